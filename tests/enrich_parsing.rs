use std::fs;
use std::path::PathBuf;

use hoops_terminal::advanced_fetch::parse_advanced_html;
use hoops_terminal::board_fetch::parse_board_html;
use hoops_terminal::forum_fetch::parse_forum_html;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn advanced_table_season_row_is_extracted_and_rounded() {
    let raw = read_fixture("advanced_page.html");

    let signal = parse_advanced_html(&raw, "2023-24").expect("fixture should parse");
    assert_eq!(signal.status, "success");
    assert_eq!(signal.per, Some(22.2));
    assert_eq!(signal.vorp, Some(4.3));
}

#[test]
fn advanced_missing_season_reports_no_data() {
    let raw = read_fixture("advanced_page.html");

    let signal = parse_advanced_html(&raw, "2019-20").expect("fixture should parse");
    assert_eq!(signal.status, "no data found");
    assert!(signal.per.is_none());
    assert!(signal.vorp.is_none());
}

#[test]
fn advanced_page_without_table_reports_no_data() {
    let signal = parse_advanced_html("<html><body><p>404</p></body></html>", "2023-24")
        .expect("plain page should parse");
    assert_eq!(signal.status, "no data found");
}

#[test]
fn forum_results_produce_stars_and_tags() {
    let raw = read_fixture("forum_search.html");

    let signal = parse_forum_html(&raw).expect("fixture should parse");
    assert_eq!(signal.status, "success");
    assert_eq!(signal.post_count, Some(8));
    assert_eq!(signal.stars, Some(1));
    assert_eq!(
        signal.tags,
        vec!["trade talk".to_string(), "injury watch".to_string()]
    );
}

#[test]
fn quiet_forum_falls_back_to_default_tags() {
    let raw = read_fixture("forum_quiet.html");

    let signal = parse_forum_html(&raw).expect("fixture should parse");
    assert_eq!(signal.post_count, Some(2));
    assert_eq!(signal.stars, Some(1));
    assert_eq!(
        signal.tags,
        vec!["general buzz".to_string(), "fan chatter".to_string()]
    );
}

#[test]
fn empty_forum_page_reports_no_data() {
    let signal = parse_forum_html("<html><body><p>No results.</p></body></html>")
        .expect("plain page should parse");
    assert_eq!(signal.status, "no data found");
    assert!(signal.post_count.is_none());
    assert!(signal.stars.is_none());
    assert!(signal.tags.is_empty());
}

#[test]
fn board_titles_cap_at_three_talking_points() {
    let raw = read_fixture("board_search.html");

    let signal = parse_board_html(&raw).expect("fixture should parse");
    assert_eq!(signal.status, "success");
    assert_eq!(signal.talking_points.len(), 3);
    assert_eq!(
        signal.talking_points[0],
        "Tatum drops 41 in Game 5 to force a decider"
    );
}

#[test]
fn empty_board_page_reports_no_data() {
    let signal = parse_board_html("<html><body></body></html>").expect("plain page should parse");
    assert_eq!(signal.status, "no data found");
    assert!(signal.talking_points.is_empty());
}
