use std::fs;
use std::path::PathBuf;

use hoops_terminal::stats_api::{
    parse_awards_json, parse_career_json, parse_player_index_json, parse_profile_json,
};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn index_lookup_matches_full_name_case_insensitively() {
    let raw = read_fixture("player_index.json");

    let identity = parse_player_index_json(&raw, "jAySoN tAtUm")
        .expect("fixture should parse")
        .expect("player should be found");
    assert_eq!(identity.id, 1628369);
    assert_eq!(identity.name, "Jayson Tatum");
}

#[test]
fn index_lookup_requires_exact_full_name() {
    let raw = read_fixture("player_index.json");

    assert!(
        parse_player_index_json(&raw, "Tatum")
            .expect("fixture should parse")
            .is_none()
    );
    assert!(
        parse_player_index_json(&raw, "Jayson Tatum Jr.")
            .expect("fixture should parse")
            .is_none()
    );
}

#[test]
fn profile_carries_team_and_position() {
    let raw = read_fixture("player_profile.json");

    let profile = parse_profile_json(&raw).expect("fixture should parse");
    assert_eq!(profile.display_name, "Jayson Tatum");
    assert_eq!(profile.team_abbr, "BOS");
    assert_eq!(profile.team_name, "Celtics");
    assert_eq!(profile.position, "F-G");
}

#[test]
fn career_parse_splits_seasons_and_totals() {
    let raw = read_fixture("player_career.json");

    let career = parse_career_json(&raw).expect("fixture should parse");
    assert_eq!(career.seasons.len(), 2);
    let latest = &career.seasons[1];
    assert_eq!(latest.season_id, "2023-24");
    assert_eq!(latest.team_abbr, "BOS");
    assert_eq!(latest.gp, 74.0);
    assert_eq!(latest.pts, 1988.0);

    let totals = career.career.expect("career totals row should exist");
    assert_eq!(totals.gp, 516.0);
    assert_eq!(totals.pts, 12000.0);
}

#[test]
fn awards_format_description_and_year() {
    let raw = read_fixture("player_awards.json");

    let awards = parse_awards_json(&raw).expect("fixture should parse");
    assert_eq!(
        awards,
        vec![
            "All-NBA (2023)".to_string(),
            "NBA All-Star (2022)".to_string(),
            // Season cells that do not lead with a year pass through verbatim.
            "All-Rookie Team (Rising Stars)".to_string(),
        ]
    );
}

#[test]
fn missing_awards_table_is_an_empty_list() {
    let raw = r#"{"resource":"playerawards","resultSets":[]}"#;
    assert!(parse_awards_json(raw).expect("empty payload should parse").is_empty());
}
