use std::time::Duration;

use anyhow::{Context, Result};
use scraper::{Html, Selector};

use crate::http_cache::{FetchContext, fetch_text_cached};

const FORUM_SEARCH_URL: &str = "https://forums.realgm.com/boards/search.php?keywords=";
const FORUM_DELAY: Duration = Duration::from_secs(3);
const FORUM_TTL: Duration = Duration::from_secs(3 * 3600);

// A full first page of results counts as saturated buzz.
const POST_SOFT_CAP: u32 = 40;
const MAX_TAGS: usize = 2;
const DEFAULT_TAGS: [&str; 2] = ["general buzz", "fan chatter"];

// Keyword substrings scanned against titles and excerpts, in priority order.
const TOPIC_VOCAB: &[(&str, &str)] = &[
    ("trade", "trade talk"),
    ("injur", "injury watch"),
    ("mvp", "award chatter"),
    ("all-star", "award chatter"),
    ("defense", "defense"),
    ("clutch", "clutch play"),
    ("contract", "contract talk"),
    ("rookie", "young-player buzz"),
];

#[derive(Debug, Clone)]
pub struct ForumSignal {
    pub post_count: Option<u32>,
    pub stars: Option<u8>,
    pub tags: Vec<String>,
    pub status: String,
}

impl ForumSignal {
    fn empty(status: impl Into<String>) -> Self {
        Self {
            post_count: None,
            stars: None,
            tags: Vec::new(),
            status: status.into(),
        }
    }
}

/// Community buzz index from a forum search page: a 1-5 star score scaled off
/// the result count, plus up to two topic tags. Failures collapse into the
/// status field.
pub fn fetch_forum(ctx: &FetchContext, name: &str) -> ForumSignal {
    match try_fetch(ctx, name) {
        Ok(signal) => signal,
        Err(err) => ForumSignal::empty(err.to_string()),
    }
}

fn try_fetch(ctx: &FetchContext, name: &str) -> Result<ForumSignal> {
    let query = name.trim().replace(' ', "+");
    let url = format!("{FORUM_SEARCH_URL}{query}");
    let body = fetch_text_cached(
        ctx.client,
        ctx.cache,
        &url,
        FORUM_TTL,
        ctx.delay(FORUM_DELAY),
        &[],
    )?;
    parse_forum_html(&body)
}

pub fn parse_forum_html(html: &str) -> Result<ForumSignal> {
    let document = Html::parse_document(html);
    let post_selector = Selector::parse("li.row").ok().context("invalid post selector")?;
    let title_selector = Selector::parse("h3 a").ok().context("invalid title selector")?;
    let excerpt_selector = Selector::parse("div.content")
        .ok()
        .context("invalid excerpt selector")?;

    let mut count = 0u32;
    let mut blob = String::new();
    for post in document.select(&post_selector) {
        count += 1;
        for title in post.select(&title_selector) {
            blob.push_str(&title.text().collect::<String>());
            blob.push(' ');
        }
        for excerpt in post.select(&excerpt_selector) {
            blob.push_str(&excerpt.text().collect::<String>());
            blob.push(' ');
        }
    }

    if count == 0 {
        return Ok(ForumSignal::empty("no data found"));
    }

    Ok(ForumSignal {
        post_count: Some(count),
        stars: Some(star_score(count)),
        tags: topic_tags(&blob),
        status: "success".to_string(),
    })
}

fn star_score(count: u32) -> u8 {
    let scaled = (f64::from(count) / f64::from(POST_SOFT_CAP) * 5.0).round();
    scaled.clamp(1.0, 5.0) as u8
}

fn topic_tags(blob: &str) -> Vec<String> {
    let lowered = blob.to_lowercase();
    let mut tags: Vec<String> = Vec::new();
    for (needle, tag) in TOPIC_VOCAB {
        if tags.len() == MAX_TAGS {
            break;
        }
        if lowered.contains(needle) && !tags.iter().any(|t| t == tag) {
            tags.push((*tag).to_string());
        }
    }

    if tags.len() < MAX_TAGS {
        return DEFAULT_TAGS.iter().map(|t| (*t).to_string()).collect();
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_score_is_bounded() {
        assert_eq!(star_score(1), 1);
        assert_eq!(star_score(20), 3);
        assert_eq!(star_score(40), 5);
        assert_eq!(star_score(400), 5);
    }

    #[test]
    fn two_distinct_matches_win_over_defaults() {
        let tags = topic_tags("Should we trade him? His injury history scares me.");
        assert_eq!(tags, vec!["trade talk".to_string(), "injury watch".to_string()]);
    }

    #[test]
    fn duplicate_tag_labels_fall_back_to_defaults() {
        // "mvp" and "all-star" map to the same label, so only one tag lands.
        let tags = topic_tags("MVP race and All-Star voting");
        assert_eq!(tags, vec!["general buzz".to_string(), "fan chatter".to_string()]);
    }

    #[test]
    fn fewer_than_two_matches_fall_back_to_defaults() {
        assert_eq!(
            topic_tags("nothing of note"),
            vec!["general buzz".to_string(), "fan chatter".to_string()]
        );
    }
}
