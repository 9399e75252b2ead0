use std::time::Duration;

use anyhow::{Context, Result};
use scraper::{Html, Selector};

use crate::http_cache::{FetchContext, fetch_text_cached};

const BOARD_SEARCH_URL: &str = "https://old.reddit.com/r/nba/search";
const BOARD_TIME_WINDOW: &str = "week";
const BOARD_DELAY: Duration = Duration::from_millis(1500);
const BOARD_TTL: Duration = Duration::from_secs(3 * 3600);

const MAX_TALKING_POINTS: usize = 3;

#[derive(Debug, Clone)]
pub struct BoardSignal {
    pub talking_points: Vec<String>,
    pub status: String,
}

impl BoardSignal {
    fn empty(status: impl Into<String>) -> Self {
        Self {
            talking_points: Vec::new(),
            status: status.into(),
        }
    }
}

/// Top talking points from a link-aggregator search over the past week.
/// Failures collapse into the status field.
pub fn fetch_board(ctx: &FetchContext, name: &str) -> BoardSignal {
    match try_fetch(ctx, name) {
        Ok(signal) => signal,
        Err(err) => BoardSignal::empty(err.to_string()),
    }
}

fn try_fetch(ctx: &FetchContext, name: &str) -> Result<BoardSignal> {
    let query = name.trim().replace(' ', "+");
    let url =
        format!("{BOARD_SEARCH_URL}?q={query}&restrict_sr=on&sort=top&t={BOARD_TIME_WINDOW}");
    let body = fetch_text_cached(
        ctx.client,
        ctx.cache,
        &url,
        BOARD_TTL,
        ctx.delay(BOARD_DELAY),
        &[],
    )?;
    parse_board_html(&body)
}

pub fn parse_board_html(html: &str) -> Result<BoardSignal> {
    let document = Html::parse_document(html);
    let title_selector = Selector::parse("div.search-result-link a.search-title")
        .ok()
        .context("invalid title selector")?;

    let mut talking_points = Vec::new();
    for title in document.select(&title_selector) {
        let text = title.text().collect::<String>().trim().to_string();
        if text.is_empty() {
            continue;
        }
        talking_points.push(text);
        if talking_points.len() == MAX_TALKING_POINTS {
            break;
        }
    }

    if talking_points.is_empty() {
        return Ok(BoardSignal::empty("no data found"));
    }

    Ok(BoardSignal {
        talking_points,
        status: "success".to_string(),
    })
}
