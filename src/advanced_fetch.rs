use std::time::Duration;

use anyhow::{Context, Result};
use scraper::{Html, Selector};

use crate::http_cache::{FetchContext, fetch_text_cached};

const ADVANCED_BASE_URL: &str = "https://www.basketball-reference.com";
// The reference site asks crawlers for a slow cadence.
const ADVANCED_DELAY: Duration = Duration::from_secs(4);
const ADVANCED_TTL: Duration = Duration::from_secs(6 * 3600);

#[derive(Debug, Clone)]
pub struct AdvancedSignal {
    pub per: Option<f64>,
    pub vorp: Option<f64>,
    pub status: String,
}

impl AdvancedSignal {
    fn empty(status: impl Into<String>) -> Self {
        Self {
            per: None,
            vorp: None,
            status: status.into(),
        }
    }
}

/// Best-effort PER/VORP pull from the player's advanced table. Never fails
/// across this boundary: every error collapses into the status field.
pub fn fetch_advanced(ctx: &FetchContext, name: &str, season: &str) -> AdvancedSignal {
    match try_fetch(ctx, name, season) {
        Ok(signal) => signal,
        Err(err) => AdvancedSignal::empty(err.to_string()),
    }
}

fn try_fetch(ctx: &FetchContext, name: &str, season: &str) -> Result<AdvancedSignal> {
    let Some(slug) = player_slug(name) else {
        return Ok(AdvancedSignal::empty("could not derive a page slug"));
    };
    let Some(initial) = slug.chars().next() else {
        return Ok(AdvancedSignal::empty("could not derive a page slug"));
    };

    let url = format!("{ADVANCED_BASE_URL}/players/{initial}/{slug}.html");
    let body = fetch_text_cached(
        ctx.client,
        ctx.cache,
        &url,
        ADVANCED_TTL,
        ctx.delay(ADVANCED_DELAY),
        &[],
    )?;
    parse_advanced_html(&body, season)
}

// Crude "last5 + first2 + 01" guess at the site's player slug. Duplicate
// surnames get disambiguating suffixes upstream that this cannot derive, so
// misses are expected and degrade to a status sentinel.
fn player_slug(name: &str) -> Option<String> {
    let lowered = name.trim().to_lowercase();
    let mut parts = lowered.split_whitespace();
    let first = parts.next()?;
    let last = parts.last()?;

    let mut slug: String = last.chars().take(5).collect();
    slug.extend(first.chars().take(2));
    slug.push_str("01");
    Some(slug)
}

pub fn parse_advanced_html(html: &str, season: &str) -> Result<AdvancedSignal> {
    let document = Html::parse_document(html);
    let row_selector = Selector::parse("table#advanced tbody tr")
        .ok()
        .context("invalid row selector")?;
    let season_selector = Selector::parse("th[data-stat=\"season\"]")
        .ok()
        .context("invalid season selector")?;
    let per_selector = Selector::parse("td[data-stat=\"per\"]")
        .ok()
        .context("invalid per selector")?;
    let vorp_selector = Selector::parse("td[data-stat=\"vorp\"]")
        .ok()
        .context("invalid vorp selector")?;

    for row in document.select(&row_selector) {
        let Some(season_cell) = row.select(&season_selector).next() else {
            continue;
        };
        if cell_text(season_cell) != season {
            continue;
        }

        let per = row
            .select(&per_selector)
            .next()
            .and_then(|cell| cell_text(cell).parse::<f64>().ok())
            .map(round1);
        let vorp = row
            .select(&vorp_selector)
            .next()
            .and_then(|cell| cell_text(cell).parse::<f64>().ok())
            .map(round1);

        return Ok(AdvancedSignal {
            per,
            vorp,
            status: "success".to_string(),
        });
    }

    Ok(AdvancedSignal::empty("no data found"))
}

fn cell_text(cell: scraper::ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_takes_last_five_first_two() {
        assert_eq!(player_slug("Jayson Tatum").as_deref(), Some("tatumja01"));
        assert_eq!(player_slug("Luka Doncic").as_deref(), Some("doncilu01"));
        assert_eq!(player_slug("Shai Gilgeous-Alexander").as_deref(), Some("gilgesh01"));
    }

    #[test]
    fn slug_needs_two_name_parts() {
        assert_eq!(player_slug("Nene"), None);
        assert_eq!(player_slug("   "), None);
    }
}
