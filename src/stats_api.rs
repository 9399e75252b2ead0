use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde_json::Value;

use crate::http_cache::{HttpCache, fetch_text_cached};

const STATS_BASE_URL: &str = "https://stats.nba.com/stats";
const PLAYER_INDEX_TTL: Duration = Duration::from_secs(6 * 3600);

// stats.nba.com drops requests that do not look like its own web app.
const STATS_HEADERS: &[(&str, &str)] = &[
    ("Referer", "https://www.nba.com/"),
    ("Origin", "https://www.nba.com"),
    ("x-nba-stats-origin", "stats"),
    ("x-nba-stats-token", "true"),
];

#[derive(Debug, Clone)]
pub struct PlayerIdentity {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct PlayerProfile {
    pub display_name: String,
    pub team_abbr: String,
    pub team_name: String,
    pub position: String,
}

#[derive(Debug, Clone)]
pub struct SeasonTotals {
    pub season_id: String,
    pub team_abbr: String,
    pub gp: f64,
    pub min: f64,
    pub fg_pct: f64,
    pub ft_pct: f64,
    pub fta: f64,
    pub reb: f64,
    pub ast: f64,
    pub stl: f64,
    pub blk: f64,
    pub tov: f64,
    pub pts: f64,
}

#[derive(Debug, Clone)]
pub struct CareerTotals {
    pub gp: f64,
    pub pts: f64,
    pub reb: f64,
    pub ast: f64,
}

#[derive(Debug, Clone, Default)]
pub struct CareerStats {
    pub seasons: Vec<SeasonTotals>,
    pub career: Option<CareerTotals>,
}

/// One named table out of the provider's result-set envelope. Cells are
/// addressed by header name so column reordering upstream stays harmless.
#[derive(Debug, Clone)]
pub struct ResultSet {
    headers: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.eq_ignore_ascii_case(name))
    }

    pub fn str_cell(&self, row: usize, column: &str) -> Option<String> {
        match self.cell(row, column)? {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn f64_cell(&self, row: usize, column: &str) -> Option<f64> {
        match self.cell(row, column)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn u64_cell(&self, row: usize, column: &str) -> Option<u64> {
        match self.cell(row, column)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        }
    }

    fn cell(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.column(column)?;
        self.rows.get(row)?.get(col)
    }
}

pub fn parse_result_sets(raw: &str) -> Result<HashMap<String, ResultSet>> {
    let root: Value = serde_json::from_str(raw.trim()).context("invalid stats json")?;
    let sets = root
        .get("resultSets")
        .and_then(|v| v.as_array())
        .context("stats payload has no resultSets")?;

    let mut out = HashMap::new();
    for set in sets {
        let Some(name) = set.get("name").and_then(|v| v.as_str()) else {
            continue;
        };
        let headers = set
            .get("headers")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|h| h.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        let rows = set
            .get("rowSet")
            .and_then(|v| v.as_array())
            .map(|arr| arr.iter().filter_map(|r| r.as_array().cloned()).collect())
            .unwrap_or_default();
        out.insert(name.to_string(), ResultSet { headers, rows });
    }
    Ok(out)
}

/// Exact case-insensitive full-name match against the league player index.
/// The index body is served from the TTL cache between queries.
pub fn lookup_player(
    client: &Client,
    cache: &HttpCache,
    name: &str,
    season: &str,
) -> Result<Option<PlayerIdentity>> {
    let url =
        format!("{STATS_BASE_URL}/commonallplayers?IsOnlyCurrentSeason=0&LeagueID=00&Season={season}");
    let body = fetch_text_cached(
        client,
        cache,
        &url,
        PLAYER_INDEX_TTL,
        Duration::ZERO,
        STATS_HEADERS,
    )
    .context("player index fetch failed")?;
    parse_player_index_json(&body, name)
}

pub fn parse_player_index_json(raw: &str, name: &str) -> Result<Option<PlayerIdentity>> {
    let sets = parse_result_sets(raw)?;
    let set = sets
        .get("CommonAllPlayers")
        .context("player index table missing")?;

    let wanted = name.trim();
    for row in 0..set.len() {
        let Some(display) = set.str_cell(row, "DISPLAY_FIRST_LAST") else {
            continue;
        };
        if !display.eq_ignore_ascii_case(wanted) {
            continue;
        }
        let Some(id) = set.u64_cell(row, "PERSON_ID") else {
            continue;
        };
        return Ok(Some(PlayerIdentity { id, name: display }));
    }
    Ok(None)
}

pub fn fetch_profile(client: &Client, player_id: u64) -> Result<PlayerProfile> {
    let url = format!("{STATS_BASE_URL}/commonplayerinfo?PlayerID={player_id}");
    let body = fetch_stats_body(client, &url).context("player info fetch failed")?;
    parse_profile_json(&body)
}

pub fn parse_profile_json(raw: &str) -> Result<PlayerProfile> {
    let sets = parse_result_sets(raw)?;
    let set = sets
        .get("CommonPlayerInfo")
        .context("player info table missing")?;
    if set.is_empty() {
        anyhow::bail!("player info table is empty");
    }

    Ok(PlayerProfile {
        display_name: set.str_cell(0, "DISPLAY_FIRST_LAST").unwrap_or_default(),
        team_abbr: set.str_cell(0, "TEAM_ABBREVIATION").unwrap_or_default(),
        team_name: set.str_cell(0, "TEAM_NAME").unwrap_or_default(),
        position: set.str_cell(0, "POSITION").unwrap_or_default(),
    })
}

pub fn fetch_career_stats(client: &Client, player_id: u64) -> Result<CareerStats> {
    let url = format!("{STATS_BASE_URL}/playercareerstats?PerMode=Totals&PlayerID={player_id}");
    let body = fetch_stats_body(client, &url).context("career stats fetch failed")?;
    parse_career_json(&body)
}

pub fn parse_career_json(raw: &str) -> Result<CareerStats> {
    let sets = parse_result_sets(raw)?;
    let season_set = sets
        .get("SeasonTotalsRegularSeason")
        .context("season totals table missing")?;

    let mut seasons = Vec::new();
    for row in 0..season_set.len() {
        let Some(season_id) = season_set.str_cell(row, "SEASON_ID") else {
            continue;
        };
        seasons.push(SeasonTotals {
            season_id,
            team_abbr: season_set.str_cell(row, "TEAM_ABBREVIATION").unwrap_or_default(),
            gp: season_set.f64_cell(row, "GP").unwrap_or(0.0),
            min: season_set.f64_cell(row, "MIN").unwrap_or(0.0),
            fg_pct: season_set.f64_cell(row, "FG_PCT").unwrap_or(0.0),
            ft_pct: season_set.f64_cell(row, "FT_PCT").unwrap_or(0.0),
            fta: season_set.f64_cell(row, "FTA").unwrap_or(0.0),
            reb: season_set.f64_cell(row, "REB").unwrap_or(0.0),
            ast: season_set.f64_cell(row, "AST").unwrap_or(0.0),
            stl: season_set.f64_cell(row, "STL").unwrap_or(0.0),
            blk: season_set.f64_cell(row, "BLK").unwrap_or(0.0),
            tov: season_set.f64_cell(row, "TOV").unwrap_or(0.0),
            pts: season_set.f64_cell(row, "PTS").unwrap_or(0.0),
        });
    }

    let career = sets.get("CareerTotalsRegularSeason").and_then(|set| {
        if set.is_empty() {
            return None;
        }
        Some(CareerTotals {
            gp: set.f64_cell(0, "GP")?,
            pts: set.f64_cell(0, "PTS")?,
            reb: set.f64_cell(0, "REB")?,
            ast: set.f64_cell(0, "AST")?,
        })
    });

    Ok(CareerStats { seasons, career })
}

pub fn fetch_awards(client: &Client, player_id: u64) -> Result<Vec<String>> {
    let url = format!("{STATS_BASE_URL}/playerawards?PlayerID={player_id}");
    let body = fetch_stats_body(client, &url).context("awards fetch failed")?;
    parse_awards_json(&body)
}

/// Awards as "Description (YYYY)" strings in the provider's native order.
pub fn parse_awards_json(raw: &str) -> Result<Vec<String>> {
    let sets = parse_result_sets(raw)?;
    let Some(set) = sets.get("PlayerAwards") else {
        return Ok(Vec::new());
    };

    let mut awards = Vec::new();
    for row in 0..set.len() {
        let Some(description) = set.str_cell(row, "DESCRIPTION") else {
            continue;
        };
        if description.is_empty() {
            continue;
        }
        match award_year(set.str_cell(row, "SEASON").as_deref()) {
            Some(year) => awards.push(format!("{description} ({year})")),
            None => awards.push(description),
        }
    }
    Ok(awards)
}

// The season cell usually leads with the start year ("2023-24" -> "2023");
// anything that does not is shown verbatim rather than guessed at.
fn award_year(season: Option<&str>) -> Option<String> {
    let season = season?.trim();
    if season.is_empty() {
        return None;
    }
    match season.get(..4) {
        Some(prefix) if prefix.chars().all(|c| c.is_ascii_digit()) => Some(prefix.to_string()),
        _ => Some(season.to_string()),
    }
}

fn fetch_stats_body(client: &Client, url: &str) -> Result<String> {
    let mut req = client.get(url);
    for (name, value) in STATS_HEADERS {
        req = req.header(*name, *value);
    }
    let resp = req.send().context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        anyhow::bail!("http {}", status);
    }
    Ok(body)
}
