use std::env;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Local};
use reqwest::blocking::Client;

use crate::advanced_fetch::{self, AdvancedSignal};
use crate::board_fetch::{self, BoardSignal};
use crate::forum_fetch::{self, ForumSignal};
use crate::http_cache::{FetchContext, HttpCache};
use crate::http_client::http_client;
use crate::positions::precise_positions;
use crate::stats_api::{self, CareerStats, PlayerIdentity, PlayerProfile, SeasonTotals};
use crate::style::{StyleVerdict, classify_style};
use crate::trend::{CareerAverages, TrendSummary, compute_trend};

// Row marker the provider uses for a multi-team season's combined totals.
const COMBINED_TEAM_MARKER: &str = "TOT";

/// Per-game values for the requested season. `None` is the explicit
/// "not available" sentinel; a real zero stays a number.
#[derive(Debug, Clone, Default)]
pub struct SeasonLine {
    pub games_played: u32,
    pub pts: Option<f64>,
    pub reb: Option<f64>,
    pub ast: Option<f64>,
    pub stl: Option<f64>,
    pub blk: Option<f64>,
    pub tov: Option<f64>,
    pub ato_ratio: Option<f64>,
    pub fg_pct: Option<f64>,
    pub ft_pct: Option<f64>,
    pub fta: Option<f64>,
    pub min: Option<f64>,
}

/// Best-effort signals from the external sites. A deselected source is
/// `None`; a selected one always carries a record, sentinel-filled on failure.
#[derive(Debug, Clone, Default)]
pub struct EnrichmentSignal {
    pub advanced: Option<AdvancedSignal>,
    pub forum: Option<ForumSignal>,
    pub board: Option<BoardSignal>,
}

#[derive(Debug, Clone)]
pub struct Report {
    pub error: Option<String>,
    pub name: String,
    pub team_abbr: String,
    pub team_full: String,
    pub position: String,
    pub precise_positions: String,
    pub season: String,
    pub line: SeasonLine,
    pub trend: TrendSummary,
    pub style: StyleVerdict,
    pub enrichment: EnrichmentSignal,
    pub awards: Vec<String>,
    pub generated_at: DateTime<Local>,
}

impl Report {
    /// Terminal error report. Keeps whatever enrichment signal was already
    /// fetched; everything else is presentation-irrelevant.
    pub fn failed(
        name: &str,
        season: &str,
        enrichment: EnrichmentSignal,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: Some(message.into()),
            name: name.to_string(),
            team_abbr: String::new(),
            team_full: String::new(),
            position: String::new(),
            precise_positions: String::new(),
            season: season.to_string(),
            line: SeasonLine::default(),
            trend: TrendSummary::unavailable(),
            style: classify_style(None, None, None),
            enrichment,
            awards: Vec::new(),
            generated_at: Local::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnrichConfig {
    pub advanced: bool,
    pub forum: bool,
    pub board: bool,
    pub delay_override: Option<Duration>,
    pub disk_cache: bool,
}

impl EnrichConfig {
    pub fn from_env() -> Self {
        let sources = env::var("ENRICH_SOURCES")
            .unwrap_or_else(|_| "all".to_string())
            .trim()
            .to_ascii_lowercase();
        let all = sources.is_empty() || sources == "all";
        let has = |key: &str| all || sources.split(',').any(|s| s.trim() == key);

        let delay_override = env::var("SCRAPE_DELAY_SECS")
            .ok()
            .and_then(|v| v.trim().parse::<f64>().ok())
            .map(|v| Duration::from_secs_f64(v.clamp(0.0, 30.0)));

        Self {
            advanced: has("advanced"),
            forum: has("forum"),
            board: has("board"),
            delay_override,
            disk_cache: env_bool("ENRICH_DISK_CACHE", true),
        }
    }
}

pub struct ReportBuilder {
    cache: HttpCache,
    config: EnrichConfig,
}

impl ReportBuilder {
    pub fn new(config: EnrichConfig) -> Self {
        let cache = if config.disk_cache {
            HttpCache::with_disk()
        } else {
            HttpCache::new()
        };
        Self { cache, config }
    }

    /// Run the whole pipeline for one query. Never returns an error: every
    /// failure ends up inside the Report.
    pub fn build(&self, name: &str, season: &str) -> Report {
        // Enrichment runs first and unconditionally, so even an unresolved
        // identity still reports the signal that was gathered.
        let enrichment = self.fetch_enrichment(name, season);

        let client = match http_client() {
            Ok(client) => client,
            Err(err) => {
                return Report::failed(
                    name,
                    season,
                    enrichment,
                    format!("processing failed: {err:#}"),
                );
            }
        };

        let identity = match stats_api::lookup_player(client, &self.cache, name, season) {
            Ok(Some(identity)) => identity,
            Ok(None) => {
                return Report::failed(
                    name,
                    season,
                    enrichment,
                    format!("no player found named \"{name}\"; check the spelling"),
                );
            }
            Err(err) => {
                return Report::failed(
                    name,
                    season,
                    enrichment,
                    format!("processing failed: {err:#}"),
                );
            }
        };

        match self.fetch_primary(client, identity.id) {
            Ok((profile, career, awards)) => {
                assemble_report(&identity, &profile, &career, awards, enrichment, season)
            }
            Err(err) => Report::failed(
                name,
                season,
                enrichment,
                format!("processing failed: {err:#}"),
            ),
        }
    }

    fn fetch_primary(
        &self,
        client: &Client,
        player_id: u64,
    ) -> Result<(PlayerProfile, CareerStats, Vec<String>)> {
        let profile = stats_api::fetch_profile(client, player_id)?;
        let career = stats_api::fetch_career_stats(client, player_id)?;
        let awards = stats_api::fetch_awards(client, player_id)?;
        Ok((profile, career, awards))
    }

    fn fetch_enrichment(&self, name: &str, season: &str) -> EnrichmentSignal {
        let Ok(client) = http_client() else {
            return EnrichmentSignal::default();
        };
        let ctx = FetchContext {
            client,
            cache: &self.cache,
            delay_override: self.config.delay_override,
        };
        EnrichmentSignal {
            advanced: self
                .config
                .advanced
                .then(|| advanced_fetch::fetch_advanced(&ctx, name, season)),
            forum: self.config.forum.then(|| forum_fetch::fetch_forum(&ctx, name)),
            board: self.config.board.then(|| board_fetch::fetch_board(&ctx, name)),
        }
    }
}

/// Pure assembly over already-fetched inputs: derives the per-game line,
/// classifies style and trend, and flattens everything into one record.
pub fn assemble_report(
    identity: &PlayerIdentity,
    profile: &PlayerProfile,
    career: &CareerStats,
    awards: Vec<String>,
    enrichment: EnrichmentSignal,
    season: &str,
) -> Report {
    let season_rows: Vec<&SeasonTotals> = career
        .seasons
        .iter()
        .filter(|s| s.season_id == season)
        .collect();

    let (team_abbr, team_full) = team_fields(&season_rows, profile);

    let stat_row = season_rows
        .iter()
        .copied()
        .find(|r| r.team_abbr == COMBINED_TEAM_MARKER)
        .or_else(|| season_rows.last().copied());
    let line = match stat_row {
        Some(row) if row.gp > 0.0 => derive_season_line(row),
        _ => SeasonLine::default(),
    };

    let career_avg = career.career.as_ref().and_then(|totals| {
        if totals.gp > 0.0 {
            Some(CareerAverages {
                pts: totals.pts / totals.gp,
                reb: totals.reb / totals.gp,
                ast: totals.ast / totals.gp,
            })
        } else {
            None
        }
    });
    let trend = compute_trend(line.pts, line.reb, line.ast, career_avg.as_ref());
    let style = classify_style(line.pts, line.ast, line.reb);

    let name = if profile.display_name.is_empty() {
        identity.name.clone()
    } else {
        profile.display_name.clone()
    };

    Report {
        error: None,
        name,
        team_abbr,
        team_full,
        position: profile.position.clone(),
        precise_positions: precise_positions(&profile.position),
        season: season.to_string(),
        line,
        trend,
        style,
        enrichment,
        awards,
        generated_at: Local::now(),
    }
}

fn team_fields(rows: &[&SeasonTotals], profile: &PlayerProfile) -> (String, String) {
    if rows.is_empty() {
        return (profile.team_abbr.clone(), profile.team_name.clone());
    }

    let traded = rows.iter().any(|r| r.team_abbr == COMBINED_TEAM_MARKER);
    if traded {
        let abbrs: Vec<&str> = rows
            .iter()
            .map(|r| r.team_abbr.as_str())
            .filter(|a| *a != COMBINED_TEAM_MARKER)
            .collect();
        let joined = abbrs.join(", ");
        (joined.clone(), format!("Multiple teams: {joined}"))
    } else {
        let abbr = rows[0].team_abbr.clone();
        (abbr.clone(), abbr)
    }
}

fn derive_season_line(row: &SeasonTotals) -> SeasonLine {
    let gp = row.gp;
    let per_game = |total: f64| Some(round1(total / gp));

    let ast = per_game(row.ast);
    let tov = per_game(row.tov);
    // A/TO over the rounded per-game values; zero turnovers means no ratio.
    let ato_ratio = match (ast, tov) {
        (Some(a), Some(t)) if t > 0.0 => Some(round2(a / t)),
        _ => None,
    };

    SeasonLine {
        games_played: gp as u32,
        pts: per_game(row.pts),
        reb: per_game(row.reb),
        ast,
        stl: per_game(row.stl),
        blk: per_game(row.blk),
        tov,
        ato_ratio,
        fg_pct: Some(round1(row.fg_pct * 100.0)),
        ft_pct: Some(round1(row.ft_pct * 100.0)),
        fta: per_game(row.fta),
        min: per_game(row.min),
    }
}

fn env_bool(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(v) => matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
