use crate::report::{EnrichmentSignal, Report};
use crate::trend::format_delta;

const NOT_AVAILABLE: &str = "N/A";

/// Flatten a report into the displayed text block. Section order is fixed;
/// an error report renders as heading + message and nothing else.
pub fn render_report(report: &Report) -> String {
    if let Some(error) = &report.error {
        return format!("== Report error ==\n\n{error}");
    }

    let mut lines: Vec<String> = Vec::new();
    lines.push(format!(
        "== {} ({}) status report ==",
        report.name,
        text_or_na(&report.team_abbr)
    ));
    lines.push(format!(
        "Generated: {}",
        report.generated_at.format("%Y-%m-%d %H:%M")
    ));
    lines.push(format!("Team this season: {}", text_or_na(&report.team_full)));
    lines.push(format!("Games played: {}", report.line.games_played));
    lines.push(format!("Positions: {}", text_or_na(&report.precise_positions)));
    lines.push(String::new());

    lines.push("-- Enrichment signals --".to_string());
    push_enrichment(&mut lines, &report.enrichment);
    lines.push(String::new());

    lines.push(format!("-- {} per-game averages --", report.season));
    if report.line.games_played == 0 {
        lines.push(format!("No games recorded in {}.", report.season));
    }
    lines.push(format!(
        "MIN: {} | PTS: {} | REB: {} | AST: {}",
        fmt1(report.line.min),
        fmt1(report.line.pts),
        fmt1(report.line.reb),
        fmt1(report.line.ast)
    ));
    lines.push(format!(
        "STL: {} | BLK: {} | TOV: {} | A/TO: {}",
        fmt1(report.line.stl),
        fmt1(report.line.blk),
        fmt1(report.line.tov),
        fmt2(report.line.ato_ratio)
    ));
    lines.push(format!(
        "FG%: {} | FT%: {} | FTA: {}",
        fmt1(report.line.fg_pct),
        fmt1(report.line.ft_pct),
        fmt1(report.line.fta)
    ));
    lines.push(String::new());

    lines.push("-- Career trend --".to_string());
    lines.push(format!("Status: {}", report.trend.status));
    lines.push(format!(
        "PTS delta: {} (vs career average)",
        format_delta(report.trend.delta_pts)
    ));
    lines.push(format!("REB delta: {}", format_delta(report.trend.delta_reb)));
    lines.push(format!("AST delta: {}", format_delta(report.trend.delta_ast)));
    lines.push(String::new());

    lines.push("-- Style profile --".to_string());
    lines.push(format!("Core style: {}", report.style.label));
    lines.push(format!("Quick take: {}", report.style.summary));
    lines.push(String::new());

    lines.push("-- Official awards --".to_string());
    if report.awards.is_empty() {
        lines.push("* No official awards on record".to_string());
    } else {
        for award in &report.awards {
            lines.push(format!("* {award}"));
        }
    }

    lines.join("\n")
}

fn push_enrichment(lines: &mut Vec<String>, signal: &EnrichmentSignal) {
    let mut any = false;

    if let Some(advanced) = &signal.advanced {
        any = true;
        lines.push(format!(
            "Advanced: PER {} | VORP {} ({})",
            fmt1(advanced.per),
            fmt1(advanced.vorp),
            advanced.status
        ));
    }

    if let Some(forum) = &signal.forum {
        any = true;
        match (forum.stars, forum.post_count) {
            (Some(stars), Some(count)) => lines.push(format!(
                "Forum buzz: {stars}/5 stars across {count} posts | tags: {} ({})",
                forum.tags.join(", "),
                forum.status
            )),
            _ => lines.push(format!("Forum buzz: {NOT_AVAILABLE} ({})", forum.status)),
        }
    }

    if let Some(board) = &signal.board {
        any = true;
        if board.talking_points.is_empty() {
            lines.push(format!("Board talk: {NOT_AVAILABLE} ({})", board.status));
        } else {
            lines.push(format!("Board talk ({}):", board.status));
            for point in &board.talking_points {
                lines.push(format!("  * {point}"));
            }
        }
    }

    if !any {
        lines.push("No enrichment sources selected".to_string());
    }
}

fn fmt1(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}"),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn fmt2(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn text_or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        NOT_AVAILABLE
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::EnrichmentSignal;

    #[test]
    fn error_report_renders_heading_and_message_only() {
        let report = Report::failed(
            "Nobody Realman",
            "2023-24",
            EnrichmentSignal::default(),
            "no player found named \"Nobody Realman\"; check the spelling",
        );
        let text = render_report(&report);
        assert_eq!(
            text,
            "== Report error ==\n\nno player found named \"Nobody Realman\"; check the spelling"
        );
    }

    #[test]
    fn failed_report_still_carries_enrichment() {
        let enrichment = EnrichmentSignal {
            advanced: Some(crate::advanced_fetch::AdvancedSignal {
                per: None,
                vorp: None,
                status: "fetch failed (code 404)".to_string(),
            }),
            forum: None,
            board: None,
        };
        let report = Report::failed("Nobody", "2023-24", enrichment, "boom");
        assert_eq!(
            report.enrichment.advanced.as_ref().map(|a| a.status.as_str()),
            Some("fetch failed (code 404)")
        );
    }
}
