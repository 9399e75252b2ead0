const ASCENDING_DELTA: f64 = 3.0;
const STABLE_BAND: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct CareerAverages {
    pub pts: f64,
    pub reb: f64,
    pub ast: f64,
}

#[derive(Debug, Clone)]
pub struct TrendSummary {
    pub status: String,
    pub delta_pts: Option<f64>,
    pub delta_reb: Option<f64>,
    pub delta_ast: Option<f64>,
}

impl TrendSummary {
    pub fn unavailable() -> Self {
        Self {
            status: "Cannot compute career trend".to_string(),
            delta_pts: None,
            delta_reb: None,
            delta_ast: None,
        }
    }
}

/// Season-over-career deltas plus a bucket label driven by the scoring delta.
/// Collapses to the unavailable state when either side of the comparison is
/// missing.
pub fn compute_trend(
    season_pts: Option<f64>,
    season_reb: Option<f64>,
    season_ast: Option<f64>,
    career: Option<&CareerAverages>,
) -> TrendSummary {
    let (Some(pts), Some(career)) = (season_pts, career) else {
        return TrendSummary::unavailable();
    };

    let delta_pts = round1(pts - career.pts);
    TrendSummary {
        status: bucket_label(delta_pts).to_string(),
        delta_pts: Some(delta_pts),
        delta_reb: season_reb.map(|v| round1(v - career.reb)),
        delta_ast: season_ast.map(|v| round1(v - career.ast)),
    }
}

fn bucket_label(delta_pts: f64) -> &'static str {
    if delta_pts >= ASCENDING_DELTA {
        "Ascending"
    } else if delta_pts.abs() < STABLE_BAND {
        "Stable Peak"
    } else if delta_pts < -ASCENDING_DELTA {
        "Declining"
    } else {
        "Fluctuating"
    }
}

pub fn format_delta(delta: Option<f64>) -> String {
    match delta {
        Some(d) => format!("{d:+.1}"),
        None => "N/A".to_string(),
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn career(pts: f64) -> CareerAverages {
        CareerAverages {
            pts,
            reb: 5.0,
            ast: 4.0,
        }
    }

    #[test]
    fn buckets_cover_the_line() {
        let t = compute_trend(Some(23.0), None, None, Some(&career(20.0)));
        assert_eq!(t.status, "Ascending");
        let t = compute_trend(Some(20.5), None, None, Some(&career(20.0)));
        assert_eq!(t.status, "Stable Peak");
        let t = compute_trend(Some(16.5), None, None, Some(&career(20.0)));
        assert_eq!(t.status, "Declining");
        let t = compute_trend(Some(22.0), None, None, Some(&career(20.0)));
        assert_eq!(t.status, "Fluctuating");
    }

    #[test]
    fn deltas_round_to_one_decimal() {
        let t = compute_trend(Some(21.234), Some(6.06), Some(3.55), Some(&career(20.0)));
        assert_eq!(t.delta_pts, Some(1.2));
        assert_eq!(t.delta_reb, Some(1.1));
        assert_eq!(t.delta_ast, Some(-0.5));
    }

    #[test]
    fn missing_career_collapses_to_unavailable() {
        let t = compute_trend(Some(21.0), Some(6.0), Some(3.0), None);
        assert_eq!(t.status, "Cannot compute career trend");
        assert!(t.delta_pts.is_none());
        let t = compute_trend(None, None, None, Some(&career(20.0)));
        assert!(t.delta_pts.is_none());
    }

    #[test]
    fn delta_formatting_is_signed() {
        assert_eq!(format_delta(Some(2.0)), "+2.0");
        assert_eq!(format_delta(Some(-3.5)), "-3.5");
        assert_eq!(format_delta(None), "N/A");
    }
}
