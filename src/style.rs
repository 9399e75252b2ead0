const HIGH_PTS: f64 = 25.0;
const HIGH_AST: f64 = 8.0;
const HIGH_REB: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleVerdict {
    pub label: &'static str,
    pub summary: &'static str,
}

/// Rule-based style read over per-game scoring, passing and rebounding.
/// Branches fire in priority order; the first match wins.
pub fn classify_style(pts: Option<f64>, ast: Option<f64>, reb: Option<f64>) -> StyleVerdict {
    let (Some(pts), Some(ast), Some(reb)) = (pts, ast, reb) else {
        return StyleVerdict {
            label: "Insufficient data",
            summary: "Try a season where the player logged games.",
        };
    };

    if pts >= HIGH_PTS && ast >= 6.0 && reb >= 6.0 {
        StyleVerdict {
            label: "Elite All-Around Star",
            summary: "Scoring, playmaking and rebounding rolled into one franchise player.",
        }
    } else if pts >= HIGH_PTS {
        StyleVerdict {
            label: "Volume Scorer",
            summary: "A top-shelf scorer who gets buckets from anywhere on the floor.",
        }
    } else if ast >= HIGH_AST && pts >= 15.0 {
        StyleVerdict {
            label: "Playmaking Maestro",
            summary: "Pass-first engine of the offense with a reliable scoring punch.",
        }
    } else if reb >= HIGH_REB && pts < 15.0 {
        StyleVerdict {
            label: "Rebounding/Defense Anchor",
            summary: "Interior defense and glass-cleaning specialist, the team's backbone.",
        }
    } else {
        StyleVerdict {
            label: "Role Player",
            summary: "A dependable rotation piece.",
        }
    }
}
