// Coarse position codes from the stats provider, expanded to the specific
// spots a player actually covers. Hybrid codes keep the provider's ordering.
const POSITION_MAP: &[(&str, &str)] = &[
    ("Guard", "PG, SG"),
    ("Forward", "SF, PF"),
    ("Center", "C"),
    ("G-F", "PG, SG, SF"),
    ("F-G", "SG, SF, PF"),
    ("F-C", "SF, PF, C"),
    ("C-F", "PF, C, SF"),
    ("G", "PG, SG"),
    ("F", "SF, PF"),
    ("C", "C"),
];

pub fn precise_positions(generic: &str) -> String {
    for (coarse, precise) in POSITION_MAP {
        if *coarse == generic {
            return (*precise).to_string();
        }
    }
    generic.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_every_known_code() {
        assert_eq!(precise_positions("Guard"), "PG, SG");
        assert_eq!(precise_positions("Forward"), "SF, PF");
        assert_eq!(precise_positions("Center"), "C");
        assert_eq!(precise_positions("G-F"), "PG, SG, SF");
        assert_eq!(precise_positions("F-G"), "SG, SF, PF");
        assert_eq!(precise_positions("F-C"), "SF, PF, C");
        assert_eq!(precise_positions("C-F"), "PF, C, SF");
        assert_eq!(precise_positions("G"), "PG, SG");
        assert_eq!(precise_positions("F"), "SF, PF");
        assert_eq!(precise_positions("C"), "C");
    }

    #[test]
    fn unknown_code_passes_through() {
        assert_eq!(precise_positions("Forward-Center"), "Forward-Center");
        assert_eq!(precise_positions(""), "");
    }
}
