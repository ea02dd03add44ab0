//! Battle-format identifier normalization.

/// Normalize a user-supplied format identifier to the form the data host
/// uses: lowercased, trimmed, internal whitespace removed. Any identifier
/// containing the canonical competitive ladder `gen9ou` collapses to
/// exactly `gen9ou`.
pub fn normalize_format(raw: &str) -> String {
    let clean: String = raw.trim().to_lowercase().split_whitespace().collect();
    if clean.contains("gen9ou") {
        "gen9ou".to_string()
    } else {
        clean
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaced_mixed_case_collapses_to_canonical() {
        assert_eq!(normalize_format(" Gen 9 OU "), "gen9ou");
    }

    #[test]
    fn canonical_alias_wins_over_decorations() {
        assert_eq!(normalize_format("gen9ou-series-2"), "gen9ou");
    }

    #[test]
    fn other_formats_pass_through_normalized() {
        assert_eq!(normalize_format("Gen 9 Ubers"), "gen9ubers");
        assert_eq!(normalize_format("gen5ou"), "gen5ou");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize_format("   "), "");
    }
}
