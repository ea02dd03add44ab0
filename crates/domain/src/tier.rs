use serde::{Deserialize, Deserializer, Serialize};

/// How much competitive background a user has.
///
/// Selects the system-instruction variant when a runner is first built
/// for the user's conversation. Unrecognized stored values fall back to
/// `Beginner` rather than failing — an unset tier is a policy default,
/// not an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ProficiencyTier {
    #[default]
    Beginner,
    Intermediate,
    Expert,
}

impl<'de> Deserialize<'de> for ProficiencyTier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "Intermediate" => ProficiencyTier::Intermediate,
            "Expert" => ProficiencyTier::Expert,
            // "Beginner" and anything unrecognized.
            _ => ProficiencyTier::Beginner,
        })
    }
}

impl ProficiencyTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProficiencyTier::Beginner => "Beginner",
            ProficiencyTier::Intermediate => "Intermediate",
            ProficiencyTier::Expert => "Expert",
        }
    }
}

impl std::fmt::Display for ProficiencyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_beginner() {
        assert_eq!(ProficiencyTier::default(), ProficiencyTier::Beginner);
    }

    #[test]
    fn known_values_roundtrip() {
        for tier in [
            ProficiencyTier::Beginner,
            ProficiencyTier::Intermediate,
            ProficiencyTier::Expert,
        ] {
            let json = serde_json::to_string(&tier).unwrap();
            let back: ProficiencyTier = serde_json::from_str(&json).unwrap();
            assert_eq!(back, tier);
        }
    }

    #[test]
    fn unknown_value_falls_back_to_beginner() {
        let tier: ProficiencyTier = serde_json::from_str(r#""Grandmaster""#).unwrap();
        assert_eq!(tier, ProficiencyTier::Beginner);
    }
}
