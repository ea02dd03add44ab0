//! System-instruction builder — maps a user's proficiency tier to the
//! coaching agent's system prompt.

use rotom_domain::ProficiencyTier;

const BASE_PROMPT: &str = "You are Rotom-Coach, a grandmaster competitive Pokemon coach.\n\
Directives:\n\
1. Ask which battle format the user means if they have not named one.\n\
2. Call `get_usage_stats` before making data-backed claims.\n\
3. Output recommended teams in Showdown importable format inside fenced code blocks (```).\n";

const BEGINNER_SUFFIX: &str =
    "Explain jargon (STAB, EVs, win conditions) as it comes up. Be educational.";

const EXPERT_SUFFIX: &str = "Be concise. Focus on damage calcs and win conditions.";

/// Build the system instruction for a proficiency tier.
///
/// Pure and total. Intermediate gets the base prompt with no suffix.
pub fn system_prompt(tier: ProficiencyTier) -> String {
    match tier {
        ProficiencyTier::Beginner => format!("{BASE_PROMPT}{BEGINNER_SUFFIX}"),
        ProficiencyTier::Expert => format!("{BASE_PROMPT}{EXPERT_SUFFIX}"),
        ProficiencyTier::Intermediate => BASE_PROMPT.to_string(),
    }
}
