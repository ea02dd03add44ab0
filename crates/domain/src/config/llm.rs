use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Model client
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Gemini API host.
    #[serde(default = "d_base_url")]
    pub base_url: String,
    /// Model identifier for the coaching agent.
    #[serde(default = "d_model")]
    pub model: String,
    /// Environment variable holding the API key. Read once at startup;
    /// a missing key is logged, not fatal — generation calls fail
    /// individually until it is set.
    #[serde(default = "d_api_key_env")]
    pub api_key_env: String,
    /// Attempt ceiling for transient upstream failures when opening a
    /// generation stream. Applied transparently inside the model client.
    #[serde(default = "d_3")]
    pub retry_attempts: u32,
    /// Hard per-call timeout. Bounds hung upstream generation calls.
    #[serde(default = "d_120")]
    pub request_timeout_secs: u64,
    /// Maximum model→tool→model round trips within one turn.
    #[serde(default = "d_8")]
    pub max_tool_loops: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: d_base_url(),
            model: d_model(),
            api_key_env: d_api_key_env(),
            retry_attempts: 3,
            request_timeout_secs: 120,
            max_tool_loops: 8,
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_base_url() -> String {
    "https://generativelanguage.googleapis.com".into()
}
fn d_model() -> String {
    "gemini-2.5-pro".into()
}
fn d_api_key_env() -> String {
    "GOOGLE_API_KEY".into()
}
fn d_3() -> u32 {
    3
}
fn d_120() -> u64 {
    120
}
fn d_8() -> usize {
    8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = LlmConfig::default();
        assert_eq!(cfg.model, "gemini-2.5-pro");
        assert_eq!(cfg.api_key_env, "GOOGLE_API_KEY");
        assert_eq!(cfg.retry_attempts, 3);
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let cfg: LlmConfig = toml::from_str(r#"model = "gemini-2.0-flash""#).unwrap();
        assert_eq!(cfg.model, "gemini-2.0-flash");
        assert_eq!(cfg.retry_attempts, 3);
        assert_eq!(cfg.max_tool_loops, 8);
    }
}
