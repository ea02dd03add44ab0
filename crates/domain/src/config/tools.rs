use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Data-lookup tools
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Host serving usage statistics and sample teams, keyed by
    /// normalized format identifier.
    #[serde(default = "d_data_base_url")]
    pub data_base_url: String,
    /// Timeout for one outbound lookup.
    #[serde(default = "d_20")]
    pub timeout_secs: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            data_base_url: d_data_base_url(),
            timeout_secs: 20,
        }
    }
}

fn d_data_base_url() -> String {
    "https://data.pkmn.cc".into()
}
fn d_20() -> u64 {
    20
}
