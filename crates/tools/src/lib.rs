//! Data-lookup tools for the coaching agent.
//!
//! Two stateless request/transform functions the model can invoke:
//! `get_usage_stats` and `get_sample_teams`. Each normalizes a battle
//! format identifier, performs one GET against the data host, and returns
//! a summary string — or a fixed not-found string on any failure. Tools
//! never raise past their boundary.

mod client;
pub mod formats;
mod stats;
mod teams;

use serde_json::Value;

use rotom_domain::chat::ToolDefinition;
use rotom_domain::config::ToolsConfig;
use rotom_domain::Result;

pub use client::DataClient;
pub use formats::normalize_format;
pub use stats::usage_stats;
pub use teams::sample_teams;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tool set
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The tool bindings a runner exposes to the model.
pub struct ToolSet {
    client: DataClient,
}

impl ToolSet {
    pub fn new(cfg: &ToolsConfig) -> Result<Self> {
        Ok(Self {
            client: DataClient::new(cfg)?,
        })
    }

    /// Definitions for every tool, by name, as the model sees them.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition {
                name: "get_usage_stats".into(),
                description: "Look up the top-20 usage ranking for a battle format.".into(),
                parameters: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "format": {
                            "type": "string",
                            "description": "Battle format, e.g. \"gen9ou\""
                        }
                    },
                    "required": ["format"]
                }),
            },
            ToolDefinition {
                name: "get_sample_teams".into(),
                description: "Fetch sample teams for a battle format.".into(),
                parameters: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "format": {
                            "type": "string",
                            "description": "Battle format, e.g. \"gen9ou\""
                        }
                    },
                    "required": ["format"]
                }),
            },
        ]
    }

    /// Dispatch one tool call by name. Infallible by contract: unknown
    /// tools and lookup failures all come back as plain strings.
    pub async fn dispatch(&self, name: &str, args: &Value) -> String {
        let format = args.get("format").and_then(|f| f.as_str()).unwrap_or("");

        match name {
            "get_usage_stats" => usage_stats(&self.client, format).await,
            "get_sample_teams" => sample_teams(&self.client, format).await,
            other => {
                tracing::warn!(tool = %other, "model requested an unknown tool");
                format!("Unknown tool: {other}.")
            }
        }
    }
}
