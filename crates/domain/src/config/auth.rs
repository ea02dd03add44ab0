use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Authentication
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable holding the JWT signing secret. When unset
    /// the server mints an ephemeral per-process secret and warns:
    /// issued tokens then die with the process.
    #[serde(default = "d_jwt_secret_env")]
    pub jwt_secret_env: String,
    /// Bearer token lifetime.
    #[serde(default = "d_24")]
    pub token_ttl_hours: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret_env: d_jwt_secret_env(),
            token_ttl_hours: 24,
        }
    }
}

fn d_jwt_secret_env() -> String {
    "RC_JWT_SECRET".into()
}
fn d_24() -> u64 {
    24
}
