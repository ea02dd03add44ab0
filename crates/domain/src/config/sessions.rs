use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session engine
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsConfig {
    /// Application namespace under which engine sessions are created.
    #[serde(default = "d_app_namespace")]
    pub app_namespace: String,
    /// Synthetic engine-side user identity. All web conversations share
    /// it; the conversation key is what scopes state per user.
    #[serde(default = "d_engine_user_id")]
    pub engine_user_id: String,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            app_namespace: d_app_namespace(),
            engine_user_id: d_engine_user_id(),
        }
    }
}

fn d_app_namespace() -> String {
    "coach".into()
}
fn d_engine_user_id() -> String {
    "web_user".into()
}
