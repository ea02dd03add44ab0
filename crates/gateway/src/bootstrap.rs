//! Application state assembly.

use std::sync::Arc;

use anyhow::Context;

use rotom_domain::config::Config;
use rotom_sessions::{InMemorySessionService, SessionService};
use rotom_tools::ToolSet;
use rotom_users::UserStore;

use crate::auth::TokenService;
use crate::runtime::lock::KeyedLocks;
use crate::runtime::runner::RunnerCache;
use crate::runtime::session_init::SessionInitializer;
use crate::state::AppState;

/// Build the shared state all handlers receive. Secrets are resolved
/// here, once.
pub fn build_app_state(config: Arc<Config>) -> anyhow::Result<AppState> {
    // Missing credentials are logged, not fatal: the gateway still
    // serves auth and profile endpoints, and chat turns fail
    // individually until the key is provided.
    let api_key = match std::env::var(&config.llm.api_key_env) {
        Ok(key) if !key.trim().is_empty() => Some(key),
        _ => {
            tracing::warn!(
                env = %config.llm.api_key_env,
                "model API key not set; chat turns will fail until it is configured"
            );
            None
        }
    };

    let jwt_secret = match std::env::var(&config.auth.jwt_secret_env) {
        Ok(secret) if !secret.trim().is_empty() => secret,
        _ => {
            tracing::warn!(
                env = %config.auth.jwt_secret_env,
                "JWT secret not set; using an ephemeral secret — issued tokens die with this process"
            );
            uuid::Uuid::new_v4().to_string()
        }
    };

    let users = Arc::new(UserStore::new(&config.state_path).context("user store")?);
    let sessions: Arc<dyn SessionService> = Arc::new(InMemorySessionService::new());
    let tools = Arc::new(ToolSet::new(&config.tools).context("tool set")?);
    let runners = Arc::new(
        RunnerCache::new(config.llm.clone(), api_key, tools).context("runner cache")?,
    );
    let session_init = Arc::new(SessionInitializer::new(
        Arc::clone(&sessions),
        config.sessions.clone(),
    ));
    let tokens = Arc::new(TokenService::new(&jwt_secret, config.auth.token_ttl_hours));

    Ok(AppState {
        config,
        users,
        tokens,
        sessions,
        runners,
        session_init,
        turn_locks: Arc::new(KeyedLocks::new()),
    })
}
