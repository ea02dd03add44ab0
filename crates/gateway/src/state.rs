use std::sync::Arc;

use rotom_domain::config::Config;
use rotom_sessions::SessionService;
use rotom_users::UserStore;

use crate::auth::TokenService;
use crate::runtime::lock::KeyedLocks;
use crate::runtime::runner::RunnerCache;
use crate::runtime::session_init::SessionInitializer;

/// Shared application state passed to all API handlers.
///
/// Every piece of process-wide mutable state lives here and is injected
/// at construction — there are no ambient globals. Fields are grouped by
/// concern:
/// - **Core services** — config, users, tokens
/// - **Conversation runtime** — session engine, runner cache, session
///   initializer, per-conversation turn locks
#[derive(Clone)]
pub struct AppState {
    // ── Core services ─────────────────────────────────────────────────
    pub config: Arc<Config>,
    pub users: Arc<UserStore>,
    pub tokens: Arc<TokenService>,

    // ── Conversation runtime ──────────────────────────────────────────
    pub sessions: Arc<dyn SessionService>,
    pub runners: Arc<RunnerCache>,
    pub session_init: Arc<SessionInitializer>,
    pub turn_locks: Arc<KeyedLocks>,
}
