//! Runtime core — composes the runner cache, session initializer, and
//! response aggregator into the per-turn orchestration flow.

pub mod aggregate;
pub mod lock;
pub mod prompt;
pub mod runner;
pub mod session_init;

use rotom_domain::chat::Content;
use rotom_domain::Result;
use rotom_sessions::ConversationKey;
use rotom_users::UserProfile;

use crate::state::AppState;

/// Run one chat turn for an authenticated user and return the aggregated
/// reply.
///
/// An empty reply is a valid success — the caller owns the UX for it.
/// Only generation failures surface as errors; session-init and
/// event-shape problems are absorbed upstream.
pub async fn handle_turn(state: &AppState, user: &UserProfile, message: &str) -> Result<String> {
    let key = ConversationKey::for_user(&user.id);

    // One turn in flight per conversation. Holding the permit for the
    // whole turn also serializes the create-if-absent paths below.
    let _permit = state.turn_locks.acquire(key.as_str()).await;

    let runner = state.runners.get_or_create(&key, user.skill_level);

    let outcome = state.session_init.ensure_session(&key).await;
    tracing::debug!(conversation = %key, ?outcome, "session ensured");

    // Record the user turn. A missing session here is the documented
    // price of fail-open initialization and surfaces as the turn error.
    state
        .sessions
        .append(&key, Content::user_text(message))
        .await?;
    let contents = state.sessions.history(&key).await?;

    let events = runner.run(contents);
    let reply = aggregate::aggregate(events).await?;

    if !reply.is_empty() {
        state
            .sessions
            .append(&key, Content::model_text(&reply))
            .await?;
    }

    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use rotom_domain::config::Config;
    use rotom_domain::{Error, ProficiencyTier};
    use rotom_sessions::{InMemorySessionService, SessionService};
    use rotom_tools::ToolSet;
    use rotom_users::UserStore;

    use crate::auth::TokenService;
    use crate::runtime::lock::KeyedLocks;
    use crate::runtime::runner::RunnerCache;
    use crate::runtime::session_init::SessionInitializer;

    /// State with no model API key configured: every generation call
    /// fails with an auth error, which is the turn-level error path.
    fn keyless_state(dir: &std::path::Path) -> AppState {
        let mut config = Config::default();
        config.state_path = dir.to_path_buf();
        config.tools.data_base_url = "http://127.0.0.1:9".into();
        let config = Arc::new(config);

        let sessions: Arc<dyn SessionService> = Arc::new(InMemorySessionService::new());
        let tools = Arc::new(ToolSet::new(&config.tools).unwrap());

        AppState {
            users: Arc::new(UserStore::new(&config.state_path).unwrap()),
            tokens: Arc::new(TokenService::new("test-secret", 1)),
            runners: Arc::new(RunnerCache::new(config.llm.clone(), None, tools).unwrap()),
            session_init: Arc::new(SessionInitializer::new(
                Arc::clone(&sessions),
                config.sessions.clone(),
            )),
            turn_locks: Arc::new(KeyedLocks::new()),
            sessions,
            config,
        }
    }

    #[tokio::test]
    async fn missing_api_key_surfaces_as_turn_error() {
        let dir = tempfile::tempdir().unwrap();
        let state = keyless_state(dir.path());
        let user = UserProfile {
            id: "u1".into(),
            username: "ash".into(),
            skill_level: ProficiencyTier::Beginner,
        };

        let err = handle_turn(&state, &user, "hello").await.unwrap_err();
        assert!(matches!(err, Error::Auth(_)));

        // The orchestration side effects still happened: session created,
        // runner cached, user message recorded.
        let key = ConversationKey::for_user("u1");
        assert!(state.session_init.is_initialized(&key));
        assert_eq!(state.runners.len(), 1);
        let history = state.sessions.history(&key).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].text(), "hello");
    }

    #[tokio::test]
    async fn second_turn_reuses_runner_and_session() {
        let dir = tempfile::tempdir().unwrap();
        let state = keyless_state(dir.path());
        let user = UserProfile {
            id: "u1".into(),
            username: "ash".into(),
            skill_level: ProficiencyTier::Expert,
        };

        let _ = handle_turn(&state, &user, "one").await;
        let _ = handle_turn(&state, &user, "two").await;

        assert_eq!(state.runners.len(), 1);
        let key = ConversationKey::for_user("u1");
        let history = state.sessions.history(&key).await.unwrap();
        assert_eq!(history.len(), 2);
    }
}
