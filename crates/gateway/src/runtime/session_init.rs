//! Exactly-once, fail-open session initialization.
//!
//! The initializer tracks which conversations have had session creation
//! attempted (the initialized set) and guards the create-if-absent path
//! with a per-key lock so concurrent first turns issue one engine call.
//! The set is an approximation, not a source of truth: engine failures
//! still mark the key initialized, and the cost of a false mark is a
//! downstream generation failure rather than a crash.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use rotom_domain::config::SessionsConfig;
use rotom_domain::Error;
use rotom_sessions::{ConversationKey, SessionService};

use super::lock::KeyedLocks;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Outcome
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Outcome of [`SessionInitializer::ensure_session`].
///
/// Every variant marks the key initialized. Engine failures are treated
/// as success — duplicate creation is expected on reused keys, and a
/// transient engine error must not interrupt the user-visible turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// The engine created a fresh session record.
    Created,
    /// This process already initialized the key.
    AlreadyInitialized,
    /// The engine reported the session already exists.
    AlreadyExists,
    /// The engine call failed; logged, treated as initialized.
    Failed,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Initializer
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Ensures each conversation's engine session is created at most once.
pub struct SessionInitializer {
    service: Arc<dyn SessionService>,
    cfg: SessionsConfig,
    initialized: Mutex<HashSet<ConversationKey>>,
    locks: KeyedLocks,
}

impl SessionInitializer {
    pub fn new(service: Arc<dyn SessionService>, cfg: SessionsConfig) -> Self {
        Self {
            service,
            cfg,
            initialized: Mutex::new(HashSet::new()),
            locks: KeyedLocks::new(),
        }
    }

    /// Idempotent: call before every turn; redundant calls are cheap.
    /// Never surfaces an error to the caller.
    pub async fn ensure_session(&self, key: &ConversationKey) -> InitOutcome {
        if self.initialized.lock().contains(key) {
            return InitOutcome::AlreadyInitialized;
        }

        let _permit = self.locks.acquire(key.as_str()).await;

        // Re-check under the lock: another task may have initialized the
        // key while we waited.
        if self.initialized.lock().contains(key) {
            return InitOutcome::AlreadyInitialized;
        }

        let outcome = match self
            .service
            .create_session(key, &self.cfg.engine_user_id, &self.cfg.app_namespace)
            .await
        {
            Ok(_) => InitOutcome::Created,
            Err(Error::SessionExists(_)) => {
                tracing::debug!(conversation = %key, "engine session already exists");
                InitOutcome::AlreadyExists
            }
            Err(e) => {
                tracing::warn!(
                    conversation = %key,
                    error = %e,
                    "session creation failed; marking initialized anyway"
                );
                InitOutcome::Failed
            }
        };

        self.initialized.lock().insert(key.clone());
        outcome
    }

    /// Whether the key has had creation attempted in this process.
    pub fn is_initialized(&self, key: &ConversationKey) -> bool {
        self.initialized.lock().contains(key)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    use rotom_domain::chat::Content;
    use rotom_domain::Result;
    use rotom_sessions::{InMemorySessionService, SessionRecord};

    fn initializer(service: Arc<dyn SessionService>) -> SessionInitializer {
        SessionInitializer::new(service, SessionsConfig::default())
    }

    /// Session engine that always fails creation.
    struct BrokenService;

    #[async_trait::async_trait]
    impl SessionService for BrokenService {
        async fn create_session(
            &self,
            _key: &ConversationKey,
            _engine_user_id: &str,
            _app_namespace: &str,
        ) -> Result<SessionRecord> {
            Err(rotom_domain::Error::Other("engine down".into()))
        }

        async fn append(&self, key: &ConversationKey, _content: Content) -> Result<()> {
            Err(rotom_domain::Error::SessionNotFound(key.to_string()))
        }

        async fn history(&self, key: &ConversationKey) -> Result<Vec<Content>> {
            Err(rotom_domain::Error::SessionNotFound(key.to_string()))
        }
    }

    /// Session engine whose creation call takes a while, to exercise the
    /// per-key lock.
    struct SlowService {
        inner: InMemorySessionService,
    }

    #[async_trait::async_trait]
    impl SessionService for SlowService {
        async fn create_session(
            &self,
            key: &ConversationKey,
            engine_user_id: &str,
            app_namespace: &str,
        ) -> Result<SessionRecord> {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            self.inner
                .create_session(key, engine_user_id, app_namespace)
                .await
        }

        async fn append(&self, key: &ConversationKey, content: Content) -> Result<()> {
            self.inner.append(key, content).await
        }

        async fn history(&self, key: &ConversationKey) -> Result<Vec<Content>> {
            self.inner.history(key).await
        }
    }

    #[tokio::test]
    async fn first_call_creates_then_short_circuits() {
        let init = initializer(Arc::new(InMemorySessionService::new()));
        let key = ConversationKey::for_user("u1");

        assert_eq!(init.ensure_session(&key).await, InitOutcome::Created);
        assert!(init.is_initialized(&key));
        assert_eq!(
            init.ensure_session(&key).await,
            InitOutcome::AlreadyInitialized
        );
    }

    #[tokio::test]
    async fn engine_failure_still_marks_initialized() {
        let init = initializer(Arc::new(BrokenService));
        let key = ConversationKey::for_user("u1");

        assert_eq!(init.ensure_session(&key).await, InitOutcome::Failed);
        assert!(init.is_initialized(&key));

        // Redundant calls never retry and never raise.
        assert_eq!(
            init.ensure_session(&key).await,
            InitOutcome::AlreadyInitialized
        );
    }

    #[tokio::test]
    async fn duplicate_engine_record_counts_as_success() {
        let service = Arc::new(InMemorySessionService::new());
        let key = ConversationKey::for_user("u1");

        // The engine already has a record (e.g. created by an earlier
        // initializer instance in this process).
        service.create_session(&key, "web_user", "coach").await.unwrap();

        let init = initializer(service);
        assert_eq!(init.ensure_session(&key).await, InitOutcome::AlreadyExists);
        assert!(init.is_initialized(&key));
    }

    #[tokio::test]
    async fn concurrent_first_calls_create_exactly_once() {
        let init = Arc::new(initializer(Arc::new(SlowService {
            inner: InMemorySessionService::new(),
        })));
        let key = ConversationKey::for_user("u1");

        let a = tokio::spawn({
            let init = Arc::clone(&init);
            let key = key.clone();
            async move { init.ensure_session(&key).await }
        });
        let b = tokio::spawn({
            let init = Arc::clone(&init);
            let key = key.clone();
            async move { init.ensure_session(&key).await }
        });

        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        let outcomes = [a, b];

        assert!(outcomes.contains(&InitOutcome::Created));
        // The loser of the race observes the winner's work, never a
        // duplicate-create error.
        assert!(outcomes
            .iter()
            .all(|o| matches!(o, InitOutcome::Created | InitOutcome::AlreadyInitialized)));
    }

    #[tokio::test]
    async fn distinct_keys_are_independent() {
        let init = initializer(Arc::new(InMemorySessionService::new()));
        let k1 = ConversationKey::for_user("u1");
        let k2 = ConversationKey::for_user("u2");

        assert_eq!(init.ensure_session(&k1).await, InitOutcome::Created);
        assert!(!init.is_initialized(&k2));
        assert_eq!(init.ensure_session(&k2).await, InitOutcome::Created);
    }
}
