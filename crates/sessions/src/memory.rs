//! In-memory session service — no persistence, forgotten on restart.

use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;

use rotom_domain::chat::Content;
use rotom_domain::{Error, Result};

use crate::conversation::ConversationKey;
use crate::service::{SessionRecord, SessionService};

/// Session engine backed by a process-local map.
#[derive(Default)]
pub struct InMemorySessionService {
    sessions: RwLock<HashMap<ConversationKey, SessionRecord>>,
}

impl InMemorySessionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live sessions (for monitoring and tests).
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

#[async_trait::async_trait]
impl SessionService for InMemorySessionService {
    async fn create_session(
        &self,
        key: &ConversationKey,
        engine_user_id: &str,
        app_namespace: &str,
    ) -> Result<SessionRecord> {
        let mut sessions = self.sessions.write();
        if sessions.contains_key(key) {
            return Err(Error::SessionExists(key.to_string()));
        }

        let now = Utc::now();
        let record = SessionRecord {
            key: key.clone(),
            app_namespace: app_namespace.to_string(),
            engine_user_id: engine_user_id.to_string(),
            created_at: now,
            updated_at: now,
            history: Vec::new(),
        };
        sessions.insert(key.clone(), record.clone());

        tracing::debug!(conversation = %key, "session created");
        Ok(record)
    }

    async fn append(&self, key: &ConversationKey, content: Content) -> Result<()> {
        let mut sessions = self.sessions.write();
        let record = sessions
            .get_mut(key)
            .ok_or_else(|| Error::SessionNotFound(key.to_string()))?;
        record.history.push(content);
        record.updated_at = Utc::now();
        Ok(())
    }

    async fn history(&self, key: &ConversationKey) -> Result<Vec<Content>> {
        let sessions = self.sessions.read();
        let record = sessions
            .get(key)
            .ok_or_else(|| Error::SessionNotFound(key.to_string()))?;
        Ok(record.history.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_duplicate_errors() {
        let service = InMemorySessionService::new();
        let key = ConversationKey::for_user("u1");

        service.create_session(&key, "web_user", "coach").await.unwrap();
        let err = service
            .create_session(&key, "web_user", "coach")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SessionExists(_)));
    }

    #[tokio::test]
    async fn append_and_history_roundtrip() {
        let service = InMemorySessionService::new();
        let key = ConversationKey::for_user("u1");
        service.create_session(&key, "web_user", "coach").await.unwrap();

        service
            .append(&key, Content::user_text("what beats Kingambit?"))
            .await
            .unwrap();
        service
            .append(&key, Content::model_text("Great question."))
            .await
            .unwrap();

        let history = service.history(&key).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].text(), "what beats Kingambit?");
    }

    #[tokio::test]
    async fn missing_session_is_an_error() {
        let service = InMemorySessionService::new();
        let key = ConversationKey::for_user("ghost");

        let err = service.history(&key).await.unwrap_err();
        assert!(matches!(err, Error::SessionNotFound(_)));

        let err = service
            .append(&key, Content::user_text("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SessionNotFound(_)));
    }
}
