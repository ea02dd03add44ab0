use chrono::{DateTime, Utc};

use rotom_domain::chat::Content;
use rotom_domain::Result;

use crate::conversation::ConversationKey;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session record
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Engine-internal conversational memory for one conversation.
///
/// Keyed by (conversation key, application namespace, synthetic engine
/// user id). Created at most once per key.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub key: ConversationKey,
    pub app_namespace: String,
    pub engine_user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub history: Vec<Content>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Service trait
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The session engine's lifecycle and history operations.
#[async_trait::async_trait]
pub trait SessionService: Send + Sync {
    /// Create the session record for `key`.
    ///
    /// Errors with [`rotom_domain::Error::SessionExists`] when a record is
    /// already present — callers decide whether that counts as failure
    /// (the initializer treats it as success).
    async fn create_session(
        &self,
        key: &ConversationKey,
        engine_user_id: &str,
        app_namespace: &str,
    ) -> Result<SessionRecord>;

    /// Append one content block to the session history.
    ///
    /// Errors with [`rotom_domain::Error::SessionNotFound`] when the
    /// record was never created.
    async fn append(&self, key: &ConversationKey, content: Content) -> Result<()>;

    /// The conversation history, oldest first.
    async fn history(&self, key: &ConversationKey) -> Result<Vec<Content>>;
}
