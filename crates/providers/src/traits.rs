use rotom_domain::chat::{Content, ToolDefinition};
use rotom_domain::gen::EventStream;
use rotom_domain::Result;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request type
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A provider-agnostic generation request.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    /// System instruction for the whole conversation.
    pub system_instruction: String,
    /// Conversation contents, oldest first.
    pub contents: Vec<Content>,
    /// Tool definitions the model may invoke.
    pub tools: Vec<ToolDefinition>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Core client trait
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Trait every model adapter implements.
///
/// Transient failures while opening the stream are retried internally up
/// to the configured attempt ceiling; callers see only the final error.
#[async_trait::async_trait]
pub trait ModelClient: Send + Sync {
    /// Start a streaming generation call and return the event stream.
    async fn stream_generate(&self, req: &GenerateRequest) -> Result<EventStream>;

    /// The model identifier this client targets.
    fn model(&self) -> &str;
}
