use serde::Serialize;
use std::pin::Pin;

use crate::chat::Part;

/// A boxed async stream, used for model streaming responses.
pub type BoxStream<'a, T> = Pin<Box<dyn futures_core::Stream<Item = T> + Send + 'a>>;

/// The item stream one generation call produces.
pub type EventStream = BoxStream<'static, crate::Result<GenEvent>>;

/// One incremental unit of a generation call's output stream.
///
/// The upstream protocol interleaves two shapes for the same logical
/// answer: a consolidated plain-text event (authoritative — it replaces
/// whatever the aggregator accumulated so far) and structured content
/// carrying incremental parts (appended in arrival order). Payloads the
/// client does not recognize decode to `Unknown` and are skipped.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum GenEvent {
    /// Consolidated answer text so far.
    #[serde(rename = "text")]
    Text { text: String },

    /// Incremental structured content.
    #[serde(rename = "content")]
    Content { parts: Vec<Part> },

    /// An event shape this client does not recognize.
    #[serde(rename = "unknown")]
    Unknown,
}
