//! SSE streaming infrastructure for the model adapter.
//!
//! The adapter receives a `reqwest::Response`, buffers chunks, splits on
//! `\n\n`, extracts `data:` payloads, and feeds each payload to a parser
//! that returns `Vec<Result<GenEvent>>`.

use rotom_domain::gen::{EventStream, GenEvent};
use rotom_domain::{Error, Result};

/// Extract complete `data:` payloads from an SSE buffer.
///
/// SSE events are delimited by `\n\n`. An event block may contain
/// `event:`, `data:`, `id:`, or `retry:` lines; only `data:` lines
/// matter here. The buffer is drained in place — a trailing partial
/// event stays behind for the next call.
pub(crate) fn drain_data_lines(buffer: &mut String) -> Vec<String> {
    let mut data_lines = Vec::new();

    while let Some(pos) = buffer.find("\n\n") {
        let block: String = buffer.drain(..pos).collect();
        buffer.drain(..2); // the \n\n delimiter

        for line in block.lines() {
            let line = line.trim();
            if let Some(data) = line.strip_prefix("data:") {
                let data = data.trim();
                if !data.is_empty() {
                    data_lines.push(data.to_string());
                }
            }
        }
    }

    data_lines
}

/// Build an [`EventStream`] from an SSE `reqwest::Response` and a parser
/// closure that maps each `data:` payload to zero or more events.
///
/// When the body closes, any partial event left in the buffer is flushed
/// through the parser once.
pub(crate) fn sse_response_stream<F>(response: reqwest::Response, mut parse_data: F) -> EventStream
where
    F: FnMut(&str) -> Vec<Result<GenEvent>> + Send + 'static,
{
    let stream = async_stream::stream! {
        let mut response = response;
        let mut buffer = String::new();

        loop {
            match response.chunk().await {
                Ok(Some(bytes)) => {
                    buffer.push_str(&String::from_utf8_lossy(&bytes));
                    for data in drain_data_lines(&mut buffer) {
                        for event in parse_data(&data) {
                            yield event;
                        }
                    }
                }
                Ok(None) => {
                    // Body closed — flush any remaining partial event.
                    if !buffer.trim().is_empty() {
                        buffer.push_str("\n\n");
                        for data in drain_data_lines(&mut buffer) {
                            for event in parse_data(&data) {
                                yield event;
                            }
                        }
                    }
                    break;
                }
                Err(e) => {
                    yield Err(from_reqwest(e));
                    break;
                }
            }
        }
    };

    Box::pin(stream)
}

/// Convert a [`reqwest::Error`] into the domain [`Error`] type.
pub(crate) fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Http(e.to_string())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
