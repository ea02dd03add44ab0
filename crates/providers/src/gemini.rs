//! Gemini adapter.
//!
//! Implements the `streamGenerateContent` API with SSE transport. Auth is
//! an API key passed as a query parameter (`key={api_key}`). Opening the
//! stream is retried on transient failures (connect errors, timeouts,
//! 429/5xx) up to a bounded attempt ceiling; 4xx responses are permanent.

use std::time::Duration;

use serde_json::Value;

use rotom_domain::chat::{Content, Part, Role, ToolDefinition};
use rotom_domain::config::LlmConfig;
use rotom_domain::gen::{EventStream, GenEvent};
use rotom_domain::{Error, Result};

use crate::sse::{from_reqwest, sse_response_stream};
use crate::traits::{GenerateRequest, ModelClient};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Adapter struct
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A model client for the Gemini streaming API.
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: Option<String>,
    retry_attempts: u32,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a client from config plus the startup-resolved API key and
    /// a shared HTTP client. No network I/O happens here.
    pub fn new(cfg: &LlmConfig, api_key: Option<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            model: cfg.model.clone(),
            api_key,
            retry_attempts: cfg.retry_attempts.max(1),
            client,
        }
    }

    fn stream_url(&self, api_key: &str) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse&key={}",
            self.base_url, self.model, api_key
        )
    }

    fn build_body(&self, req: &GenerateRequest) -> Value {
        let contents: Vec<Value> = req.contents.iter().map(content_to_gemini).collect();

        let mut body = serde_json::json!({
            "contents": contents,
        });

        if !req.system_instruction.is_empty() {
            body["systemInstruction"] = serde_json::json!({
                "parts": [{ "text": req.system_instruction }]
            });
        }

        if !req.tools.is_empty() {
            let function_declarations: Vec<Value> = req.tools.iter().map(tool_to_gemini).collect();
            body["tools"] = serde_json::json!([{
                "functionDeclarations": function_declarations,
            }]);
        }

        body
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request serialization
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn content_to_gemini(content: &Content) -> Value {
    let role = match content.role {
        Role::User => "user",
        Role::Model => "model",
    };

    let parts: Vec<Value> = content
        .parts
        .iter()
        .map(|part| match part {
            Part::Text { text } => serde_json::json!({ "text": text }),
            Part::FunctionCall { name, args } => serde_json::json!({
                "functionCall": { "name": name, "args": args }
            }),
            Part::FunctionResponse { name, response } => serde_json::json!({
                "functionResponse": {
                    "name": name,
                    "response": { "content": response }
                }
            }),
        })
        .collect();

    serde_json::json!({ "role": role, "parts": parts })
}

fn tool_to_gemini(tool: &ToolDefinition) -> Value {
    serde_json::json!({
        "name": tool.name,
        "description": tool.description,
        "parameters": tool.parameters,
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Stream payload decoding
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Decode a single SSE `data:` payload into generation events.
///
/// - malformed JSON → one `Err(Error::Json)` item (the aggregator skips it)
/// - a candidate with parts → one `GenEvent::Content`
/// - anything else (usage-only chunks, unexpected shapes) → `GenEvent::Unknown`
fn parse_sse_data(data: &str) -> Vec<Result<GenEvent>> {
    let v: Value = match serde_json::from_str(data) {
        Ok(v) => v,
        Err(e) => return vec![Err(Error::Json(e))],
    };

    let parts = v
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|a| a.first())
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array());

    let raw_parts = match parts {
        Some(p) => p,
        None => return vec![Ok(GenEvent::Unknown)],
    };

    let mut decoded: Vec<Part> = Vec::new();
    for part in raw_parts {
        if let Some(text) = part.get("text").and_then(|t| t.as_str()) {
            if !text.is_empty() {
                decoded.push(Part::Text { text: text.to_string() });
            }
        }
        if let Some(fc) = part.get("functionCall") {
            let name = fc
                .get("name")
                .and_then(|n| n.as_str())
                .unwrap_or("")
                .to_string();
            let args = fc
                .get("args")
                .cloned()
                .unwrap_or(Value::Object(Default::default()));
            decoded.push(Part::FunctionCall { name, args });
        }
    }

    if decoded.is_empty() {
        // A recognizable candidate that carries nothing usable (e.g. a
        // finish-reason-only chunk).
        return Vec::new();
    }

    vec![Ok(GenEvent::Content { parts: decoded })]
}

/// Redact the API key from a URL for safe logging.
fn redact_url_key(url: &str) -> String {
    match url.find("key=") {
        Some(idx) => {
            let prefix = &url[..idx + 4];
            let rest = &url[idx + 4..];
            let end = rest.find('&').unwrap_or(rest.len());
            format!("{prefix}[REDACTED]{}", &rest[end..])
        }
        None => url.to_string(),
    }
}

/// Exponential back-off before retry `attempt` (1-based).
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_millis(200 * 2u64.pow(attempt.saturating_sub(1)))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait::async_trait]
impl ModelClient for GeminiClient {
    async fn stream_generate(&self, req: &GenerateRequest) -> Result<EventStream> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            Error::Auth("no API key configured for the model client".into())
        })?;

        let url = self.stream_url(api_key);
        let body = self.build_body(req);

        tracing::debug!(model = %self.model, url = %redact_url_key(&url), "gemini stream request");

        let mut last_err: Option<Error> = None;

        for attempt in 0..self.retry_attempts {
            if attempt > 0 {
                tokio::time::sleep(backoff_delay(attempt)).await;
                tracing::debug!(model = %self.model, attempt, "retrying generation call");
            }

            let result = self
                .client
                .post(&url)
                .header("Content-Type", "application/json")
                .json(&body)
                .send()
                .await;

            match result {
                Ok(resp) => {
                    let status = resp.status();

                    if status.is_success() {
                        return Ok(sse_response_stream(resp, parse_sse_data));
                    }

                    let err_text = resp.text().await.unwrap_or_default();
                    let err = Error::Model {
                        model: self.model.clone(),
                        message: format!("HTTP {} - {}", status.as_u16(), err_text),
                    };

                    // 429 and 5xx are transient; other 4xx are permanent.
                    if status.as_u16() == 429 || status.is_server_error() {
                        last_err = Some(err);
                        continue;
                    }
                    return Err(err);
                }
                Err(e) => {
                    // Connect errors and timeouts are transient.
                    last_err = Some(from_reqwest(e));
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| Error::Model {
            model: self.model.clone(),
            message: "all retry attempts exhausted".into(),
        }))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GeminiClient {
        GeminiClient::new(&LlmConfig::default(), Some("k".into()), reqwest::Client::new())
    }

    #[test]
    fn text_parts_decode_to_content() {
        let data = r#"{"candidates":[{"content":{"parts":[{"text":"Hello, "},{"text":"coach!"}]}}]}"#;
        let events = parse_sse_data(data);
        assert_eq!(events.len(), 1);
        match events[0].as_ref().unwrap() {
            GenEvent::Content { parts } => {
                assert_eq!(parts.len(), 2);
                assert_eq!(parts[0].text(), Some("Hello, "));
            }
            other => panic!("expected content event, got {other:?}"),
        }
    }

    #[test]
    fn function_call_decodes_to_part() {
        let data = r#"{"candidates":[{"content":{"parts":[{"functionCall":{"name":"get_usage_stats","args":{"format":"gen9ou"}}}]}}]}"#;
        let events = parse_sse_data(data);
        match events[0].as_ref().unwrap() {
            GenEvent::Content { parts } => match &parts[0] {
                Part::FunctionCall { name, args } => {
                    assert_eq!(name, "get_usage_stats");
                    assert_eq!(args["format"], "gen9ou");
                }
                other => panic!("expected function call part, got {other:?}"),
            },
            other => panic!("expected content event, got {other:?}"),
        }
    }

    #[test]
    fn unrecognized_payload_is_unknown() {
        let events = parse_sse_data(r#"{"usageMetadata":{"promptTokenCount":12}}"#);
        assert!(matches!(events[0], Ok(GenEvent::Unknown)));
    }

    #[test]
    fn malformed_payload_is_a_json_error() {
        let events = parse_sse_data("{not json");
        assert!(matches!(events[0], Err(Error::Json(_))));
    }

    #[test]
    fn finish_only_chunk_decodes_to_nothing() {
        let data = r#"{"candidates":[{"content":{"parts":[]},"finishReason":"STOP"}]}"#;
        assert!(parse_sse_data(data).is_empty());
    }

    #[test]
    fn body_carries_system_instruction_and_tools() {
        let c = client();
        let req = GenerateRequest {
            system_instruction: "be helpful".into(),
            contents: vec![Content::user_text("hi")],
            tools: vec![ToolDefinition {
                name: "get_usage_stats".into(),
                description: "usage".into(),
                parameters: serde_json::json!({"type": "object"}),
            }],
        };
        let body = c.build_body(&req);
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be helpful");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(
            body["tools"][0]["functionDeclarations"][0]["name"],
            "get_usage_stats"
        );
    }

    #[test]
    fn function_response_serializes_for_the_wire() {
        let content = Content {
            role: Role::User,
            parts: vec![Part::FunctionResponse {
                name: "get_usage_stats".into(),
                response: "Top 20 Usage: ...".into(),
            }],
        };
        let v = content_to_gemini(&content);
        assert_eq!(v["parts"][0]["functionResponse"]["name"], "get_usage_stats");
    }

    #[test]
    fn url_key_is_redacted() {
        let url = "https://host/v1beta/models/m:streamGenerateContent?alt=sse&key=secret";
        assert!(!redact_url_key(url).contains("secret"));
    }

    #[test]
    fn backoff_doubles() {
        assert_eq!(backoff_delay(1), Duration::from_millis(200));
        assert_eq!(backoff_delay(2), Duration::from_millis(400));
        assert_eq!(backoff_delay(3), Duration::from_millis(800));
    }
}
