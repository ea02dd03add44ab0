//! Streaming-response aggregation — folds one turn's event stream into
//! the final reply text.

use tokio::sync::mpsc;

use rotom_domain::gen::GenEvent;
use rotom_domain::{Error, Result};

/// Fold an ordered, finite event sequence into the reply string.
///
/// Rules, in arrival order:
/// - a non-empty `Text` event **replaces** the accumulator (it carries
///   the consolidated answer so far, not a delta);
/// - `Content` parts that carry text are **appended** in order;
/// - `Unknown` events are skipped;
/// - a malformed wire payload (`Error::Json`) is logged and skipped —
///   one bad event must never abort the whole turn;
/// - any other error is a transport failure and aborts the turn.
///
/// An empty result is a valid reply, not an error.
pub async fn aggregate(mut rx: mpsc::Receiver<Result<GenEvent>>) -> Result<String> {
    let mut reply = String::new();

    while let Some(item) = rx.recv().await {
        match item {
            Ok(GenEvent::Text { text }) if !text.is_empty() => reply = text,
            Ok(GenEvent::Text { .. }) => {}
            Ok(GenEvent::Content { parts }) => {
                for part in &parts {
                    if let Some(text) = part.text() {
                        reply.push_str(text);
                    }
                }
            }
            Ok(GenEvent::Unknown) => {}
            Err(Error::Json(e)) => {
                tracing::debug!(error = %e, "skipping malformed generation event");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rotom_domain::chat::Part;

    async fn run(events: Vec<Result<GenEvent>>) -> Result<String> {
        let (tx, rx) = mpsc::channel(16);
        for event in events {
            tx.send(event).await.unwrap();
        }
        drop(tx);
        aggregate(rx).await
    }

    fn parts_event(texts: &[&str]) -> Result<GenEvent> {
        Ok(GenEvent::Content {
            parts: texts
                .iter()
                .map(|t| Part::Text {
                    text: (*t).to_string(),
                })
                .collect(),
        })
    }

    #[tokio::test]
    async fn structured_parts_append_in_order() {
        let reply = run(vec![parts_event(&["Hello, "]), parts_event(&["coach!"])])
            .await
            .unwrap();
        assert_eq!(reply, "Hello, coach!");
    }

    #[tokio::test]
    async fn plain_text_replaces_prior_accumulation() {
        let reply = run(vec![
            parts_event(&["draft"]),
            Ok(GenEvent::Text {
                text: "final answer".into(),
            }),
        ])
        .await
        .unwrap();
        assert_eq!(reply, "final answer");
    }

    #[tokio::test]
    async fn unrecognized_events_are_skipped() {
        let reply = run(vec![Ok(GenEvent::Unknown), parts_event(&["ok"])])
            .await
            .unwrap();
        assert_eq!(reply, "ok");
    }

    #[tokio::test]
    async fn empty_stream_yields_empty_reply() {
        let reply = run(vec![]).await.unwrap();
        assert_eq!(reply, "");
    }

    #[tokio::test]
    async fn empty_text_event_does_not_clobber() {
        let reply = run(vec![
            parts_event(&["kept"]),
            Ok(GenEvent::Text { text: String::new() }),
        ])
        .await
        .unwrap();
        assert_eq!(reply, "kept");
    }

    #[tokio::test]
    async fn malformed_event_is_skipped_not_fatal() {
        let bad = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let reply = run(vec![
            parts_event(&["before "]),
            Err(Error::Json(bad)),
            parts_event(&["after"]),
        ])
        .await
        .unwrap();
        assert_eq!(reply, "before after");
    }

    #[tokio::test]
    async fn transport_error_aborts_the_turn() {
        let result = run(vec![
            parts_event(&["partial"]),
            Err(Error::Http("connection reset".into())),
        ])
        .await;
        assert!(matches!(result, Err(Error::Http(_))));
    }

    #[tokio::test]
    async fn function_call_parts_carry_no_text() {
        let reply = run(vec![Ok(GenEvent::Content {
            parts: vec![
                Part::FunctionCall {
                    name: "get_usage_stats".into(),
                    args: serde_json::json!({ "format": "gen9ou" }),
                },
                Part::Text { text: "ok".into() },
            ],
        })])
        .await
        .unwrap();
        assert_eq!(reply, "ok");
    }

    #[tokio::test]
    async fn deterministic_over_a_fixed_sequence() {
        let make = || {
            vec![
                parts_event(&["a", "b"]),
                Ok(GenEvent::Unknown),
                parts_event(&["c"]),
                Ok(GenEvent::Text { text: "abc".into() }),
            ]
        };
        let first = run(make()).await.unwrap();
        let second = run(make()).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first, "abc");
    }
}
