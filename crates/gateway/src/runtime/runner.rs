//! Runner construction and caching.
//!
//! A [`Runner`] is the execution context for one conversation: model
//! client, system instruction, and tool bindings. Expensive to construct,
//! cheap to reuse, never mutated after construction. The [`RunnerCache`]
//! guarantees at most one runner per conversation for the process
//! lifetime.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc;

use futures_util::StreamExt;

use rotom_domain::chat::{Content, Part, Role};
use rotom_domain::config::LlmConfig;
use rotom_domain::gen::GenEvent;
use rotom_domain::{Error, ProficiencyTier, Result};
use rotom_providers::{GeminiClient, GenerateRequest, ModelClient};
use rotom_sessions::ConversationKey;
use rotom_tools::ToolSet;

use super::prompt::system_prompt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Runner
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A constructed, reusable execution context for one conversation.
pub struct Runner {
    client: Arc<dyn ModelClient>,
    instruction: String,
    tools: Arc<ToolSet>,
    max_tool_loops: usize,
}

impl Runner {
    pub fn new(
        client: Arc<dyn ModelClient>,
        instruction: String,
        tools: Arc<ToolSet>,
        max_tool_loops: usize,
    ) -> Self {
        Self {
            client,
            instruction,
            tools,
            max_tool_loops,
        }
    }

    /// Run one generation call over `contents` and return the event
    /// stream for the aggregator.
    ///
    /// The internal loop forwards every upstream event as-is, dispatches
    /// any function calls the model requested, feeds the results back,
    /// and finishes by emitting a consolidated [`GenEvent::Text`] once a
    /// response arrives with no pending calls. Transport failures are
    /// sent as the final `Err` item.
    pub fn run(self: Arc<Self>, contents: Vec<Content>) -> mpsc::Receiver<Result<GenEvent>> {
        let (tx, rx) = mpsc::channel::<Result<GenEvent>>(64);
        let runner = self;

        tokio::spawn(async move {
            if let Err(e) = runner.run_inner(contents, &tx).await {
                let _ = tx.send(Err(e)).await;
            }
        });

        rx
    }

    async fn run_inner(
        &self,
        mut contents: Vec<Content>,
        tx: &mpsc::Sender<Result<GenEvent>>,
    ) -> Result<()> {
        for _ in 0..self.max_tool_loops {
            let req = GenerateRequest {
                system_instruction: self.instruction.clone(),
                contents: contents.clone(),
                tools: self.tools.definitions(),
            };

            let mut stream = self.client.stream_generate(&req).await?;

            let mut text_buf = String::new();
            let mut calls: Vec<(String, Value)> = Vec::new();

            while let Some(item) = stream.next().await {
                match item {
                    Ok(event) => {
                        if let GenEvent::Content { parts } = &event {
                            for part in parts {
                                match part {
                                    Part::Text { text } => text_buf.push_str(text),
                                    Part::FunctionCall { name, args } => {
                                        calls.push((name.clone(), args.clone()));
                                    }
                                    Part::FunctionResponse { .. } => {}
                                }
                            }
                        }
                        if tx.send(Ok(event)).await.is_err() {
                            return Ok(()); // caller went away
                        }
                    }
                    Err(Error::Json(e)) => {
                        // Malformed wire payload: forward so the
                        // aggregator can skip it and keep going.
                        if tx.send(Err(Error::Json(e))).await.is_err() {
                            return Ok(());
                        }
                    }
                    Err(e) => return Err(e),
                }
            }

            if calls.is_empty() {
                let _ = tx.send(Ok(GenEvent::Text { text: text_buf })).await;
                return Ok(());
            }

            // ── Tool dispatch ──────────────────────────────────────
            let mut model_parts: Vec<Part> = Vec::new();
            if !text_buf.is_empty() {
                model_parts.push(Part::Text { text: text_buf });
            }
            for (name, args) in &calls {
                model_parts.push(Part::FunctionCall {
                    name: name.clone(),
                    args: args.clone(),
                });
            }
            contents.push(Content {
                role: Role::Model,
                parts: model_parts,
            });

            let mut responses: Vec<Part> = Vec::new();
            for (name, args) in &calls {
                tracing::debug!(tool = %name, "dispatching tool call");
                let response = self.tools.dispatch(name, args).await;
                responses.push(Part::FunctionResponse {
                    name: name.clone(),
                    response,
                });
            }
            contents.push(Content {
                role: Role::User,
                parts: responses,
            });
        }

        Err(Error::Other(format!(
            "tool loop limit reached ({} iterations)",
            self.max_tool_loops
        )))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Runner cache (+ agent factory)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Process-wide cache of one runner per conversation.
///
/// The tier is consulted only on first creation: an existing runner is
/// returned unchanged even if the user's profile changed since
/// (documented staleness). Entries live for the process lifetime — no
/// eviction, so the map grows with the number of distinct conversations
/// that ever chatted.
pub struct RunnerCache {
    llm: LlmConfig,
    api_key: Option<String>,
    http: reqwest::Client,
    tools: Arc<ToolSet>,
    runners: Mutex<HashMap<ConversationKey, Arc<Runner>>>,
}

impl RunnerCache {
    /// Build the cache and the shared HTTP client runners will use. The
    /// per-call timeout bounds hung upstream generation calls.
    pub fn new(llm: LlmConfig, api_key: Option<String>, tools: Arc<ToolSet>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(llm.request_timeout_secs))
            .build()
            .map_err(|e| Error::Http(format!("building model http client: {e}")))?;

        Ok(Self {
            llm,
            api_key,
            http,
            tools,
            runners: Mutex::new(HashMap::new()),
        })
    }

    /// Return the runner for `key`, constructing it under the map lock on
    /// first use so concurrent first turns build at most one.
    pub fn get_or_create(&self, key: &ConversationKey, tier: ProficiencyTier) -> Arc<Runner> {
        let mut runners = self.runners.lock();
        if let Some(runner) = runners.get(key) {
            return Arc::clone(runner);
        }

        let runner = Arc::new(self.build(tier));
        runners.insert(key.clone(), Arc::clone(&runner));
        tracing::info!(conversation = %key, tier = %tier, "runner constructed");
        runner
    }

    /// The agent factory: model client with bounded retry, the tier's
    /// system instruction, and the tool bindings. No network I/O here.
    fn build(&self, tier: ProficiencyTier) -> Runner {
        let client = Arc::new(GeminiClient::new(
            &self.llm,
            self.api_key.clone(),
            self.http.clone(),
        ));

        Runner::new(
            client,
            system_prompt(tier),
            Arc::clone(&self.tools),
            self.llm.max_tool_loops,
        )
    }

    /// Number of cached runners (for monitoring and tests).
    pub fn len(&self) -> usize {
        self.runners.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.runners.lock().is_empty()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
