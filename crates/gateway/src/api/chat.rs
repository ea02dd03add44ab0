//! Chat endpoint — one coaching turn per request.

use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;

use super::auth::CurrentUser;
use crate::runtime;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// User message text.
    pub message: String,
}

/// `POST /v1/chat`
///
/// Returns HTTP 200 with either `{"response": ...}` or `{"error": ...}`;
/// clients key off the body, not the status. An empty response string is
/// a valid reply.
pub async fn chat(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<ChatRequest>,
) -> Json<serde_json::Value> {
    match runtime::handle_turn(&state, &user.0, &body.message).await {
        Ok(response) => Json(serde_json::json!({ "response": response })),
        Err(e) => {
            tracing::warn!(user = %user.0.username, error = %e, "chat turn failed");
            Json(serde_json::json!({ "error": e.to_string() }))
        }
    }
}
