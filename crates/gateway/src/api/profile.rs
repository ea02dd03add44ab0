//! Profile and saved-team endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::Deserialize;

use super::auth::CurrentUser;
use super::api_error;
use crate::state::AppState;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /v1/profile
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn profile(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Json<serde_json::Value> {
    // Newest saved teams first.
    let teams = state.users.teams_for(&user.0.id);
    Json(serde_json::json!({ "user": user.0, "teams": teams }))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /v1/teams
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
pub struct SaveTeamRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    /// The Showdown-importable team block from a chat reply.
    pub team_text: String,
}

pub async fn save_team(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<SaveTeamRequest>,
) -> Response {
    let title = body.title.as_deref().unwrap_or("Untitled");
    let format = body.format.as_deref().unwrap_or("Unknown");

    match state
        .users
        .append_saved_team(&user.0.id, title, format, &body.team_text)
    {
        Ok(team) => Json(serde_json::json!({ "status": "success", "team": team })).into_response(),
        Err(e) => {
            tracing::error!(user = %user.0.username, error = %e, "saving team failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "could not save team")
        }
    }
}
