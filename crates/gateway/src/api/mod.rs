//! HTTP API.
//!
//! Routes are split into **public** (health, register, login) and
//! **protected** (chat, profile, teams) behind the bearer-token
//! middleware.
//!
//! `state` is needed to wire up the auth middleware at build time.

pub mod auth;
pub mod chat;
pub mod profile;

use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::state::AppState;

/// Build the full API router.
pub fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/v1/healthz", get(healthz))
        .route("/v1/auth/register", post(auth::register))
        .route("/v1/auth/login", post(auth::login));

    let protected = Router::new()
        .route("/v1/chat", post(chat::chat))
        .route("/v1/profile", get(profile::profile))
        .route("/v1/teams", post(profile::save_team))
        .route_layer(middleware::from_fn_with_state(state, auth::require_user));

    public.merge(protected)
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Build a standardized JSON error response: `{ "error": "<message>" }`.
pub(crate) fn api_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({ "error": message.into() }))).into_response()
}
