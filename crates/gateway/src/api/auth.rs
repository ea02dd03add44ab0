//! Registration, login, and the bearer-token middleware.

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use rotom_domain::{Error, ProficiencyTier};
use rotom_users::UserProfile;

use super::api_error;
use crate::state::AppState;

/// The authenticated caller, inserted into request extensions by
/// [`require_user`].
#[derive(Clone)]
pub struct CurrentUser(pub UserProfile);

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /v1/auth/register
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    /// Unknown or missing values fall back to Beginner.
    #[serde(default)]
    pub skill_level: ProficiencyTier,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Response {
    if body.username.trim().is_empty() || body.password.len() < 8 {
        return api_error(
            StatusCode::BAD_REQUEST,
            "username and a password of at least 8 characters are required",
        );
    }

    let user = match state
        .users
        .create(body.username.trim(), &body.password, body.skill_level)
    {
        Ok(user) => user,
        Err(Error::UsernameTaken(_)) => {
            return api_error(StatusCode::CONFLICT, "username already taken");
        }
        Err(e) => {
            tracing::error!(error = %e, "user creation failed");
            return api_error(StatusCode::INTERNAL_SERVER_ERROR, "could not create user");
        }
    };

    issue_token_response(&state, user)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /v1/auth/login
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub async fn login(State(state): State<AppState>, Json(body): Json<LoginRequest>) -> Response {
    match state
        .users
        .find_by_credentials(body.username.trim(), &body.password)
    {
        Some(user) => issue_token_response(&state, user),
        None => api_error(StatusCode::UNAUTHORIZED, "invalid credentials"),
    }
}

fn issue_token_response(state: &AppState, user: UserProfile) -> Response {
    match state.tokens.issue(&user) {
        Ok(token) => Json(serde_json::json!({ "token": token, "user": user })).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "token issuance failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "could not issue token")
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Middleware
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Axum middleware enforcing bearer authentication on protected routes.
///
/// The token is resolved to a live profile on every request, so handlers
/// always see the user's current tier — though a cached runner created
/// earlier keeps its original instruction (documented staleness).
pub async fn require_user(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or("");

    let claims = match state.tokens.validate(token) {
        Ok(claims) => claims,
        Err(_) => return api_error(StatusCode::UNAUTHORIZED, "invalid or missing bearer token"),
    };

    let user = match state.users.find_by_id(&claims.sub) {
        Some(user) => user,
        None => return api_error(StatusCode::UNAUTHORIZED, "unknown user"),
    };

    req.extensions_mut().insert(CurrentUser(user));
    next.run(req).await
}
