use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRef, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use super::credentials::AdminCredentials;
use super::session::AdminSession;
use super::token::{AuthError, TokenAuthority};
use crate::error::ApiError;

#[derive(Clone)]
pub struct AuthState {
    pub authority: TokenAuthority,
    pub credentials: Option<AdminCredentials>,
}

impl FromRef<AuthState> for TokenAuthority {
    fn from_ref(state: &AuthState) -> Self {
        state.authority.clone()
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Router builder exposing admin login and token introspection.
pub fn auth_router(state: AuthState) -> Router {
    Router::new()
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/me", get(me_handler))
        .with_state(state)
}

pub(crate) async fn login_handler(
    State(state): State<AuthState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    let email = request
        .email
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ApiError::field("email", "email is required"))?;
    let password = request
        .password
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::field("password", "password is required"))?;

    let Some(credentials) = state.credentials.as_ref() else {
        tracing::warn!("login attempted but no admin account is configured");
        return Err(ApiError::Unauthorized(AuthError::InvalidCredentials.to_string()));
    };

    if !credentials.verify(&email, &password) {
        tracing::warn!(email = %email, "admin login rejected");
        return Err(ApiError::Unauthorized(AuthError::InvalidCredentials.to_string()));
    }

    let issued = state
        .authority
        .issue(credentials.email())
        .map_err(|err| ApiError::Internal(err.to_string()))?;
    tracing::info!(email = %credentials.email(), "admin signed in");

    Ok(Json(json!({
        "success": true,
        "token": issued.token,
        "expiresIn": issued.expires_in,
    })))
}

pub(crate) async fn me_handler(AdminSession(claims): AdminSession) -> Json<Value> {
    Json(json!({ "success": true, "data": claims }))
}
