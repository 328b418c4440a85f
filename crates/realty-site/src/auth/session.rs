use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::token::{AuthError, Claims, TokenAuthority};
use crate::error::ApiError;

/// Extractor guarding admin handlers: a verified bearer token or a 401.
///
/// Use `Option<AdminSession>` for routes that serve both the public and admins.
#[derive(Debug, Clone)]
pub struct AdminSession(pub Claims);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminSession
where
    TokenAuthority: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let authority = TokenAuthority::from_ref(state);
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        authority
            .verify_header(header)
            .map(AdminSession)
            .map_err(|err| {
                if !matches!(err, AuthError::MissingToken) {
                    tracing::warn!(path = %parts.uri.path(), error = %err, "admin request rejected");
                }
                ApiError::Unauthorized(err.to_string())
            })
    }
}
