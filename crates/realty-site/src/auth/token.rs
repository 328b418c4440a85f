use std::fmt;
use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::TOKEN_TTL_HOURS;

pub const ADMIN_ROLE: &str = "admin";

/// JWT payload carried by admin bearer tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    pub token: String,
    /// Lifetime in seconds.
    pub expires_in: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("authorization token missing")]
    MissingToken,
    #[error("authorization header must use the Bearer scheme")]
    InvalidScheme,
    #[error("authorization token expired")]
    Expired,
    #[error("authorization token invalid")]
    InvalidToken,
    #[error("admin role required")]
    Forbidden,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("unable to sign token: {0}")]
    Signing(String),
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Issues and verifies HS256 admin tokens.
#[derive(Clone)]
pub struct TokenAuthority {
    keys: Arc<Keys>,
    ttl: Duration,
}

impl fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenAuthority {
    /// Lifetimes outside the accepted configuration range are clamped into it.
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        let hours = ttl_hours.clamp(*TOKEN_TTL_HOURS.start(), *TOKEN_TTL_HOURS.end());
        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
            }),
            ttl: Duration::try_hours(hours).unwrap_or_else(Duration::zero),
        }
    }

    pub fn issue(&self, subject: &str) -> Result<IssuedToken, AuthError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::Signing("token expiry out of range".to_string()))?;
        let claims = Claims {
            sub: subject.to_string(),
            role: ADMIN_ROLE.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        self.sign(&claims).map(|token| IssuedToken {
            token,
            expires_in: self.ttl.num_seconds(),
        })
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.keys.encoding)
            .map_err(|err| AuthError::Signing(err.to_string()))
    }

    /// Verifies signature, expiry, and admin role.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data = jsonwebtoken::decode::<Claims>(token, &self.keys.decoding, &validation)
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken,
            })?;

        if data.claims.role != ADMIN_ROLE {
            return Err(AuthError::Forbidden);
        }
        Ok(data.claims)
    }

    /// Extracts and verifies the token from an `Authorization` header value.
    pub fn verify_header(&self, header: Option<&str>) -> Result<Claims, AuthError> {
        let header = header.map(str::trim).filter(|value| !value.is_empty());
        let header = header.ok_or(AuthError::MissingToken)?;
        let (scheme, token) = header.split_once(' ').unwrap_or((header, ""));
        if !scheme.eq_ignore_ascii_case("bearer") {
            return Err(AuthError::InvalidScheme);
        }
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        self.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authority() -> TokenAuthority {
        TokenAuthority::new("test-secret", 2)
    }

    #[test]
    fn issued_tokens_verify() {
        let authority = authority();
        let issued = authority.issue("admin@example.com").expect("token issued");
        assert_eq!(issued.expires_in, 2 * 3600);

        let claims = authority
            .verify_header(Some(&format!("Bearer {}", issued.token)))
            .expect("token verifies");
        assert_eq!(claims.sub, "admin@example.com");
        assert_eq!(claims.role, ADMIN_ROLE);
    }

    #[test]
    fn extreme_lifetimes_are_clamped() {
        let issued = TokenAuthority::new("test-secret", 3_000_000_000_000)
            .issue("admin@example.com")
            .expect("token issued");
        assert_eq!(issued.expires_in, 8_760 * 3600);

        let issued = TokenAuthority::new("test-secret", -4)
            .issue("admin@example.com")
            .expect("token issued");
        assert_eq!(issued.expires_in, 3600);
    }

    #[test]
    fn rejects_tokens_signed_with_another_secret() {
        let issued = TokenAuthority::new("other-secret", 2)
            .issue("admin@example.com")
            .expect("token issued");
        assert!(matches!(
            authority().verify(&issued.token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn rejects_expired_tokens() {
        let authority = authority();
        let now = Utc::now().timestamp();
        let token = authority
            .sign(&Claims {
                sub: "admin@example.com".into(),
                role: ADMIN_ROLE.into(),
                iat: now - 7200,
                exp: now - 3600,
            })
            .expect("signed");
        assert!(matches!(authority.verify(&token), Err(AuthError::Expired)));
    }

    #[test]
    fn rejects_non_admin_roles() {
        let authority = authority();
        let now = Utc::now().timestamp();
        let token = authority
            .sign(&Claims {
                sub: "visitor".into(),
                role: "viewer".into(),
                iat: now,
                exp: now + 600,
            })
            .expect("signed");
        assert!(matches!(authority.verify(&token), Err(AuthError::Forbidden)));
    }

    #[test]
    fn header_parsing_requires_bearer_scheme() {
        let authority = authority();
        assert!(matches!(
            authority.verify_header(None),
            Err(AuthError::MissingToken)
        ));
        assert!(matches!(
            authority.verify_header(Some("Basic abc")),
            Err(AuthError::InvalidScheme)
        ));
        assert!(matches!(
            authority.verify_header(Some("Bearer   ")),
            Err(AuthError::MissingToken)
        ));
    }
}
