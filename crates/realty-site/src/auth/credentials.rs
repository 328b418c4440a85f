use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::config::AuthConfig;

/// The single admin account configured through the environment.
#[derive(Clone)]
pub struct AdminCredentials {
    email: String,
    password_digest: [u8; 32],
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}

impl AdminCredentials {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.trim().to_ascii_lowercase(),
            password_digest: digest(password),
        }
    }

    /// `None` when either the admin email or password is unset; login is then disabled.
    pub fn from_config(config: &AuthConfig) -> Option<Self> {
        match (&config.admin_email, &config.admin_password) {
            (Some(email), Some(password)) => Some(Self::new(email, password)),
            _ => None,
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Email matches case-insensitively; passwords are compared as digests in constant time.
    pub fn verify(&self, email: &str, password: &str) -> bool {
        let email_matches = email.trim().eq_ignore_ascii_case(&self.email);
        let password_matches: bool = digest(password)
            .as_slice()
            .ct_eq(self.password_digest.as_slice())
            .into();
        email_matches & password_matches
    }
}
