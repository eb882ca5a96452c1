//! Controller capability handling.
//!
//! A connection proves it is the controller by presenting the shared admin
//! secret in its upgrade request. Classification happens exactly once per
//! connection; the resulting role is cached on the connection handle.

use crate::types::Role;

const DEFAULT_ADMIN_SECRET: &str = "faceoff-admin-2026";

/// Admin secret configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    secret: String,
}

impl AdminConfig {
    /// Load the admin secret from `ADMIN_SECRET`, falling back to the
    /// built-in default so a dev setup works out of the box.
    pub fn from_env() -> Self {
        match std::env::var("ADMIN_SECRET")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
        {
            Some(secret) => {
                tracing::info!("Admin secret loaded from environment");
                Self { secret }
            }
            None => {
                tracing::warn!(
                    "ADMIN_SECRET not set, using built-in default - anyone who reads the source can control the session!"
                );
                Self {
                    secret: DEFAULT_ADMIN_SECRET.to_string(),
                }
            }
        }
    }

    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Classify a connection from the token it presented at upgrade time.
    /// No token, or a token that does not match, means participant.
    pub fn classify(&self, token: Option<&str>) -> Role {
        match token {
            Some(t) if constant_time_eq(self.secret.as_bytes(), t.as_bytes()) => Role::Controller,
            _ => Role::Participant,
        }
    }

    /// The raw secret, for injection into the served admin page.
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

/// Constant-time byte comparison to prevent timing attacks
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
