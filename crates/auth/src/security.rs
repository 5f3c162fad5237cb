//! Password policy and session tokens.
//!
//! Tokens here are opaque random identifiers, not cryptographic material;
//! real signing/verification sits outside this system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use docflow_core::UserId;

/// Minimum bar for user-chosen passwords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_digit: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            require_digit: true,
        }
    }
}

impl PasswordPolicy {
    pub fn validate(&self, password: &str) -> bool {
        if password.chars().count() < self.min_length {
            return false;
        }
        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            return false;
        }
        true
    }
}

/// Opaque bearer token issued on login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub value: String,
    pub issued_at: DateTime<Utc>,
}

impl Token {
    pub fn generate() -> Self {
        Self {
            value: Uuid::now_v7().simple().to_string(),
            issued_at: Utc::now(),
        }
    }
}

/// A login session bounded by an expiry window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub token: Token,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_active(&self, moment: DateTime<Utc>) -> bool {
        self.created_at <= moment && moment <= self.expires_at
    }
}
