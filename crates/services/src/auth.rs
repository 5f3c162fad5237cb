//! Credential check at the service boundary.

use std::collections::HashMap;

use docflow_auth::{PasswordPolicy, Token};
use docflow_core::{DomainError, DomainResult};

/// Login → password table plus the policy the password must satisfy.
///
/// Passwords live in memory in the clear; this is a collaborator stub, not a
/// credential store.
pub struct AuthService {
    users: HashMap<String, String>,
    policy: PasswordPolicy,
}

impl AuthService {
    pub fn new(users: HashMap<String, String>, policy: PasswordPolicy) -> Self {
        Self { users, policy }
    }

    pub fn login(&self, login: &str, password: &str) -> DomainResult<Token> {
        let Some(stored) = self.users.get(login) else {
            return Err(DomainError::auth_failed("unknown user"));
        };
        if !self.policy.validate(password) || stored != password {
            return Err(DomainError::auth_failed("invalid credentials"));
        }
        tracing::info!(login, "user logged in");
        Ok(Token::generate())
    }
}
