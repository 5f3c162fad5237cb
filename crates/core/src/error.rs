//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, conflicts). Infrastructure concerns belong elsewhere.
///
/// Every variant is a hard stop for the triggering operation: no internal
/// retry or suppression, and prior state is left unchanged at the point of
/// failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A document or value failed validation (e.g. empty title/number).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A registry collision (document number already reserved).
    #[error("duplicate: {0}")]
    Duplicate(String),

    /// A requested document/account key is unknown.
    #[error("not found: {0}")]
    NotFound(String),

    /// An illegal lifecycle transition was attempted.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Signing was attempted on a document without versions.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// Lock contention (held by a different owner).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Malformed or mismatched approval route usage.
    #[error("route error: {0}")]
    Route(String),

    /// Payment failure: currency mismatch, insufficient funds, frozen
    /// account, negative amount.
    #[error("payment error: {0}")]
    Payment(String),

    /// Attachment storage over quota.
    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),

    /// A blocked user attempted a restricted action.
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// Bad credentials.
    #[error("authentication failed: {0}")]
    AuthFailed(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::Duplicate(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn invalid_signature(msg: impl Into<String>) -> Self {
        Self::InvalidSignature(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn route(msg: impl Into<String>) -> Self {
        Self::Route(msg.into())
    }

    pub fn payment(msg: impl Into<String>) -> Self {
        Self::Payment(msg.into())
    }

    pub fn quota_exceeded(msg: impl Into<String>) -> Self {
        Self::QuotaExceeded(msg.into())
    }

    pub fn access_denied(msg: impl Into<String>) -> Self {
        Self::AccessDenied(msg.into())
    }

    pub fn auth_failed(msg: impl Into<String>) -> Self {
        Self::AuthFailed(msg.into())
    }
}
