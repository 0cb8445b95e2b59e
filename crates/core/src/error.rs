//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (malformed
/// identifiers, invalid intervals, policy rejections). Infrastructure concerns
/// belong elsewhere. An unknown product is not an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier was invalid (e.g. empty store or article id).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A validity interval ends before it starts.
    #[error("invalid interval: {0}")]
    InvalidInterval(String),

    /// A resolution policy refused to resolve a group of records.
    #[error("policy violation: {0}")]
    Policy(String),
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn invalid_interval(msg: impl Into<String>) -> Self {
        Self::InvalidInterval(msg.into())
    }

    pub fn policy(msg: impl Into<String>) -> Self {
        Self::Policy(msg.into())
    }
}
