//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent rule violations of the morphology core.
/// Every variant is recoverable; callers decide how to present it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid root '{0}': expected exactly 3 letters")]
    InvalidRoot(String),

    #[error("root already exists: {0}")]
    DuplicateRoot(String),

    #[error("root not found: {0}")]
    RootNotFound(String),

    #[error("invalid pattern '{pattern}': missing placeholder(s) {missing}")]
    InvalidPattern { pattern: String, missing: String },

    #[error("scheme name must not be empty")]
    InvalidSchemeName,

    #[error("scheme already exists: {0}")]
    DuplicateScheme(String),

    #[error("scheme not found: {0}")]
    SchemeNotFound(String),

    #[error("invalid placeholders '{0}': expected 3 distinct characters")]
    InvalidPlaceholders(String),

    #[error("generation failed for root '{root}' with scheme '{scheme}'")]
    GenerationFailure { root: String, scheme: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
