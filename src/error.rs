//! Error types for override construction
//!
//! Every error here is a configuration-authoring error raised while a
//! resolver is being built. Resolution itself never fails.

/// Errors raised while building options, rules, or a resolver
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OverrideError {
    #[error("Unknown option '{key}'")]
    UnknownOption { key: String },

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Invalid value for option '{key}': expected {expected}, found {found}")]
    InvalidValue {
        key: String,
        expected: String,
        found: String,
    },

    #[error("Base configuration is missing option '{key}'")]
    MissingOption { key: String },

    #[error("Malformed configuration: {0}")]
    Malformed(String),

    #[error("Fingerprint error: {0}")]
    Fingerprint(String),
}

impl OverrideError {
    /// Short machine-readable code for the error kind
    pub fn code(&self) -> &'static str {
        match self {
            OverrideError::UnknownOption { .. } => "UNKNOWN_OPTION",
            OverrideError::InvalidPattern { .. } => "INVALID_PATTERN",
            OverrideError::InvalidValue { .. } => "INVALID_VALUE",
            OverrideError::MissingOption { .. } => "MISSING_OPTION",
            OverrideError::Malformed(_) => "MALFORMED",
            OverrideError::Fingerprint(_) => "FINGERPRINT",
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, OverrideError>;
