//! Error types for the Family Huddle core.
//!
//! All public APIs return `HuddleResult<T>`: no panics in library code.

use thiserror::Error;

/// Unified error type for all Huddle operations.
#[derive(Debug, Error)]
pub enum HuddleError {
    /// Record store error (unexpected on-disk state, etc.)
    #[error("storage error: {0}")]
    Storage(String),

    /// Standard I/O error
    #[error("io error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Table name that cannot be mapped to a backing file
    #[error("invalid table name '{0}'")]
    InvalidTableName(String),

    /// Invalid arguments
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// Missing or malformed configuration value
    #[error("configuration error: {key} is not set\nHint: {hint}")]
    Config { key: String, hint: String },

    /// Input rejected by a domain rule (form validation)
    #[error("validation failed: {0}")]
    Validation(String),

    /// Requested entity does not exist
    #[error("{entity} '{id}' not found")]
    NotFound { entity: String, id: String },

    /// Password could not be hashed (bad work factor, etc.)
    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    /// Email/password pair did not match a user
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Operation requires a signed-in session (and usually an active profile)
    #[error("not authenticated: {0}")]
    Unauthenticated(String),

    /// Entity already exists
    #[error("conflict: {0}")]
    Conflict(String),

    /// Constraint violation (capacity, ownership, etc.)
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// Feature not yet implemented
    #[error("not implemented: {0}")]
    NotImplemented(String),
}

/// Result type alias for all Huddle operations.
pub type HuddleResult<T> = Result<T, HuddleError>;

// From 구현들
impl From<serde_json::Error> for HuddleError {
    fn from(err: serde_json::Error) -> Self {
        HuddleError::Serialization(err.to_string())
    }
}

impl From<bcrypt::BcryptError> for HuddleError {
    fn from(err: bcrypt::BcryptError) -> Self {
        HuddleError::PasswordHash(err.to_string())
    }
}

impl HuddleError {
    /// `NotFound` 생성 헬퍼
    pub fn not_found(entity: &str, id: impl Into<String>) -> Self {
        HuddleError::NotFound {
            entity: entity.to_string(),
            id: id.into(),
        }
    }
}
