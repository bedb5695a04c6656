use thiserror::Error;

/// Error for unknown diet names
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown diet: {0}")]
pub struct DietError(pub String);

/// Top-level error for preference operations
#[derive(Debug, Clone, Error)]
pub enum PreferencesError {
    #[error("Invalid diet: {0}")]
    InvalidDiet(#[from] DietError),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
