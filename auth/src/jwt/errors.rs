use thiserror::Error;

use crate::token::TokenType;

/// Reasons a token is rejected.
///
/// These never cross the validator or refresh coordinator boundary; callers
/// only ever see the collapsed `AuthenticationFailed` / `InvalidRefreshToken`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature does not verify")]
    BadSignature,

    #[error("Token is expired")]
    Expired,

    #[error("Expected {expected} token")]
    WrongTokenType { expected: TokenType },

    #[error("Token has no issuer")]
    MissingIssuer,

    #[error("Unknown account: {0}")]
    IdentityNotFound(String),

    #[error("User directory unavailable: {0}")]
    DirectoryUnavailable(String),

    #[error("Failed to encode token: {0}")]
    Encoding(String),
}

/// Error building signing key material.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("Signing secret too short: minimum {min} bytes, got {actual}")]
    TooShort { min: usize, actual: usize },
}
