use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

/// Account role carried by access tokens and resolved for every principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when text does not name a known role.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// Token type tag, checked by every operation that consumes a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Access => f.write_str("access"),
            TokenType::Refresh => f.write_str("refresh"),
        }
    }
}

/// Decoded session token.
///
/// Timestamps are Unix seconds. The role is present exactly when the token is
/// an access token; use [`Token::access`] and [`Token::refresh`] to keep that
/// invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub issuer: String,
    pub token_type: TokenType,
    pub role: Option<Role>,
    pub issued_at: i64,
    pub expires_at: i64,
}

impl Token {
    pub fn access(issuer: impl Into<String>, role: Role, issued_at: i64, expires_at: i64) -> Self {
        Self {
            issuer: issuer.into(),
            token_type: TokenType::Access,
            role: Some(role),
            issued_at,
            expires_at,
        }
    }

    pub fn refresh(issuer: impl Into<String>, issued_at: i64, expires_at: i64) -> Self {
        Self {
            issuer: issuer.into(),
            token_type: TokenType::Refresh,
            role: None,
            issued_at,
            expires_at,
        }
    }

    /// A token is expired once `now` reaches `expires_at`.
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at <= now
    }

    /// Lifetime window in seconds, never negative.
    pub fn lifetime_secs(&self) -> i64 {
        (self.expires_at - self.issued_at).max(0)
    }
}

/// A token together with its signed compact form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: Token,
    pub encoded: String,
}

/// Authenticated identity and its current role for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub identity: String,
    pub role: Role,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
