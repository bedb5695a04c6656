use std::sync::Arc;

use chrono::Duration;
use thiserror::Error;

use crate::clock::Clock;
use crate::directory::DirectoryError;
use crate::directory::UserDirectory;
use crate::jwt::TokenCodec;
use crate::jwt::TokenError;
use crate::token::IssuedToken;
use crate::token::Token;

/// Token issuance errors.
#[derive(Debug, Clone, Error)]
pub enum IssueError {
    #[error("Unknown account: {0}")]
    IdentityNotFound(String),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Builds signed access and refresh tokens for an identity.
pub struct TokenIssuer {
    codec: Arc<TokenCodec>,
    directory: Arc<dyn UserDirectory>,
    clock: Arc<dyn Clock>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    /// Create an issuer.
    ///
    /// # Arguments
    /// * `codec` - Shared codec holding the signing key
    /// * `directory` - Role lookup for access tokens
    /// * `clock` - Time source for `iat` / `exp`
    /// * `access_ttl` - Access token lifetime
    /// * `refresh_ttl` - Refresh token lifetime
    pub fn new(
        codec: Arc<TokenCodec>,
        directory: Arc<dyn UserDirectory>,
        clock: Arc<dyn Clock>,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            codec,
            directory,
            clock,
            access_ttl,
            refresh_ttl,
        }
    }

    /// Issue an access token carrying the identity's current role.
    ///
    /// # Errors
    /// * `IdentityNotFound` - Directory has no such account
    /// * `Directory` - Directory lookup failed
    /// * `Token` - Signing failed
    pub async fn create_access_token(&self, identity: &str) -> Result<IssuedToken, IssueError> {
        let role = self
            .directory
            .find_role(identity)
            .await?
            .ok_or_else(|| IssueError::IdentityNotFound(identity.to_string()))?;

        let now = self.clock.now();
        let token = Token::access(
            identity,
            role,
            now.timestamp(),
            (now + self.access_ttl).timestamp(),
        );

        tracing::debug!(identity, role = %role, expires_at = token.expires_at, "Access token issued");
        self.sign(token)
    }

    /// Issue a refresh token. Refresh tokens carry no role claim.
    ///
    /// # Errors
    /// * `Token` - Signing failed
    pub fn create_refresh_token(&self, identity: &str) -> Result<IssuedToken, IssueError> {
        let now = self.clock.now();
        let token = Token::refresh(
            identity,
            now.timestamp(),
            (now + self.refresh_ttl).timestamp(),
        );

        tracing::debug!(identity, expires_at = token.expires_at, "Refresh token issued");
        self.sign(token)
    }

    fn sign(&self, token: Token) -> Result<IssuedToken, IssueError> {
        let encoded = self.codec.encode(&token)?;
        Ok(IssuedToken { token, encoded })
    }
}
