use std::sync::Arc;

use thiserror::Error;

use crate::clock::Clock;
use crate::issuer::IssueError;
use crate::issuer::TokenIssuer;
use crate::jwt::TokenCodec;
use crate::jwt::TokenError;
use crate::token::IssuedToken;
use crate::token::Token;
use crate::token::TokenType;

/// Opaque refresh rejection. Deliberately carries no cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid or expired refresh token")]
pub struct InvalidRefreshToken;

/// Validates refresh tokens and mints replacement tokens from them.
///
/// Rotation-on-use: every successful refresh yields a new refresh token
/// alongside the new access token. The presented refresh token stays valid
/// until its own expiry since there is no revocation store.
pub struct RefreshCoordinator {
    codec: Arc<TokenCodec>,
    issuer: Arc<TokenIssuer>,
    clock: Arc<dyn Clock>,
}

impl RefreshCoordinator {
    pub fn new(codec: Arc<TokenCodec>, issuer: Arc<TokenIssuer>, clock: Arc<dyn Clock>) -> Self {
        Self {
            codec,
            issuer,
            clock,
        }
    }

    /// True unless the token is a correctly signed, unexpired refresh token.
    pub fn is_refresh_invalid(&self, token: &str) -> bool {
        self.verify(token).is_err()
    }

    /// Mint a fresh access token from a refresh token.
    ///
    /// The new token's expiry is computed from the current time, not inherited.
    ///
    /// # Errors
    /// * `InvalidRefreshToken` - Token rejected, or its account no longer exists
    pub async fn rotate_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<IssuedToken, InvalidRefreshToken> {
        let verified = self.verify_or_reject(refresh_token)?;
        self.mint_access(&verified).await
    }

    /// Mint a fresh refresh token from a refresh token.
    ///
    /// # Errors
    /// * `InvalidRefreshToken` - Token rejected
    pub fn rotate_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<IssuedToken, InvalidRefreshToken> {
        let verified = self.verify_or_reject(refresh_token)?;
        self.mint_refresh(&verified)
    }

    /// Verify once and mint both replacement tokens.
    ///
    /// # Errors
    /// * `InvalidRefreshToken` - Token rejected, or its account no longer exists
    pub async fn rotate(
        &self,
        refresh_token: &str,
    ) -> Result<(IssuedToken, IssuedToken), InvalidRefreshToken> {
        let verified = self.verify_or_reject(refresh_token)?;
        let access = self.mint_access(&verified).await?;
        let refresh = self.mint_refresh(&verified)?;
        Ok((access, refresh))
    }

    fn verify(&self, token: &str) -> Result<Token, TokenError> {
        let token = self.codec.decode(token)?;

        if token.is_expired(self.clock.now().timestamp()) {
            return Err(TokenError::Expired);
        }

        if token.token_type != TokenType::Refresh {
            return Err(TokenError::WrongTokenType {
                expected: TokenType::Refresh,
            });
        }

        if token.issuer.is_empty() {
            return Err(TokenError::MissingIssuer);
        }

        Ok(token)
    }

    fn verify_or_reject(&self, token: &str) -> Result<Token, InvalidRefreshToken> {
        self.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "Refresh token rejected");
            InvalidRefreshToken
        })
    }

    async fn mint_access(&self, verified: &Token) -> Result<IssuedToken, InvalidRefreshToken> {
        self.issuer
            .create_access_token(&verified.issuer)
            .await
            .map_err(|e| reject_issue(&verified.issuer, e))
    }

    fn mint_refresh(&self, verified: &Token) -> Result<IssuedToken, InvalidRefreshToken> {
        self.issuer
            .create_refresh_token(&verified.issuer)
            .map_err(|e| reject_issue(&verified.issuer, e))
    }
}

fn reject_issue(identity: &str, error: IssueError) -> InvalidRefreshToken {
    match error {
        IssueError::IdentityNotFound(_) => {
            tracing::debug!(identity, "Refresh for deleted account rejected")
        }
        e => tracing::warn!(identity, error = %e, "Token rotation failed"),
    }
    InvalidRefreshToken
}
