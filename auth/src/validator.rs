use std::sync::Arc;

use thiserror::Error;

use crate::clock::Clock;
use crate::directory::UserDirectory;
use crate::jwt::TokenCodec;
use crate::jwt::TokenError;
use crate::token::Principal;
use crate::token::TokenType;

/// Opaque access-token rejection. Deliberately carries no cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Authentication failed")]
pub struct AuthenticationFailed;

/// Resolves access tokens to principals.
pub struct TokenValidator {
    codec: Arc<TokenCodec>,
    directory: Arc<dyn UserDirectory>,
    clock: Arc<dyn Clock>,
}

impl TokenValidator {
    pub fn new(
        codec: Arc<TokenCodec>,
        directory: Arc<dyn UserDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            codec,
            directory,
            clock,
        }
    }

    /// Validate an access token and resolve its principal.
    ///
    /// The returned role comes from the directory, not from the token, so a
    /// role change applies on the very next request.
    ///
    /// # Errors
    /// * `AuthenticationFailed` - For every rejection reason
    pub async fn validate_access(&self, token: &str) -> Result<Principal, AuthenticationFailed> {
        self.check_access(token).await.map_err(|e| {
            match &e {
                TokenError::DirectoryUnavailable(_) => {
                    tracing::warn!(error = %e, "Access token rejected")
                }
                _ => tracing::debug!(error = %e, "Access token rejected"),
            }
            AuthenticationFailed
        })
    }

    async fn check_access(&self, token: &str) -> Result<Principal, TokenError> {
        let token = self.codec.decode(token)?;

        if token.is_expired(self.clock.now().timestamp()) {
            return Err(TokenError::Expired);
        }

        if token.token_type != TokenType::Access {
            return Err(TokenError::WrongTokenType {
                expected: TokenType::Access,
            });
        }

        if token.issuer.is_empty() {
            return Err(TokenError::MissingIssuer);
        }

        let role = self
            .directory
            .find_role(&token.issuer)
            .await
            .map_err(|e| TokenError::DirectoryUnavailable(e.to_string()))?
            .ok_or_else(|| TokenError::IdentityNotFound(token.issuer.clone()))?;

        Ok(Principal {
            identity: token.issuer,
            role,
        })
    }
}
