use async_trait::async_trait;
use thiserror::Error;

use crate::token::Role;

/// Failure reaching the user directory (as opposed to a definite "not found").
#[derive(Debug, Clone, Error)]
#[error("User directory lookup failed: {0}")]
pub struct DirectoryError(pub String);

/// Account lookup the token core depends on.
///
/// Implemented by whichever service owns accounts. A lookup must be
/// consistent within one request; across requests it may lag.
#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    /// Resolve the current role for an identity.
    ///
    /// # Arguments
    /// * `identity` - Account identity (email) carried as token issuer
    ///
    /// # Returns
    /// `Some(role)` if the account exists, `None` otherwise
    ///
    /// # Errors
    /// * `DirectoryError` - The backing store could not be queried
    async fn find_role(&self, identity: &str) -> Result<Option<Role>, DirectoryError>;
}
