use std::sync::Arc;

use async_trait::async_trait;
use auth::DirectoryError;
use auth::Role;
use auth::UserDirectory;

use crate::domain::user::models::EmailAddress;
use crate::user::ports::UserRepository;

/// Account store seen through the session core's directory port.
///
/// Token identities are email addresses; anything that does not parse as one
/// cannot belong to an account and resolves to `None`.
pub struct RepositoryUserDirectory<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
}

impl<UR> RepositoryUserDirectory<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<UR> UserDirectory for RepositoryUserDirectory<UR>
where
    UR: UserRepository,
{
    async fn find_role(&self, identity: &str) -> Result<Option<Role>, DirectoryError> {
        let Ok(email) = EmailAddress::new(identity.to_string()) else {
            return Ok(None);
        };

        self.repository
            .find_by_email(&email)
            .await
            .map(|user| user.map(|u| u.role))
            .map_err(|e| DirectoryError(e.to_string()))
    }
}
