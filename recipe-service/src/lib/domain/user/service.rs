use std::sync::Arc;

use async_trait::async_trait;
use auth::Role;
use chrono::Utc;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for account operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: auth::PasswordHasher,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    ///
    /// # Returns
    /// Configured user service instance
    pub fn new(repository: Arc<UR>) -> Self {
        Self {
            repository,
            password_hasher: auth::PasswordHasher::new(),
        }
    }

    fn new_account(
        &self,
        email: EmailAddress,
        password: &Password,
        role: Role,
    ) -> Result<User, UserError> {
        let password_hash = self.password_hasher.hash(password.expose())?;

        Ok(User {
            id: UserId::new(),
            email,
            password_hash,
            role,
            created_at: Utc::now(),
        })
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        if self.repository.find_by_email(&command.email).await?.is_some() {
            return Err(UserError::EmailAlreadyExists(command.email.to_string()));
        }

        let user = self.new_account(command.email, &command.password, Role::User)?;
        let created_user = self.repository.create(user).await?;

        tracing::info!(user_id = %created_user.id, email = %created_user.email, "User registered");
        Ok(created_user)
    }

    async fn authenticate(&self, command: LoginCommand) -> Result<User, UserError> {
        let Some(user) = self.repository.find_by_email(&command.email).await? else {
            tracing::debug!(email = %command.email, "Login rejected: unknown email");
            return Err(UserError::InvalidCredentials);
        };

        if !self
            .password_hasher
            .verify(command.password.expose(), &user.password_hash)?
        {
            tracing::debug!(email = %command.email, "Login rejected: wrong password");
            return Err(UserError::InvalidCredentials);
        }

        Ok(user)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn get_user_by_email(&self, email: &EmailAddress) -> Result<User, UserError> {
        self.repository
            .find_by_email(email)
            .await?
            .ok_or(UserError::NotFoundByEmail(email.to_string()))
    }

    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        self.repository.list_all().await
    }

    async fn update_role(&self, id: &UserId, role: Role) -> Result<User, UserError> {
        let updated_user = self.repository.update_role(id, role).await?;

        tracing::info!(user_id = %id, role = %role, "User role changed");
        Ok(updated_user)
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        self.repository.delete(id).await?;

        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    async fn ensure_admin(
        &self,
        email: EmailAddress,
        password: Password,
    ) -> Result<(User, bool), UserError> {
        if let Some(existing) = self.repository.find_by_email(&email).await? {
            if existing.role != Role::Admin {
                tracing::warn!(email = %email, role = %existing.role, "Configured admin account exists without ADMIN role");
            }
            return Ok((existing, false));
        }

        let admin = self.new_account(email, &password, Role::Admin)?;
        let created = self.repository.create(admin).await?;

        tracing::info!(email = %created.email, "Admin account created");
        Ok((created, true))
    }
}
