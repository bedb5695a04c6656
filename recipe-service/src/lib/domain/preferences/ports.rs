use async_trait::async_trait;

use crate::domain::preferences::errors::PreferencesError;
use crate::domain::preferences::models::PatchPreferencesCommand;
use crate::domain::preferences::models::UserPreferences;
use crate::domain::user::models::UserId;

/// Port for dietary preference operations.
#[async_trait]
pub trait PreferencesServicePort: Send + Sync + 'static {
    /// Current preferences of a user; defaults when none were stored.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn get_preferences(&self, user_id: &UserId) -> Result<UserPreferences, PreferencesError>;

    /// Apply a partial update and return the resulting preferences.
    ///
    /// # Errors
    /// * `UserNotFound` - Account no longer exists
    /// * `DatabaseError` - Database operation failed
    async fn patch_preferences(
        &self,
        user_id: &UserId,
        command: PatchPreferencesCommand,
    ) -> Result<UserPreferences, PreferencesError>;
}

/// Persistence operations for preferences.
#[async_trait]
pub trait PreferencesRepository: Send + Sync + 'static {
    /// Retrieve stored preferences.
    ///
    /// # Returns
    /// Optional preferences (None if never stored)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<UserPreferences>, PreferencesError>;

    /// Insert or replace a user's preferences.
    ///
    /// # Errors
    /// * `UserNotFound` - Account no longer exists
    /// * `DatabaseError` - Database operation failed
    async fn upsert(&self, preferences: UserPreferences) -> Result<UserPreferences, PreferencesError>;
}
