use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::preferences::errors::PreferencesError;
use crate::domain::preferences::models::PatchPreferencesCommand;
use crate::domain::preferences::models::UserPreferences;
use crate::domain::preferences::ports::PreferencesRepository;
use crate::domain::preferences::ports::PreferencesServicePort;
use crate::domain::user::models::UserId;

/// Domain service implementation for preference operations.
pub struct PreferencesService<PR>
where
    PR: PreferencesRepository,
{
    repository: Arc<PR>,
}

impl<PR> PreferencesService<PR>
where
    PR: PreferencesRepository,
{
    pub fn new(repository: Arc<PR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<PR> PreferencesServicePort for PreferencesService<PR>
where
    PR: PreferencesRepository,
{
    async fn get_preferences(&self, user_id: &UserId) -> Result<UserPreferences, PreferencesError> {
        Ok(self
            .repository
            .find_by_user(user_id)
            .await?
            .unwrap_or_else(|| UserPreferences::default_for(*user_id)))
    }

    async fn patch_preferences(
        &self,
        user_id: &UserId,
        command: PatchPreferencesCommand,
    ) -> Result<UserPreferences, PreferencesError> {
        let updated = self.get_preferences(user_id).await?.apply(command);
        let stored = self.repository.upsert(updated).await?;

        tracing::info!(
            user_id = %user_id,
            diet = %stored.diet,
            disliked = stored.disliked_ingredients.len(),
            "Preferences updated"
        );
        Ok(stored)
    }
}
