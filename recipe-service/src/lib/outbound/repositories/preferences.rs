use async_trait::async_trait;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::preferences::errors::PreferencesError;
use crate::domain::preferences::models::Diet;
use crate::domain::preferences::models::UserPreferences;
use crate::domain::preferences::ports::PreferencesRepository;
use crate::domain::user::models::UserId;

pub struct PostgresPreferencesRepository {
    pool: PgPool,
}

impl PostgresPreferencesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PreferencesRow {
    user_id: Uuid,
    diet: String,
    disliked_ingredients: Vec<String>,
}

impl TryFrom<PreferencesRow> for UserPreferences {
    type Error = PreferencesError;

    fn try_from(row: PreferencesRow) -> Result<Self, Self::Error> {
        Ok(UserPreferences {
            user_id: UserId(row.user_id),
            diet: row.diet.parse::<Diet>()?,
            disliked_ingredients: row.disliked_ingredients,
        })
    }
}

fn database_error(e: sqlx::Error) -> PreferencesError {
    PreferencesError::DatabaseError(e.to_string())
}

#[async_trait]
impl PreferencesRepository for PostgresPreferencesRepository {
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<UserPreferences>, PreferencesError> {
        sqlx::query_as::<_, PreferencesRow>(
            r#"
            SELECT user_id, diet, disliked_ingredients
            FROM user_preferences
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?
        .map(UserPreferences::try_from)
        .transpose()
    }

    async fn upsert(&self, preferences: UserPreferences) -> Result<UserPreferences, PreferencesError> {
        sqlx::query(
            r#"
            INSERT INTO user_preferences (user_id, diet, disliked_ingredients, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (user_id) DO UPDATE
            SET diet = EXCLUDED.diet,
                disliked_ingredients = EXCLUDED.disliked_ingredients,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(preferences.user_id.0)
        .bind(preferences.diet.as_str())
        .bind(&preferences.disliked_ingredients)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_foreign_key_violation() {
                    return PreferencesError::UserNotFound(preferences.user_id.to_string());
                }
            }
            database_error(e)
        })?;

        Ok(preferences)
    }
}
