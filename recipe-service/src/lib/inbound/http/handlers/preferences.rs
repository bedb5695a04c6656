use auth::Principal;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::me::current_user;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::preferences::errors::PreferencesError;
use crate::domain::preferences::models::split_ingredients;
use crate::domain::preferences::models::Diet;
use crate::domain::preferences::models::PatchPreferencesCommand;
use crate::domain::preferences::models::UserPreferences;
use crate::domain::preferences::ports::PreferencesServicePort;
use crate::inbound::http::router::AppState;

pub async fn get_preferences(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<ApiSuccess<PreferencesData>, ApiError> {
    let user = current_user(&state, &principal).await?;

    state
        .preferences_service
        .get_preferences(&user.id)
        .await
        .map_err(ApiError::from)
        .map(|ref preferences| ApiSuccess::new(StatusCode::OK, preferences.into()))
}

pub async fn patch_preferences(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<PatchPreferencesRequest>,
) -> Result<ApiSuccess<PreferencesData>, ApiError> {
    let command = body.try_into_command()?;
    let user = current_user(&state, &principal).await?;

    state
        .preferences_service
        .patch_preferences(&user.id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref preferences| ApiSuccess::new(StatusCode::OK, preferences.into()))
}

/// Disliked ingredients as a JSON array or one comma-separated string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IngredientList {
    Items(Vec<String>),
    Text(String),
}

impl IngredientList {
    fn into_items(self) -> Vec<String> {
        match self {
            IngredientList::Items(items) => items,
            IngredientList::Text(text) => split_ingredients(&text),
        }
    }
}

/// HTTP request body for a partial preferences update (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PatchPreferencesRequest {
    #[serde(default)]
    diet: Option<String>,
    #[serde(default)]
    disliked_ingredients: Option<IngredientList>,
}

impl PatchPreferencesRequest {
    fn try_into_command(self) -> Result<PatchPreferencesCommand, PreferencesError> {
        let diet = self.diet.map(|d| d.parse::<Diet>()).transpose()?;
        let disliked_ingredients = self.disliked_ingredients.map(IngredientList::into_items);
        Ok(PatchPreferencesCommand::new(diet, disliked_ingredients))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreferencesData {
    pub diet: Diet,
    pub disliked_ingredients: Vec<String>,
}

impl From<&UserPreferences> for PreferencesData {
    fn from(preferences: &UserPreferences) -> Self {
        Self {
            diet: preferences.diet,
            disliked_ingredients: preferences.disliked_ingredients.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> PatchPreferencesCommand {
        serde_json::from_str::<PatchPreferencesRequest>(json)
            .unwrap()
            .try_into_command()
            .unwrap()
    }

    #[test]
    fn test_ingredients_as_array() {
        let command = parse(r#"{"disliked_ingredients": ["Onion", " garlic ", "onion"]}"#);
        assert_eq!(command.diet, None);
        assert_eq!(
            command.disliked_ingredients,
            Some(vec!["Onion".to_string(), "garlic".to_string()])
        );
    }

    #[test]
    fn test_ingredients_as_comma_string() {
        let command = parse(r#"{"diet": "vegan", "disliked_ingredients": "tofu, olives ,,"}"#);
        assert_eq!(command.diet, Some(Diet::Vegan));
        assert_eq!(
            command.disliked_ingredients,
            Some(vec!["tofu".to_string(), "olives".to_string()])
        );
    }

    #[test]
    fn test_empty_body_changes_nothing() {
        assert_eq!(parse("{}"), PatchPreferencesCommand::default());
    }

    #[test]
    fn test_unknown_diet() {
        let request: PatchPreferencesRequest =
            serde_json::from_str(r#"{"diet": "carnivore"}"#).unwrap();
        assert!(matches!(
            request.try_into_command(),
            Err(PreferencesError::InvalidDiet(_))
        ));
    }
}
