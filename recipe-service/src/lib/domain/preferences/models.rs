use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::domain::preferences::errors::DietError;
use crate::domain::user::models::UserId;

/// Dietary regime a user follows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Diet {
    #[default]
    None,
    Vegetarian,
    Vegan,
    GlutenFree,
    Keto,
}

impl Diet {
    pub fn as_str(&self) -> &'static str {
        match self {
            Diet::None => "NONE",
            Diet::Vegetarian => "VEGETARIAN",
            Diet::Vegan => "VEGAN",
            Diet::GlutenFree => "GLUTEN_FREE",
            Diet::Keto => "KETO",
        }
    }
}

impl fmt::Display for Diet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Diet {
    type Err = DietError;

    /// Case-insensitive; dashes and spaces count as underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "NONE" => Ok(Diet::None),
            "VEGETARIAN" => Ok(Diet::Vegetarian),
            "VEGAN" => Ok(Diet::Vegan),
            "GLUTEN_FREE" => Ok(Diet::GlutenFree),
            "KETO" => Ok(Diet::Keto),
            _ => Err(DietError(s.to_string())),
        }
    }
}

/// Dietary preferences of one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPreferences {
    pub user_id: UserId,
    pub diet: Diet,
    pub disliked_ingredients: Vec<String>,
}

impl UserPreferences {
    /// Preferences of a user who never stored any.
    pub fn default_for(user_id: UserId) -> Self {
        Self {
            user_id,
            diet: Diet::None,
            disliked_ingredients: Vec::new(),
        }
    }

    /// Apply the provided fields, leaving the rest as they are.
    pub fn apply(mut self, command: PatchPreferencesCommand) -> Self {
        if let Some(diet) = command.diet {
            self.diet = diet;
        }
        if let Some(ingredients) = command.disliked_ingredients {
            self.disliked_ingredients = ingredients;
        }
        self
    }
}

/// Partial update of a user's preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchPreferencesCommand {
    pub diet: Option<Diet>,
    pub disliked_ingredients: Option<Vec<String>>,
}

impl PatchPreferencesCommand {
    pub fn new(diet: Option<Diet>, disliked_ingredients: Option<Vec<String>>) -> Self {
        Self {
            diet,
            disliked_ingredients: disliked_ingredients.map(normalize_ingredients),
        }
    }
}

/// Trim entries, drop empty ones and keep the first spelling of each
/// case-insensitive duplicate.
pub fn normalize_ingredients<I, S>(ingredients: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    ingredients
        .into_iter()
        .filter_map(|ingredient| {
            let trimmed = ingredient.as_ref().trim();
            if trimmed.is_empty() || !seen.insert(trimmed.to_lowercase()) {
                return None;
            }
            Some(trimmed.to_string())
        })
        .collect()
}

/// Split a comma-separated ingredient list.
pub fn split_ingredients(text: &str) -> Vec<String> {
    normalize_ingredients(text.split(','))
}
