//! Recipe row schema

use serde::{Deserialize, Serialize};

use crate::db::schemas::present;
use crate::types::ApiError;

/// Recipe row from the catalog store.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Store-generated row identity
    pub id: i64,
    /// Login handle of the owning user
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub steps: String,
}

/// Inbound recipe payload, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipePayload {
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub steps: Option<String>,
}

/// Fully-validated recipe fields, used for insert and full replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub steps: String,
}

impl RecipePayload {
    /// Validate presence of every required field, reporting all misses at
    /// once rather than the first.
    pub fn into_validated(self) -> Result<NewRecipe, ApiError> {
        let mut missing = Vec::new();
        if !present(&self.owner_id) {
            missing.push("ownerId");
        }
        if !present(&self.title) {
            missing.push("title");
        }
        if !present(&self.description) {
            missing.push("description");
        }
        if !present(&self.steps) {
            missing.push("steps");
        }
        if !missing.is_empty() {
            return Err(ApiError::Validation(missing));
        }

        Ok(NewRecipe {
            owner_id: self.owner_id.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            steps: self.steps.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_payload() -> RecipePayload {
        RecipePayload {
            owner_id: Some("alice".into()),
            title: Some("Flatbread".into()),
            description: Some("Simple unleavened bread".into()),
            steps: Some("Mix, rest, roll, fry.".into()),
        }
    }

    #[test]
    fn test_valid_payload() {
        let recipe = full_payload().into_validated().unwrap();
        assert_eq!(recipe.owner_id, "alice");
        assert_eq!(recipe.title, "Flatbread");
    }

    #[test]
    fn test_every_missing_field_reported() {
        let err = RecipePayload::default().into_validated().unwrap_err();
        match err {
            ApiError::Validation(fields) => {
                assert_eq!(fields, vec!["ownerId", "title", "description", "steps"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_field_counts_as_missing() {
        let mut payload = full_payload();
        payload.title = Some("   ".into());
        let err = payload.into_validated().unwrap_err();
        assert!(matches!(err, ApiError::Validation(fields) if fields == vec!["title"]));
    }
}
