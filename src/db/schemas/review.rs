//! Review row schema

use serde::{Deserialize, Serialize};

use crate::db::schemas::present;
use crate::types::ApiError;

/// Review row from the catalog store.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Store-generated row identity
    pub id: i64,
    /// Recipe the review refers to
    pub recipe_id: i64,
    /// Login handle of the owning user
    pub owner_id: String,
    pub title: String,
    pub rating: i32,
    /// Free-text body; optional
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Inbound review payload, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPayload {
    #[serde(default)]
    pub recipe_id: Option<i64>,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub body: Option<String>,
}

/// Fully-validated review fields, used for insert and full replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub recipe_id: i64,
    pub owner_id: String,
    pub title: String,
    pub rating: i32,
    pub body: Option<String>,
}

impl ReviewPayload {
    /// Validate presence of every required field, reporting all misses at
    /// once. The body is optional; a rating of zero is present, not absent.
    pub fn into_validated(self) -> Result<NewReview, ApiError> {
        let mut missing = Vec::new();
        if self.recipe_id.is_none() {
            missing.push("recipeId");
        }
        if !present(&self.owner_id) {
            missing.push("ownerId");
        }
        if !present(&self.title) {
            missing.push("title");
        }
        if self.rating.is_none() {
            missing.push("rating");
        }
        if !missing.is_empty() {
            return Err(ApiError::Validation(missing));
        }

        Ok(NewReview {
            recipe_id: self.recipe_id.unwrap_or_default(),
            owner_id: self.owner_id.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            rating: self.rating.unwrap_or_default(),
            body: self.body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_payload() -> ReviewPayload {
        ReviewPayload {
            recipe_id: Some(7),
            owner_id: Some("bob".into()),
            title: Some("Excellent".into()),
            rating: Some(5),
            body: Some("Came out great on the first try.".into()),
        }
    }

    #[test]
    fn test_valid_payload() {
        let review = full_payload().into_validated().unwrap();
        assert_eq!(review.recipe_id, 7);
        assert_eq!(review.rating, 5);
    }

    #[test]
    fn test_body_is_optional() {
        let mut payload = full_payload();
        payload.body = None;
        let review = payload.into_validated().unwrap();
        assert!(review.body.is_none());
    }

    #[test]
    fn test_zero_rating_is_present() {
        let mut payload = full_payload();
        payload.rating = Some(0);
        assert!(payload.into_validated().is_ok());
    }

    #[test]
    fn test_every_missing_field_reported() {
        let err = ReviewPayload::default().into_validated().unwrap_err();
        match err {
            ApiError::Validation(fields) => {
                assert_eq!(fields, vec!["recipeId", "ownerId", "title", "rating"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
