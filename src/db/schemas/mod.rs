//! Storage and wire schemas
//!
//! Defines the recipe/review row types, the user document, and the inbound
//! payload types with their field validation.

mod recipe;
mod review;
mod user;

pub use recipe::{NewRecipe, Recipe, RecipePayload};
pub use review::{NewReview, Review, ReviewPayload};
pub use user::{CredentialsPayload, UserDoc, UserProfile, USER_COLLECTION};

/// True when an optional text field is present and non-blank.
pub(crate) fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}
