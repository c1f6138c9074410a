//! User document schema
//!
//! Stores credentials and the denormalized index of owned entity ids.

use serde::{Deserialize, Serialize};

use crate::db::schemas::present;
use crate::types::ApiError;

/// Collection name for users
pub const USER_COLLECTION: &str = "users";

/// User document stored in the identity store.
///
/// The `recipes` and `reviews` arrays index the entity ids this user owns.
/// They are append-only and best-effort: a write interrupted between the
/// catalog insert and the index append leaves them under-counting, and
/// deleted entities are never removed from them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDoc {
    /// Natural key: the login handle
    pub user_id: String,

    /// Argon2 password hash, PHC formatted
    pub password_hash: String,

    #[serde(default)]
    pub recipes: Vec<i64>,

    #[serde(default)]
    pub reviews: Vec<i64>,
}

impl UserDoc {
    /// Create a new user document with empty back-reference arrays
    pub fn new(user_id: String, password_hash: String) -> Self {
        Self {
            user_id,
            password_hash,
            recipes: Vec::new(),
            reviews: Vec::new(),
        }
    }
}

/// Public view of a user: everything except the credential hash.
///
/// The hash can never leak into a response because this type has no field
/// for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    pub recipes: Vec<i64>,
    pub reviews: Vec<i64>,
}

impl From<UserDoc> for UserProfile {
    fn from(doc: UserDoc) -> Self {
        Self {
            user_id: doc.user_id,
            recipes: doc.recipes,
            reviews: doc.reviews,
        }
    }
}

/// Inbound handle/password payload for registration and login.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsPayload {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl CredentialsPayload {
    /// Validate that both the handle and the password are present.
    pub fn into_validated(self) -> Result<(String, String), ApiError> {
        let mut missing = Vec::new();
        if !present(&self.user_id) {
            missing.push("userId");
        }
        if !present(&self.password) {
            missing.push("password");
        }
        if !missing.is_empty() {
            return Err(ApiError::Validation(missing));
        }

        Ok((
            self.user_id.unwrap_or_default(),
            self.password.unwrap_or_default(),
        ))
    }
}
