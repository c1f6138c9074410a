//! MongoDB adapter for user profiles
//!
//! Owns the identity store: registration inserts, point lookups, and the
//! atomic back-reference appends keyed by login handle.

use async_trait::async_trait;
use bson::{doc, Document};
use mongodb::{options::IndexOptions, Client, Collection, IndexModel};
use tracing::info;

use crate::credentials::UserDirectory;
use crate::db::schemas::{UserDoc, UserProfile, USER_COLLECTION};
use crate::types::{ApiError, Result};
use crate::writes::OwnerIndex;

/// Identity store backed by a MongoDB users collection.
#[derive(Clone)]
pub struct IdentityStore {
    users: Collection<UserDoc>,
}

impl IdentityStore {
    /// Connect, verify the connection, and apply the unique handle index.
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self> {
        info!("Connecting to MongoDB at {}", uri);

        // Use serverSelectionTimeoutMS to avoid hanging on unreachable MongoDB
        let timeout_uri = if uri.contains('?') {
            format!("{}&serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        } else {
            format!("{}?serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        };

        let client = Client::with_uri_str(&timeout_uri)
            .await
            .map_err(|e| ApiError::Store(format!("Failed to connect to MongoDB: {e}")))?;

        let db = client.database(db_name);

        // Verify connection with timeout
        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| ApiError::Store(format!("MongoDB ping failed: {e}")))?;

        let users = db.collection::<UserDoc>(USER_COLLECTION);

        let index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("user_id_unique".to_string())
                    .build(),
            )
            .build();
        users
            .create_index(index)
            .await
            .map_err(|e| ApiError::Store(format!("Failed to create index: {e}")))?;

        info!("Connected to MongoDB database '{}'", db_name);
        Ok(Self { users })
    }

    /// Apply an update to the user document for `handle`. A missing match
    /// is a store failure: user documents are never deleted, so the handle
    /// was validated against a document that should still exist.
    async fn update_user(&self, handle: &str, update: Document) -> Result<()> {
        let result = self
            .users
            .update_one(doc! { "user_id": handle }, update)
            .await
            .map_err(|e| ApiError::Store(format!("Update failed: {e}")))?;

        if result.matched_count == 0 {
            return Err(ApiError::Store(format!(
                "owner document missing for {handle}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for IdentityStore {
    async fn find_user(&self, handle: &str) -> Result<Option<UserProfile>> {
        Ok(self
            .find_user_with_hash(handle)
            .await?
            .map(UserProfile::from))
    }

    async fn find_user_with_hash(&self, handle: &str) -> Result<Option<UserDoc>> {
        self.users
            .find_one(doc! { "user_id": handle })
            .await
            .map_err(|e| ApiError::Store(format!("Find failed: {e}")))
    }

    async fn insert_user(&self, user: UserDoc) -> Result<()> {
        self.users.insert_one(user).await.map_err(|e| {
            // The unique index backstops the check-then-insert race
            let msg = e.to_string();
            if msg.contains("duplicate key") || msg.contains("E11000") {
                ApiError::Conflict("A user with this ID already exists.".into())
            } else {
                ApiError::Store(format!("Insert failed: {msg}"))
            }
        })?;
        Ok(())
    }
}

#[async_trait]
impl OwnerIndex for IdentityStore {
    async fn owner_exists(&self, handle: &str) -> Result<bool> {
        Ok(self.find_user_with_hash(handle).await?.is_some())
    }

    async fn append_recipe(&self, handle: &str, id: i64) -> Result<()> {
        self.update_user(handle, doc! { "$push": { "recipes": id } })
            .await
    }

    async fn append_review(&self, handle: &str, id: i64) -> Result<()> {
        self.update_user(handle, doc! { "$push": { "reviews": id } })
            .await
    }
}

#[cfg(test)]
mod tests {
    // Integration tests would require a running MongoDB instance.
    // Credential and coordinated-write behavior over this adapter is
    // covered in credentials.rs and writes.rs against in-memory fakes.
}
