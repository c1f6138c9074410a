//! Cross-store write coordination for owned entities
//!
//! Creating a recipe or review touches both stores in a fixed order: owner
//! lookup in the identity store, row insert into the catalog, back-reference
//! append onto the owner document. The first failure aborts the sequence;
//! nothing is retried or rolled back. A failure after the row insert leaves
//! the row durable but unindexed - the caller still receives the error, and
//! the step name records where the sequence stopped so a reconciliation job
//! could pick it up later.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::db::schemas::{NewRecipe, NewReview};
use crate::types::{ApiError, Result};

/// Which step of a coordinated write failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStep {
    /// Point lookup of the owner handle in the identity store
    OwnerLookup,
    /// Row insert into the catalog store
    RowInsert,
    /// Back-reference append onto the owner document
    IndexAppend,
}

impl fmt::Display for WriteStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OwnerLookup => write!(f, "owner lookup"),
            Self::RowInsert => write!(f, "row insert"),
            Self::IndexAppend => write!(f, "index append"),
        }
    }
}

/// A failed coordinated write, tagged with the step that failed.
///
/// When `step` is `IndexAppend` the entity row already exists and is
/// reachable through the catalog store; only the owner's index is missing
/// the new id.
#[derive(Debug)]
pub struct WriteFailure {
    pub step: WriteStep,
    pub error: ApiError,
}

impl WriteFailure {
    fn at(step: WriteStep) -> impl FnOnce(ApiError) -> Self {
        move |error| Self { step, error }
    }
}

/// Catalog-side insert operations.
#[async_trait]
pub trait RowWriter: Send + Sync {
    /// Insert a recipe row, returning the store-generated id.
    async fn insert_recipe(&self, recipe: &NewRecipe) -> Result<i64>;
    /// Insert a review row, returning the store-generated id.
    async fn insert_review(&self, review: &NewReview) -> Result<i64>;
}

/// Identity-side owner lookup and back-reference appends.
#[async_trait]
pub trait OwnerIndex: Send + Sync {
    async fn owner_exists(&self, handle: &str) -> Result<bool>;
    /// Append a recipe id to the owner's index. Atomic per document.
    async fn append_recipe(&self, handle: &str, id: i64) -> Result<()>;
    /// Append a review id to the owner's index. Atomic per document.
    async fn append_review(&self, handle: &str, id: i64) -> Result<()>;
}

/// Sequences validation and the cross-store writes for entity creation.
///
/// Holds the two store adapters it needs; nothing is reached through
/// ambient state.
pub struct WriteCoordinator {
    catalog: Arc<dyn RowWriter>,
    identity: Arc<dyn OwnerIndex>,
}

impl WriteCoordinator {
    pub fn new(catalog: Arc<dyn RowWriter>, identity: Arc<dyn OwnerIndex>) -> Self {
        Self { catalog, identity }
    }

    /// Create a recipe owned by `recipe.owner_id`.
    ///
    /// Returns the new row id only once the owner's index has been updated.
    pub async fn create_recipe(&self, recipe: &NewRecipe) -> std::result::Result<i64, WriteFailure> {
        self.ensure_owner(&recipe.owner_id).await?;

        let id = self
            .catalog
            .insert_recipe(recipe)
            .await
            .map_err(WriteFailure::at(WriteStep::RowInsert))?;

        self.identity
            .append_recipe(&recipe.owner_id, id)
            .await
            .map_err(WriteFailure::at(WriteStep::IndexAppend))?;

        Ok(id)
    }

    /// Create a review owned by `review.owner_id`.
    pub async fn create_review(&self, review: &NewReview) -> std::result::Result<i64, WriteFailure> {
        self.ensure_owner(&review.owner_id).await?;

        let id = self
            .catalog
            .insert_review(review)
            .await
            .map_err(WriteFailure::at(WriteStep::RowInsert))?;

        self.identity
            .append_review(&review.owner_id, id)
            .await
            .map_err(WriteFailure::at(WriteStep::IndexAppend))?;

        Ok(id)
    }

    async fn ensure_owner(&self, handle: &str) -> std::result::Result<(), WriteFailure> {
        match self.identity.owner_exists(handle).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(WriteFailure {
                step: WriteStep::OwnerLookup,
                error: ApiError::InvalidOwner(handle.to_string()),
            }),
            Err(error) => Err(WriteFailure {
                step: WriteStep::OwnerLookup,
                error,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// In-memory catalog: records inserts, hands out sequential ids.
    #[derive(Default)]
    struct FakeCatalog {
        recipes: Mutex<Vec<NewRecipe>>,
        reviews: Mutex<Vec<NewReview>>,
        fail_inserts: bool,
    }

    #[async_trait]
    impl RowWriter for FakeCatalog {
        async fn insert_recipe(&self, recipe: &NewRecipe) -> Result<i64> {
            if self.fail_inserts {
                return Err(ApiError::Store("insert refused".into()));
            }
            let mut rows = self.recipes.lock().unwrap();
            rows.push(recipe.clone());
            Ok(rows.len() as i64)
        }

        async fn insert_review(&self, review: &NewReview) -> Result<i64> {
            if self.fail_inserts {
                return Err(ApiError::Store("insert refused".into()));
            }
            let mut rows = self.reviews.lock().unwrap();
            rows.push(review.clone());
            Ok(rows.len() as i64)
        }
    }

    /// In-memory owner index with injectable append failure.
    #[derive(Default)]
    struct FakeIndex {
        owners: Vec<String>,
        recipe_appends: Mutex<Vec<(String, i64)>>,
        review_appends: Mutex<Vec<(String, i64)>>,
        fail_appends: bool,
    }

    #[async_trait]
    impl OwnerIndex for FakeIndex {
        async fn owner_exists(&self, handle: &str) -> Result<bool> {
            Ok(self.owners.iter().any(|o| o == handle))
        }

        async fn append_recipe(&self, handle: &str, id: i64) -> Result<()> {
            if self.fail_appends {
                return Err(ApiError::Store("append refused".into()));
            }
            self.recipe_appends
                .lock()
                .unwrap()
                .push((handle.to_string(), id));
            Ok(())
        }

        async fn append_review(&self, handle: &str, id: i64) -> Result<()> {
            if self.fail_appends {
                return Err(ApiError::Store("append refused".into()));
            }
            self.review_appends
                .lock()
                .unwrap()
                .push((handle.to_string(), id));
            Ok(())
        }
    }

    fn recipe_for(owner: &str) -> NewRecipe {
        NewRecipe {
            owner_id: owner.into(),
            title: "Flatbread".into(),
            description: "Simple unleavened bread".into(),
            steps: "Mix, rest, roll, fry.".into(),
        }
    }

    fn coordinator(
        catalog: FakeCatalog,
        index: FakeIndex,
    ) -> (WriteCoordinator, Arc<FakeCatalog>, Arc<FakeIndex>) {
        let catalog = Arc::new(catalog);
        let index = Arc::new(index);
        let coordinator = WriteCoordinator::new(catalog.clone(), index.clone());
        (coordinator, catalog, index)
    }

    #[tokio::test]
    async fn test_unknown_owner_persists_nothing() {
        let (coordinator, catalog, index) =
            coordinator(FakeCatalog::default(), FakeIndex::default());

        let failure = coordinator
            .create_recipe(&recipe_for("nobody"))
            .await
            .unwrap_err();

        assert_eq!(failure.step, WriteStep::OwnerLookup);
        assert!(matches!(failure.error, ApiError::InvalidOwner(ref h) if h == "nobody"));
        assert!(catalog.recipes.lock().unwrap().is_empty());
        assert!(index.recipe_appends.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_valid_owner_persists_row_and_append() {
        let index = FakeIndex {
            owners: vec!["alice".into()],
            ..FakeIndex::default()
        };
        let (coordinator, catalog, index) = coordinator(FakeCatalog::default(), index);

        let id = coordinator.create_recipe(&recipe_for("alice")).await.unwrap();

        assert_eq!(id, 1);
        assert_eq!(catalog.recipes.lock().unwrap().len(), 1);
        assert_eq!(
            *index.recipe_appends.lock().unwrap(),
            vec![("alice".to_string(), 1)]
        );
    }

    #[tokio::test]
    async fn test_insert_failure_leaves_index_untouched() {
        let catalog = FakeCatalog {
            fail_inserts: true,
            ..FakeCatalog::default()
        };
        let index = FakeIndex {
            owners: vec!["alice".into()],
            ..FakeIndex::default()
        };
        let (coordinator, _, index) = coordinator(catalog, index);

        let failure = coordinator
            .create_recipe(&recipe_for("alice"))
            .await
            .unwrap_err();

        assert_eq!(failure.step, WriteStep::RowInsert);
        assert!(index.recipe_appends.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_failure_reports_step_but_row_survives() {
        let index = FakeIndex {
            owners: vec!["alice".into()],
            fail_appends: true,
            ..FakeIndex::default()
        };
        let (coordinator, catalog, _) = coordinator(FakeCatalog::default(), index);

        let failure = coordinator
            .create_recipe(&recipe_for("alice"))
            .await
            .unwrap_err();

        // The caller sees an error, yet the row was durably created: the
        // documented inconsistency window.
        assert_eq!(failure.step, WriteStep::IndexAppend);
        assert!(matches!(failure.error, ApiError::Store(_)));
        assert_eq!(catalog.recipes.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_review_sequence_appends_matching_id() {
        let index = FakeIndex {
            owners: vec!["bob".into()],
            ..FakeIndex::default()
        };
        let (coordinator, catalog, index) = coordinator(FakeCatalog::default(), index);

        let review = NewReview {
            recipe_id: 7,
            owner_id: "bob".into(),
            title: "Excellent".into(),
            rating: 5,
            body: None,
        };
        let id = coordinator.create_review(&review).await.unwrap();

        assert_eq!(catalog.reviews.lock().unwrap().len(), 1);
        assert_eq!(
            *index.review_appends.lock().unwrap(),
            vec![("bob".to_string(), id)]
        );
    }
}
