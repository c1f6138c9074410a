//! Registration, login, and protected-route checks
//!
//! Flow per operation:
//! - register: validate fields, hash the password, store a user document
//!   with empty back-reference arrays
//! - login: privileged lookup including the hash, verify, issue a token
//! - protected check: authenticate the bearer token, then compare the
//!   decoded subject against the target handle

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::{extract_bearer_token, Hasher, TokenSigner};
use crate::db::schemas::{CredentialsPayload, UserDoc, UserProfile};
use crate::types::{ApiError, Result};

/// Response message for every failed credential check. A single constant,
/// so an unknown handle and a wrong password are indistinguishable.
const INVALID_CREDENTIALS: &str = "Invalid credentials.";

/// Store operations the credential service needs from the identity side.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Point lookup returning the public profile.
    async fn find_user(&self, handle: &str) -> Result<Option<UserProfile>>;
    /// Privileged lookup including the password hash. Login is the only
    /// caller.
    async fn find_user_with_hash(&self, handle: &str) -> Result<Option<UserDoc>>;
    /// Insert a new user document. A duplicate handle is a conflict.
    async fn insert_user(&self, user: UserDoc) -> Result<()>;
}

/// Issues and checks credentials against the identity store.
pub struct CredentialService {
    directory: Arc<dyn UserDirectory>,
    hasher: Hasher,
    signer: TokenSigner,
}

impl CredentialService {
    pub fn new(directory: Arc<dyn UserDirectory>, hasher: Hasher, signer: TokenSigner) -> Self {
        Self {
            directory,
            hasher,
            signer,
        }
    }

    /// Register a new user. Returns the handle that now identifies them.
    pub async fn register(&self, payload: CredentialsPayload) -> Result<String> {
        let (handle, password) = payload.into_validated()?;

        if self.directory.find_user(&handle).await?.is_some() {
            return Err(ApiError::Conflict(format!(
                "A user with the ID {handle} already exists."
            )));
        }

        let password_hash = self.hasher.hash(&password)?;
        self.directory
            .insert_user(UserDoc::new(handle.clone(), password_hash))
            .await?;

        info!("Registered new user: {}", handle);
        Ok(handle)
    }

    /// Authenticate a handle/password pair and issue a session token.
    pub async fn login(&self, handle: &str, password: &str) -> Result<String> {
        let user = match self.directory.find_user_with_hash(handle).await? {
            Some(user) => user,
            None => {
                warn!("Login failed - user not found: {}", handle);
                return Err(ApiError::Unauthorized(INVALID_CREDENTIALS));
            }
        };

        if !self.hasher.verify(password, &user.password_hash)? {
            warn!("Login failed - invalid password: {}", handle);
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS));
        }

        info!("Login successful: {}", handle);
        self.signer.issue(handle)
    }

    /// Authentication gate: verify the bearer token and decode the subject.
    pub fn authenticate(&self, auth_header: Option<&str>) -> Result<String> {
        let token = extract_bearer_token(auth_header)
            .ok_or(ApiError::Unauthorized("No authentication token provided."))?;
        Ok(self.signer.verify(token)?.sub)
    }

    /// Authorization gate: the authenticated principal must match the
    /// target handle. Only meaningful after `authenticate` succeeds.
    pub fn authorize(&self, principal: &str, target: &str) -> Result<()> {
        if principal == target {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}
