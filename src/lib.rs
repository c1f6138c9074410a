//! Larder - recipe and review catalog API
//!
//! Recipe and review rows live in a MySQL catalog; user profiles live in
//! MongoDB, carrying a denormalized index of the entity ids each user owns.
//! The service coordinates entity creation across the two stores, paginates
//! the public listings, and issues signed session tokens for protected
//! user reads.
//!
//! ## Modules
//!
//! - **db**: the two store adapters (catalog rows, identity documents)
//! - **writes**: cross-store create coordination with per-step failure tags
//! - **credentials**: registration, login, and the two protected-route gates
//! - **pagination**: pure page window and navigation-link computation
//! - **routes / server**: hyper request dispatch over shared state

pub mod auth;
pub mod config;
pub mod credentials;
pub mod db;
pub mod pagination;
pub mod routes;
pub mod server;
pub mod types;
pub mod writes;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{ApiError, Result};
