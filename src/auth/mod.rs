//! Authentication primitives
//!
//! Provides:
//! - Session token generation and validation (HS256)
//! - Password hashing with Argon2

pub mod jwt;
pub mod password;

pub use jwt::{extract_bearer_token, Claims, TokenSigner};
pub use password::Hasher;
