//! Session token handling
//!
//! Signed tokens bind an authenticated subject to a login handle for a
//! bounded validity window.
//!
//! Security notes:
//! - Tokens are signed with HS256 (HMAC-SHA256)
//! - The validity window comes from configuration; there is no default
//! - JWT_SECRET should be a strong random value from the environment

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::ApiError;

/// Payload stored in a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Login handle of the authenticated user
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Session token signer and verifier
#[derive(Clone)]
pub struct TokenSigner {
    secret: String,
    expiry_seconds: u64,
}

impl TokenSigner {
    /// Create a new token signer
    ///
    /// Returns an error if the secret is empty or too short, or if the
    /// validity window is zero.
    pub fn new(secret: String, expiry_seconds: u64) -> Result<Self, ApiError> {
        if secret.is_empty() {
            return Err(ApiError::Config("JWT_SECRET is required".into()));
        }

        if secret.len() < 32 {
            return Err(ApiError::Config(
                "JWT_SECRET must be at least 32 characters".into(),
            ));
        }

        if expiry_seconds == 0 {
            return Err(ApiError::Config(
                "JWT_EXPIRY_SECONDS must be positive".into(),
            ));
        }

        Ok(Self {
            secret,
            expiry_seconds,
        })
    }

    /// Issue a token for an authenticated handle
    pub fn issue(&self, handle: &str) -> Result<String, ApiError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| ApiError::Internal(format!("System time error: {e}")))?
            .as_secs();

        let claims = Claims {
            sub: handle.to_string(),
            iat: now,
            exp: now + self.expiry_seconds,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(format!("Failed to generate token: {e}")))
    }

    /// Verify a token and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|err| {
            use jsonwebtoken::errors::ErrorKind;
            match err.kind() {
                ErrorKind::ExpiredSignature => ApiError::Unauthorized("Token expired."),
                _ => ApiError::Unauthorized("Invalid authentication token."),
            }
        })
    }
}

/// Extract a bearer token from an Authorization header value.
/// Supports "Bearer <token>" format and raw tokens.
pub fn extract_bearer_token(auth_header: Option<&str>) -> Option<&str> {
    let header = auth_header?;

    if let Some(token) = header.strip_prefix("Bearer ") {
        let token = token.trim();
        if !token.is_empty() {
            return Some(token);
        }
    }

    if !header.contains(' ') {
        let token = header.trim();
        if !token.is_empty() {
            return Some(token);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_signer() -> TokenSigner {
        TokenSigner::new(
            "test-secret-that-is-at-least-32-characters-long".into(),
            3600,
        )
        .unwrap()
    }

    #[test]
    fn test_issue_and_verify_token() {
        let signer = test_signer();

        let token = signer.issue("alice").unwrap();
        assert!(!token.is_empty());

        let claims = signer.verify(&token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.exp, claims.iat + 3600);
    }

    #[test]
    fn test_invalid_token() {
        let signer = test_signer();

        let result = signer.verify("invalid-token");
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn test_wrong_secret() {
        let signer1 = test_signer();
        let signer2 = TokenSigner::new(
            "different-secret-that-is-at-least-32-characters".into(),
            3600,
        )
        .unwrap();

        let token = signer1.issue("alice").unwrap();

        // Verify with wrong secret should fail
        assert!(signer2.verify(&token).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        // Bearer format
        assert_eq!(
            extract_bearer_token(Some("Bearer abc123")),
            Some("abc123")
        );

        // Raw token
        assert_eq!(extract_bearer_token(Some("abc123")), Some("abc123"));

        // Empty cases
        assert_eq!(extract_bearer_token(None), None);
        assert_eq!(extract_bearer_token(Some("")), None);
        assert_eq!(extract_bearer_token(Some("Bearer ")), None);

        // Invalid format
        assert_eq!(extract_bearer_token(Some("Basic abc123")), None);
    }

    #[test]
    fn test_secret_validation() {
        // Too short
        assert!(TokenSigner::new("short".into(), 3600).is_err());

        // Empty
        assert!(TokenSigner::new("".into(), 3600).is_err());

        // Zero expiry
        assert!(TokenSigner::new(
            "this-secret-is-at-least-32-chars-long".into(),
            0
        )
        .is_err());

        // Valid
        assert!(TokenSigner::new("this-secret-is-at-least-32-chars-long".into(), 3600).is_ok());
    }
}
