//! Configuration for larder
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::SocketAddr;

/// Larder - recipe and review catalog API
#[derive(Parser, Debug, Clone)]
#[command(name = "larder")]
#[command(about = "Recipe and review catalog API")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// MySQL connection URL for the recipe/review catalog
    #[arg(long, env = "CATALOG_URL", default_value = "mysql://localhost:3306/larder")]
    pub catalog_url: String,

    /// Maximum catalog pool connections
    #[arg(long, env = "CATALOG_MAX_CONNECTIONS", default_value = "8")]
    pub catalog_max_connections: u32,

    /// MongoDB connection URI for user profiles
    #[arg(long, env = "IDENTITY_URI", default_value = "mongodb://localhost:27017")]
    pub identity_uri: String,

    /// MongoDB database name
    #[arg(long, env = "IDENTITY_DB", default_value = "larder")]
    pub identity_db: String,

    /// JWT secret for token signing
    #[arg(long, env = "JWT_SECRET")]
    pub jwt_secret: Option<String>,

    /// Session token validity window in seconds. Deliberately has no
    /// default: deployments must choose a window.
    #[arg(long, env = "JWT_EXPIRY_SECONDS")]
    pub jwt_expiry_seconds: Option<u64>,

    /// Argon2 time cost for password hashing
    #[arg(long, env = "HASH_TIME_COST", default_value = "2")]
    pub hash_time_cost: u32,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt_secret.is_none() {
            return Err("JWT_SECRET is required".to_string());
        }

        if self.jwt_expiry_seconds.is_none() {
            return Err(
                "JWT_EXPIRY_SECONDS is required; the token validity window is never defaulted"
                    .to_string(),
            );
        }

        if self.hash_time_cost == 0 {
            return Err("HASH_TIME_COST must be at least 1".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args::parse_from([
            "larder",
            "--jwt-secret",
            "a-secret-that-is-at-least-32-characters",
            "--jwt-expiry-seconds",
            "3600",
        ])
    }

    #[test]
    fn test_valid_args() {
        assert!(base_args().validate().is_ok());
    }

    #[test]
    fn test_missing_jwt_secret_rejected() {
        let mut args = base_args();
        args.jwt_secret = None;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_missing_expiry_rejected() {
        let mut args = base_args();
        args.jwt_expiry_seconds = None;
        let err = args.validate().unwrap_err();
        assert!(err.contains("JWT_EXPIRY_SECONDS"));
    }

    #[test]
    fn test_zero_time_cost_rejected() {
        let mut args = base_args();
        args.hash_time_cost = 0;
        assert!(args.validate().is_err());
    }
}
