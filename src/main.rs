//! Larder - recipe and review catalog API

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use larder::{
    auth::{Hasher, TokenSigner},
    config::Args,
    credentials::CredentialService,
    db::{CatalogStore, IdentityStore},
    server::{self, AppState},
    writes::WriteCoordinator,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    // Initialize tracing/logging
    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("larder={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("======================================");
    info!("  Larder - recipe catalog API");
    info!(
        "  build {} ({})",
        env!("GIT_COMMIT_SHORT"),
        env!("BUILD_TIMESTAMP")
    );
    info!("======================================");
    info!("Listen: {}", args.listen);
    info!("Catalog: MySQL");
    info!("Identity: {}", args.identity_uri);
    info!("======================================");

    // Connect both stores before accepting traffic
    let catalog = Arc::new(
        CatalogStore::connect(&args.catalog_url, args.catalog_max_connections).await?,
    );
    info!("MySQL catalog connected successfully");

    let identity = Arc::new(IdentityStore::connect(&args.identity_uri, &args.identity_db).await?);
    info!("MongoDB identity store connected successfully");

    // Wire the core components with the adapters they need
    let signer = TokenSigner::new(
        args.jwt_secret.clone().unwrap_or_default(),
        args.jwt_expiry_seconds.unwrap_or_default(),
    )?;
    let hasher = Hasher::new(args.hash_time_cost);
    let credentials = CredentialService::new(identity.clone(), hasher, signer);
    let writer = WriteCoordinator::new(catalog.clone(), identity.clone());

    let state = Arc::new(AppState::new(args, catalog, identity, credentials, writer));
    server::run(state).await?;

    Ok(())
}
