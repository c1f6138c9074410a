//! HTTP server: shared state and the accept loop
//!
//! Uses hyper http1 with TokioIo for async handling. Each component is
//! constructed with the store adapters it needs; nothing is looked up from
//! a global.

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::config::Args;
use crate::credentials::CredentialService;
use crate::db::{CatalogStore, IdentityStore};
use crate::routes::{self, error_response, BoxBody};
use crate::types::ApiError;
use crate::writes::WriteCoordinator;

/// Shared application state
pub struct AppState {
    pub args: Args,
    pub catalog: Arc<CatalogStore>,
    pub identity: Arc<IdentityStore>,
    pub credentials: CredentialService,
    pub writer: WriteCoordinator,
}

impl AppState {
    pub fn new(
        args: Args,
        catalog: Arc<CatalogStore>,
        identity: Arc<IdentityStore>,
        credentials: CredentialService,
        writer: WriteCoordinator,
    ) -> Self {
        Self {
            args,
            catalog,
            identity,
            credentials,
            writer,
        }
    }
}

/// Run the HTTP server until the process is stopped.
pub async fn run(state: Arc<AppState>) -> Result<(), ApiError> {
    let listener = TcpListener::bind(state.args.listen)
        .await
        .map_err(|e| ApiError::Config(format!("Failed to bind {}: {e}", state.args.listen)))?;

    info!("Listening on {}", state.args.listen);

    loop {
        let (stream, remote) = match listener.accept().await {
            Ok(pair) => pair,
            Err(e) => {
                error!("Accept failed: {}", e);
                continue;
            }
        };

        let state = Arc::clone(&state);
        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            let service = service_fn(move |req| {
                let state = Arc::clone(&state);
                async move { Ok::<_, hyper::Error>(dispatch(req, state).await) }
            });

            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                debug!("Connection from {} ended: {}", remote, e);
            }
        });
    }
}

/// Top-level route dispatch with a JSON not-found fallthrough.
async fn dispatch(req: Request<Incoming>, state: Arc<AppState>) -> Response<BoxBody> {
    debug!("{} {}", req.method(), req.uri().path());

    let path = req.uri().path().to_string();
    let response = if path == "/recipes" || path.starts_with("/recipes/") {
        routes::handle_recipe_request(req, state).await
    } else if path == "/reviews" || path.starts_with("/reviews/") {
        routes::handle_review_request(req, state).await
    } else if path == "/users" || path.starts_with("/users/") {
        routes::handle_user_request(req, state).await
    } else {
        None
    };

    response.unwrap_or_else(|| error_response(ApiError::NotFound))
}
