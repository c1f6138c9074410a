//! HTTP routes for larder

pub mod recipes;
pub mod reviews;
pub mod users;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::error;

use crate::types::ApiError;

pub use recipes::handle_recipe_request;
pub use reviews::handle_review_request;
pub use users::handle_user_request;

pub(crate) type BoxBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;

/// Maximum accepted request body, in bytes.
const MAX_BODY_BYTES: usize = 10240;

/// Error body shape: `{"error": "<message>"}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub(crate) fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<BoxBody> {
    let json = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(full_body(json))
        .unwrap()
}

pub(crate) fn full_body(data: impl Into<Bytes>) -> BoxBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed()
}

pub(crate) fn empty_body() -> BoxBody {
    Full::new(Bytes::new())
        .map_err(|never| match never {})
        .boxed()
}

/// Map a core error to its HTTP response. This is the single boundary
/// where store failures surface: the detail is logged and the client gets
/// a generic message that never exposes internals.
pub(crate) fn error_response(err: ApiError) -> Response<BoxBody> {
    let status = err.status_code();
    let message = match &err {
        ApiError::Store(detail) | ApiError::Internal(detail) | ApiError::Config(detail) => {
            error!("request failed: {}", detail);
            "Internal server error. Please try again later.".to_string()
        }
        _ => err.to_string(),
    };

    json_response(status, &ErrorResponse { error: message })
}

pub(crate) fn method_not_allowed() -> Response<BoxBody> {
    json_response(
        StatusCode::METHOD_NOT_ALLOWED,
        &ErrorResponse {
            error: "Method not allowed".to_string(),
        },
    )
}

pub(crate) async fn parse_json_body<T: DeserializeOwned>(
    req: Request<Incoming>,
) -> Result<T, ApiError> {
    let body = req
        .collect()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read body: {e}")))?;

    let bytes = body.to_bytes();
    if bytes.len() > MAX_BODY_BYTES {
        return Err(ApiError::BadRequest("Request body too large".into()));
    }

    serde_json::from_slice(&bytes).map_err(|e| ApiError::BadRequest(format!("Invalid JSON: {e}")))
}

pub(crate) fn auth_header(req: &Request<Incoming>) -> Option<&str> {
    req.headers()
        .get(hyper::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}
