//! HTTP routes for users
//!
//! - POST /users                - registration, public
//! - POST /users/login          - handle + password, returns a token
//! - GET  /users/{id}           - profile, requires auth + principal match
//! - GET  /users/{id}/recipes   - unpaginated listing by owner, public
//! - GET  /users/{id}/reviews   - unpaginated listing by owner, public

use hyper::body::Incoming;
use hyper::{Method, Request, Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;

use crate::credentials::UserDirectory;
use crate::db::schemas::{CredentialsPayload, Recipe, Review};
use crate::routes::{
    auth_header, error_response, json_response, method_not_allowed, parse_json_body, BoxBody,
};
use crate::server::AppState;
use crate::types::ApiError;

#[derive(Debug, Serialize)]
struct UserLinks {
    user: String,
}

#[derive(Debug, Serialize)]
struct CreatedUser {
    id: String,
    links: UserLinks,
}

#[derive(Debug, Serialize)]
struct TokenResponse {
    token: String,
}

#[derive(Debug, Serialize)]
struct OwnerRecipes {
    recipes: Vec<Recipe>,
}

#[derive(Debug, Serialize)]
struct OwnerReviews {
    reviews: Vec<Review>,
}

/// Handle /users requests.
///
/// Returns Some(response) if the request was handled, None if it is not a
/// user route.
pub async fn handle_user_request(
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Option<Response<BoxBody>> {
    let path = req.uri().path().to_string();
    if path != "/users" && !path.starts_with("/users/") {
        return None;
    }

    let method = req.method().clone();

    let response = match path.as_str() {
        "/users" => match method {
            Method::POST => register(req, &state).await,
            _ => method_not_allowed(),
        },
        "/users/login" => match method {
            Method::POST => login(req, &state).await,
            _ => method_not_allowed(),
        },
        _ => {
            let rest = path.trim_start_matches("/users/");
            if let Some(handle) = rest.strip_suffix("/recipes") {
                match method {
                    Method::GET => owner_recipes(&state, handle).await,
                    _ => method_not_allowed(),
                }
            } else if let Some(handle) = rest.strip_suffix("/reviews") {
                match method {
                    Method::GET => owner_reviews(&state, handle).await,
                    _ => method_not_allowed(),
                }
            } else if rest.contains('/') {
                // Deeper paths are not resources
                return None;
            } else {
                match method {
                    Method::GET => get_user(&req, &state, rest).await,
                    _ => method_not_allowed(),
                }
            }
        }
    };

    Some(response)
}

async fn register(req: Request<Incoming>, state: &AppState) -> Response<BoxBody> {
    let payload: CredentialsPayload = match parse_json_body(req).await {
        Ok(p) => p,
        Err(e) => return error_response(e),
    };

    match state.credentials.register(payload).await {
        Ok(handle) => json_response(
            StatusCode::CREATED,
            &CreatedUser {
                links: UserLinks {
                    user: format!("/users/{handle}"),
                },
                id: handle,
            },
        ),
        Err(e) => error_response(e),
    }
}

async fn login(req: Request<Incoming>, state: &AppState) -> Response<BoxBody> {
    let payload: CredentialsPayload = match parse_json_body(req).await {
        Ok(p) => p,
        Err(e) => return error_response(e),
    };
    let (handle, password) = match payload.into_validated() {
        Ok(pair) => pair,
        Err(e) => return error_response(e),
    };

    match state.credentials.login(&handle, &password).await {
        Ok(token) => json_response(StatusCode::OK, &TokenResponse { token }),
        Err(e) => error_response(e),
    }
}

/// Two independent gates: token verification, then principal match. The
/// second runs only after the first succeeds.
async fn get_user(req: &Request<Incoming>, state: &AppState, handle: &str) -> Response<BoxBody> {
    let principal = match state.credentials.authenticate(auth_header(req)) {
        Ok(p) => p,
        Err(e) => return error_response(e),
    };
    if let Err(e) = state.credentials.authorize(&principal, handle) {
        return error_response(e);
    }

    match state.identity.find_user(handle).await {
        Ok(Some(profile)) => json_response(StatusCode::OK, &profile),
        Ok(None) => error_response(ApiError::NotFound),
        Err(e) => error_response(e),
    }
}

async fn owner_recipes(state: &AppState, handle: &str) -> Response<BoxBody> {
    match state.catalog.recipes_by_owner(handle).await {
        Ok(recipes) => json_response(StatusCode::OK, &OwnerRecipes { recipes }),
        Err(e) => error_response(e),
    }
}

async fn owner_reviews(state: &AppState, handle: &str) -> Response<BoxBody> {
    match state.catalog.reviews_by_owner(handle).await {
        Ok(reviews) => json_response(StatusCode::OK, &OwnerReviews { reviews }),
        Err(e) => error_response(e),
    }
}
