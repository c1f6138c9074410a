//! HTTP routes for reviews
//!
//! - GET    /reviews            - paginated listing, public
//! - POST   /reviews            - coordinated create, requires a valid owner
//! - GET    /reviews/{recipeId} - review for a recipe reference, public
//! - PUT    /reviews/{id}       - full-field replace
//! - DELETE /reviews/{id}       - hard delete
//!
//! The GET addresses a review by the recipe it refers to; PUT and DELETE
//! address the review row itself.

use hyper::body::Incoming;
use hyper::{Method, Request, Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::db::schemas::{Review, ReviewPayload};
use crate::pagination::{requested_page, PageEnvelope, PageWindow, PAGE_SIZE};
use crate::routes::{
    empty_body, error_response, json_response, method_not_allowed, parse_json_body, BoxBody,
};
use crate::server::AppState;
use crate::types::ApiError;

#[derive(Debug, Serialize)]
struct ReviewLinks {
    review: String,
}

#[derive(Debug, Serialize)]
struct CreatedReview {
    id: i64,
    links: ReviewLinks,
}

#[derive(Debug, Serialize)]
struct ReplacedReview {
    links: ReviewLinks,
}

/// Handle /reviews requests.
///
/// Returns Some(response) if the request was handled, None if it is not a
/// review route.
pub async fn handle_review_request(
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Option<Response<BoxBody>> {
    let path = req.uri().path().to_string();
    if path != "/reviews" && !path.starts_with("/reviews/") {
        return None;
    }

    let method = req.method().clone();

    let response = if path == "/reviews" {
        match method {
            Method::GET => {
                let page = requested_page(req.uri().query());
                list_reviews(&state, page).await
            }
            Method::POST => create_review(req, &state).await,
            _ => method_not_allowed(),
        }
    } else {
        let id = match path.trim_start_matches("/reviews/").parse::<i64>() {
            Ok(id) => id,
            Err(_) => return Some(error_response(ApiError::NotFound)),
        };
        match method {
            Method::GET => get_review_for_recipe(&state, id).await,
            Method::PUT => replace_review(req, &state, id).await,
            Method::DELETE => delete_review(&state, id).await,
            _ => method_not_allowed(),
        }
    };

    Some(response)
}

async fn list_reviews(state: &AppState, page: i64) -> Response<BoxBody> {
    match reviews_page(state, page).await {
        Ok(envelope) => json_response(StatusCode::OK, &envelope),
        Err(e) => error_response(e),
    }
}

async fn reviews_page(state: &AppState, page: i64) -> Result<PageEnvelope<Review>, ApiError> {
    let total = state.catalog.review_count().await?;
    let window = PageWindow::clamp(page, total);
    let items = state.catalog.reviews_page(window.offset, PAGE_SIZE).await?;
    Ok(PageEnvelope::new(items, &window, "/reviews"))
}

async fn create_review(req: Request<Incoming>, state: &AppState) -> Response<BoxBody> {
    let payload: ReviewPayload = match parse_json_body(req).await {
        Ok(p) => p,
        Err(e) => return error_response(e),
    };
    let review = match payload.into_validated() {
        Ok(r) => r,
        Err(e) => return error_response(e),
    };

    match state.writer.create_review(&review).await {
        Ok(id) => json_response(
            StatusCode::CREATED,
            &CreatedReview {
                id,
                links: ReviewLinks {
                    review: format!("/reviews/{id}"),
                },
            },
        ),
        Err(failure) => {
            warn!("review create aborted at {}: {}", failure.step, failure.error);
            error_response(failure.error)
        }
    }
}

async fn get_review_for_recipe(state: &AppState, recipe_id: i64) -> Response<BoxBody> {
    match state.catalog.review_by_recipe(recipe_id).await {
        Ok(Some(review)) => json_response(StatusCode::OK, &review),
        Ok(None) => error_response(ApiError::NotFound),
        Err(e) => error_response(e),
    }
}

async fn replace_review(req: Request<Incoming>, state: &AppState, id: i64) -> Response<BoxBody> {
    let payload: ReviewPayload = match parse_json_body(req).await {
        Ok(p) => p,
        Err(e) => return error_response(e),
    };
    let review = match payload.into_validated() {
        Ok(r) => r,
        Err(e) => return error_response(e),
    };

    match state.catalog.update_review(id, &review).await {
        Ok(true) => json_response(
            StatusCode::OK,
            &ReplacedReview {
                links: ReviewLinks {
                    review: format!("/reviews/{id}"),
                },
            },
        ),
        Ok(false) => error_response(ApiError::NotFound),
        Err(e) => error_response(e),
    }
}

async fn delete_review(state: &AppState, id: i64) -> Response<BoxBody> {
    match state.catalog.delete_review(id).await {
        Ok(true) => Response::builder()
            .status(StatusCode::NO_CONTENT)
            .body(empty_body())
            .unwrap(),
        Ok(false) => error_response(ApiError::NotFound),
        Err(e) => error_response(e),
    }
}
