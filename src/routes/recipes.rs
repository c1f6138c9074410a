//! HTTP routes for recipes
//!
//! - GET    /recipes       - paginated listing, public
//! - POST   /recipes       - coordinated create, requires a valid owner
//! - GET    /recipes/{id}  - public
//! - PUT    /recipes/{id}  - full-field replace
//! - DELETE /recipes/{id}  - hard delete

use hyper::body::Incoming;
use hyper::{Method, Request, Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::db::schemas::{Recipe, RecipePayload};
use crate::pagination::{requested_page, PageEnvelope, PageWindow, PAGE_SIZE};
use crate::routes::{
    empty_body, error_response, json_response, method_not_allowed, parse_json_body, BoxBody,
};
use crate::server::AppState;
use crate::types::ApiError;

#[derive(Debug, Serialize)]
struct RecipeLinks {
    recipe: String,
}

#[derive(Debug, Serialize)]
struct CreatedRecipe {
    id: i64,
    links: RecipeLinks,
}

#[derive(Debug, Serialize)]
struct ReplacedRecipe {
    links: RecipeLinks,
}

/// Handle /recipes requests.
///
/// Returns Some(response) if the request was handled, None if it is not a
/// recipe route.
pub async fn handle_recipe_request(
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Option<Response<BoxBody>> {
    let path = req.uri().path().to_string();
    if path != "/recipes" && !path.starts_with("/recipes/") {
        return None;
    }

    let method = req.method().clone();

    let response = if path == "/recipes" {
        match method {
            Method::GET => {
                let page = requested_page(req.uri().query());
                list_recipes(&state, page).await
            }
            Method::POST => create_recipe(req, &state).await,
            _ => method_not_allowed(),
        }
    } else {
        // Non-numeric ids fall through like any other missing resource
        let id = match path.trim_start_matches("/recipes/").parse::<i64>() {
            Ok(id) => id,
            Err(_) => return Some(error_response(ApiError::NotFound)),
        };
        match method {
            Method::GET => get_recipe(&state, id).await,
            Method::PUT => replace_recipe(req, &state, id).await,
            Method::DELETE => delete_recipe(&state, id).await,
            _ => method_not_allowed(),
        }
    };

    Some(response)
}

async fn list_recipes(state: &AppState, page: i64) -> Response<BoxBody> {
    match recipes_page(state, page).await {
        Ok(envelope) => json_response(StatusCode::OK, &envelope),
        Err(e) => error_response(e),
    }
}

async fn recipes_page(state: &AppState, page: i64) -> Result<PageEnvelope<Recipe>, ApiError> {
    let total = state.catalog.recipe_count().await?;
    let window = PageWindow::clamp(page, total);
    let items = state.catalog.recipes_page(window.offset, PAGE_SIZE).await?;
    Ok(PageEnvelope::new(items, &window, "/recipes"))
}

async fn create_recipe(req: Request<Incoming>, state: &AppState) -> Response<BoxBody> {
    let payload: RecipePayload = match parse_json_body(req).await {
        Ok(p) => p,
        Err(e) => return error_response(e),
    };
    let recipe = match payload.into_validated() {
        Ok(r) => r,
        Err(e) => return error_response(e),
    };

    match state.writer.create_recipe(&recipe).await {
        Ok(id) => json_response(
            StatusCode::CREATED,
            &CreatedRecipe {
                id,
                links: RecipeLinks {
                    recipe: format!("/recipes/{id}"),
                },
            },
        ),
        Err(failure) => {
            warn!("recipe create aborted at {}: {}", failure.step, failure.error);
            error_response(failure.error)
        }
    }
}

async fn get_recipe(state: &AppState, id: i64) -> Response<BoxBody> {
    match state.catalog.recipe_by_id(id).await {
        Ok(Some(recipe)) => json_response(StatusCode::OK, &recipe),
        Ok(None) => error_response(ApiError::NotFound),
        Err(e) => error_response(e),
    }
}

async fn replace_recipe(req: Request<Incoming>, state: &AppState, id: i64) -> Response<BoxBody> {
    let payload: RecipePayload = match parse_json_body(req).await {
        Ok(p) => p,
        Err(e) => return error_response(e),
    };
    let recipe = match payload.into_validated() {
        Ok(r) => r,
        Err(e) => return error_response(e),
    };

    match state.catalog.update_recipe(id, &recipe).await {
        Ok(true) => json_response(
            StatusCode::OK,
            &ReplacedRecipe {
                links: RecipeLinks {
                    recipe: format!("/recipes/{id}"),
                },
            },
        ),
        Ok(false) => error_response(ApiError::NotFound),
        Err(e) => error_response(e),
    }
}

async fn delete_recipe(state: &AppState, id: i64) -> Response<BoxBody> {
    match state.catalog.delete_recipe(id).await {
        Ok(true) => Response::builder()
            .status(StatusCode::NO_CONTENT)
            .body(empty_body())
            .unwrap(),
        Ok(false) => error_response(ApiError::NotFound),
        Err(e) => error_response(e),
    }
}
