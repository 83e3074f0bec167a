//! JSON mutations behind the admin pages. Each answers with an outcome object.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use catalog::db::ImageDetails;
use core_types::Outcome;
use serde::Deserialize;

use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CategoryChange {
    pub category_id: i64,
}

fn outcome_response(outcome: Outcome) -> Response {
    let status = if outcome.success {
        StatusCode::OK
    } else if outcome.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(outcome)).into_response()
}

/// POST /admin/api/images/{id}/featured
pub async fn set_featured(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Response> {
    let outcome = state
        .with_catalog(move |catalog| catalog.set_featured_image(id))
        .await?;
    Ok(outcome_response(outcome))
}

/// POST /admin/api/images/{id}/category
pub async fn change_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(change): Json<CategoryChange>,
) -> AppResult<Response> {
    let outcome = state
        .with_catalog(move |catalog| catalog.update_image_category(id, change.category_id))
        .await?;
    Ok(outcome_response(outcome))
}

/// POST /admin/api/images/{id}
pub async fn update_details(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(details): Json<ImageDetails>,
) -> AppResult<Response> {
    let outcome = state
        .with_catalog(move |catalog| catalog.update_image_details(id, &details))
        .await?;
    Ok(outcome_response(outcome))
}

/// DELETE /admin/api/images/{id}
pub async fn delete_image(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Response> {
    let outcome = state
        .with_catalog(move |catalog| catalog.delete_image(id))
        .await?;
    Ok(outcome_response(outcome))
}

/// DELETE /admin/api/categories/{id}
pub async fn delete_category(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Response> {
    let outcome = state
        .with_catalog(move |catalog| catalog.delete_category(id))
        .await?;
    Ok(outcome_response(outcome))
}
