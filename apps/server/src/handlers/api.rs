//! Public read API consumed by the gallery frontend.

use axum::extract::{Query, State};
use axum::Json;
use catalog::services::{CategoryView, ImageView, PortfolioPage, PortfolioQuery};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Raw query string of `/api/portfolio`. Values are parsed leniently: anything
/// that is not an integer falls back to the default.
#[derive(Debug, Default, Deserialize)]
pub struct PortfolioParams {
    pub category_id: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl PortfolioParams {
    pub fn to_query(&self) -> PortfolioQuery {
        let int = |raw: &Option<String>| raw.as_deref().and_then(|v| v.trim().parse::<i64>().ok());
        PortfolioQuery::new(int(&self.category_id), int(&self.page), int(&self.per_page))
    }
}

/// GET /api/categories
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<CategoryView>>> {
    let categories = state
        .with_catalog(|catalog| catalog.list_active_categories())
        .await??;
    Ok(Json(categories))
}

/// GET /api/portfolio
pub async fn list_portfolio(
    State(state): State<AppState>,
    Query(params): Query<PortfolioParams>,
) -> AppResult<Json<PortfolioPage>> {
    let query = params.to_query();
    let page = state
        .with_catalog(move |catalog| catalog.list_portfolio(&query))
        .await??;
    Ok(Json(page))
}

/// GET /api/featured-image
pub async fn featured_image(State(state): State<AppState>) -> AppResult<Json<ImageView>> {
    state
        .with_catalog(|catalog| catalog.featured_image())
        .await??
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No featured image set".into()))
}
