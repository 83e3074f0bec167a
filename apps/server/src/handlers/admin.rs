//! Admin console: HTML pages and the directory import trigger.

use axum::extract::State;
use axum::response::Html;
use axum::Json;
use core_types::ImportSummary;

use crate::error::AppResult;
use crate::import::import_scanned;
use crate::import::scanner::scan_directory;
use crate::state::AppState;
use crate::views;

/// GET /admin
pub async fn dashboard(State(state): State<AppState>) -> AppResult<Html<String>> {
    let stats = state.with_catalog(|catalog| catalog.stats()).await??;
    Ok(Html(views::dashboard(&state.config.site_name, &stats)))
}

/// GET /admin/import
pub async fn import_page(State(state): State<AppState>) -> Html<String> {
    let data_dir = state.config.data_dir.display().to_string();
    Html(views::import(&state.config.site_name, &data_dir))
}

/// POST /admin/import/execute
///
/// Files are scanned and decoded before the catalog is locked; only the
/// batch insert runs under the lock.
pub async fn execute_import(State(state): State<AppState>) -> Json<ImportSummary> {
    let engine = state.engine.clone();
    let data_dir = state.config.data_dir.clone();
    let scanned =
        match tokio::task::spawn_blocking(move || scan_directory(&data_dir, &engine)).await {
            Ok(scanned) => scanned,
            Err(err) => {
                tracing::error!(error = %err, "directory scan failed");
                return Json(ImportSummary::failed(format!("directory scan failed: {err}"), 0));
            }
        };

    let total_found = scanned.len();
    let site_name = state.config.site_name.clone();
    let summary = state
        .with_catalog(move |catalog| import_scanned(catalog, &scanned, &site_name))
        .await;

    Json(summary.unwrap_or_else(|err| ImportSummary::failed(err.to_string(), total_found)))
}

/// GET /admin/portfolio
pub async fn portfolio_page(State(state): State<AppState>) -> AppResult<Html<String>> {
    let images = state.with_catalog(|catalog| catalog.all_images()).await??;
    Ok(Html(views::portfolio(&state.config.site_name, &images)))
}

/// GET /admin/categories
pub async fn categories_page(State(state): State<AppState>) -> AppResult<Html<String>> {
    let categories = state.with_catalog(|catalog| catalog.list_categories()).await??;
    Ok(Html(views::categories(&state.config.site_name, &categories)))
}

/// GET /admin/featured
pub async fn featured_page(State(state): State<AppState>) -> AppResult<Html<String>> {
    let (current, images) = state
        .with_catalog(|service| -> catalog::Result<_> {
            Ok((service.featured_details()?, service.all_images()?))
        })
        .await??;
    Ok(Html(views::featured(
        &state.config.site_name,
        current.as_ref(),
        &images,
    )))
}
