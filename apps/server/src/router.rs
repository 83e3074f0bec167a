//! Shared application router builder.
//!
//! [`build_app_router`] is used by both `main.rs` and the integration tests so
//! they run the same routes and middleware stack.

use std::time::Duration;

use axum::http::{HeaderName, StatusCode};
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::handlers::{admin, admin_api, api};
use crate::state::AppState;

/// Build the full application [`Router`] with all middleware layers.
///
/// Routing order: the JSON API, the admin console, `/data/*` from the photo
/// volume, then the frontend bundle with an `index.html` fallback.
///
/// The middleware stack is applied bottom-up:
///
/// 1. CORS (any origin)
/// 2. Set request ID on incoming requests
/// 3. Structured request/response tracing
/// 4. Propagate request ID to response
/// 5. Request timeout
/// 6. Panic recovery (catch panics, return 500)
pub fn build_app_router(state: AppState) -> Router {
    let config = state.config.clone();
    let request_id_header = HeaderName::from_static("x-request-id");

    let frontend = ServeDir::new(&config.static_dir).fallback(ServeFile::new(config.index_file()));

    Router::new()
        .merge(api_routes())
        .merge(admin_routes())
        .nest_service("/data", ServeDir::new(&config.data_dir))
        .fallback_service(frontend)
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(api::list_categories))
        .route("/api/portfolio", get(api::list_portfolio))
        .route("/api/featured-image", get(api::featured_image))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(admin::dashboard))
        .route("/admin/import", get(admin::import_page))
        .route("/admin/import/execute", post(admin::execute_import))
        .route("/admin/portfolio", get(admin::portfolio_page))
        .route("/admin/categories", get(admin::categories_page))
        .route("/admin/featured", get(admin::featured_page))
        .route(
            "/admin/api/images/{id}",
            post(admin_api::update_details).delete(admin_api::delete_image),
        )
        .route(
            "/admin/api/images/{id}/featured",
            post(admin_api::set_featured),
        )
        .route(
            "/admin/api/images/{id}/category",
            post(admin_api::change_category),
        )
        .route(
            "/admin/api/categories/{id}",
            delete(admin_api::delete_category),
        )
}
