#![allow(dead_code)]

use std::path::Path;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use catalog::db::CatalogDb;
use catalog::CatalogService;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use portfolio_server::config::ServerConfig;
use portfolio_server::router::build_app_router;
use portfolio_server::state::AppState;

/// A router over an in-memory catalog (default categories seeded) and
/// temporary photo and frontend directories.
pub struct TestApp {
    pub router: Router,
    pub data_dir: TempDir,
    pub static_dir: TempDir,
}

pub fn test_config(data_dir: &Path, static_dir: &Path) -> ServerConfig {
    ServerConfig {
        addr: "127.0.0.1:0".parse().unwrap(),
        data_dir: data_dir.to_path_buf(),
        database_path: ":memory:".into(),
        static_dir: static_dir.to_path_buf(),
        site_name: "Test Studio".to_string(),
        request_timeout_secs: 30,
    }
}

pub fn build_test_app() -> TestApp {
    let data_dir = TempDir::new().unwrap();
    let static_dir = TempDir::new().unwrap();

    let service = CatalogService::new(CatalogDb::in_memory().unwrap());
    service.seed_default_categories().unwrap();

    let config = test_config(data_dir.path(), static_dir.path());
    let router = build_app_router(AppState::new(service, config));

    TestApp {
        router,
        data_dir,
        static_dir,
    }
}

impl TestApp {
    /// Write a small PNG under the photo directory, creating parent folders.
    pub fn add_photo(&self, relative: &str) {
        let path = self.data_dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        image::RgbImage::new(4, 3).save(path).unwrap();
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Method::GET, uri, None).await
    }

    pub async fn send(&self, method: Method, uri: &str, json: Option<Value>) -> Response<Body> {
        let builder = Request::builder().method(method).uri(uri);
        let request = match json {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Run the directory import and return its summary.
    pub async fn import(&self) -> Value {
        body_json(self.send(Method::POST, "/admin/import/execute", None).await).await
    }

    /// Published images as returned by the public API (first 100).
    pub async fn published(&self) -> Vec<Value> {
        let page = body_json(self.get("/api/portfolio?per_page=100").await).await;
        page["images"].as_array().cloned().unwrap_or_default()
    }

    pub async fn category_id(&self, slug: &str) -> i64 {
        let categories = body_json(self.get("/api/categories").await).await;
        categories
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["slug"] == slug)
            .and_then(|c| c["id"].as_i64())
            .unwrap()
    }
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}
