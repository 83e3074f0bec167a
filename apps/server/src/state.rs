use std::sync::{Arc, Mutex, PoisonError};

use catalog::CatalogService;
use engine::ImageEngine;

use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};

/// Shared application state available to all handlers via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// The catalog owns the single SQLite connection; every access is serialised here.
    pub catalog: Arc<Mutex<CatalogService>>,
    pub engine: Arc<ImageEngine>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(catalog: CatalogService, config: ServerConfig) -> Self {
        Self {
            catalog: Arc::new(Mutex::new(catalog)),
            engine: Arc::new(ImageEngine::new()),
            config: Arc::new(config),
        }
    }

    /// Run `f` against the catalog on the blocking pool.
    ///
    /// A panic inside `f` fails only its own request: an open transaction is
    /// rolled back when dropped during the unwind, so the guard is recovered
    /// from a poisoned lock and later calls proceed.
    pub async fn with_catalog<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut CatalogService) -> T + Send + 'static,
        T: Send + 'static,
    {
        let catalog = Arc::clone(&self.catalog);
        tokio::task::spawn_blocking(move || {
            let mut guard = catalog.lock().unwrap_or_else(PoisonError::into_inner);
            f(&mut *guard)
        })
        .await
        .map_err(|e| AppError::InternalError(format!("catalog task failed: {e}")))
    }
}
