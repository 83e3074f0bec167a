pub mod db;
pub mod schema;
pub mod services;

use thiserror::Error;

pub use services::CatalogService;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("{0:#}")]
    Database(#[from] anyhow::Error),
}

impl CatalogError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        CatalogError::NotFound { entity, id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
