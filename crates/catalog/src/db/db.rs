use std::path::Path;

use anyhow::Context;
use rusqlite::{Connection, Transaction};

use crate::db::DbResult;
use crate::schema::initialize_schema;

use super::DbHandle;

/// Owns the single SQLite connection of the portfolio catalog.
#[derive(Debug)]
pub struct CatalogDb {
    conn: Connection,
}

impl CatalogDb {
    /// Open (creating parent directories and the file if needed) and initialise the schema.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database {}", path.display()))?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Begin a transaction; dropping it without `commit` rolls back.
    pub fn transaction(&mut self) -> rusqlite::Result<Transaction<'_>> {
        self.conn.transaction()
    }
}

impl DbHandle for CatalogDb {
    fn execute(&self, sql: &str, params: impl rusqlite::Params) -> rusqlite::Result<usize> {
        self.conn.execute(sql, params)
    }

    fn prepare<'a>(&'a self, sql: &str) -> rusqlite::Result<rusqlite::Statement<'a>> {
        self.conn.prepare(sql)
    }

    fn last_insert_rowid(&self) -> i64 {
        self.conn.last_insert_rowid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::query_count;
    use tempfile::tempdir;

    #[test]
    fn open_creates_missing_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("database").join("app.db");
        let db = CatalogDb::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(
            query_count(&db, "SELECT count(*) FROM portfolio_images", []).unwrap(),
            0
        );
    }

    #[test]
    fn dropped_transaction_rolls_back() {
        let mut db = CatalogDb::in_memory().unwrap();
        {
            let tx = db.transaction().unwrap();
            tx.execute(
                "INSERT INTO categories (name, slug) VALUES ('Tmp', 'tmp')",
                [],
            )
            .unwrap();
        }
        assert_eq!(
            query_count(&db, "SELECT count(*) FROM categories", []).unwrap(),
            0
        );
    }
}
