//! SQLite schema DDL and helper utilities for catalog initialization.

use rusqlite::{Connection, Error as SqliteError, ErrorCode, OptionalExtension};

/// SQLite schema version supported by this build.
pub const TARGET_SCHEMA_VERSION: i64 = 1;

/// Packed SQL definition for the complete catalog schema.
pub const CATALOG_SCHEMA_SQL: &str = include_str!("../schema/catalog_schema.sql");

/// Applies the catalog schema on the provided connection.
///
/// Enables foreign keys (category and image deletes cascade through them),
/// creates missing tables, records the schema version in `catalog_metadata`,
/// and keeps `PRAGMA user_version` aligned with [`TARGET_SCHEMA_VERSION`].
pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", true)?;

    let user_version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if user_version > TARGET_SCHEMA_VERSION {
        return Err(newer_schema_error(user_version));
    }

    apply_migrations(conn, user_version)?;

    let recorded: i64 = conn
        .query_row(
            "SELECT schema_version FROM catalog_metadata WHERE id = 1",
            [],
            |row| row.get(0),
        )
        .optional()?
        .unwrap_or(0);
    if recorded > TARGET_SCHEMA_VERSION {
        return Err(newer_schema_error(recorded));
    }

    conn.execute(
        "INSERT INTO catalog_metadata (id, schema_version, created_at, updated_at)
         VALUES (
            1,
            ?1,
            strftime('%Y-%m-%dT%H:%M:%fZ','now'),
            strftime('%Y-%m-%dT%H:%M:%fZ','now')
         )
         ON CONFLICT(id) DO UPDATE SET
            schema_version = excluded.schema_version,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ','now')",
        [TARGET_SCHEMA_VERSION],
    )?;

    conn.pragma_update(None, "user_version", TARGET_SCHEMA_VERSION)?;
    Ok(())
}

fn apply_migrations(conn: &Connection, from_version: i64) -> rusqlite::Result<()> {
    match from_version {
        // The DDL is idempotent, so a catalog at the current version re-runs it harmlessly.
        0 | 1 => conn.execute_batch(CATALOG_SCHEMA_SQL),
        other => Err(newer_schema_error(other)),
    }
}

fn newer_schema_error(version: i64) -> SqliteError {
    SqliteError::SqliteFailure(
        rusqlite::ffi::Error {
            code: ErrorCode::DatabaseCorrupt,
            extended_code: 0,
        },
        Some(format!(
            "catalog schema version {version} is newer than supported {TARGET_SCHEMA_VERSION}"
        )),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initializes_fresh_database() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        let version: i64 = conn
            .query_row(
                "SELECT schema_version FROM catalog_metadata WHERE id = 1",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(version, TARGET_SCHEMA_VERSION);

        let fk: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn initialization_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        initialize_schema(&conn).unwrap();

        let rows: i64 = conn
            .query_row("SELECT count(*) FROM catalog_metadata", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn refuses_newer_schema() {
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "user_version", TARGET_SCHEMA_VERSION + 1)
            .unwrap();
        assert!(initialize_schema(&conn).is_err());
    }
}
