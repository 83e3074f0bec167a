use crate::db::{
    parse_datetime, query_all, query_count, query_optional, to_rfc3339, DbHandle, DbResult,
};
use anyhow::Context;
use chrono::{DateTime, Utc};
use rusqlite::params;
use serde::{Deserialize, Serialize};

/// One entry in the featured-image history. Only the newest entry is expected to be active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturedImage {
    pub id: i64,
    pub portfolio_image_id: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl FeaturedImage {
    pub fn new_active(portfolio_image_id: i64) -> Self {
        Self {
            id: 0,
            portfolio_image_id,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    pub fn insert<H: DbHandle>(&self, db: &H) -> DbResult<i64> {
        db.execute(
            "INSERT INTO featured_images (portfolio_image_id, is_active, created_at)
             VALUES (?1, ?2, ?3)",
            params![
                self.portfolio_image_id,
                self.is_active,
                to_rfc3339(self.created_at)
            ],
        )
        .with_context(|| {
            format!(
                "failed to insert featured image for image id={}",
                self.portfolio_image_id
            )
        })?;
        Ok(db.last_insert_rowid())
    }

    /// The first active entry, if any.
    pub fn active<H: DbHandle>(db: &H) -> DbResult<Option<Self>> {
        query_optional(
            db,
            "SELECT id, portfolio_image_id, is_active, created_at
             FROM featured_images
             WHERE is_active = 1
             ORDER BY id
             LIMIT 1",
            [],
            FeaturedImage::from_row,
        )
    }

    pub fn count_active<H: DbHandle>(db: &H) -> DbResult<i64> {
        query_count(
            db,
            "SELECT count(*) FROM featured_images WHERE is_active = 1",
            [],
        )
    }

    /// Full history, newest first.
    pub fn history<H: DbHandle>(db: &H) -> DbResult<Vec<Self>> {
        query_all(
            db,
            "SELECT id, portfolio_image_id, is_active, created_at
             FROM featured_images
             ORDER BY id DESC",
            [],
            FeaturedImage::from_row,
        )
    }

    /// Clears the active flag on every entry; rows are kept as history.
    pub fn deactivate_all<H: DbHandle>(db: &H) -> DbResult<usize> {
        db.execute(
            "UPDATE featured_images SET is_active = 0 WHERE is_active = 1",
            [],
        )
        .context("failed to deactivate featured images")
    }

    pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> DbResult<Self> {
        Ok(Self {
            id: row.get(0)?,
            portfolio_image_id: row.get(1)?,
            is_active: row.get(2)?,
            created_at: parse_datetime(row.get::<_, String>(3)?, "created_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::portfolio_images::tests::sample_image;
    use crate::db::{CatalogDb, Category, PortfolioImage};

    #[test]
    fn deactivate_keeps_history() {
        let db = CatalogDb::in_memory().unwrap();
        let category_id = Category::new("Events", "events", None, 1)
            .insert(&db)
            .unwrap();
        let a = sample_image("a.jpg", category_id).insert(&db).unwrap();
        let b = sample_image("b.jpg", category_id).insert(&db).unwrap();

        FeaturedImage::new_active(a).insert(&db).unwrap();
        FeaturedImage::new_active(b).insert(&db).unwrap();
        assert_eq!(FeaturedImage::count_active(&db).unwrap(), 2);

        assert_eq!(FeaturedImage::deactivate_all(&db).unwrap(), 2);
        assert_eq!(FeaturedImage::count_active(&db).unwrap(), 0);
        assert!(FeaturedImage::active(&db).unwrap().is_none());
        assert_eq!(FeaturedImage::history(&db).unwrap().len(), 2);
    }

    #[test]
    fn deleting_image_removes_its_featured_entries() {
        let db = CatalogDb::in_memory().unwrap();
        let category_id = Category::new("Events", "events", None, 1)
            .insert(&db)
            .unwrap();
        let id = sample_image("a.jpg", category_id).insert(&db).unwrap();
        FeaturedImage::new_active(id).insert(&db).unwrap();

        PortfolioImage::delete(&db, id).unwrap();
        assert!(FeaturedImage::history(&db).unwrap().is_empty());
    }
}
