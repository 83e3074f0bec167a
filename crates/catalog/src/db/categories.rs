use crate::db::{
    parse_datetime, query_all, query_count, query_one, query_optional, to_rfc3339, DbHandle,
    DbResult,
};
use anyhow::Context;
use chrono::{DateTime, Utc};
use rusqlite::params;
use serde::{Deserialize, Serialize};

/// Categories created on first start: `(name, slug, description, display_order)`.
pub const DEFAULT_CATEGORIES: &[(&str, &str, &str, i64)] = &[
    ("Portraits", "portraits", "Portrait photography", 1),
    ("Landscapes", "landscapes", "Landscape photography", 2),
    ("Street", "street", "Street photography", 3),
    ("Events", "events", "Event photography", 4),
    ("Commercial", "commercial", "Commercial photography", 5),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub display_order: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const CATEGORY_COLUMNS: &str =
    "id, name, slug, description, display_order, is_active, created_at, updated_at";

impl Category {
    pub fn new(name: &str, slug: &str, description: Option<&str>, display_order: i64) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: name.to_string(),
            slug: slug.to_string(),
            description: description.map(str::to_string),
            display_order,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn insert<H: DbHandle>(&self, db: &H) -> DbResult<i64> {
        db.execute(
            "INSERT INTO categories (
                name, slug, description, display_order, is_active, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                self.name,
                self.slug,
                self.description,
                self.display_order,
                self.is_active,
                to_rfc3339(self.created_at),
                to_rfc3339(self.updated_at)
            ],
        )
        .with_context(|| format!("failed to insert category slug={}", self.slug))?;
        Ok(db.last_insert_rowid())
    }

    pub fn find<H: DbHandle>(db: &H, id: i64) -> DbResult<Option<Self>> {
        query_optional(
            db,
            &format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ?1"),
            params![id],
            Category::from_row,
        )
    }

    /// All categories in display order.
    pub fn load_all<H: DbHandle>(db: &H) -> DbResult<Vec<Self>> {
        query_all(
            db,
            &format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY display_order, id"),
            [],
            Category::from_row,
        )
    }

    pub fn load_active<H: DbHandle>(db: &H) -> DbResult<Vec<Self>> {
        query_all(
            db,
            &format!(
                "SELECT {CATEGORY_COLUMNS} FROM categories
                 WHERE is_active = 1
                 ORDER BY display_order, id"
            ),
            [],
            Category::from_row,
        )
    }

    /// The oldest category row; imports without an explicit category land here.
    pub fn first<H: DbHandle>(db: &H) -> DbResult<Option<Self>> {
        query_optional(
            db,
            &format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY id LIMIT 1"),
            [],
            Category::from_row,
        )
    }

    pub fn count<H: DbHandle>(db: &H) -> DbResult<i64> {
        query_count(db, "SELECT count(*) FROM categories", [])
    }

    pub fn count_active<H: DbHandle>(db: &H) -> DbResult<i64> {
        query_count(db, "SELECT count(*) FROM categories WHERE is_active = 1", [])
    }

    /// Number of images attached to the category, published or not.
    pub fn image_count<H: DbHandle>(db: &H, id: i64) -> DbResult<i64> {
        query_count(
            db,
            "SELECT count(*) FROM portfolio_images WHERE category_id = ?1",
            params![id],
        )
    }

    /// Deletes the category; its images go with it through the foreign key cascade.
    pub fn delete<H: DbHandle>(db: &H, id: i64) -> DbResult<usize> {
        db.execute("DELETE FROM categories WHERE id = ?1", params![id])
            .with_context(|| format!("failed to delete category id={id}"))
    }

    /// Insert [`DEFAULT_CATEGORIES`] when the table is empty. Returns how many were created.
    pub fn seed_defaults<H: DbHandle>(db: &H) -> DbResult<usize> {
        if Self::count(db)? > 0 {
            return Ok(0);
        }
        for (name, slug, description, order) in DEFAULT_CATEGORIES {
            Category::new(name, slug, Some(*description), *order).insert(db)?;
        }
        Ok(DEFAULT_CATEGORIES.len())
    }

    pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> DbResult<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            slug: row.get(2)?,
            description: row.get(3)?,
            display_order: row.get(4)?,
            is_active: row.get(5)?,
            created_at: parse_datetime(row.get::<_, String>(6)?, "created_at")?,
            updated_at: parse_datetime(row.get::<_, String>(7)?, "updated_at")?,
        })
    }
}
