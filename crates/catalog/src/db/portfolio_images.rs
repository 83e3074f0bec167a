use crate::db::{
    from_json, parse_datetime, parse_datetime_opt, query_all, query_count, query_one,
    query_optional, to_json, to_rfc3339, to_rfc3339_opt, DbHandle, DbResult,
};
use anyhow::Context;
use chrono::{DateTime, Utc};
use rusqlite::params;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// URL prefix under which the photo volume is served.
pub const WEB_ROOT: &str = "/data";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioImage {
    pub id: i64,
    /// Path relative to the photo volume; unique, and the import de-duplication key.
    pub filename: String,
    pub original_filename: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub alt_text: Option<String>,
    pub category_id: i64,
    pub file_size: Option<i64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub format: Option<String>,
    pub exif_data: Option<Value>,
    pub camera_make: Option<String>,
    pub camera_model: Option<String>,
    pub lens: Option<String>,
    pub focal_length: Option<String>,
    pub aperture: Option<String>,
    pub shutter_speed: Option<String>,
    pub iso: Option<String>,
    pub date_taken: Option<DateTime<Utc>>,
    pub display_order: i64,
    pub is_featured: bool,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable text fields and publication state of an image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDetails {
    pub title: Option<String>,
    pub description: Option<String>,
    pub alt_text: Option<String>,
    pub is_published: bool,
}

const IMAGE_COLUMNS: &str = "i.id, i.filename, i.original_filename, i.title, i.description,
    i.alt_text, i.category_id, i.file_size, i.width, i.height, i.format, i.exif_data,
    i.camera_make, i.camera_model, i.lens, i.focal_length, i.aperture, i.shutter_speed,
    i.iso, i.date_taken, i.display_order, i.is_featured, i.is_published, i.created_at,
    i.updated_at";

/// Index of the joined `categories.name` column following [`IMAGE_COLUMNS`].
const CATEGORY_NAME_COLUMN: usize = 25;

impl PortfolioImage {
    pub fn web_path(&self) -> String {
        format!("{WEB_ROOT}/{}", self.filename)
    }

    pub fn insert<H: DbHandle>(&self, db: &H) -> DbResult<i64> {
        let exif_data = self.exif_data.as_ref().map(to_json).transpose()?;
        db.execute(
            "INSERT INTO portfolio_images (
                filename, original_filename, title, description, alt_text, category_id,
                file_size, width, height, format, exif_data, camera_make, camera_model,
                lens, focal_length, aperture, shutter_speed, iso, date_taken,
                display_order, is_featured, is_published, created_at, updated_at
             ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                ?14, ?15, ?16, ?17, ?18, ?19,
                ?20, ?21, ?22, ?23, ?24
             )",
            params![
                self.filename,
                self.original_filename,
                self.title,
                self.description,
                self.alt_text,
                self.category_id,
                self.file_size,
                self.width,
                self.height,
                self.format,
                exif_data,
                self.camera_make,
                self.camera_model,
                self.lens,
                self.focal_length,
                self.aperture,
                self.shutter_speed,
                self.iso,
                to_rfc3339_opt(self.date_taken),
                self.display_order,
                self.is_featured,
                self.is_published,
                to_rfc3339(self.created_at),
                to_rfc3339(self.updated_at)
            ],
        )
        .with_context(|| format!("failed to insert portfolio image filename={}", self.filename))?;
        Ok(db.last_insert_rowid())
    }

    pub fn load<H: DbHandle>(db: &H, id: i64) -> DbResult<Self> {
        query_one(
            db,
            &format!("SELECT {IMAGE_COLUMNS} FROM portfolio_images i WHERE i.id = ?1"),
            params![id],
            PortfolioImage::from_row,
        )
        .with_context(|| format!("failed to load portfolio image id={id}"))
    }

    pub fn find<H: DbHandle>(db: &H, id: i64) -> DbResult<Option<Self>> {
        query_optional(
            db,
            &format!("SELECT {IMAGE_COLUMNS} FROM portfolio_images i WHERE i.id = ?1"),
            params![id],
            PortfolioImage::from_row,
        )
    }

    pub fn find_by_filename<H: DbHandle>(db: &H, filename: &str) -> DbResult<Option<Self>> {
        query_optional(
            db,
            &format!("SELECT {IMAGE_COLUMNS} FROM portfolio_images i WHERE i.filename = ?1"),
            params![filename],
            PortfolioImage::from_row,
        )
    }

    pub fn exists_with_filename<H: DbHandle>(db: &H, filename: &str) -> DbResult<bool> {
        Ok(query_count(
            db,
            "SELECT count(*) FROM portfolio_images WHERE filename = ?1",
            params![filename],
        )? > 0)
    }

    /// Image with the name of its category (if the category row still exists).
    pub fn find_with_category<H: DbHandle>(
        db: &H,
        id: i64,
    ) -> DbResult<Option<(Self, Option<String>)>> {
        query_optional(
            db,
            &format!(
                "SELECT {IMAGE_COLUMNS}, c.name
                 FROM portfolio_images i
                 LEFT JOIN categories c ON c.id = i.category_id
                 WHERE i.id = ?1"
            ),
            params![id],
            PortfolioImage::from_joined_row,
        )
    }

    /// Every image, newest first.
    pub fn load_all_with_category<H: DbHandle>(db: &H) -> DbResult<Vec<(Self, Option<String>)>> {
        query_all(
            db,
            &format!(
                "SELECT {IMAGE_COLUMNS}, c.name
                 FROM portfolio_images i
                 LEFT JOIN categories c ON c.id = i.category_id
                 ORDER BY i.created_at DESC, i.id DESC"
            ),
            [],
            PortfolioImage::from_joined_row,
        )
    }

    /// One page of published images, optionally limited to a category.
    pub fn published_page<H: DbHandle>(
        db: &H,
        category_id: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<(Self, Option<String>)>> {
        query_all(
            db,
            &format!(
                "SELECT {IMAGE_COLUMNS}, c.name
                 FROM portfolio_images i
                 LEFT JOIN categories c ON c.id = i.category_id
                 WHERE i.is_published = 1 AND (?1 IS NULL OR i.category_id = ?1)
                 ORDER BY i.display_order ASC, i.created_at DESC, i.id DESC
                 LIMIT ?2 OFFSET ?3"
            ),
            params![category_id, limit, offset],
            PortfolioImage::from_joined_row,
        )
    }

    pub fn count_published_in<H: DbHandle>(db: &H, category_id: Option<i64>) -> DbResult<i64> {
        query_count(
            db,
            "SELECT count(*) FROM portfolio_images
             WHERE is_published = 1 AND (?1 IS NULL OR category_id = ?1)",
            params![category_id],
        )
    }

    pub fn count<H: DbHandle>(db: &H) -> DbResult<i64> {
        query_count(db, "SELECT count(*) FROM portfolio_images", [])
    }

    pub fn update_category<H: DbHandle>(db: &H, id: i64, category_id: i64) -> DbResult<usize> {
        db.execute(
            "UPDATE portfolio_images SET category_id = ?1, updated_at = ?2 WHERE id = ?3",
            params![category_id, to_rfc3339(Utc::now()), id],
        )
        .with_context(|| format!("failed to update category for image id={id}"))
    }

    pub fn update_details<H: DbHandle>(db: &H, id: i64, details: &ImageDetails) -> DbResult<usize> {
        db.execute(
            "UPDATE portfolio_images SET
                title = ?1,
                description = ?2,
                alt_text = ?3,
                is_published = ?4,
                updated_at = ?5
             WHERE id = ?6",
            params![
                details.title,
                details.description,
                details.alt_text,
                details.is_published,
                to_rfc3339(Utc::now()),
                id
            ],
        )
        .with_context(|| format!("failed to update details for image id={id}"))
    }

    /// Flags `id` as the only featured image.
    pub fn mark_featured<H: DbHandle>(db: &H, id: i64) -> DbResult<usize> {
        db.execute(
            "UPDATE portfolio_images SET is_featured = (id = ?1)
             WHERE is_featured = 1 OR id = ?1",
            params![id],
        )
        .with_context(|| format!("failed to flag featured image id={id}"))
    }

    /// Removes the row only; the file on the photo volume is never touched.
    pub fn delete<H: DbHandle>(db: &H, id: i64) -> DbResult<usize> {
        db.execute("DELETE FROM portfolio_images WHERE id = ?1", params![id])
            .with_context(|| format!("failed to delete portfolio image id={id}"))
    }

    pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> DbResult<Self> {
        Ok(Self {
            id: row.get(0)?,
            filename: row.get(1)?,
            original_filename: row.get(2)?,
            title: row.get(3)?,
            description: row.get(4)?,
            alt_text: row.get(5)?,
            category_id: row.get(6)?,
            file_size: row.get(7)?,
            width: row.get(8)?,
            height: row.get(9)?,
            format: row.get(10)?,
            exif_data: {
                let raw: Option<String> = row.get(11)?;
                match raw {
                    Some(json) => Some(from_json(&json)?),
                    None => None,
                }
            },
            camera_make: row.get(12)?,
            camera_model: row.get(13)?,
            lens: row.get(14)?,
            focal_length: row.get(15)?,
            aperture: row.get(16)?,
            shutter_speed: row.get(17)?,
            iso: row.get(18)?,
            date_taken: parse_datetime_opt(row.get::<_, Option<String>>(19)?, "date_taken")?,
            display_order: row.get(20)?,
            is_featured: row.get(21)?,
            is_published: row.get(22)?,
            created_at: parse_datetime(row.get::<_, String>(23)?, "created_at")?,
            updated_at: parse_datetime(row.get::<_, String>(24)?, "updated_at")?,
        })
    }

    fn from_joined_row(row: &rusqlite::Row<'_>) -> DbResult<(Self, Option<String>)> {
        let image = Self::from_row(row)?;
        let category_name: Option<String> = row.get(CATEGORY_NAME_COLUMN)?;
        Ok((image, category_name))
    }
}
