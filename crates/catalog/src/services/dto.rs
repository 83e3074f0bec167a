//! Response shapes handed to the HTTP layer.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::db::{Category, PortfolioImage};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 12;
pub const MAX_PER_PAGE: i64 = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryView {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub display_order: i64,
    pub is_active: bool,
    /// All images of the category, published or not.
    pub image_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CategoryView {
    pub fn new(category: Category, image_count: i64) -> Self {
        Self {
            id: category.id,
            name: category.name,
            slug: category.slug,
            description: category.description,
            display_order: category.display_order,
            is_active: category.is_active,
            image_count,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

/// Public image representation; the raw EXIF blob stays server-side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageView {
    pub id: i64,
    pub filename: String,
    pub original_filename: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub alt_text: Option<String>,
    pub category_id: i64,
    pub category_name: Option<String>,
    pub file_size: Option<i64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub format: Option<String>,
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
    pub web_path: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ImageView {
    pub fn new(image: PortfolioImage, category_name: Option<String>) -> Self {
        let web_path = image.web_path();
        Self {
            id: image.id,
            filename: image.filename,
            original_filename: image.original_filename,
            title: image.title,
            description: image.description,
            alt_text: image.alt_text,
            category_id: image.category_id,
            category_name,
            file_size: image.file_size,
            width: image.width,
            height: image.height,
            format: image.format,
            camera_make: image.camera_make,
            camera_model: image.camera_model,
            lens: image.lens,
            focal_length: image.focal_length,
            aperture: image.aperture,
            shutter_speed: image.shutter_speed,
            iso: image.iso,
            date_taken: image.date_taken,
            display_order: image.display_order,
            is_featured: image.is_featured,
            is_published: image.is_published,
            web_path,
            created_at: image.created_at,
            updated_at: image.updated_at,
        }
    }
}

/// Normalised pagination and filter for the public listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortfolioQuery {
    pub category_id: Option<i64>,
    pub page: i64,
    pub per_page: i64,
}

impl Default for PortfolioQuery {
    fn default() -> Self {
        Self {
            category_id: None,
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PortfolioQuery {
    /// Category 0 means "all"; page below 1 becomes 1; per_page below 1 falls
    /// back to the default and is capped at [`MAX_PER_PAGE`].
    pub fn new(category_id: Option<i64>, page: Option<i64>, per_page: Option<i64>) -> Self {
        let page = page.unwrap_or(DEFAULT_PAGE).max(1);
        let per_page = match per_page {
            Some(n) if n >= 1 => n.min(MAX_PER_PAGE),
            _ => DEFAULT_PER_PAGE,
        };
        Self {
            category_id: category_id.filter(|id| *id != 0),
            page,
            per_page,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioPage {
    pub images: Vec<ImageView>,
    pub total: i64,
    pub pages: i64,
    pub current_page: i64,
    pub per_page: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PortfolioPage {
    pub fn new(images: Vec<ImageView>, total: i64, query: &PortfolioQuery) -> Self {
        let per_page = query.per_page.max(1);
        let pages = (total + per_page - 1) / per_page;
        Self {
            images,
            total,
            pages,
            current_page: query.page,
            per_page: query.per_page,
            has_next: query.page < pages,
            has_prev: query.page > 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStat {
    pub name: String,
    /// Published images only.
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortfolioStats {
    pub total_images: i64,
    pub published_images: i64,
    pub total_categories: i64,
    pub has_featured_image: bool,
    pub category_stats: Vec<CategoryStat>,
}

/// The active featured image with its EXIF tags, for the admin featured page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeaturedDetails {
    pub image: ImageView,
    pub exif: Vec<(String, String)>,
}

impl FeaturedDetails {
    pub fn new(image: PortfolioImage, category_name: Option<String>) -> Self {
        let exif = exif_pairs(image.exif_data.as_ref());
        Self {
            image: ImageView::new(image, category_name),
            exif,
        }
    }
}

fn exif_pairs(blob: Option<&Value>) -> Vec<(String, String)> {
    let Some(Value::Object(map)) = blob else {
        return Vec::new();
    };
    map.iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), text)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_defaults_and_clamps() {
        assert_eq!(PortfolioQuery::new(None, None, None), PortfolioQuery::default());

        let q = PortfolioQuery::new(Some(0), Some(-3), Some(0));
        assert_eq!(q.category_id, None);
        assert_eq!(q.page, 1);
        assert_eq!(q.per_page, DEFAULT_PER_PAGE);

        let q = PortfolioQuery::new(Some(4), Some(3), Some(500));
        assert_eq!(q.category_id, Some(4));
        assert_eq!(q.per_page, MAX_PER_PAGE);
        assert_eq!(q.offset(), 200);
    }

    #[test]
    fn page_math() {
        let q = PortfolioQuery::new(None, Some(2), Some(12));
        let page = PortfolioPage::new(Vec::new(), 20, &q);
        assert_eq!(page.pages, 2);
        assert!(!page.has_next);
        assert!(page.has_prev);

        let empty = PortfolioPage::new(Vec::new(), 0, &PortfolioQuery::default());
        assert_eq!(empty.pages, 0);
        assert!(!empty.has_next);
        assert!(!empty.has_prev);
    }

    #[test]
    fn exif_pairs_stringify_values() {
        let blob = serde_json::json!({ "Make": "Nikon", "Count": 3 });
        let pairs = exif_pairs(Some(&blob));
        assert_eq!(
            pairs,
            vec![
                ("Count".to_string(), "3".to_string()),
                ("Make".to_string(), "Nikon".to_string())
            ]
        );
        assert!(exif_pairs(None).is_empty());
    }
}
