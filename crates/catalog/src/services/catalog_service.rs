use anyhow::Context;
use core_types::Outcome;
use rusqlite::Transaction;
use tracing::{info, warn};

use crate::db::{CatalogDb, Category, FeaturedImage, ImageDetails, PortfolioImage};
use crate::services::dto::{
    CategoryStat, CategoryView, FeaturedDetails, ImageView, PortfolioPage, PortfolioQuery,
    PortfolioStats,
};
use crate::{CatalogError, Result};

/// High-level catalog operations that sit above the raw ORM bindings.
pub struct CatalogService {
    pub db: CatalogDb,
}

impl CatalogService {
    pub fn new(db: CatalogDb) -> Self {
        Self { db }
    }

    /// Insert the default categories when none exist yet.
    pub fn seed_default_categories(&self) -> Result<usize> {
        let created = Category::seed_defaults(&self.db).context("failed to seed categories")?;
        if created > 0 {
            info!(created, "seeded default categories");
        }
        Ok(created)
    }

    pub fn list_active_categories(&self) -> Result<Vec<CategoryView>> {
        let categories =
            Category::load_active(&self.db).context("failed to list active categories")?;
        self.with_image_counts(categories)
    }

    pub fn list_categories(&self) -> Result<Vec<CategoryView>> {
        let categories = Category::load_all(&self.db).context("failed to list categories")?;
        self.with_image_counts(categories)
    }

    fn with_image_counts(&self, categories: Vec<Category>) -> Result<Vec<CategoryView>> {
        categories
            .into_iter()
            .map(|category| -> Result<CategoryView> {
                let count = Category::image_count(&self.db, category.id)?;
                Ok(CategoryView::new(category, count))
            })
            .collect()
    }

    /// Category that new imports are attached to: the lowest id.
    pub fn default_category(&self) -> Result<Option<Category>> {
        Ok(Category::first(&self.db)?)
    }

    pub fn list_portfolio(&self, query: &PortfolioQuery) -> Result<PortfolioPage> {
        let total = PortfolioImage::count_published_in(&self.db, query.category_id)
            .context("failed to count published images")?;
        let images = PortfolioImage::published_page(
            &self.db,
            query.category_id,
            query.per_page,
            query.offset(),
        )
        .context("failed to list published images")?
        .into_iter()
        .map(|(image, category)| ImageView::new(image, category))
        .collect();
        Ok(PortfolioPage::new(images, total, query))
    }

    /// Every image, newest first, published or not.
    pub fn all_images(&self) -> Result<Vec<ImageView>> {
        Ok(PortfolioImage::load_all_with_category(&self.db)
            .context("failed to list images")?
            .into_iter()
            .map(|(image, category)| ImageView::new(image, category))
            .collect())
    }

    pub fn featured_image(&self) -> Result<Option<ImageView>> {
        Ok(self
            .active_featured()?
            .map(|(image, category)| ImageView::new(image, category)))
    }

    pub fn featured_details(&self) -> Result<Option<FeaturedDetails>> {
        Ok(self
            .active_featured()?
            .map(|(image, category)| FeaturedDetails::new(image, category)))
    }

    fn active_featured(&self) -> Result<Option<(PortfolioImage, Option<String>)>> {
        let Some(featured) = FeaturedImage::active(&self.db)? else {
            return Ok(None);
        };
        Ok(PortfolioImage::find_with_category(
            &self.db,
            featured.portfolio_image_id,
        )?)
    }

    pub fn stats(&self) -> Result<PortfolioStats> {
        let category_stats = Category::load_active(&self.db)?
            .into_iter()
            .map(|category| -> Result<CategoryStat> {
                let count = PortfolioImage::count_published_in(&self.db, Some(category.id))?;
                Ok(CategoryStat {
                    name: category.name,
                    count,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(PortfolioStats {
            total_images: PortfolioImage::count(&self.db)?,
            published_images: PortfolioImage::count_published_in(&self.db, None)?,
            total_categories: Category::count_active(&self.db)?,
            has_featured_image: FeaturedImage::active(&self.db)?.is_some(),
            category_stats,
        })
    }

    pub fn update_image_category(&mut self, image_id: i64, category_id: i64) -> Outcome {
        let result = self.in_transaction(|tx| {
            require_image(tx, image_id)?;
            if Category::find(tx, category_id)?.is_none() {
                return Err(CatalogError::not_found("Category", category_id));
            }
            PortfolioImage::update_category(tx, image_id, category_id)?;
            Ok(())
        });
        into_outcome("update_image_category", image_id, result)
    }

    pub fn update_image_details(&mut self, image_id: i64, details: &ImageDetails) -> Outcome {
        let result = self.in_transaction(|tx| {
            if PortfolioImage::update_details(tx, image_id, details)? == 0 {
                return Err(CatalogError::not_found("Image", image_id));
            }
            Ok(())
        });
        into_outcome("update_image_details", image_id, result)
    }

    /// Removes the catalog row; the file on disk is left alone.
    pub fn delete_image(&mut self, image_id: i64) -> Outcome {
        let result = self.in_transaction(|tx| {
            if PortfolioImage::delete(tx, image_id)? == 0 {
                return Err(CatalogError::not_found("Image", image_id));
            }
            Ok(())
        });
        into_outcome("delete_image", image_id, result)
    }

    /// Deactivate every active featured row, then record `image_id` as the active one.
    pub fn set_featured_image(&mut self, image_id: i64) -> Outcome {
        let result = self.in_transaction(|tx| {
            require_image(tx, image_id)?;
            FeaturedImage::deactivate_all(tx)?;
            FeaturedImage::new_active(image_id).insert(tx)?;
            PortfolioImage::mark_featured(tx, image_id)?;
            Ok(())
        });
        into_outcome("set_featured_image", image_id, result)
    }

    /// Deletes the category together with its images.
    pub fn delete_category(&mut self, category_id: i64) -> Outcome {
        let result = self.in_transaction(|tx| {
            if Category::delete(tx, category_id)? == 0 {
                return Err(CatalogError::not_found("Category", category_id));
            }
            Ok(())
        });
        into_outcome("delete_category", category_id, result)
    }

    /// Run `f` in a transaction that commits on `Ok` and rolls back otherwise.
    fn in_transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let tx = self.db.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}

fn require_image(tx: &Transaction<'_>, image_id: i64) -> Result<PortfolioImage> {
    PortfolioImage::find(tx, image_id)?.ok_or_else(|| CatalogError::not_found("Image", image_id))
}

fn into_outcome(operation: &'static str, id: i64, result: Result<()>) -> Outcome {
    if let Err(err) = &result {
        warn!(operation, id, error = %err, "catalog update rolled back");
    }
    Outcome::from_result(result)
}
