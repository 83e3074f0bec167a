pub mod scanner;

use std::path::Path;

use anyhow::{Context, Result};
use catalog::db::{Category, PortfolioImage};
use catalog::CatalogService;
use chrono::Utc;
use core_types::ImportSummary;
use engine::ExifSummary;
use serde_json::Value;
use tracing::{info, warn};

use self::scanner::ScannedImage;

/// Catalog the scanned images whose filenames are not in the catalog yet.
///
/// New rows are written in one transaction: a failure anywhere discards the
/// whole batch and the summary reports only the number of files found.
pub fn import_scanned(
    service: &mut CatalogService,
    scanned: &[ScannedImage],
    site_name: &str,
) -> ImportSummary {
    let total_found = scanned.len();

    match persist_new_images(service, scanned, site_name) {
        Ok((imported, skipped)) => {
            info!(imported, skipped, total_found, "import finished");
            ImportSummary::completed(imported, skipped, total_found)
        }
        Err(err) => {
            warn!(error = %format!("{err:#}"), "import rolled back");
            ImportSummary::failed(format!("{err:#}"), total_found)
        }
    }
}

fn persist_new_images(
    service: &mut CatalogService,
    scanned: &[ScannedImage],
    site_name: &str,
) -> Result<(usize, usize)> {
    let tx = service.db.transaction()?;
    let mut default_category = None;
    let mut imported = 0;
    let mut skipped = 0;

    for image in scanned {
        if PortfolioImage::exists_with_filename(&tx, &image.relative_path)? {
            skipped += 1;
            continue;
        }

        let category_id = match default_category {
            Some(id) => id,
            None => {
                let id = Category::first(&tx)?
                    .context("no category exists to attach imported images to")?
                    .id;
                *default_category.insert(id)
            }
        };

        new_portfolio_image(image, category_id, site_name)
            .insert(&tx)
            .with_context(|| format!("failed to import {}", image.relative_path))?;
        imported += 1;
    }

    tx.commit().context("failed to commit import")?;
    Ok((imported, skipped))
}

fn new_portfolio_image(image: &ScannedImage, category_id: i64, site_name: &str) -> PortfolioImage {
    let exif = ExifSummary::from_tags(&image.metadata.exif);
    let exif_blob = image
        .metadata
        .exif
        .iter()
        .map(|(key, value)| (key.clone(), Value::String(value.clone())))
        .collect();

    PortfolioImage {
        id: 0,
        filename: image.relative_path.clone(),
        original_filename: Some(image.original_filename.clone()),
        title: Some(derive_title(&image.original_filename)),
        description: Some(String::new()),
        alt_text: Some(format!("Photography by {site_name}")),
        category_id,
        file_size: Some(i64::try_from(image.file_size).unwrap_or(i64::MAX)),
        width: Some(i64::from(image.metadata.width)),
        height: Some(i64::from(image.metadata.height)),
        format: Some(image.extension.clone()),
        exif_data: Some(Value::Object(exif_blob)),
        camera_make: exif.camera_make,
        camera_model: exif.camera_model,
        lens: exif.lens,
        focal_length: exif.focal_length,
        aperture: exif.aperture,
        shutter_speed: exif.shutter_speed,
        iso: exif.iso,
        date_taken: exif.date_taken,
        display_order: 0,
        is_featured: false,
        is_published: true,
        created_at: image.created_at,
        updated_at: Utc::now(),
    }
}

/// Human title from a file name: extension dropped, `_` and `-` become spaces,
/// and every run of letters starts upper-case with the rest lower-case.
pub fn derive_title(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);

    let mut title = String::with_capacity(stem.len());
    let mut in_word = false;
    for ch in stem.chars() {
        let ch = if ch == '_' || ch == '-' { ' ' } else { ch };
        if ch.is_alphabetic() {
            if in_word {
                title.extend(ch.to_lowercase());
            } else {
                title.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            title.push(ch);
            in_word = false;
        }
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::scanner::scan_directory;
    use catalog::db::{CatalogDb, DbHandle};
    use engine::ImageEngine;
    use catalog::services::PortfolioQuery;
    use std::fs;
    use tempfile::tempdir;

    fn import(service: &mut CatalogService, dir: &Path) -> ImportSummary {
        let scanned = scan_directory(dir, &ImageEngine::new());
        import_scanned(service, &scanned, "Studio")
    }

    fn seeded_service() -> CatalogService {
        let service = CatalogService::new(CatalogDb::in_memory().unwrap());
        service.seed_default_categories().unwrap();
        service
    }

    fn photo_dir() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("events")).unwrap();
        image::RgbImage::new(40, 30)
            .save(dir.path().join("events").join("summer_wedding-2023.png"))
            .unwrap();
        image::RgbImage::new(10, 20)
            .save(dir.path().join("SUNSET.jpg"))
            .unwrap();
        fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();
        dir
    }

    #[test]
    fn titles_follow_word_capitalisation() {
        assert_eq!(derive_title("summer_wedding-2023.png"), "Summer Wedding 2023");
        assert_eq!(derive_title("IMG_0042.JPG"), "Img 0042");
        assert_eq!(derive_title("mcDONALD's_bar.jpeg"), "Mcdonald'S Bar");
        assert_eq!(derive_title("no-extension"), "No Extension");
    }

    #[test]
    fn import_catalogs_new_files() {
        let dir = photo_dir();
        let mut service = seeded_service();

        let summary = import(&mut service, dir.path());
        assert_eq!(summary, ImportSummary::completed(2, 0, 2));

        let wedding = PortfolioImage::find_by_filename(&service.db, "events/summer_wedding-2023.png")
            .unwrap()
            .unwrap();
        assert_eq!(wedding.title.as_deref(), Some("Summer Wedding 2023"));
        assert_eq!(wedding.alt_text.as_deref(), Some("Photography by Studio"));
        assert_eq!(wedding.description.as_deref(), Some(""));
        assert_eq!(wedding.format.as_deref(), Some("png"));
        assert_eq!((wedding.width, wedding.height), (Some(40), Some(30)));
        assert!(wedding.is_published);

        let portraits = service.default_category().unwrap().unwrap();
        assert_eq!(wedding.category_id, portraits.id);
        assert_eq!(service.list_portfolio(&PortfolioQuery::default()).unwrap().total, 2);
    }

    #[test]
    fn reimport_skips_everything() {
        let dir = photo_dir();
        let mut service = seeded_service();

        import(&mut service, dir.path());
        let again = import(&mut service, dir.path());
        assert!(again.success);
        assert_eq!(again.imported, 0);
        assert_eq!(again.skipped, again.total_found);
        assert_eq!(PortfolioImage::count(&service.db).unwrap(), 2);
    }

    #[test]
    fn import_without_category_fails() {
        let dir = photo_dir();
        let mut service = CatalogService::new(CatalogDb::in_memory().unwrap());

        let summary = import(&mut service, dir.path());
        assert!(!summary.success);
        assert!(summary.error.unwrap().contains("no category"));
        assert_eq!((summary.imported, summary.skipped, summary.total_found), (0, 0, 2));
        assert_eq!(PortfolioImage::count(&service.db).unwrap(), 0);
    }

    #[test]
    fn failed_insert_discards_earlier_rows() {
        let dir = tempdir().unwrap();
        for name in ["a.png", "b.png", "c.png"] {
            image::RgbImage::new(2, 2).save(dir.path().join(name)).unwrap();
        }
        let mut service = seeded_service();
        service
            .db
            .execute(
                "CREATE TRIGGER reject_c BEFORE INSERT ON portfolio_images
                 WHEN NEW.filename = 'c.png'
                 BEGIN SELECT RAISE(ABORT, 'disk full'); END",
                [],
            )
            .unwrap();

        let summary = import(&mut service, dir.path());
        assert!(!summary.success);
        assert!(summary.error.unwrap().contains("disk full"));
        assert_eq!((summary.imported, summary.skipped, summary.total_found), (0, 0, 3));
        assert_eq!(PortfolioImage::count(&service.db).unwrap(), 0);
    }

    #[test]
    fn empty_directory_needs_no_category() {
        let dir = tempdir().unwrap();
        let mut service = CatalogService::new(CatalogDb::in_memory().unwrap());

        let summary = import(&mut service, dir.path());
        assert_eq!(summary, ImportSummary::completed(0, 0, 0));
    }
}
