use std::fs::Metadata;
use std::path::{Path, PathBuf};

use catalog::db::portfolio_images::WEB_ROOT;
use chrono::{DateTime, Utc};
use core_types::ImageFormat;
use engine::{ImageEngine, ImageMetadata};
use tracing::warn;
use walkdir::WalkDir;

/// An image file found under the photo volume.
#[derive(Debug, Clone)]
pub struct ScannedImage {
    pub path: PathBuf,
    /// Forward-slash path relative to the scan root.
    pub relative_path: String,
    pub original_filename: String,
    /// Lower-cased file extension as found on disk.
    pub extension: String,
    pub file_size: u64,
    pub created_at: DateTime<Utc>,
    pub metadata: ImageMetadata,
    pub web_path: String,
}

/// Walk `root` recursively and describe every supported image.
///
/// A missing root yields an empty list. Unreadable entries are logged and skipped.
pub fn scan_directory(root: &Path, engine: &ImageEngine) -> Vec<ScannedImage> {
    if !root.exists() {
        return Vec::new();
    }

    let mut out = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };

        let file_name = entry.file_name().to_string_lossy().into_owned();
        if ImageFormat::from_file_name(&file_name).is_none() {
            continue;
        }

        // Follows symlinks, so linked images are imported like regular files.
        let fs_meta = match std::fs::metadata(entry.path()) {
            Ok(meta) if meta.is_file() => meta,
            Ok(_) => continue,
            Err(err) => {
                warn!(path = %entry.path().display(), error = %err, "skipping unreadable file");
                continue;
            }
        };

        let path = entry.into_path();
        let relative_path = relative_web_path(root, &path);
        out.push(ScannedImage {
            extension: file_name
                .rsplit_once('.')
                .map(|(_, ext)| ext.to_ascii_lowercase())
                .unwrap_or_default(),
            original_filename: file_name,
            file_size: fs_meta.len(),
            created_at: created_time(&fs_meta),
            metadata: engine.read_metadata(&path),
            web_path: format!("{WEB_ROOT}/{relative_path}"),
            relative_path,
            path,
        });
    }

    out
}

fn relative_web_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Birth time where the filesystem records it, else the modification time.
fn created_time(meta: &Metadata) -> DateTime<Utc> {
    meta.created()
        .or_else(|_| meta.modified())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now())
}
