use serde::{Deserialize, Serialize};

/// Raster formats picked up by the directory import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Bmp,
    Tiff,
    WebP,
}

impl ImageFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "bmp" => Some(Self::Bmp),
            "tiff" => Some(Self::Tiff),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Case-insensitive suffix match on a file name. A bare `.jpg` counts:
    /// everything after the last dot is the extension.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        Self::from_extension(ext)
    }
}

/// Success/error result returned by catalog mutations instead of an error value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Outcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }

    /// Failures caused by a missing row carry an error ending in "not found".
    pub fn is_not_found(&self) -> bool {
        !self.success
            && self
                .error
                .as_deref()
                .is_some_and(|message| message.ends_with("not found"))
    }

    pub fn from_result<E: std::fmt::Display>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(err) => Self::failed(err.to_string()),
        }
    }
}

/// Counts reported by a directory import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub imported: usize,
    pub skipped: usize,
    pub total_found: usize,
}

impl ImportSummary {
    pub fn completed(imported: usize, skipped: usize, total_found: usize) -> Self {
        Self {
            success: true,
            error: None,
            imported,
            skipped,
            total_found,
        }
    }

    /// A failed batch discards its progress; only the number of files found survives.
    pub fn failed(message: impl Into<String>, total_found: usize) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            imported: 0,
            skipped: 0,
            total_found,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_matching_ignores_case() {
        assert_eq!(ImageFormat::from_file_name("IMG_0001.JPG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_file_name("scan.TiFf"), Some(ImageFormat::Tiff));
        assert_eq!(ImageFormat::from_file_name("pic.webp"), Some(ImageFormat::WebP));
        assert_eq!(ImageFormat::from_file_name("notes.txt"), None);
        assert_eq!(ImageFormat::from_file_name("no_extension"), None);
        assert_eq!(ImageFormat::from_file_name("frame.tif"), None);
        assert_eq!(ImageFormat::from_file_name("jpg"), None);
    }

    #[test]
    fn dot_file_with_image_suffix_matches() {
        assert_eq!(ImageFormat::from_file_name(".JPG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_file_name("archive.tar.png"), Some(ImageFormat::Png));
    }

    #[test]
    fn outcome_omits_error_on_success() {
        let ok = serde_json::to_value(Outcome::ok()).unwrap();
        assert_eq!(ok, serde_json::json!({ "success": true }));

        let failed = serde_json::to_value(Outcome::failed("Image not found")).unwrap();
        assert_eq!(
            failed,
            serde_json::json!({ "success": false, "error": "Image not found" })
        );
    }

    #[test]
    fn not_found_outcomes_are_recognised() {
        assert!(Outcome::failed("Category not found").is_not_found());
        assert!(!Outcome::failed("database is locked").is_not_found());
        assert!(!Outcome::ok().is_not_found());
    }

    #[test]
    fn failed_import_discards_counts() {
        let summary = ImportSummary::failed("disk full", 7);
        assert!(!summary.success);
        assert_eq!(summary.imported, 0);
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.total_found, 7);
    }
}
