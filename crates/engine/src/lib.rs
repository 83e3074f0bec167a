use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub mod exif_tags;

pub use exif_tags::ExifSummary;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("EXIF error: {0}")]
    Exif(#[from] exif::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Flattened EXIF tag name -> display text.
pub type ExifTags = BTreeMap<String, String>;

/// Header-level facts about an image file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    pub exif: ExifTags,
}

impl ImageMetadata {
    pub fn is_empty(&self) -> bool {
        self.width == 0 && self.height == 0 && self.exif.is_empty()
    }
}

pub struct ImageEngine;

impl Default for ImageEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageEngine {
    pub fn new() -> Self {
        Self
    }

    /// Read dimensions and EXIF tags. Files that cannot be decoded yield empty metadata.
    pub fn read_metadata<P: AsRef<Path>>(&self, path: P) -> ImageMetadata {
        let path = path.as_ref();
        match self.try_read_metadata(path) {
            Ok(meta) => meta,
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "unreadable image, using empty metadata");
                ImageMetadata::default()
            }
        }
    }

    /// Like [`read_metadata`](Self::read_metadata) but reports why the header could not be read.
    ///
    /// A missing or broken EXIF block is not an error: the dimensions are kept and
    /// the tag map is left empty.
    pub fn try_read_metadata<P: AsRef<Path>>(&self, path: P) -> Result<ImageMetadata> {
        let path = path.as_ref();
        let (width, height) =
            image::image_dimensions(path).map_err(|e| EngineError::Decode(e.to_string()))?;

        let exif = match read_exif_tags(path) {
            Ok(tags) => tags,
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "no EXIF data");
                ExifTags::new()
            }
        };

        Ok(ImageMetadata {
            width,
            height,
            exif,
        })
    }
}

fn read_exif_tags(path: &Path) -> Result<ExifTags> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut reader)?;
    Ok(exif_tags::flatten(&exif))
}
