//! Flattening of EXIF fields into a name -> text map and the handful of
//! capture settings the catalog stores in dedicated columns.

use chrono::{DateTime, NaiveDateTime, Utc};
use exif::{Exif, Field, In, Tag, Value};
use serde::{Deserialize, Serialize};

use crate::ExifTags;

/// Flatten the primary-image fields of `exif`. The first value seen for a tag wins.
pub fn flatten(exif: &Exif) -> ExifTags {
    let mut tags = ExifTags::new();
    for field in exif.fields() {
        // IFD1 describes the embedded thumbnail, not the photo.
        if field.ifd_num != In::PRIMARY {
            continue;
        }
        tags.entry(tag_key(field.tag))
            .or_insert_with(|| value_text(field, exif));
    }
    tags
}

/// Tag name from the EXIF table, or the decimal tag number when the table has no entry.
pub fn tag_key(tag: Tag) -> String {
    if tag.description().is_some() {
        tag.to_string()
    } else {
        tag.number().to_string()
    }
}

fn value_text(field: &Field, exif: &Exif) -> String {
    match &field.value {
        Value::Ascii(parts) => parts
            .iter()
            .map(|raw| {
                String::from_utf8_lossy(raw)
                    .trim_matches('\u{0}')
                    .trim()
                    .to_string()
            })
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        _ => field.display_value().with_unit(exif).to_string(),
    }
}

/// Capture settings promoted out of the raw tag map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExifSummary {
    pub camera_make: Option<String>,
    pub camera_model: Option<String>,
    pub lens: Option<String>,
    pub focal_length: Option<String>,
    pub aperture: Option<String>,
    pub shutter_speed: Option<String>,
    pub iso: Option<String>,
    pub date_taken: Option<DateTime<Utc>>,
}

impl ExifSummary {
    pub fn from_tags(tags: &ExifTags) -> Self {
        let text = |keys: &[&str]| {
            keys.iter()
                .filter_map(|key| tags.get(*key))
                .find_map(|value| sanitize_non_empty(value))
        };

        Self {
            camera_make: text(&["Make"]),
            camera_model: text(&["Model"]),
            lens: text(&["LensModel"]),
            focal_length: text(&["FocalLength"]),
            aperture: text(&["FNumber"]),
            shutter_speed: text(&["ExposureTime"]),
            iso: text(&["PhotographicSensitivity", "ISOSpeedRatings", "ISOSpeed"]),
            date_taken: ["DateTimeOriginal", "DateTimeDigitized", "DateTime"]
                .iter()
                .filter_map(|key| tags.get(*key))
                .find_map(|raw| parse_exif_datetime(raw)),
        }
    }
}

fn parse_exif_datetime(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw.trim(), "%Y:%m:%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

fn sanitize_non_empty(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
