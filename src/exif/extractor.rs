//! EXIF metadata extraction and parsing
//!
//! Reads camera identification, capture time, GPS position and color space
//! from JPEG files. Other formats are reported as carrying no EXIF.

use crate::error::{AnalysisError, Result};
use crate::image_loader::ImageFormat;
use exif::{Exif, In, Tag, Value};
use serde::{Serialize, Serializer};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Why the metadata is absent or incomplete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataNote {
    /// The file has no EXIF block
    NoMetadata,
    /// None of make, model, capture time or latitude is present
    Sparse,
    /// The format is not read for EXIF
    FormatWithoutExif,
}

impl MetadataNote {
    pub fn label(&self) -> &'static str {
        match self {
            MetadataNote::NoMetadata => "no EXIF metadata",
            MetadataNote::Sparse => "sparse metadata",
            MetadataNote::FormatWithoutExif => "format carries no EXIF",
        }
    }
}

impl fmt::Display for MetadataNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for MetadataNote {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Camera metadata of one photo
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CameraMetadata {
    pub make: Option<String>,
    pub model: Option<String>,
    /// `DateTimeOriginal` as stored (`YYYY:MM:DD HH:MM:SS`)
    pub date_time_original: Option<String>,
    /// Signed decimal degrees (south negative)
    pub gps_latitude: Option<f64>,
    /// Signed decimal degrees (west negative)
    pub gps_longitude: Option<f64>,
    pub color_space: Option<String>,
    pub note: Option<MetadataNote>,
}

impl CameraMetadata {
    fn with_note(note: MetadataNote) -> Self {
        Self {
            note: Some(note),
            ..Self::default()
        }
    }

    /// Whether any identifying field was found
    pub fn has_identity(&self) -> bool {
        self.make.is_some()
            || self.model.is_some()
            || self.date_time_original.is_some()
            || self.gps_latitude.is_some()
    }
}

/// EXIF metadata extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifExtractor;

impl ExifExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract camera metadata from an image file
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::ExifError` if a JPEG cannot be opened or its
    /// EXIF block is malformed. A JPEG without EXIF is not an error.
    pub fn extract(&self, image_path: &Path) -> Result<CameraMetadata> {
        let carries_exif = ImageFormat::from_extension(image_path)
            .map(|format| format.carries_exif())
            .unwrap_or(false);
        if !carries_exif {
            return Ok(CameraMetadata::with_note(MetadataNote::FormatWithoutExif));
        }

        let file = File::open(image_path).map_err(|e| {
            AnalysisError::exif(format!("Failed to open {}", image_path.display()), e)
        })?;
        let mut reader = BufReader::new(file);
        let exif = match exif::Reader::new().read_from_container(&mut reader) {
            Ok(exif) => exif,
            Err(exif::Error::NotFound(_)) => {
                return Ok(CameraMetadata::with_note(MetadataNote::NoMetadata))
            }
            Err(e) => {
                return Err(AnalysisError::exif(
                    format!("Failed to parse EXIF of {}", image_path.display()),
                    e,
                ))
            }
        };

        Ok(Self::from_exif(&exif))
    }

    fn from_exif(exif: &Exif) -> CameraMetadata {
        if exif.fields().next().is_none() {
            return CameraMetadata::with_note(MetadataNote::NoMetadata);
        }

        let text = |tag| exif.get_field(tag, In::PRIMARY).and_then(|f| ascii_value(&f.value));
        let reference = |tag| {
            exif.get_field(tag, In::PRIMARY)
                .and_then(|f| ascii_value(&f.value))
                .and_then(|s| s.chars().next())
        };
        let coordinate = |tag, reference_tag, negative| {
            let degrees = exif
                .get_field(tag, In::PRIMARY)
                .and_then(|f| dms_to_degrees(&f.value))?;
            Some(if reference(reference_tag) == Some(negative) {
                -degrees
            } else {
                degrees
            })
        };

        let mut metadata = CameraMetadata {
            make: text(Tag::Make),
            model: text(Tag::Model),
            date_time_original: text(Tag::DateTimeOriginal),
            gps_latitude: coordinate(Tag::GPSLatitude, Tag::GPSLatitudeRef, 'S'),
            gps_longitude: coordinate(Tag::GPSLongitude, Tag::GPSLongitudeRef, 'W'),
            color_space: exif
                .get_field(Tag::ColorSpace, In::PRIMARY)
                .and_then(|f| f.value.get_uint(0))
                .map(color_space_name),
            note: None,
        };
        if !metadata.has_identity() {
            metadata.note = Some(MetadataNote::Sparse);
        }
        metadata
    }
}

/// First ASCII string of a value, trimmed; `None` when empty
fn ascii_value(value: &Value) -> Option<String> {
    match value {
        Value::Ascii(strings) => strings
            .first()
            .map(|bytes| {
                String::from_utf8_lossy(bytes)
                    .trim_matches(char::from(0))
                    .trim()
                    .to_string()
            })
            .filter(|s| !s.is_empty()),
        _ => None,
    }
}

/// Degrees, minutes, seconds rationals to decimal degrees
fn dms_to_degrees(value: &Value) -> Option<f64> {
    match value {
        Value::Rational(parts) if !parts.is_empty() => {
            let part = |i: usize| parts.get(i).map(|r| r.to_f64()).unwrap_or(0.0);
            let degrees = part(0) + part(1) / 60.0 + part(2) / 3600.0;
            degrees.is_finite().then_some(degrees)
        }
        _ => None,
    }
}

fn color_space_name(code: u32) -> String {
    match code {
        1 => "sRGB".to_string(),
        2 => "Adobe RGB".to_string(),
        0xFFFF => "Uncalibrated".to_string(),
        other => format!("Unknown ({})", other),
    }
}
