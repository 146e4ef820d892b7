//! Error types for the scene_features library

use serde::Serialize;
use thiserror::Error;

/// Result type alias for scene_features operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Coarse failure taxonomy shared by every component.
///
/// Callers that only need to know *why* a statistic fell back to its
/// default can branch on this instead of matching every error variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    /// The image could not be opened or decoded
    Decode,
    /// The image decoded but its content makes a statistic undefined
    DegenerateInput,
    /// A computation hit unexpected input and was approximated by a neutral value
    Computation,
    /// Invalid configuration or parameters
    Configuration,
    /// Metadata (EXIF) could not be read
    Metadata,
    /// The scene classifier rejected its input
    Classification,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Decode => "decode",
            FailureKind::DegenerateInput => "degenerate-input",
            FailureKind::Computation => "computation",
            FailureKind::Configuration => "configuration",
            FailureKind::Metadata => "metadata",
            FailureKind::Classification => "classification",
        }
    }
}

/// Comprehensive error types for feature extraction operations
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Image file could not be loaded or decoded
    #[error("Failed to load image: {message}")]
    ImageLoadError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// File extension is not a supported raster format
    #[error("Unsupported image format: {path}")]
    UnsupportedFormat { path: String },

    /// Image content makes the statistic undefined (e.g. an all-black frame)
    #[error("Degenerate input: {reason}")]
    DegenerateInput { reason: String },

    /// A statistic could not be computed on otherwise valid input
    #[error("Computation failed in {operation}: {message}")]
    ComputationError { operation: String, message: String },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Configuration file could not be read or written
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// EXIF metadata extraction failed
    #[error("EXIF processing error: {message}")]
    ExifError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The scene classifier could not score a feature row
    #[error("Classifier error: {message}")]
    ClassifierError { message: String },
}

impl AnalysisError {
    /// Create an image load error with context
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoadError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an EXIF processing error with context
    pub fn exif<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ExifError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateInput {
            reason: reason.into(),
        }
    }

    pub fn computation(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ComputationError {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Copy of this error without its source chain
    ///
    /// Used when one upstream failure (typically a decode error) has to be
    /// reported by several statistics.
    pub fn detached(&self) -> Self {
        match self {
            AnalysisError::ImageLoadError { message, source } => AnalysisError::ImageLoadError {
                message: match source {
                    Some(source) => format!("{}: {}", message, source),
                    None => message.clone(),
                },
                source: None,
            },
            AnalysisError::UnsupportedFormat { path } => {
                AnalysisError::UnsupportedFormat { path: path.clone() }
            }
            AnalysisError::DegenerateInput { reason } => AnalysisError::degenerate(reason.clone()),
            AnalysisError::ComputationError { operation, message } => {
                AnalysisError::computation(operation.clone(), message.clone())
            }
            AnalysisError::InvalidParameter { parameter, value } => AnalysisError::InvalidParameter {
                parameter: parameter.clone(),
                value: value.clone(),
            },
            AnalysisError::ConfigError { message, .. } => AnalysisError::ConfigError {
                message: message.clone(),
                source: None,
            },
            AnalysisError::ExifError { message, .. } => AnalysisError::ExifError {
                message: message.clone(),
                source: None,
            },
            AnalysisError::ClassifierError { message } => AnalysisError::ClassifierError {
                message: message.clone(),
            },
        }
    }

    /// Map this error onto the shared failure taxonomy
    pub fn kind(&self) -> FailureKind {
        match self {
            AnalysisError::ImageLoadError { .. } | AnalysisError::UnsupportedFormat { .. } => {
                FailureKind::Decode
            }
            AnalysisError::DegenerateInput { .. } => FailureKind::DegenerateInput,
            AnalysisError::ComputationError { .. } => FailureKind::Computation,
            AnalysisError::InvalidParameter { .. } | AnalysisError::ConfigError { .. } => {
                FailureKind::Configuration
            }
            AnalysisError::ExifError { .. } => FailureKind::Metadata,
            AnalysisError::ClassifierError { .. } => FailureKind::Classification,
        }
    }

    /// Check if this error indicates a recoverable condition
    ///
    /// Recoverable errors concern a single statistic of a single image;
    /// the rest of the image (and the batch) is still usable.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            FailureKind::DegenerateInput | FailureKind::Computation | FailureKind::Metadata
        )
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::ImageLoadError { .. } => {
                "Could not load the image. Please check the file format and try again.".to_string()
            }
            AnalysisError::UnsupportedFormat { path } => {
                format!("The file '{}' is not a supported image format.", path)
            }
            AnalysisError::DegenerateInput { .. } => {
                "The image is too uniform (e.g. completely black) for this measurement.".to_string()
            }
            AnalysisError::InvalidParameter { parameter, .. } => {
                format!("The configuration value '{}' is not valid.", parameter)
            }
            _ => "Feature extraction failed. Please try with a different image.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_mapping() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert_eq!(AnalysisError::image_load("x", io).kind(), FailureKind::Decode);
        assert_eq!(AnalysisError::degenerate("black").kind(), FailureKind::DegenerateInput);
        assert_eq!(
            AnalysisError::computation("avg", "nan").kind(),
            FailureKind::Computation
        );
        assert_eq!(
            AnalysisError::invalid_parameter("hue_bin_width", 0.0).kind(),
            FailureKind::Configuration
        );
    }

    #[test]
    fn test_detached_keeps_kind_and_context() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let original = AnalysisError::image_load("Failed to open image file: a.png", io);
        let copy = original.detached();
        assert_eq!(copy.kind(), FailureKind::Decode);
        assert!(copy.to_string().contains("a.png"));
        assert!(copy.to_string().contains("missing"));
        assert!(std::error::Error::source(&copy).is_none());
    }

    #[test]
    fn test_recoverable() {
        assert!(AnalysisError::degenerate("black").is_recoverable());
        assert!(!AnalysisError::UnsupportedFormat { path: "a.doc".into() }.is_recoverable());
    }

    #[test]
    fn test_display_messages() {
        let err = AnalysisError::invalid_parameter("top_colors", 0);
        assert_eq!(err.to_string(), "Invalid parameter: top_colors = 0");

        let err = AnalysisError::computation("dominant_hsv", "empty bin");
        assert_eq!(err.to_string(), "Computation failed in dominant_hsv: empty bin");
    }
}
