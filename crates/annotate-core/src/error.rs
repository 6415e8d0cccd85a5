//! Error types for annotation and compositing operations
//!
//! Each error carries enough context for a user-facing message and exposes
//! an actionable remediation hint. Unknown annotation types are deliberately
//! absent here: they are skipped with a diagnostic instead of failing a
//! request (see [`crate::model::SkippedAnnotation`]).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Result type alias for annotation operations
pub type AnnotateResult<T> = Result<T, AnnotateError>;

/// High-level error category for filtering and grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Input file does not exist
    NotFound,
    /// Invalid descriptor or parameter
    InvalidInput,
    /// Image decode/encode or filesystem failure
    SystemError,
    /// SVG rasterization failure
    ProcessingError,
}

/// Error type for annotation operations
#[derive(Debug, thiserror::Error)]
pub enum AnnotateError {
    /// Source image path does not exist
    #[error("Input image not found: {}", .path.display())]
    InputNotFound {
        /// The missing path
        path: PathBuf,
    },

    /// An annotation descriptor could not be parsed
    #[error("Invalid annotation at index {index}: {reason}")]
    InvalidDescriptor {
        /// Position of the descriptor in the request
        index:  usize,
        /// Parser message
        reason: String,
    },

    /// Invalid tool or CLI parameter
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: String,
        /// Reason why it's invalid
        reason:    String,
    },

    /// Image read or write failed in the compositor
    #[error("Image I/O failed for {}: {reason}", .path.display())]
    ImageIo {
        /// File being read or written
        path:   PathBuf,
        /// Underlying library message
        reason: String,
    },

    /// I/O error occurred
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The generated SVG overlay could not be rasterized
    #[error("Failed to render overlay: {0}")]
    Render(String),
}

impl AnnotateError {
    /// Builds an [`AnnotateError::ImageIo`] from any displayable error
    pub fn image_io(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        AnnotateError::ImageIo {
            path:   path.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns an actionable remediation hint for this error
    ///
    /// # Examples
    ///
    /// ```
    /// use annotate_core::error::AnnotateError;
    ///
    /// let error = AnnotateError::InputNotFound {
    ///     path: "missing.png".into(),
    /// };
    /// assert!(error.remediation_hint().contains("absolute path"));
    /// ```
    pub fn remediation_hint(&self) -> &str {
        match self {
            AnnotateError::InputNotFound { .. } => {
                "Check that the input image exists. Relative paths are resolved against the \
                 server's working directory, so prefer an absolute path."
            }
            AnnotateError::InvalidDescriptor { .. } => {
                "Each annotation must be an object with a string 'type' field. Points such as \
                 'from' and 'to' are [x, y] arrays and numeric fields must be numbers."
            }
            AnnotateError::InvalidParameter { parameter, .. } => match parameter.as_str() {
                "width" | "height" => "Region width and height must be greater than 0.",
                "annotations" => "Split the request into smaller batches of annotations.",
                _ => "Check the parameter value against the tool schema.",
            },
            AnnotateError::ImageIo { .. } => {
                "The image could not be read or written. Supported formats are PNG, JPEG and \
                 WebP; check file permissions and that the output directory exists."
            }
            AnnotateError::IoError(_) => {
                "An I/O error occurred. Check file permissions, disk space, and system resources."
            }
            AnnotateError::Render(_) => {
                "The overlay could not be rasterized. Check annotation colors for invalid CSS \
                 color strings."
            }
        }
    }

    /// Returns the error category
    pub fn category(&self) -> ErrorCategory {
        match self {
            AnnotateError::InputNotFound { .. } => ErrorCategory::NotFound,
            AnnotateError::InvalidDescriptor { .. } | AnnotateError::InvalidParameter { .. } => {
                ErrorCategory::InvalidInput
            }
            AnnotateError::ImageIo { .. } | AnnotateError::IoError(_) => ErrorCategory::SystemError,
            AnnotateError::Render(_) => ErrorCategory::ProcessingError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_not_found_message() {
        let error = AnnotateError::InputNotFound {
            path: PathBuf::from("/tmp/photo.png"),
        };
        let msg = error.to_string();
        assert!(msg.contains("not found"));
        assert!(msg.contains("/tmp/photo.png"));
        assert_eq!(error.category(), ErrorCategory::NotFound);
    }

    #[test]
    fn test_invalid_descriptor_message() {
        let error = AnnotateError::InvalidDescriptor {
            index:  2,
            reason: "missing field `type`".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("index 2"));
        assert!(msg.contains("missing field"));
        assert!(error.remediation_hint().contains("'type'"));
    }

    #[test]
    fn test_invalid_parameter_hint_by_name() {
        let error = AnnotateError::InvalidParameter {
            parameter: "width".to_string(),
            reason:    "must be greater than 0".to_string(),
        };
        assert!(error.remediation_hint().contains("greater than 0"));
        assert_eq!(error.category(), ErrorCategory::InvalidInput);

        let error = AnnotateError::InvalidParameter {
            parameter: "theme".to_string(),
            reason:    "unknown".to_string(),
        };
        assert!(error.remediation_hint().contains("schema"));
    }

    #[test]
    fn test_image_io_constructor() {
        let error = AnnotateError::image_io("out.png", "permission denied");
        assert!(error.to_string().contains("out.png"));
        assert!(error.to_string().contains("permission denied"));
        assert_eq!(error.category(), ErrorCategory::SystemError);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error: AnnotateError = io_error.into();
        assert!(matches!(error, AnnotateError::IoError(_)));
        assert!(error.remediation_hint().contains("permissions"));
    }

    #[test]
    fn test_render_error_category() {
        let error = AnnotateError::Render("bad svg".to_string());
        assert_eq!(error.category(), ErrorCategory::ProcessingError);
        assert!(error.to_string().contains("bad svg"));
    }

    #[test]
    fn test_error_category_serialization() {
        assert_eq!(serde_json::to_string(&ErrorCategory::NotFound).unwrap(), r#""not_found""#);
        assert_eq!(
            serde_json::to_string(&ErrorCategory::InvalidInput).unwrap(),
            r#""invalid_input""#
        );
    }
}
