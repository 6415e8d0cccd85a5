//! Mock compositor for testing
//!
//! [`MockCompositor`] implements [`ImageCompositor`] without touching the
//! filesystem or decoding images. It reports configurable dimensions,
//! records every overlay it receives and can inject an error.
//!
//! # Examples
//!
//! ```
//! use std::path::Path;
//!
//! use annotate_core::composite::{ImageCompositor, mock::MockCompositor};
//!
//! #[tokio::main]
//! async fn main() {
//!     let compositor = MockCompositor::new().with_dimensions(640, 480);
//!
//!     let meta = compositor.metadata(Path::new("shot.png")).await.unwrap();
//!     assert_eq!((meta.width, meta.height), (640, 480));
//!
//!     compositor
//!         .composite(Path::new("shot.png"), "<svg/>", Path::new("out.png"))
//!         .await
//!         .unwrap();
//!     assert_eq!(compositor.calls().len(), 1);
//! }
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::traits::ImageCompositor;
use crate::{
    error::{AnnotateError, AnnotateResult},
    model::ImageMetadata,
};

/// One recorded `composite` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeCall {
    pub input:   PathBuf,
    pub overlay: String,
    pub output:  PathBuf,
}

/// In-memory compositor for tests
#[derive(Debug)]
pub struct MockCompositor {
    width:           u32,
    height:          u32,
    format:          String,
    /// Error returned by every operation, if set
    error_injection: Option<AnnotateError>,
    calls:           Mutex<Vec<CompositeCall>>,
}

impl Default for MockCompositor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCompositor {
    /// A 1920x1080 PNG source
    pub fn new() -> Self {
        Self {
            width:           1920,
            height:          1080,
            format:          "png".to_string(),
            error_injection: None,
            calls:           Mutex::new(Vec::new()),
        }
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Injects an error returned by all operations
    pub fn with_error(mut self, error: AnnotateError) -> Self {
        self.error_injection = Some(error);
        self
    }

    /// Calls recorded so far, oldest first
    pub fn calls(&self) -> Vec<CompositeCall> {
        self.calls.lock().clone()
    }

    /// The overlay from the most recent call
    pub fn last_overlay(&self) -> Option<String> {
        self.calls.lock().last().map(|call| call.overlay.clone())
    }

    fn check_error_injection(&self) -> AnnotateResult<()> {
        let Some(error) = &self.error_injection else {
            return Ok(());
        };
        // AnnotateError is not Clone because of io::Error
        Err(match error {
            AnnotateError::InputNotFound { path } => AnnotateError::InputNotFound { path: path.clone() },
            AnnotateError::InvalidDescriptor { index, reason } => AnnotateError::InvalidDescriptor {
                index:  *index,
                reason: reason.clone(),
            },
            AnnotateError::InvalidParameter { parameter, reason } => AnnotateError::InvalidParameter {
                parameter: parameter.clone(),
                reason:    reason.clone(),
            },
            AnnotateError::ImageIo { path, reason } => AnnotateError::ImageIo {
                path:   path.clone(),
                reason: reason.clone(),
            },
            AnnotateError::IoError(e) => AnnotateError::IoError(std::io::Error::new(e.kind(), e.to_string())),
            AnnotateError::Render(msg) => AnnotateError::Render(msg.clone()),
        })
    }
}

#[async_trait]
impl ImageCompositor for MockCompositor {
    async fn metadata(&self, _path: &Path) -> AnnotateResult<ImageMetadata> {
        self.check_error_injection()?;
        Ok(ImageMetadata {
            width:  self.width,
            height: self.height,
            format: self.format.clone(),
        })
    }

    async fn composite(&self, input: &Path, overlay: &str, output: &Path) -> AnnotateResult<()> {
        self.check_error_injection()?;
        self.calls.lock().push(CompositeCall {
            input:   input.to_path_buf(),
            overlay: overlay.to_string(),
            output:  output.to_path_buf(),
        });
        Ok(())
    }
}
