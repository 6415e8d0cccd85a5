//! Compositor seam
//!
//! The orchestrator never touches pixels itself. It asks an
//! [`ImageCompositor`] for the source dimensions and hands it the finished
//! SVG overlay. [`super::ResvgCompositor`] is the real implementation and
//! [`super::mock::MockCompositor`] stands in for it in tests.

use std::path::Path;

use async_trait::async_trait;

use crate::error::AnnotateResult;
use crate::model::ImageMetadata;

/// Capability: read image metadata and composite an SVG overlay onto it.
#[async_trait]
pub trait ImageCompositor: Send + Sync {
    /// Reads `{width, height, format}` of the image at `path`.
    async fn metadata(&self, path: &Path) -> AnnotateResult<ImageMetadata>;

    /// Draws `overlay` (a complete SVG document) over the image at `input`,
    /// top-left aligned, and writes the result to `output`.
    ///
    /// Either the output file is fully written or it is left untouched.
    async fn composite(&self, input: &Path, overlay: &str, output: &Path) -> AnnotateResult<()>;
}
