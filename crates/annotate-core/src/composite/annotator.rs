//! Composition orchestrator
//!
//! [`Annotator`] ties the compiler to a compositor: it validates the
//! request, measures the source image, builds an overlay of exactly that
//! size and asks the compositor to draw it.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::{debug, info};

use super::traits::ImageCompositor;
use crate::{
    config::RenderConfig,
    error::{AnnotateError, AnnotateResult},
    model::{AnnotateOptions, AnnotateSummary, AnnotationDescriptor, ImageMetadata},
    render::{DocumentBuilder, SvgDocument},
};

/// Annotates screenshots through an [`ImageCompositor`]
#[derive(Clone)]
pub struct Annotator {
    compositor: Arc<dyn ImageCompositor>,
    config:     RenderConfig,
}

impl std::fmt::Debug for Annotator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Annotator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Annotator {
    pub fn new(compositor: Arc<dyn ImageCompositor>, config: RenderConfig) -> Self {
        Self { compositor, config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Builder for a request theme; `None` falls back to the configured
    /// default theme
    pub fn document_builder(&self, theme: Option<&str>) -> DocumentBuilder {
        let theme = theme.unwrap_or(&self.config.default_theme);
        DocumentBuilder::new(self.config.font_family.clone()).with_theme_name(Some(theme))
    }

    fn check_annotation_count(&self, count: usize) -> AnnotateResult<()> {
        if count > self.config.max_annotations {
            return Err(AnnotateError::InvalidParameter {
                parameter: "annotations".to_string(),
                reason:    format!(
                    "{} annotations exceeds the limit of {}",
                    count, self.config.max_annotations
                ),
            });
        }
        Ok(())
    }

    async fn ensure_exists(path: &Path) -> AnnotateResult<()> {
        if tokio::fs::try_exists(path).await? {
            Ok(())
        } else {
            Err(AnnotateError::InputNotFound {
                path: path.to_path_buf(),
            })
        }
    }

    /// Reads source image metadata
    pub async fn image_info(&self, path: &Path) -> AnnotateResult<ImageMetadata> {
        Self::ensure_exists(path).await?;
        self.compositor.metadata(path).await
    }

    /// Compiles annotations without touching any image
    pub fn render_svg(
        &self,
        width: u32,
        height: u32,
        annotations: &[AnnotationDescriptor],
        theme: Option<&str>,
    ) -> AnnotateResult<SvgDocument> {
        for (parameter, value) in [("width", width), ("height", height)] {
            if value == 0 {
                return Err(AnnotateError::InvalidParameter {
                    parameter: parameter.to_string(),
                    reason:    "must be greater than 0".to_string(),
                });
            }
        }
        self.check_annotation_count(annotations.len())?;
        Ok(self.document_builder(theme).build(width, height, annotations))
    }

    /// Draws `annotations` onto the image at `input`
    ///
    /// Without an explicit `output` the result lands next to the input
    /// (see [`RenderConfig::derive_output_path`]). The overlay is sized to
    /// the source image, so annotation coordinates are source pixels.
    pub async fn annotate(
        &self,
        input: &Path,
        output: Option<&Path>,
        annotations: &[AnnotationDescriptor],
        options: &AnnotateOptions,
    ) -> AnnotateResult<AnnotateSummary> {
        self.check_annotation_count(annotations.len())?;
        Self::ensure_exists(input).await?;

        let output_path: PathBuf = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.derive_output_path(input));

        let meta = self.compositor.metadata(input).await?;
        debug!(
            "Source {} is {}x{} {}",
            input.display(),
            meta.width,
            meta.height,
            meta.format
        );

        let document = self
            .document_builder(options.theme.as_deref())
            .build(meta.width, meta.height, annotations);

        self.compositor
            .composite(input, &document.markup, &output_path)
            .await?;

        info!(
            "Annotated {} -> {} ({} of {} annotations rendered, {} skipped)",
            input.display(),
            output_path.display(),
            document.rendered,
            annotations.len(),
            document.skipped.len()
        );

        Ok(AnnotateSummary {
            output_path,
            width: meta.width,
            height: meta.height,
            annotation_count: annotations.len(),
            rendered: document.rendered,
            skipped: document.skipped,
        })
    }
}
