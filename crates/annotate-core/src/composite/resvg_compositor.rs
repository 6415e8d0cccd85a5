//! `resvg`-backed compositor
//!
//! Rasterizes the SVG overlay with `resvg` into a pixmap the size of the
//! source image, alpha-blends it over the source with `image`, encodes by
//! output extension and persists the result atomically.

use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use image::{ImageReader, RgbaImage, imageops};
use resvg::{tiny_skia, usvg};
use tracing::debug;

use super::traits::ImageCompositor;
use crate::{
    config::{DEFAULT_FONT_FAMILY, JPEG_QUALITY},
    error::{AnnotateError, AnnotateResult},
    model::ImageMetadata,
    util::encode::{OutputFormat, encode_image},
};

/// Real compositor used by the server and CLI
#[derive(Clone)]
pub struct ResvgCompositor {
    fontdb:       Arc<usvg::fontdb::Database>,
    font_family:  String,
    jpeg_quality: u8,
}

impl std::fmt::Debug for ResvgCompositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResvgCompositor")
            .field("fonts", &self.fontdb.len())
            .field("font_family", &self.font_family)
            .field("jpeg_quality", &self.jpeg_quality)
            .finish()
    }
}

impl Default for ResvgCompositor {
    fn default() -> Self {
        Self::new()
    }
}

impl ResvgCompositor {
    /// Creates a compositor with the system fonts loaded
    ///
    /// Font discovery runs once here; every composite call shares the
    /// database.
    pub fn new() -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        debug!("Loaded {} font faces for overlay text", fontdb.len());
        Self::with_fontdb(Arc::new(fontdb))
    }

    /// Creates a compositor that uses an existing font database
    pub fn with_fontdb(fontdb: Arc<usvg::fontdb::Database>) -> Self {
        Self {
            fontdb,
            font_family: primary_font(DEFAULT_FONT_FAMILY),
            jpeg_quality: JPEG_QUALITY,
        }
    }

    /// Sets the fallback font used for text without a matching face
    pub fn with_font_family(mut self, font_family: &str) -> Self {
        self.font_family = primary_font(font_family);
        self
    }

    /// Sets the quality used for `.jpg` / `.jpeg` outputs
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Rasterizes `overlay` to a straight-alpha RGBA image of `width` x `height`
    pub fn rasterize(&self, overlay: &str, width: u32, height: u32) -> AnnotateResult<RgbaImage> {
        let mut opt = usvg::Options::default();
        opt.fontdb = Arc::clone(&self.fontdb);
        opt.font_family = self.font_family.clone();

        let tree = usvg::Tree::from_str(overlay, &opt).map_err(|e| AnnotateError::Render(e.to_string()))?;
        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| AnnotateError::Render(format!("cannot allocate {}x{} canvas", width, height)))?;

        // Stretch only if the document and canvas sizes disagree.
        let size = tree.size();
        let transform = tiny_skia::Transform::from_scale(
            width as f32 / size.width(),
            height as f32 / size.height(),
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        let mut raw = Vec::with_capacity(pixmap.pixels().len() * 4);
        for pixel in pixmap.pixels() {
            let color = pixel.demultiply();
            raw.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
        }
        RgbaImage::from_raw(width, height, raw)
            .ok_or_else(|| AnnotateError::Render("overlay buffer size mismatch".to_string()))
    }

    fn composite_blocking(&self, input: &Path, overlay: &str, output: &Path) -> AnnotateResult<()> {
        let mut base = image::open(input)
            .map_err(|e| AnnotateError::image_io(input, e))?
            .to_rgba8();
        let (width, height) = base.dimensions();

        let layer = self.rasterize(overlay, width, height)?;
        imageops::overlay(&mut base, &layer, 0, 0);

        let format = OutputFormat::from_path(output);
        let bytes = encode_image(&base, format, self.jpeg_quality).map_err(|e| AnnotateError::image_io(output, e))?;
        write_atomic(output, &bytes)?;

        debug!(
            "Composited {}x{} overlay onto {} -> {} ({} bytes, {})",
            width,
            height,
            input.display(),
            output.display(),
            bytes.len(),
            format.as_str()
        );
        Ok(())
    }
}

/// First family in a CSS font stack, unquoted
fn primary_font(stack: &str) -> String {
    stack
        .split(',')
        .map(|s| s.trim().trim_matches(|c| c == '"' || c == '\''))
        .find(|s| !s.is_empty())
        .unwrap_or("sans-serif")
        .to_string()
}

/// Writes to a temp file beside `output`, then renames it into place
fn write_atomic(output: &Path, bytes: &[u8]) -> AnnotateResult<()> {
    let dir = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut file = tempfile::Builder::new()
        .prefix(".annotate-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| AnnotateError::image_io(output, e))?;
    file.write_all(bytes)
        .and_then(|_| file.flush())
        .map_err(|e| AnnotateError::image_io(output, e))?;
    file.persist(output)
        .map_err(|e| AnnotateError::image_io(output, e.error))?;
    Ok(())
}

fn read_metadata(path: &Path) -> AnnotateResult<ImageMetadata> {
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| AnnotateError::image_io(path, e))?;
    let format = reader
        .format()
        .map(|f| format!("{:?}", f).to_ascii_lowercase())
        .unwrap_or_else(|| "unknown".to_string());
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| AnnotateError::image_io(path, e))?;

    Ok(ImageMetadata { width, height, format })
}

fn join_error(e: tokio::task::JoinError) -> AnnotateError {
    AnnotateError::Render(format!("compositing task failed: {}", e))
}

#[async_trait]
impl ImageCompositor for ResvgCompositor {
    async fn metadata(&self, path: &Path) -> AnnotateResult<ImageMetadata> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || read_metadata(&path))
            .await
            .map_err(join_error)?
    }

    async fn composite(&self, input: &Path, overlay: &str, output: &Path) -> AnnotateResult<()> {
        let this = self.clone();
        let (input, output): (PathBuf, PathBuf) = (input.to_path_buf(), output.to_path_buf());
        let overlay = overlay.to_string();
        tokio::task::spawn_blocking(move || this.composite_blocking(&input, &overlay, &output))
            .await
            .map_err(join_error)?
    }
}
