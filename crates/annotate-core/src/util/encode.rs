//! Output encoding for annotated images
//!
//! The output format follows the output path's extension. Handles the
//! format-specific requirements: JPEG has no alpha channel, and WebP is
//! lossless only in image crate v0.25.
//!
//! # Examples
//!
//! ```
//! use std::path::Path;
//!
//! use annotate_core::util::encode::{OutputFormat, encode_image};
//! use image::RgbaImage;
//!
//! let img = RgbaImage::from_pixel(16, 16, image::Rgba([255, 0, 0, 255]));
//! let format = OutputFormat::from_path(Path::new("out.png"));
//! let bytes = encode_image(&img, format, 90).unwrap();
//! assert_eq!(&bytes[1..4], b"PNG");
//! ```

use std::{io::Cursor, path::Path};

use image::{
    ImageEncoder, ImageResult, RgbaImage,
    codecs::{
        jpeg::JpegEncoder,
        png::{CompressionType, FilterType, PngEncoder},
        webp::WebPEncoder,
    },
};

/// Encoded output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
    Webp,
}

impl OutputFormat {
    /// Picks the format from a path's extension (case-insensitive)
    ///
    /// Missing or unrecognized extensions fall back to PNG.
    pub fn from_path(path: &Path) -> OutputFormat {
        match path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .as_deref()
        {
            Some("jpg" | "jpeg") => OutputFormat::Jpeg,
            Some("webp") => OutputFormat::Webp,
            _ => OutputFormat::Png,
        }
    }

    /// Lowercase format name
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Webp => "webp",
        }
    }

    /// MIME type for MCP image content
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Webp => "image/webp",
        }
    }
}

/// Encodes an image as PNG with adaptive filtering
pub fn encode_png(image: &RgbaImage) -> ImageResult<Vec<u8>> {
    let mut output = Vec::new();
    let encoder = PngEncoder::new_with_quality(
        Cursor::new(&mut output),
        CompressionType::Default,
        FilterType::Adaptive,
    );
    let (width, height) = image.dimensions();
    encoder.write_image(image.as_raw(), width, height, image::ExtendedColorType::Rgba8)?;
    Ok(output)
}

/// Encodes an image as JPEG with the given quality
///
/// JPEG doesn't support alpha, so the image is flattened to RGB first.
pub fn encode_jpeg(image: &RgbaImage, quality: u8) -> ImageResult<Vec<u8>> {
    let quality = quality.clamp(1, 100);
    let mut output = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut output), quality);

    let rgb = image::DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let (width, height) = rgb.dimensions();
    encoder.write_image(rgb.as_raw(), width, height, image::ExtendedColorType::Rgb8)?;
    Ok(output)
}

/// Encodes an image as lossless WebP
pub fn encode_webp(image: &RgbaImage) -> ImageResult<Vec<u8>> {
    let mut output = Vec::new();
    let encoder = WebPEncoder::new_lossless(Cursor::new(&mut output));
    let (width, height) = image.dimensions();
    encoder.write_image(image.as_raw(), width, height, image::ExtendedColorType::Rgba8)?;
    Ok(output)
}

/// Encodes `image` in `format`; `jpeg_quality` only affects JPEG
pub fn encode_image(image: &RgbaImage, format: OutputFormat, jpeg_quality: u8) -> ImageResult<Vec<u8>> {
    match format {
        OutputFormat::Png => encode_png(image),
        OutputFormat::Jpeg => encode_jpeg(image, jpeg_quality),
        OutputFormat::Webp => encode_webp(image),
    }
}

#[cfg(test)]
mod tests {
    use image::{GenericImageView, Rgba};

    use super::*;

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 128, 200])
        })
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("a.png")), OutputFormat::Png);
        assert_eq!(OutputFormat::from_path(Path::new("a.JPG")), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_path(Path::new("a.jpeg")), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_path(Path::new("a.webp")), OutputFormat::Webp);
        assert_eq!(OutputFormat::from_path(Path::new("a.bmp")), OutputFormat::Png);
        assert_eq!(OutputFormat::from_path(Path::new("noext")), OutputFormat::Png);
    }

    #[test]
    fn test_encode_png_signature() {
        let bytes = encode_png(&gradient(64, 64)).unwrap();
        assert_eq!(&bytes[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }

    #[test]
    fn test_encode_jpeg_drops_alpha() {
        let bytes = encode_jpeg(&gradient(64, 48), 80).unwrap();
        // JPEG SOI marker
        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (64, 48));
        assert!(!decoded.color().has_alpha());
    }

    #[test]
    fn test_encode_jpeg_quality_affects_size() {
        let img = gradient(256, 256);
        let low = encode_jpeg(&img, 20).unwrap();
        let high = encode_jpeg(&img, 95).unwrap();
        assert!(high.len() > low.len());
    }

    #[test]
    fn test_encode_webp_roundtrip_dimensions() {
        let bytes = encode_webp(&gradient(32, 16)).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WEBP");
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (32, 16));
    }

    #[test]
    fn test_encode_image_dispatch() {
        let img = gradient(8, 8);
        assert_eq!(&encode_image(&img, OutputFormat::Png, 90).unwrap()[1..4], b"PNG");
        assert_eq!(&encode_image(&img, OutputFormat::Jpeg, 90).unwrap()[0..2], &[0xFF, 0xD8]);
        assert_eq!(&encode_image(&img, OutputFormat::Webp, 90).unwrap()[0..4], b"RIFF");
    }
}
