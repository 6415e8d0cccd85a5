//! Source images and sample annotation lists

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use serde_json::{Value, json};
use tempfile::TempDir;

/// Background color of every fixture image
pub const FIXTURE_BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// A temp directory holding one solid-white source image
///
/// The directory (and everything written into it) is removed on drop.
pub struct FixtureImage {
    dir:  TempDir,
    path: PathBuf,
}

impl FixtureImage {
    /// Writes a `width` x `height` white PNG named `source.png`
    pub fn png(width: u32, height: u32) -> Self {
        Self::with_name("source.png", width, height)
    }

    /// Writes a white image whose format follows `name`'s extension
    pub fn with_name(name: &str, width: u32, height: u32) -> Self {
        let dir = TempDir::new().expect("create fixture dir");
        let path = write_solid_image(dir.path(), name, width, height);
        Self { dir, path }
    }

    /// Path of the source image
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fixture directory
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// A path inside the fixture directory (not created)
    pub fn output(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// Saves a solid white image into `dir`; JPEG files drop the alpha channel
pub fn write_solid_image(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    let img = RgbaImage::from_pixel(width, height, FIXTURE_BACKGROUND);
    let is_jpeg = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"));
    if is_jpeg {
        image::DynamicImage::ImageRgba8(img)
            .to_rgb8()
            .save(&path)
            .expect("write fixture jpeg");
    } else {
        img.save(&path).expect("write fixture image");
    }
    path
}

/// One annotation of every canonical kind, positioned inside a 400x300
/// canvas
pub fn every_kind() -> Value {
    json!([
        {"type": "highlight", "x": 10, "y": 10, "width": 120, "height": 40},
        {"type": "blur", "x": 250, "y": 200, "width": 100, "height": 30, "radius": 6},
        {"type": "rect", "x": 20, "y": 80, "width": 100, "height": 60, "cornerRadius": 6},
        {"type": "circle", "x": 200, "y": 110, "radius": 30, "dashed": true},
        {"type": "connector", "from": [60, 160], "to": [200, 160]},
        {"type": "arrow", "from": [300, 40], "to": [220, 90]},
        {"type": "curved-arrow", "from": [40, 260], "to": [160, 220], "curve": 30},
        {"type": "marker", "x": 30, "y": 30, "number": 1},
        {"type": "marker", "x": 70, "y": 30, "number": 12, "style": "badge"},
        {"type": "callout", "x": 330, "y": 150, "text": "Click here\nthen wait", "pointer": "bottom"},
        {"type": "label", "x": 20, "y": 180, "text": "Settings <beta>", "background": "blue", "color": "white"},
        {"type": "icon", "x": 370, "y": 30, "icon": "check"}
    ])
}

/// Three annotations, the middle one with an unknown type
pub fn with_unknown_type() -> Value {
    json!([
        {"type": "circle", "x": 20, "y": 20, "radius": 10},
        {"type": "sparkle", "x": 1, "y": 1},
        {"type": "rect", "x": 40, "y": 40, "width": 20, "height": 20}
    ])
}

/// A single circle centered on a 100x100 canvas
pub fn single_circle() -> Value {
    json!([{"type": "circle", "x": 50, "y": 50, "radius": 20, "color": "red"}])
}
