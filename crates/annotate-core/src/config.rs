//! Centralized defaults and runtime configuration.
//!
//! All values can be overridden at runtime via environment variables:
//!
//! | Environment Variable | Default | Description |
//! |---------------------|---------|-------------|
//! | `ANNOTATE_DEFAULT_THEME` | `default` | Theme applied when a request names none |
//! | `ANNOTATE_FONT_FAMILY` | `Arial, Helvetica, sans-serif` | Font stack for text |
//! | `ANNOTATE_OUTPUT_SUFFIX` | `-annotated` | Suffix for derived output file names |
//! | `ANNOTATE_MAX_ANNOTATIONS` | 500 | Upper bound on annotations per request |
//! | `ANNOTATE_JPEG_QUALITY` | 90 | Quality for JPEG output (1-100) |
//!
//! Invalid or empty values fall back to the defaults.

use std::path::{Path, PathBuf};

/// Theme applied when a request does not name one.
pub const DEFAULT_THEME: &str = "default";

/// Font stack written into every text element.
pub const DEFAULT_FONT_FAMILY: &str = "Arial, Helvetica, sans-serif";

/// Suffix inserted before the extension when no output path is given.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "-annotated";

/// Maximum number of annotations accepted in a single request.
pub const MAX_ANNOTATIONS: usize = 500;

/// JPEG encoder quality for annotated output.
pub const JPEG_QUALITY: u8 = 90;

fn string_from_env(env_var: &str, default: &str) -> String {
    std::env::var(env_var)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_from_env<T: std::str::FromStr>(env_var: &str, default: T) -> T {
    std::env::var(env_var)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// Get the default theme name, checking `ANNOTATE_DEFAULT_THEME`.
pub fn default_theme() -> String {
    string_from_env("ANNOTATE_DEFAULT_THEME", DEFAULT_THEME)
}

/// Get the font stack, checking `ANNOTATE_FONT_FAMILY`.
pub fn font_family() -> String {
    string_from_env("ANNOTATE_FONT_FAMILY", DEFAULT_FONT_FAMILY)
}

/// Get the output file suffix, checking `ANNOTATE_OUTPUT_SUFFIX`.
pub fn output_suffix() -> String {
    string_from_env("ANNOTATE_OUTPUT_SUFFIX", DEFAULT_OUTPUT_SUFFIX)
}

/// Get the annotation limit, checking `ANNOTATE_MAX_ANNOTATIONS`.
pub fn max_annotations() -> usize {
    match parse_from_env("ANNOTATE_MAX_ANNOTATIONS", MAX_ANNOTATIONS) {
        0 => MAX_ANNOTATIONS,
        n => n,
    }
}

/// Get the JPEG quality, checking `ANNOTATE_JPEG_QUALITY`.
pub fn jpeg_quality() -> u8 {
    parse_from_env::<u32>("ANNOTATE_JPEG_QUALITY", u32::from(JPEG_QUALITY)).clamp(1, 100) as u8
}

/// Rendering and output settings shared by the orchestrator and binaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Theme used when a request omits one
    pub default_theme:   String,
    /// Font stack for all text elements
    pub font_family:     String,
    /// Suffix for derived output paths
    pub output_suffix:   String,
    /// Upper bound on annotations per request
    pub max_annotations: usize,
    /// JPEG encoder quality
    pub jpeg_quality:    u8,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            default_theme:   DEFAULT_THEME.to_string(),
            font_family:     DEFAULT_FONT_FAMILY.to_string(),
            output_suffix:   DEFAULT_OUTPUT_SUFFIX.to_string(),
            max_annotations: MAX_ANNOTATIONS,
            jpeg_quality:    JPEG_QUALITY,
        }
    }
}

impl RenderConfig {
    /// Builds a config from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            default_theme:   default_theme(),
            font_family:     font_family(),
            output_suffix:   output_suffix(),
            max_annotations: max_annotations(),
            jpeg_quality:    jpeg_quality(),
        }
    }

    /// Derives `<dir>/<stem><suffix>.<ext>` for an input path.
    ///
    /// Inputs without an extension get `.png`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    ///
    /// use annotate_core::config::RenderConfig;
    ///
    /// let config = RenderConfig::default();
    /// let out = config.derive_output_path(Path::new("/shots/login.jpg"));
    /// assert_eq!(out, Path::new("/shots/login-annotated.jpg"));
    /// ```
    pub fn derive_output_path(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "screenshot".to_string());
        let ext = input
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| "png".to_string());
        input.with_file_name(format!("{}{}.{}", stem, self.output_suffix, ext))
    }
}
