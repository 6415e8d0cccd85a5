//! Annotation-to-SVG compiler
//!
//! - [`color`]: palette lookup and color helpers
//! - [`theme`]: per-kind theme defaults
//! - [`markup`]: fragments, id allocation, escaping
//! - [`shapes`]: one compiler per annotation kind
//! - [`document`]: assembles fragments into a sized `<svg>` overlay

pub mod color;
pub mod document;
pub mod markup;
pub mod shapes;
pub mod theme;

pub use document::{DocumentBuilder, SvgDocument, build_document};
pub use markup::{Fragment, RenderContext};
pub use theme::{THEME_NAMES, Theme, merge_with_theme};
