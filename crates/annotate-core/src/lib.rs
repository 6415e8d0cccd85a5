//! annotate-core: screenshot annotation library
//!
//! Compiles declarative annotation lists (markers, arrows, callouts, shapes,
//! labels, blur masks) into a layered SVG overlay and composites it onto a
//! raster screenshot.

pub mod composite;
pub mod config;
pub mod error;
pub mod model;
pub mod render;
pub mod util;
