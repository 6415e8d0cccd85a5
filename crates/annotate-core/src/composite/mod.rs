//! Compositing: orchestration, the compositor seam and its implementations
//!
//! - [`Annotator`]: validates a request, builds the overlay and composites it
//! - [`ImageCompositor`]: metadata + composite capability
//! - [`ResvgCompositor`]: `resvg` + `image` implementation
//! - [`mock::MockCompositor`]: test double
//! - [`builders`]: step guides, highlighted areas, callouts, blur regions

pub mod annotator;
pub mod builders;
pub mod mock;
pub mod resvg_compositor;
pub mod traits;

pub use annotator::Annotator;
pub use resvg_compositor::ResvgCompositor;
pub use traits::ImageCompositor;
