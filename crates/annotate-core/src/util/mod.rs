//! Utility modules
//!
//! - [`encode`]: PNG, JPEG and WebP output encoding

pub mod encode;
