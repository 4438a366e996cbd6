//! pixplane - Planar multi-channel images for Rust
//!
//! # Overview
//!
//! - Channel planes that are owned, shared between images copy-on-write, or
//!   borrowed from caller memory
//! - Typed images over `u8`, `i16`, `i32`, `f32` and `f64` samples, plus a
//!   depth-erased handle for code that picks the depth at run time
//! - Region-of-interest iteration
//! - Convolution with depth-specialized, optionally accelerated backends
//!
//! # Example
//!
//! ```
//! use pixplane::{Depth, Format, Size, make};
//! use pixplane::filter::box_blur;
//!
//! let mut img = make(Depth::U8, Size::new(64, 48), Format::Gray, None, None).unwrap();
//! img.as_image_mut::<u8>().unwrap().fill(128).unwrap();
//!
//! let blurred = box_blur(&img, 2).unwrap();
//! assert_eq!(blurred.size(), Size::new(60, 44));
//! ```

// Re-export core types (primary data structures used everywhere)
pub use pixplane_core::*;

// Filters live in their own module to keep their error type apart
pub use pixplane_filter as filter;
