//! pixplane-core - Planar multi-channel image buffers
//!
//! This crate provides the buffer, ownership and ROI layer that filters and
//! I/O code build on:
//!
//! - [`ChannelBlock`] - One plane of samples; owned, shared or borrowed
//! - [`Image<T>`] - Typed image made of channel blocks of sample type `T`
//! - [`AnyImage`] - Depth-erased handle over the five supported sample types
//! - [`RoiIter`] / [`RoiRows`] - Row-major traversal of a region of interest
//! - [`Point`] / [`Size`] / [`Rect`] - Geometry value types
//!
//! # Depths
//!
//! | [`Depth`] | sample type |
//! |---|---|
//! | `U8` | `u8` |
//! | `I16` | `i16` |
//! | `I32` | `i32` |
//! | `F32` | `f32` |
//! | `F64` | `f64` |
//!
//! # Threading
//!
//! Channel sharing uses non-atomic reference counts, so images are neither
//! `Send` nor `Sync`.

pub mod channel;
pub mod depth;
pub mod error;
pub mod format;
pub mod geom;
pub mod handle;
pub mod image;
pub mod roi;

pub use channel::{ChannelBlock, ChannelMut, ChannelRef, Ownership};
pub use depth::{Depth, Sample, clipped_cast};
pub use error::{Error, Result};
pub use format::Format;
pub use geom::{Point, Rect, Size};
pub use handle::{
    AnyImage, ImageSpec, ImageVisitor, ImageVisitorMut, ensure_compatible,
    ensure_compatible_with, make,
};
pub use image::Image;
pub use roi::{ChannelView, ChannelViewMut, Positioned, RoiIter, RoiIterMut, RoiRows, RoiRowsMut};
