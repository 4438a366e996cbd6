//! Error types for pixplane-core
//!
//! Every operation on channel blocks, typed images and depth-erased
//! handles reports failure through [`Error`]. Nothing in this crate
//! recovers from these conditions locally; they always reach the caller.

use crate::depth::Depth;
use crate::geom::{Rect, Size};
use thiserror::Error;

/// pixplane-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// ROI rectangle is not contained in the image bounds
    #[error("invalid ROI {roi} for image of size {size}")]
    InvalidRoi { roi: Rect, size: Size },

    /// A depth-erased handle was downcast to a pixel type it does not hold
    #[error("type mismatch: requested {expected} image, handle holds {actual}")]
    TypeMismatch { expected: Depth, actual: Depth },

    /// Channel block allocation failed
    #[error("out of memory allocating {bytes} bytes")]
    OutOfMemory { bytes: usize },

    /// Channel index out of range
    #[error("channel index out of bounds: {index} >= {len}")]
    ChannelIndex { index: usize, len: usize },

    /// Exclusive write requested on a channel that is still aliased
    #[error("channel {index} is shared with another image; detach it before writing")]
    SharedChannel { index: usize },

    /// Two images (or an image and a buffer) disagree in size
    #[error("size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: Size, actual: Size },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for pixplane-core operations
pub type Result<T> = std::result::Result<T, Error>;
