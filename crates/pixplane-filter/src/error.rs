//! Error types for pixplane-filter

use crate::kernel::KernelType;
use pixplane_core::{Depth, Rect, Size};
use thiserror::Error;

/// Errors that can occur during filtering operations
#[derive(Debug, Error)]
pub enum FilterError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] pixplane_core::Error),

    /// The kernel mask does not fit inside the source ROI
    #[error("kernel of size {kernel} does not fit in ROI {roi}")]
    KernelTooLarge { kernel: Size, roi: Rect },

    /// No registered implementation handles this source depth
    #[error("no convolution specialization for {depth} images with a {kernel} kernel")]
    UnsupportedKernelSpecialization { depth: Depth, kernel: KernelType },

    /// `apply` was called before a kernel was set
    #[error("filter has no kernel configured")]
    NotConfigured,

    /// Invalid kernel
    #[error("invalid kernel: {0}")]
    InvalidKernel(String),

    /// An operation finished without producing an output image
    #[error("operation produced no output image")]
    NoOutput,
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
