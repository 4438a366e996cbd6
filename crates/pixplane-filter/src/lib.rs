//! pixplane-filter - Convolution over pixplane images
//!
//! This crate provides:
//!
//! - Integer and float convolution kernels, plus Sobel, Gauss and Laplace
//!   presets
//! - A convolution engine that picks a specialization per source depth
//!   from a registry of portable and accelerated implementations
//! - Box and Gaussian blur helpers
//! - The [`UnaryOp`] trait shared by image-to-image filters

pub mod convolve;
mod error;
pub mod kernel;
pub mod op;

pub use error::{FilterError, FilterResult};
pub use kernel::{Kernel, KernelPreset, KernelType};
pub use op::UnaryOp;

// Re-export commonly used items
pub use convolve::{
    Backend, BackendPreference, Convolution, ConvolutionOptions, ConvolveFn, Registry,
    Resolution, Specialization, box_blur, convolve, convolve_with, gaussian_blur, output_rect,
};
