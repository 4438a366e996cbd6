//! Image-to-image operations
//!
//! [`UnaryOp`] is the common shape of a neighborhood filter: one source
//! image in, one destination slot out. The slot is reused across calls when
//! its layout already matches, so a loop over frames allocates only once.

use crate::convolve::Convolution;
use crate::{FilterError, FilterResult};
use pixplane_core::AnyImage;

/// An operation producing one image from one source image
pub trait UnaryOp {
    /// Run the operation, (re)allocating `dst` as needed.
    fn apply(&mut self, src: &AnyImage, dst: &mut Option<AnyImage>) -> FilterResult<()>;

    /// Run the operation into a fresh destination.
    fn apply_new(&mut self, src: &AnyImage) -> FilterResult<AnyImage> {
        let mut dst = None;
        self.apply(src, &mut dst)?;
        dst.ok_or(FilterError::NoOutput)
    }
}

impl UnaryOp for Convolution<'_> {
    fn apply(&mut self, src: &AnyImage, dst: &mut Option<AnyImage>) -> FilterResult<()> {
        Convolution::apply(self, src, dst).map(|_| ())
    }
}
