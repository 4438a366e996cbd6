//! Portable specializations
//!
//! One loop for every depth: walk the output window centers with a ROI
//! iterator, take a mask-sized window around each center and form the dot
//! product with the kernel. Integer kernels accumulate in `i128` and divide
//! by the factor (truncating); float kernels accumulate in `f64`.

use super::{ChannelPass, drive, scale_int};
use crate::kernel::Kernel;
use crate::{FilterError, FilterResult};
use pixplane_core::{AnyImage, ChannelView, ChannelViewMut, Rect, Sample, Size};

struct IntPass<'k> {
    values: &'k [i32],
    factor: i128,
    mask: Size,
}

impl<S: Sample> ChannelPass<S> for IntPass<'_> {
    fn run<D: Sample>(
        &self,
        src: &ChannelView<'_, S>,
        centers: Rect,
        out: &mut ChannelViewMut<'_, D>,
    ) {
        let parent = src.iter();
        let positions = src.iter_rect(centers).with_positions();
        for ((center, _), d) in positions.zip(out.iter_mut()) {
            let acc: i128 = parent
                .window(center, self.mask)
                .map(|s| i128::from(s.to_i64().unwrap_or_default()))
                .zip(self.values)
                .map(|(s, &k)| s * i128::from(k))
                .sum();
            *d = D::clip_from_i64(scale_int(acc, self.factor));
        }
    }
}

struct FloatPass<'k> {
    values: &'k [f32],
    mask: Size,
}

impl<S: Sample> ChannelPass<S> for FloatPass<'_> {
    fn run<D: Sample>(
        &self,
        src: &ChannelView<'_, S>,
        centers: Rect,
        out: &mut ChannelViewMut<'_, D>,
    ) {
        let parent = src.iter();
        let positions = src.iter_rect(centers).with_positions();
        for ((center, _), d) in positions.zip(out.iter_mut()) {
            let acc: f64 = parent
                .window(center, self.mask)
                .zip(self.values)
                .map(|(s, &k)| s.to_f64_lossy() * f64::from(k))
                .sum();
            *d = D::clip_from_f64(acc);
        }
    }
}

/// Integer-kernel convolution for sources of sample type `S`.
pub(crate) fn convolve_int<S: Sample>(
    src: &AnyImage,
    kernel: &Kernel,
    dst: &mut AnyImage,
) -> FilterResult<()> {
    let (values, factor) = kernel.int_values().ok_or_else(|| {
        FilterError::InvalidKernel("integer specialization called with a float kernel".into())
    })?;
    let pass = IntPass {
        values,
        factor: i128::from(factor),
        mask: kernel.size(),
    };
    drive::<S, _>(src, kernel.size(), dst, &pass)
}

/// Float-kernel convolution for sources of sample type `S`.
pub(crate) fn convolve_float<S: Sample>(
    src: &AnyImage,
    kernel: &Kernel,
    dst: &mut AnyImage,
) -> FilterResult<()> {
    let values = kernel.float_values().ok_or_else(|| {
        FilterError::InvalidKernel("float specialization called with an integer kernel".into())
    })?;
    let pass = FloatPass {
        values,
        mask: kernel.size(),
    };
    drive::<S, _>(src, kernel.size(), dst, &pass)
}
