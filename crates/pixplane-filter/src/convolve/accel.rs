//! Accelerated specializations for 3x3 and 5x5 masks
//!
//! Row-based: for every output line the `K` source lines under the mask are
//! sliced once, and the mask is unrolled at compile time through a const
//! generic. Integer results match the portable path exactly; float results
//! accumulate in `f32` and may differ in the last bits.

use super::registry::{Backend, Registry, Specialization};
use super::{ChannelPass, drive, portable, scale_int};
use crate::kernel::{Kernel, KernelType};
use crate::{FilterError, FilterResult};
use pixplane_core::{AnyImage, ChannelView, ChannelViewMut, Depth, Rect, Sample, Size};

fn small_square_mask(mask: Size) -> bool {
    mask == Size::new(3, 3) || mask == Size::new(5, 5)
}

/// Add the accelerated entries to `registry`.
pub(crate) fn register(registry: &mut Registry) {
    let entries = [
        (
            Depth::U8,
            KernelType::Int,
            Specialization::new("accel-int-u8", convolve_int::<u8>),
        ),
        (
            Depth::I16,
            KernelType::Int,
            Specialization::new("accel-int-i16", convolve_int::<i16>),
        ),
        (
            Depth::F32,
            KernelType::Float,
            Specialization::new("accel-float-f32", convolve_float::<f32>),
        ),
    ];
    for (depth, kernel, spec) in entries {
        registry.register(
            depth,
            kernel,
            Backend::Accelerated,
            spec.with_masks(small_square_mask),
        );
    }
}

#[inline(always)]
fn mla(acc: f32, a: f32, b: f32) -> f32 {
    #[cfg(target_feature = "fma")]
    {
        use num_traits::MulAdd;
        MulAdd::mul_add(a, b, acc)
    }
    #[cfg(not(target_feature = "fma"))]
    {
        acc + a * b
    }
}

/// Slice the `K` source lines under the mask for output line `line`.
#[inline]
fn source_lines<'a, S, const K: usize>(
    samples: &'a [S],
    width: usize,
    centers: Rect,
    line: usize,
) -> [&'a [S]; K] {
    let top = centers.y as usize + line - K / 2;
    let left = centers.x as usize - K / 2;
    let span = centers.width as usize + K - 1;
    std::array::from_fn(|j| {
        let start = (top + j) * width + left;
        &samples[start..start + span]
    })
}

struct IntRows<const K: usize> {
    weights: [[i128; K]; K],
    factor: i128,
}

impl<const K: usize> IntRows<K> {
    fn new(values: &[i32], factor: i32) -> Self {
        Self {
            weights: std::array::from_fn(|j| {
                std::array::from_fn(|i| i128::from(values[j * K + i]))
            }),
            factor: i128::from(factor),
        }
    }
}

impl<S: Sample + Into<i64>, const K: usize> ChannelPass<S> for IntRows<K> {
    fn run<D: Sample>(
        &self,
        src: &ChannelView<'_, S>,
        centers: Rect,
        out: &mut ChannelViewMut<'_, D>,
    ) {
        let samples = src.samples();
        let width = src.size().width as usize;
        for (line, out_row) in out.rows_mut().enumerate() {
            let lines: [&[S]; K] = source_lines(samples, width, centers, line);
            for (i, d) in out_row.iter_mut().enumerate() {
                let mut acc = 0i128;
                for (row, weights) in lines.iter().zip(&self.weights) {
                    for (&s, &w) in row[i..i + K].iter().zip(weights) {
                        acc += i128::from(Into::<i64>::into(s)) * w;
                    }
                }
                *d = D::clip_from_i64(scale_int(acc, self.factor));
            }
        }
    }
}

struct FloatRows<const K: usize> {
    weights: [[f32; K]; K],
}

impl<const K: usize> FloatRows<K> {
    fn new(values: &[f32]) -> Self {
        Self {
            weights: std::array::from_fn(|j| std::array::from_fn(|i| values[j * K + i])),
        }
    }
}

impl<S: Sample + Into<f32>, const K: usize> ChannelPass<S> for FloatRows<K> {
    fn run<D: Sample>(
        &self,
        src: &ChannelView<'_, S>,
        centers: Rect,
        out: &mut ChannelViewMut<'_, D>,
    ) {
        let samples = src.samples();
        let width = src.size().width as usize;
        for (line, out_row) in out.rows_mut().enumerate() {
            let lines: [&[S]; K] = source_lines(samples, width, centers, line);
            for (i, d) in out_row.iter_mut().enumerate() {
                let mut acc = 0f32;
                for (row, weights) in lines.iter().zip(&self.weights) {
                    for (&s, &w) in row[i..i + K].iter().zip(weights) {
                        acc = mla(acc, s.into(), w);
                    }
                }
                *d = D::clip_from_f64(f64::from(acc));
            }
        }
    }
}

fn convolve_int<S: Sample + Into<i64>>(
    src: &AnyImage,
    kernel: &Kernel,
    dst: &mut AnyImage,
) -> FilterResult<()> {
    let (values, factor) = kernel.int_values().ok_or_else(|| {
        FilterError::InvalidKernel("integer specialization called with a float kernel".into())
    })?;
    let mask = kernel.size();
    match (mask.width, mask.height) {
        (3, 3) => drive::<S, _>(src, mask, dst, &IntRows::<3>::new(values, factor)),
        (5, 5) => drive::<S, _>(src, mask, dst, &IntRows::<5>::new(values, factor)),
        _ => portable::convolve_int::<S>(src, kernel, dst),
    }
}

fn convolve_float<S: Sample + Into<f32>>(
    src: &AnyImage,
    kernel: &Kernel,
    dst: &mut AnyImage,
) -> FilterResult<()> {
    let values = kernel.float_values().ok_or_else(|| {
        FilterError::InvalidKernel("float specialization called with an integer kernel".into())
    })?;
    let mask = kernel.size();
    match (mask.width, mask.height) {
        (3, 3) => drive::<S, _>(src, mask, dst, &FloatRows::<3>::new(values)),
        (5, 5) => drive::<S, _>(src, mask, dst, &FloatRows::<5>::new(values)),
        _ => portable::convolve_float::<S>(src, kernel, dst),
    }
}
