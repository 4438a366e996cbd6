//! Convolution engine
//!
//! [`Convolution`] holds a kernel and a [`Registry`] of specializations and
//! applies the kernel to images of any depth.
//!
//! # Output geometry
//!
//! The mask must fit completely at every output pixel, so the output covers
//! the source ROI minus a `width / 2` x `height / 2` border (for odd masks
//! the same amount on every side). See [`output_rect`].
//!
//! # Specialization selection
//!
//! For an integer source depth an integer-kernel specialization is tried
//! first and a float one second; for a float source depth the order is
//! reversed. A kernel type is only a candidate if the configured kernel can
//! be expressed in it: integer kernels always have a float form (values
//! divided by the factor and rounded to `f32`), float kernels only have an
//! integer form when all values are integral. Within a kernel type an accelerated entry that
//! handles the mask size wins over the portable one unless
//! [`BackendPreference::Portable`] is set.
//!
//! # Kernel ownership
//!
//! [`Convolution::set_kernel`] takes the kernel by value. The unbuffered
//! setters borrow caller-owned [`Cell`] slices instead and read them at
//! every [`apply`](Convolution::apply), so changes the caller makes between
//! calls are picked up. The engine never writes to them.
//!
//! # Examples
//!
//! ```
//! use pixplane_core::{Depth, Format, Size, make};
//! use pixplane_filter::{Convolution, Kernel};
//!
//! let mut src = make(Depth::U8, Size::new(5, 5), Format::Gray, None, None).unwrap();
//! src.as_image_mut::<u8>().unwrap().fill(100).unwrap();
//!
//! let engine = Convolution::new().with_kernel(Kernel::box_kernel(3).unwrap());
//! let mut dst = None;
//! engine.apply(&src, &mut dst).unwrap();
//!
//! let dst = dst.unwrap();
//! assert_eq!(dst.size(), Size::new(3, 3));
//! assert_eq!(dst.as_image::<u8>().unwrap().pixel(1, 1, 0), Some(100));
//! ```

#[cfg(feature = "accel")]
mod accel;
mod options;
mod portable;
mod registry;

pub use options::{BackendPreference, ConvolutionOptions};
pub use registry::{Backend, ConvolveFn, Registry, Specialization};

use crate::kernel::{Kernel, KernelType, check_factor, check_shape};
use crate::{FilterError, FilterResult};
use log::debug;
use pixplane_core::{
    AnyImage, ChannelView, ChannelViewMut, Depth, Image, ImageSpec, ImageVisitorMut, Rect,
    Sample, Size, ensure_compatible_with,
};
use std::borrow::Cow;
use std::cell::Cell;

/// Rectangle of window centers for a mask applied to `roi`.
///
/// # Errors
///
/// Returns [`FilterError::KernelTooLarge`] if the mask is larger than the
/// ROI in either direction.
pub fn output_rect(roi: Rect, mask: Size) -> FilterResult<Rect> {
    if mask.is_empty() || mask.width > roi.width || mask.height > roi.height {
        return Err(FilterError::KernelTooLarge { kernel: mask, roi });
    }
    Ok(Rect::new(
        roi.x + mask.width / 2,
        roi.y + mask.height / 2,
        roi.width - mask.width + 1,
        roi.height - mask.height + 1,
    ))
}

/// The specialization chosen for a source depth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Source depth
    pub depth: Depth,
    /// Kernel element type the specialization runs with
    pub kernel_type: KernelType,
    /// Backend of the specialization
    pub backend: Backend,
    /// Registered name
    pub name: &'static str,
}

/// Per-channel body of a specialization
///
/// `centers` is the rectangle of window centers in source coordinates; it
/// has the same size as `out`'s ROI.
pub(crate) trait ChannelPass<S: Sample> {
    fn run<D: Sample>(
        &self,
        src: &ChannelView<'_, S>,
        centers: Rect,
        out: &mut ChannelViewMut<'_, D>,
    );
}

/// Divide an integer dot product by the kernel factor, truncating toward
/// zero and saturating to the `i64` range.
pub(crate) fn scale_int(acc: i128, factor: i128) -> i64 {
    let q = acc / factor;
    i64::try_from(q).unwrap_or(if q < 0 { i64::MIN } else { i64::MAX })
}

struct Driver<'a, S: Sample, P> {
    src: &'a Image<S>,
    centers: Rect,
    pass: &'a P,
}

impl<S: Sample, P: ChannelPass<S>> ImageVisitorMut for Driver<'_, S, P> {
    type Output = FilterResult<()>;

    fn visit_mut<D: Sample>(self, out: &mut Image<D>) -> FilterResult<()> {
        if out.roi().size() != self.centers.size() {
            return Err(pixplane_core::Error::SizeMismatch {
                expected: self.centers.size(),
                actual: out.roi().size(),
            }
            .into());
        }
        if out.channels() != self.src.channels() {
            return Err(pixplane_core::Error::InvalidParameter(format!(
                "destination has {} channels, source {}",
                out.channels(),
                self.src.channels()
            ))
            .into());
        }
        for ch in 0..self.src.channels() {
            let view = self.src.view(ch)?;
            let mut out_view = out.view_mut(ch)?;
            self.pass.run(&view, self.centers, &mut out_view);
        }
        Ok(())
    }
}

/// Run `pass` over every channel of `src`, writing into `dst`'s ROI.
pub(crate) fn drive<S: Sample, P: ChannelPass<S>>(
    src: &AnyImage,
    mask: Size,
    dst: &mut AnyImage,
    pass: &P,
) -> FilterResult<()> {
    let src = src.as_image::<S>()?;
    let centers = output_rect(src.roi(), mask)?;
    dst.visit_mut(Driver { src, centers, pass })
}

enum Unbuffered<'k> {
    Int {
        size: Size,
        values: &'k [Cell<i32>],
        factor: i32,
    },
    Float {
        size: Size,
        values: &'k [Cell<f32>],
    },
}

impl Unbuffered<'_> {
    fn snapshot(&self) -> FilterResult<Kernel> {
        match self {
            Unbuffered::Int {
                size,
                values,
                factor,
            } => {
                let values: Vec<i32> = values.iter().map(Cell::get).collect();
                Kernel::from_int(size.width, size.height, &values, *factor)
            }
            Unbuffered::Float { size, values } => {
                let values: Vec<f32> = values.iter().map(Cell::get).collect();
                Kernel::from_float(size.width, size.height, &values)
            }
        }
    }

    fn size(&self) -> Size {
        match self {
            Unbuffered::Int { size, .. } | Unbuffered::Float { size, .. } => *size,
        }
    }

    fn kernel_type(&self) -> KernelType {
        match self {
            Unbuffered::Int { .. } => KernelType::Int,
            Unbuffered::Float { .. } => KernelType::Float,
        }
    }
}

enum KernelSlot<'k> {
    Unconfigured,
    Buffered {
        kernel: Kernel,
        alternate: Option<Kernel>,
    },
    Unbuffered(Unbuffered<'k>),
}

/// The configured kernel plus its other-type form, if derivable
struct KernelSet<'a> {
    kernel: Cow<'a, Kernel>,
    alternate: Option<Cow<'a, Kernel>>,
}

impl KernelSet<'_> {
    fn get(&self, ty: KernelType) -> Option<&Kernel> {
        if self.kernel.kernel_type() == ty {
            Some(&*self.kernel)
        } else {
            self.alternate.as_deref()
        }
    }
}

/// Convolution engine
///
/// Starts unconfigured; [`apply`](Self::apply) fails with
/// [`FilterError::NotConfigured`] until a kernel is set. Once configured it
/// can be applied any number of times to images of any depth.
pub struct Convolution<'k> {
    kernel: KernelSlot<'k>,
    options: ConvolutionOptions,
    registry: Registry,
}

impl Default for Convolution<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'k> Convolution<'k> {
    /// Unconfigured engine with default options and the default registry.
    pub fn new() -> Self {
        Self {
            kernel: KernelSlot::Unconfigured,
            options: ConvolutionOptions::default(),
            registry: Registry::default(),
        }
    }

    /// Set a buffered kernel, builder style.
    pub fn with_kernel(mut self, kernel: Kernel) -> Self {
        self.set_kernel(kernel);
        self
    }

    /// Replace the options, builder style.
    pub fn with_options(mut self, options: ConvolutionOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the registry, builder style.
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Configure with a kernel the engine owns.
    ///
    /// The other-type form of the kernel is derived once here. Any
    /// previously configured kernel is released.
    pub fn set_kernel(&mut self, kernel: Kernel) {
        let alternate = kernel.alternate();
        debug!(
            "convolution kernel set: {} {} (alternate {})",
            kernel.size(),
            kernel.kernel_type(),
            if alternate.is_some() { "kept" } else { "none" }
        );
        self.kernel = KernelSlot::Buffered { kernel, alternate };
    }

    /// Configure with caller-owned integer values, read at every apply.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidKernel`] if `values` does not hold
    /// `width * height` entries or `factor` is zero. The engine is left
    /// unconfigured in that case.
    pub fn set_kernel_unbuffered_int(
        &mut self,
        width: u32,
        height: u32,
        values: &'k [Cell<i32>],
        factor: i32,
    ) -> FilterResult<()> {
        self.kernel = KernelSlot::Unconfigured;
        let size = Size::new(width, height);
        check_shape(size, values.len())?;
        check_factor(factor)?;
        debug!("convolution kernel set: {size} int, unbuffered");
        self.kernel = KernelSlot::Unbuffered(Unbuffered::Int {
            size,
            values,
            factor,
        });
        Ok(())
    }

    /// Configure with caller-owned float values, read at every apply.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidKernel`] if `values` does not hold
    /// `width * height` entries. The engine is left unconfigured in that
    /// case.
    pub fn set_kernel_unbuffered_float(
        &mut self,
        width: u32,
        height: u32,
        values: &'k [Cell<f32>],
    ) -> FilterResult<()> {
        self.kernel = KernelSlot::Unconfigured;
        let size = Size::new(width, height);
        check_shape(size, values.len())?;
        debug!("convolution kernel set: {size} float, unbuffered");
        self.kernel = KernelSlot::Unbuffered(Unbuffered::Float { size, values });
        Ok(())
    }

    /// Drop the kernel and return to the unconfigured state.
    pub fn clear_kernel(&mut self) {
        self.kernel = KernelSlot::Unconfigured;
    }

    /// Check if a kernel is set.
    pub fn is_configured(&self) -> bool {
        !matches!(self.kernel, KernelSlot::Unconfigured)
    }

    /// Element type of the configured kernel.
    pub fn kernel_type(&self) -> Option<KernelType> {
        match &self.kernel {
            KernelSlot::Unconfigured => None,
            KernelSlot::Buffered { kernel, .. } => Some(kernel.kernel_type()),
            KernelSlot::Unbuffered(k) => Some(k.kernel_type()),
        }
    }

    /// Mask size of the configured kernel.
    pub fn mask_size(&self) -> Option<Size> {
        match &self.kernel {
            KernelSlot::Unconfigured => None,
            KernelSlot::Buffered { kernel, .. } => Some(kernel.size()),
            KernelSlot::Unbuffered(k) => Some(k.size()),
        }
    }

    /// Current options.
    pub fn options(&self) -> &ConvolutionOptions {
        &self.options
    }

    /// Replace the options.
    pub fn set_options(&mut self, options: ConvolutionOptions) {
        self.options = options;
    }

    /// Registered specializations.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable access to the registry, e.g. to add specializations.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    fn kernels(&self) -> FilterResult<KernelSet<'_>> {
        match &self.kernel {
            KernelSlot::Unconfigured => Err(FilterError::NotConfigured),
            KernelSlot::Buffered { kernel, alternate } => Ok(KernelSet {
                kernel: Cow::Borrowed(kernel),
                alternate: alternate.as_ref().map(Cow::Borrowed),
            }),
            KernelSlot::Unbuffered(k) => {
                let kernel = k.snapshot()?;
                let alternate = kernel.alternate().map(Cow::Owned);
                Ok(KernelSet {
                    kernel: Cow::Owned(kernel),
                    alternate,
                })
            }
        }
    }

    fn select<'s>(
        &'s self,
        depth: Depth,
        kernels: &'s KernelSet<'_>,
    ) -> FilterResult<(Resolution, &'s Specialization, &'s Kernel)> {
        let order = if depth.is_integer() {
            [KernelType::Int, KernelType::Float]
        } else {
            [KernelType::Float, KernelType::Int]
        };
        let allow_accelerated = self.options.backend == BackendPreference::Auto;
        for ty in order {
            let Some(kernel) = kernels.get(ty) else {
                continue;
            };
            if let Some((backend, spec)) =
                self.registry
                    .find(depth, ty, kernel.size(), allow_accelerated)
            {
                let resolution = Resolution {
                    depth,
                    kernel_type: ty,
                    backend,
                    name: spec.name,
                };
                return Ok((resolution, spec, kernel));
            }
        }
        Err(FilterError::UnsupportedKernelSpecialization {
            depth,
            kernel: kernels.kernel.kernel_type(),
        })
    }

    /// The specialization [`apply`](Self::apply) would use for a source of
    /// the given depth.
    ///
    /// # Errors
    ///
    /// [`FilterError::NotConfigured`] without a kernel and
    /// [`FilterError::UnsupportedKernelSpecialization`] if no registered
    /// entry can handle the depth.
    pub fn resolve(&self, depth: Depth) -> FilterResult<Resolution> {
        let kernels = self.kernels()?;
        let (resolution, _, _) = self.select(depth, &kernels)?;
        Ok(resolution)
    }

    /// Convolve `src` into the image in `dst`.
    ///
    /// `dst` is (re)allocated through [`ensure_compatible_with`] only when
    /// its depth, size, channel count or format differ from what the output
    /// needs; otherwise its storage is reused. Aliased destination channels
    /// are detached before writing. Returns the specialization that ran.
    ///
    /// # Errors
    ///
    /// - [`FilterError::NotConfigured`] without a kernel
    /// - [`FilterError::KernelTooLarge`] if the mask exceeds the source ROI
    /// - [`FilterError::UnsupportedKernelSpecialization`] if nothing in the
    ///   registry handles the source depth
    pub fn apply(&self, src: &AnyImage, dst: &mut Option<AnyImage>) -> FilterResult<Resolution> {
        let kernels = self.kernels()?;
        let centers = output_rect(src.roi(), kernels.kernel.size())?;
        let (resolution, spec, kernel) = self.select(src.depth(), &kernels)?;

        let layout = if self.options.clip_to_roi {
            ImageSpec {
                depth: self.options.output_depth.unwrap_or(src.depth()),
                size: centers.size(),
                format: src.format(),
                channels: src.channels(),
                roi: Rect::from_size(centers.size()),
            }
        } else {
            ImageSpec {
                depth: self.options.output_depth.unwrap_or(src.depth()),
                size: src.size(),
                format: src.format(),
                channels: src.channels(),
                roi: centers,
            }
        };
        ensure_compatible_with(dst, &layout)?;
        let out = dst.as_mut().ok_or(FilterError::NoOutput)?;
        out.detach()?;

        debug!(
            "convolving {} {} ROI {} with {} {} kernel using {} ({})",
            src.size(),
            src.depth(),
            src.roi(),
            kernel.size(),
            resolution.kernel_type,
            resolution.name,
            resolution.backend
        );
        (spec.run)(src, kernel, out)?;
        Ok(resolution)
    }
}

/// Convolve with a kernel, returning a new image.
///
/// Uses default options with the backend taken from `PIXPLANE_BACKEND`.
pub fn convolve(src: &AnyImage, kernel: &Kernel) -> FilterResult<AnyImage> {
    convolve_with(src, kernel, ConvolutionOptions::from_env())
}

/// Convolve with a kernel and explicit options, returning a new image.
pub fn convolve_with(
    src: &AnyImage,
    kernel: &Kernel,
    options: ConvolutionOptions,
) -> FilterResult<AnyImage> {
    let engine = Convolution::new()
        .with_kernel(kernel.clone())
        .with_options(options);
    let mut dst = None;
    engine.apply(src, &mut dst)?;
    dst.ok_or(FilterError::NoOutput)
}

fn blur_side(radius: u32) -> FilterResult<u32> {
    radius
        .checked_mul(2)
        .and_then(|v| v.checked_add(1))
        .ok_or_else(|| FilterError::InvalidKernel(format!("blur radius {radius} too large")))
}

/// Apply box (average) blur with a `(2 * radius + 1)` square mask
pub fn box_blur(src: &AnyImage, radius: u32) -> FilterResult<AnyImage> {
    let kernel = Kernel::box_kernel(blur_side(radius)?)?;
    convolve(src, &kernel)
}

/// Apply Gaussian blur with a `(2 * radius + 1)` square mask
pub fn gaussian_blur(src: &AnyImage, radius: u32, sigma: f32) -> FilterResult<AnyImage> {
    let kernel = Kernel::gaussian(blur_side(radius)?, sigma)?;
    convolve(src, &kernel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KernelPreset;
    use pixplane_core::{Format, make};

    fn gray_u8(width: u32, height: u32, value: u8) -> AnyImage {
        let size = Size::new(width, height);
        let mut img = make(Depth::U8, size, Format::Gray, None, None).unwrap();
        img.as_image_mut::<u8>().unwrap().fill(value).unwrap();
        img
    }

    #[test]
    fn test_output_rect() {
        assert_eq!(
            output_rect(Rect::new(0, 0, 5, 5), Size::new(3, 3)).unwrap(),
            Rect::new(1, 1, 3, 3)
        );
        assert_eq!(
            output_rect(Rect::new(2, 1, 7, 4), Size::new(5, 1)).unwrap(),
            Rect::new(4, 1, 3, 4)
        );
        // mask exactly the ROI size leaves a single pixel
        assert_eq!(
            output_rect(Rect::new(0, 0, 3, 3), Size::new(3, 3)).unwrap(),
            Rect::new(1, 1, 1, 1)
        );
        assert!(matches!(
            output_rect(Rect::new(0, 0, 2, 9), Size::new(3, 3)),
            Err(FilterError::KernelTooLarge { .. })
        ));
    }

    #[test]
    fn test_not_configured() {
        let engine = Convolution::new();
        assert!(!engine.is_configured());
        let mut dst = None;
        assert!(matches!(
            engine.apply(&gray_u8(4, 4, 1), &mut dst),
            Err(FilterError::NotConfigured)
        ));
        assert!(dst.is_none());
        assert!(matches!(
            engine.resolve(Depth::U8),
            Err(FilterError::NotConfigured)
        ));
    }

    #[test]
    fn test_reconfigure_and_clear() {
        let mut engine = Convolution::new().with_kernel(Kernel::box_kernel(3).unwrap());
        assert_eq!(engine.kernel_type(), Some(KernelType::Int));
        engine.set_kernel(Kernel::gaussian(5, 1.0).unwrap());
        assert_eq!(engine.kernel_type(), Some(KernelType::Float));
        assert_eq!(engine.mask_size(), Some(Size::new(5, 5)));
        engine.clear_kernel();
        assert!(!engine.is_configured());
    }

    #[test]
    fn test_priority_default_registry() {
        let portable = ConvolutionOptions::default().with_backend(BackendPreference::Portable);
        let engine = Convolution::new()
            .with_kernel(KernelPreset::Gauss3.kernel())
            .with_options(portable);

        for depth in [Depth::U8, Depth::I16, Depth::I32] {
            assert_eq!(engine.resolve(depth).unwrap().kernel_type, KernelType::Int);
        }
        for depth in [Depth::F32, Depth::F64] {
            assert_eq!(engine.resolve(depth).unwrap().kernel_type, KernelType::Float);
        }
    }

    #[test]
    fn test_fractional_float_kernel_on_integer_source() {
        let engine = Convolution::new().with_kernel(Kernel::gaussian(3, 0.8).unwrap());
        assert_eq!(engine.resolve(Depth::U8).unwrap().kernel_type, KernelType::Float);
    }

    #[test]
    fn test_unsupported_specialization() {
        let engine = Convolution::new()
            .with_kernel(Kernel::box_kernel(3).unwrap())
            .with_registry(Registry::empty());
        assert!(matches!(
            engine.resolve(Depth::I16),
            Err(FilterError::UnsupportedKernelSpecialization {
                depth: Depth::I16,
                kernel: KernelType::Int
            })
        ));
    }

    #[test]
    fn test_kernel_too_large() {
        let engine = Convolution::new().with_kernel(Kernel::box_kernel(5).unwrap());
        let mut src = gray_u8(8, 8, 1);
        src.set_roi(Rect::new(2, 2, 4, 6)).unwrap();
        let mut dst = None;
        assert!(matches!(
            engine.apply(&src, &mut dst),
            Err(FilterError::KernelTooLarge { .. })
        ));
    }

    #[test]
    fn test_destination_reused() {
        let engine = Convolution::new().with_kernel(Kernel::box_kernel(3).unwrap());
        let src = gray_u8(6, 6, 9);
        let mut dst = None;
        engine.apply(&src, &mut dst).unwrap();
        let before = dst.as_ref().unwrap().as_image::<u8>().unwrap().channel_ptr_range(0).unwrap();
        engine.apply(&src, &mut dst).unwrap();
        let after = dst.as_ref().unwrap().as_image::<u8>().unwrap().channel_ptr_range(0).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_keep_source_size() {
        let options = ConvolutionOptions::default().with_clip_to_roi(false);
        let engine = Convolution::new()
            .with_kernel(Kernel::box_kernel(3).unwrap())
            .with_options(options);
        let src = gray_u8(6, 5, 50);
        let mut dst = None;
        engine.apply(&src, &mut dst).unwrap();
        let dst = dst.unwrap();
        assert_eq!(dst.size(), Size::new(6, 5));
        assert_eq!(dst.roi(), Rect::new(1, 1, 4, 3));
        let typed = dst.as_image::<u8>().unwrap();
        assert_eq!(typed.pixel(0, 0, 0), Some(0));
        assert_eq!(typed.pixel(1, 1, 0), Some(50));
        assert_eq!(typed.pixel(4, 3, 0), Some(50));
        assert_eq!(typed.pixel(5, 4, 0), Some(0));
    }

    #[test]
    fn test_output_depth() {
        let options = ConvolutionOptions::default().with_output_depth(Depth::I16);
        let engine = Convolution::new()
            .with_kernel(KernelPreset::SobelX3.kernel())
            .with_options(options);
        // ramp falling to the right gives negative gradients
        let mut src = make(Depth::U8, Size::new(4, 3), Format::Gray, None, None).unwrap();
        for (i, v) in src
            .as_image_mut::<u8>()
            .unwrap()
            .channel_data_mut(0)
            .unwrap()
            .iter_mut()
            .enumerate()
        {
            *v = 100 - 10 * (i % 4) as u8;
        }
        let mut dst = None;
        engine.apply(&src, &mut dst).unwrap();
        let out = dst.unwrap();
        assert_eq!(out.depth(), Depth::I16);
        // (-1 - 2 - 1) * 100 + (1 + 2 + 1) * 80 at x = 1
        assert_eq!(out.as_image::<i16>().unwrap().pixel(0, 0, 0), Some(-80));
    }

    #[test]
    fn test_destination_shared_is_detached() {
        let engine = Convolution::new().with_kernel(Kernel::box_kernel(3).unwrap());
        let mut dst = None;
        engine.apply(&gray_u8(5, 5, 10), &mut dst).unwrap();
        let observer = dst.as_mut().unwrap().shallow_copy();

        engine.apply(&gray_u8(5, 5, 90), &mut dst).unwrap();
        assert_eq!(dst.as_ref().unwrap().as_image::<u8>().unwrap().pixel(0, 0, 0), Some(90));
        assert_eq!(observer.as_image::<u8>().unwrap().pixel(0, 0, 0), Some(10));
    }

    #[test]
    fn test_blur_radius_overflow() {
        let src = gray_u8(5, 5, 10);
        for radius in [u32::MAX / 2 + 1, u32::MAX] {
            assert!(matches!(
                box_blur(&src, radius),
                Err(FilterError::InvalidKernel(_))
            ));
            assert!(matches!(
                gaussian_blur(&src, radius, 1.0),
                Err(FilterError::InvalidKernel(_))
            ));
        }
    }

    #[test]
    fn test_int_kernel_extreme_values() {
        let mut src = make(Depth::I32, Size::new(3, 3), Format::Gray, None, None).unwrap();
        src.as_image_mut::<i32>().unwrap().fill(i32::MAX).unwrap();
        let engine = Convolution::new()
            .with_kernel(Kernel::from_int(3, 3, &[i32::MAX; 9], i32::MAX).unwrap());
        let mut dst = None;
        let used = engine.apply(&src, &mut dst).unwrap();
        assert_eq!(used.kernel_type, KernelType::Int);
        let out = dst.as_ref().unwrap().as_image::<i32>().unwrap();
        assert_eq!(out.pixel(0, 0, 0), Some(i32::MAX));
    }
}
