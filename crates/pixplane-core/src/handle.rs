//! AnyImage - depth-erased image handle
//!
//! [`AnyImage`] is a closed sum over the five supported sample types. Code
//! that does not care about the depth works with the handle's metadata
//! accessors and [`ImageVisitor`]; code that only supports some depths
//! downcasts with [`AnyImage::as_image`].
//!
//! The free functions [`make`] and [`ensure_compatible`] are the idiom for
//! producing output images without branching on depth:
//!
//! ```
//! use pixplane_core::{AnyImage, Depth, Format, Size, ensure_compatible, make};
//!
//! let src = make(Depth::F32, Size::new(8, 8), Format::Rgb, None, None).unwrap();
//! let mut dst: Option<AnyImage> = None;
//!
//! assert!(ensure_compatible(&mut dst, &src).unwrap());
//! // shape already matches, nothing is allocated
//! assert!(!ensure_compatible(&mut dst, &src).unwrap());
//! ```

use crate::depth::{Depth, Sample};
use crate::error::{Error, Result};
use crate::format::Format;
use crate::geom::{Rect, Size};
use crate::image::Image;
use std::io::Write;

/// Typed image of any supported depth
#[derive(Debug)]
pub enum AnyImage {
    /// 8-bit unsigned samples
    U8(Image<u8>),
    /// 16-bit signed samples
    I16(Image<i16>),
    /// 32-bit signed samples
    I32(Image<i32>),
    /// 32-bit float samples
    F32(Image<f32>),
    /// 64-bit float samples
    F64(Image<f64>),
}

/// Depth-generic read-only operation on an [`AnyImage`]
///
/// Implement `visit` once; [`AnyImage::visit`] calls it with the concrete
/// image type.
pub trait ImageVisitor {
    /// Result of the visit.
    type Output;

    /// Handle an image of sample type `T`.
    fn visit<T: Sample>(self, image: &Image<T>) -> Self::Output;
}

/// Depth-generic mutating operation on an [`AnyImage`]
pub trait ImageVisitorMut {
    /// Result of the visit.
    type Output;

    /// Handle an image of sample type `T`.
    fn visit_mut<T: Sample>(self, image: &mut Image<T>) -> Self::Output;
}

macro_rules! dispatch {
    ($any:expr, $img:ident => $body:expr) => {
        match $any {
            AnyImage::U8($img) => $body,
            AnyImage::I16($img) => $body,
            AnyImage::I32($img) => $body,
            AnyImage::F32($img) => $body,
            AnyImage::F64($img) => $body,
        }
    };
}

impl AnyImage {
    /// Depth of the wrapped image.
    pub fn depth(&self) -> Depth {
        dispatch!(self, img => img.depth())
    }

    /// Image size.
    pub fn size(&self) -> Size {
        dispatch!(self, img => img.size())
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.size().width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.size().height
    }

    /// Number of channels.
    pub fn channels(&self) -> usize {
        dispatch!(self, img => img.channels())
    }

    /// Color format.
    pub fn format(&self) -> Format {
        dispatch!(self, img => img.format())
    }

    /// Region of interest.
    pub fn roi(&self) -> Rect {
        dispatch!(self, img => img.roi())
    }

    /// Set the region of interest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRoi`] if `roi` is not contained in the image.
    pub fn set_roi(&mut self, roi: Rect) -> Result<()> {
        dispatch!(self, img => img.set_roi(roi))
    }

    /// Check if none of the channels is aliased by another image.
    pub fn is_exclusive(&self) -> bool {
        dispatch!(self, img => img.is_exclusive())
    }

    /// Downcast to the typed image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the handle holds another depth.
    pub fn as_image<T: Sample>(&self) -> Result<&Image<T>> {
        T::from_any_ref(self).ok_or(Error::TypeMismatch {
            expected: T::DEPTH,
            actual: self.depth(),
        })
    }

    /// Mutably downcast to the typed image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the handle holds another depth.
    pub fn as_image_mut<T: Sample>(&mut self) -> Result<&mut Image<T>> {
        let actual = self.depth();
        T::from_any_mut(self).ok_or(Error::TypeMismatch {
            expected: T::DEPTH,
            actual,
        })
    }

    /// Unwrap into the typed image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the handle holds another depth.
    pub fn into_image<T: Sample>(self) -> Result<Image<T>> {
        T::from_any(self).map_err(|any| Error::TypeMismatch {
            expected: T::DEPTH,
            actual: any.depth(),
        })
    }

    /// Run a depth-generic read-only operation.
    pub fn visit<V: ImageVisitor>(&self, visitor: V) -> V::Output {
        dispatch!(self, img => visitor.visit(img))
    }

    /// Run a depth-generic mutating operation.
    pub fn visit_mut<V: ImageVisitorMut>(&mut self, visitor: V) -> V::Output {
        dispatch!(self, img => visitor.visit_mut(img))
    }

    /// Create a handle sharing every channel with this one.
    pub fn shallow_copy(&mut self) -> AnyImage {
        dispatch!(self, img => AnyImage::from(img.shallow_copy()))
    }

    /// Create an independent copy.
    pub fn deep_copy(&self) -> Result<AnyImage> {
        dispatch!(self, img => img.deep_copy().map(AnyImage::from))
    }

    /// Give this image private copies of all aliased channels.
    pub fn detach(&mut self) -> Result<()> {
        dispatch!(self, img => img.detach())
    }

    /// Change the size on demand; see [`Image::resize`].
    pub fn resize(&mut self, size: Size) -> Result<()> {
        dispatch!(self, img => img.resize(size))
    }

    /// Convert to another depth, saturating at its bounds.
    ///
    /// Converting to the current depth produces a deep copy.
    pub fn convert(&self, depth: Depth) -> Result<AnyImage> {
        struct Convert(Depth);

        impl ImageVisitor for Convert {
            type Output = Result<AnyImage>;

            fn visit<T: Sample>(self, image: &Image<T>) -> Result<AnyImage> {
                Ok(match self.0 {
                    Depth::U8 => AnyImage::U8(image.convert_to()?),
                    Depth::I16 => AnyImage::I16(image.convert_to()?),
                    Depth::I32 => AnyImage::I32(image.convert_to()?),
                    Depth::F32 => AnyImage::F32(image.convert_to()?),
                    Depth::F64 => AnyImage::F64(image.convert_to()?),
                })
            }
        }

        self.visit(Convert(depth))
    }

    /// Print a short description of the image.
    pub fn write_info<W: Write>(&self, out: &mut W, label: &str) -> Result<()> {
        if !label.is_empty() {
            writeln!(out, "{label}")?;
        }
        writeln!(
            out,
            "  size = {}, depth = {}, channels = {}, format = {}",
            self.size(),
            self.depth(),
            self.channels(),
            self.format()
        )?;
        writeln!(out, "  roi = {}", self.roi())?;
        for ch in 0..self.channels() {
            let ownership = dispatch!(self, img => img.ownership(ch))?;
            writeln!(out, "  channel {ch}: {ownership:?}")?;
        }
        Ok(())
    }
}

impl<T: Sample> From<Image<T>> for AnyImage {
    fn from(image: Image<T>) -> Self {
        T::into_any(image)
    }
}

/// Create an image of the given depth.
///
/// `channels` defaults to the format's channel count and `roi` to the full
/// image.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] if `channels` does not fit `format`,
/// [`Error::InvalidRoi`] if `roi` is not inside the image, or
/// [`Error::OutOfMemory`].
pub fn make(
    depth: Depth,
    size: Size,
    format: Format,
    channels: Option<usize>,
    roi: Option<Rect>,
) -> Result<AnyImage> {
    fn typed<T: Sample>(size: Size, format: Format, channels: usize) -> Result<AnyImage> {
        Ok(T::into_any(Image::<T>::new(size, channels, format)?))
    }

    let channels = channels.unwrap_or_else(|| format.default_channels());
    let mut image = match depth {
        Depth::U8 => typed::<u8>(size, format, channels)?,
        Depth::I16 => typed::<i16>(size, format, channels)?,
        Depth::I32 => typed::<i32>(size, format, channels)?,
        Depth::F32 => typed::<f32>(size, format, channels)?,
        Depth::F64 => typed::<f64>(size, format, channels)?,
    };
    if let Some(roi) = roi {
        image.set_roi(roi)?;
    }
    Ok(image)
}

/// Metadata an image must have to be reused as an output buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSpec {
    /// Sample depth
    pub depth: Depth,
    /// Image size
    pub size: Size,
    /// Color format
    pub format: Format,
    /// Channel count
    pub channels: usize,
    /// Region of interest
    pub roi: Rect,
}

impl ImageSpec {
    /// Metadata of an existing image.
    pub fn of(image: &AnyImage) -> Self {
        Self {
            depth: image.depth(),
            size: image.size(),
            format: image.format(),
            channels: image.channels(),
            roi: image.roi(),
        }
    }
}

/// Make `slot` hold an image with the same metadata as `reference`.
///
/// Content is never copied. Returns `true` if channel memory was allocated.
/// See [`ensure_compatible_with`].
pub fn ensure_compatible(slot: &mut Option<AnyImage>, reference: &AnyImage) -> Result<bool> {
    ensure_compatible_with(slot, &ImageSpec::of(reference))
}

/// Make `slot` hold an image with exactly the metadata in `spec`.
///
/// - An empty slot, or one holding another depth, gets a fresh image.
/// - Otherwise the image is adjusted in place: a new size reallocates all
///   channels, a new channel count appends or drops channels, and format and
///   ROI are overwritten. A differing ROI alone never allocates.
///
/// Calling this twice with the same `spec` allocates at most on the first
/// call. Returns `true` if channel memory was allocated.
///
/// # Errors
///
/// Fails like [`make`] when `spec` is inconsistent, or with
/// [`Error::OutOfMemory`].
pub fn ensure_compatible_with(slot: &mut Option<AnyImage>, spec: &ImageSpec) -> Result<bool> {
    let reusable = slot.as_ref().is_some_and(|image| image.depth() == spec.depth);
    if !reusable {
        log::debug!(
            "allocating {} {} image with {} channels",
            spec.size,
            spec.depth,
            spec.channels
        );
        *slot = Some(make(
            spec.depth,
            spec.size,
            spec.format,
            Some(spec.channels),
            Some(spec.roi),
        )?);
        return Ok(true);
    }

    struct Adjust<'a>(&'a ImageSpec);

    impl ImageVisitorMut for Adjust<'_> {
        type Output = Result<bool>;

        fn visit_mut<T: Sample>(self, image: &mut Image<T>) -> Result<bool> {
            let spec = self.0;
            if !spec.format.accepts(spec.channels) {
                return Err(Error::InvalidParameter(format!(
                    "format {} does not accept {} channels",
                    spec.format, spec.channels
                )));
            }
            if !spec.roi.fits_in(spec.size) {
                return Err(Error::InvalidRoi {
                    roi: spec.roi,
                    size: spec.size,
                });
            }
            let mut allocated = false;
            if image.size() != spec.size {
                image.resize(spec.size)?;
                allocated = true;
            }
            if image.channels() != spec.channels {
                allocated |= image.channels() < spec.channels;
                image.set_channels(spec.channels)?;
            }
            if image.format() != spec.format {
                image.set_format(spec.format)?;
            }
            image.set_roi(spec.roi)?;
            Ok(allocated)
        }
    }

    let allocated = match slot.as_mut() {
        Some(image) => image.visit_mut(Adjust(spec))?,
        None => false,
    };
    if allocated {
        log::debug!("reallocated output image to {} x{}", spec.size, spec.channels);
    }
    Ok(allocated)
}
