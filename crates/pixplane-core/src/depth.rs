//! Pixel depths and the `Sample` trait
//!
//! A [`Depth`] tags the numeric element type of one pixel sample. The set
//! is closed: 8-bit unsigned, 16-bit signed, 32-bit signed, 32-bit float
//! and 64-bit float. [`Sample`] is implemented for exactly the matching
//! Rust primitives and links each of them to its [`AnyImage`] variant.

use crate::handle::AnyImage;
use crate::image::Image;
use num_traits::{NumCast, ToPrimitive};
use std::fmt;

/// Numeric element type of a pixel sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Depth {
    /// 8-bit unsigned integer
    U8,
    /// 16-bit signed integer
    I16,
    /// 32-bit signed integer
    I32,
    /// 32-bit IEEE float
    F32,
    /// 64-bit IEEE float
    F64,
}

impl Depth {
    /// All supported depths, in ascending order.
    pub const ALL: [Depth; 5] = [Depth::U8, Depth::I16, Depth::I32, Depth::F32, Depth::F64];

    /// Size of one sample in bytes.
    pub fn bytes(self) -> usize {
        match self {
            Depth::U8 => 1,
            Depth::I16 => 2,
            Depth::I32 | Depth::F32 => 4,
            Depth::F64 => 8,
        }
    }

    /// Check if samples of this depth are integers.
    pub fn is_integer(self) -> bool {
        matches!(self, Depth::U8 | Depth::I16 | Depth::I32)
    }

    /// Check if samples of this depth are floating point.
    pub fn is_float(self) -> bool {
        !self.is_integer()
    }

    /// Short lowercase name (`"u8"`, `"f32"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Depth::U8 => "u8",
            Depth::I16 => "i16",
            Depth::I32 => "i32",
            Depth::F32 => "f32",
            Depth::F64 => "f64",
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A pixel sample type with a fixed [`Depth`]
///
/// Sealed: implemented for `u8`, `i16`, `i32`, `f32` and `f64` only.
pub trait Sample:
    Copy
    + Default
    + PartialEq
    + PartialOrd
    + fmt::Debug
    + NumCast
    + ToPrimitive
    + sealed::Sealed
    + 'static
{
    /// Depth tag of this sample type.
    const DEPTH: Depth;
    /// Smallest representable value.
    const MIN: Self;
    /// Largest representable value.
    const MAX: Self;

    /// Convert from `f64`, saturating at the type bounds.
    ///
    /// Integer targets round to nearest; NaN maps to zero.
    fn clip_from_f64(v: f64) -> Self;

    /// Convert from `i64`, saturating at the type bounds.
    fn clip_from_i64(v: i64) -> Self;

    /// Widen to `f64` (lossless for every supported depth except large `i32`
    /// magnitudes beyond 2^53, which cannot occur).
    fn to_f64_lossy(self) -> f64;

    /// Wrap a typed image in its depth-erased handle.
    fn into_any(image: Image<Self>) -> AnyImage;

    /// Borrow the typed image behind a handle, if the depth matches.
    fn from_any_ref(any: &AnyImage) -> Option<&Image<Self>>;

    /// Mutably borrow the typed image behind a handle, if the depth matches.
    fn from_any_mut(any: &mut AnyImage) -> Option<&mut Image<Self>>;

    /// Unwrap a handle into its typed image, handing it back on mismatch.
    fn from_any(any: AnyImage) -> std::result::Result<Image<Self>, AnyImage>;
}

/// Convert between sample types, saturating at the target's bounds.
#[inline]
pub fn clipped_cast<S: Sample, D: Sample>(v: S) -> D {
    if D::DEPTH.is_integer() && S::DEPTH.is_integer() {
        D::clip_from_i64(v.to_i64().unwrap_or_default())
    } else {
        D::clip_from_f64(v.to_f64_lossy())
    }
}

macro_rules! impl_int_sample {
    ($t:ty, $depth:ident) => {
        impl sealed::Sealed for $t {}

        impl Sample for $t {
            const DEPTH: Depth = Depth::$depth;
            const MIN: Self = <$t>::MIN;
            const MAX: Self = <$t>::MAX;

            #[inline]
            fn clip_from_f64(v: f64) -> Self {
                // `as` saturates and maps NaN to 0
                v.round() as $t
            }

            #[inline]
            fn clip_from_i64(v: i64) -> Self {
                v.clamp(<$t>::MIN as i64, <$t>::MAX as i64) as $t
            }

            #[inline]
            fn to_f64_lossy(self) -> f64 {
                self as f64
            }

            fn into_any(image: Image<Self>) -> AnyImage {
                AnyImage::$depth(image)
            }

            fn from_any_ref(any: &AnyImage) -> Option<&Image<Self>> {
                match any {
                    AnyImage::$depth(image) => Some(image),
                    _ => None,
                }
            }

            fn from_any_mut(any: &mut AnyImage) -> Option<&mut Image<Self>> {
                match any {
                    AnyImage::$depth(image) => Some(image),
                    _ => None,
                }
            }

            fn from_any(any: AnyImage) -> std::result::Result<Image<Self>, AnyImage> {
                match any {
                    AnyImage::$depth(image) => Ok(image),
                    other => Err(other),
                }
            }
        }
    };
}

macro_rules! impl_float_sample {
    ($t:ty, $depth:ident) => {
        impl sealed::Sealed for $t {}

        impl Sample for $t {
            const DEPTH: Depth = Depth::$depth;
            const MIN: Self = <$t>::MIN;
            const MAX: Self = <$t>::MAX;

            #[inline]
            fn clip_from_f64(v: f64) -> Self {
                v as $t
            }

            #[inline]
            fn clip_from_i64(v: i64) -> Self {
                v as $t
            }

            #[inline]
            fn to_f64_lossy(self) -> f64 {
                self as f64
            }

            fn into_any(image: Image<Self>) -> AnyImage {
                AnyImage::$depth(image)
            }

            fn from_any_ref(any: &AnyImage) -> Option<&Image<Self>> {
                match any {
                    AnyImage::$depth(image) => Some(image),
                    _ => None,
                }
            }

            fn from_any_mut(any: &mut AnyImage) -> Option<&mut Image<Self>> {
                match any {
                    AnyImage::$depth(image) => Some(image),
                    _ => None,
                }
            }

            fn from_any(any: AnyImage) -> std::result::Result<Image<Self>, AnyImage> {
                match any {
                    AnyImage::$depth(image) => Ok(image),
                    other => Err(other),
                }
            }
        }
    };
}

impl_int_sample!(u8, U8);
impl_int_sample!(i16, I16);
impl_int_sample!(i32, I32);
impl_float_sample!(f32, F32);
impl_float_sample!(f64, F64);
