//! Convolution kernels
//!
//! A [`Kernel`] is a row-major `width x height` mask of either integer or
//! float values. Integer kernels carry a normalization factor the weighted
//! sum is divided by; float kernels have normalization folded into their
//! values.
//!
//! The anchor is at `(width / 2, height / 2)`, so odd sizes are centered.

use crate::{FilterError, FilterResult};
use pixplane_core::Size;
use std::fmt;

/// Element type of a kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KernelType {
    /// `i32` values plus a normalization factor
    Int,
    /// `f32` values
    Float,
}

impl fmt::Display for KernelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KernelType::Int => "int",
            KernelType::Float => "float",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
enum KernelData {
    Int { values: Vec<i32>, factor: i32 },
    Float(Vec<f32>),
}

/// A 2D convolution kernel
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    size: Size,
    data: KernelData,
}

pub(crate) fn check_shape(size: Size, len: usize) -> FilterResult<()> {
    if size.is_empty() {
        return Err(FilterError::InvalidKernel(format!("empty {size} mask")));
    }
    if size.area() != len {
        return Err(FilterError::InvalidKernel(format!(
            "{size} mask needs {} values, got {len}",
            size.area()
        )));
    }
    Ok(())
}

pub(crate) fn check_factor(factor: i32) -> FilterResult<()> {
    if factor == 0 {
        return Err(FilterError::InvalidKernel(
            "normalization factor must not be zero".into(),
        ));
    }
    Ok(())
}

impl Kernel {
    /// Create an integer kernel.
    ///
    /// The weighted sum is divided by `factor` (truncating toward zero).
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidKernel`] for an empty mask, a value
    /// count other than `width * height`, or a zero factor.
    pub fn from_int(width: u32, height: u32, values: &[i32], factor: i32) -> FilterResult<Self> {
        let size = Size::new(width, height);
        check_shape(size, values.len())?;
        check_factor(factor)?;
        Ok(Self {
            size,
            data: KernelData::Int {
                values: values.to_vec(),
                factor,
            },
        })
    }

    /// Create a float kernel.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidKernel`] for an empty mask, a value
    /// count other than `width * height`, or non-finite values.
    pub fn from_float(width: u32, height: u32, values: &[f32]) -> FilterResult<Self> {
        let size = Size::new(width, height);
        check_shape(size, values.len())?;
        if values.iter().any(|v| !v.is_finite()) {
            return Err(FilterError::InvalidKernel("non-finite value".into()));
        }
        Ok(Self {
            size,
            data: KernelData::Float(values.to_vec()),
        })
    }

    /// Create a `size x size` box (averaging) kernel.
    ///
    /// All values are 1 and the factor is `size * size`.
    pub fn box_kernel(size: u32) -> FilterResult<Self> {
        let n = size as usize * size as usize;
        let factor = i32::try_from(n)
            .map_err(|_| FilterError::InvalidKernel(format!("box size {size} too large")))?;
        Self::from_int(size, size, &vec![1; n], factor)
    }

    /// Create a normalized `size x size` Gaussian kernel.
    ///
    /// `size` must be odd and `sigma` positive.
    pub fn gaussian(size: u32, sigma: f32) -> FilterResult<Self> {
        if size % 2 == 0 {
            return Err(FilterError::InvalidKernel(format!(
                "gaussian size must be odd, got {size}"
            )));
        }
        if !(sigma > 0.0) {
            return Err(FilterError::InvalidKernel(format!(
                "gaussian sigma must be positive, got {sigma}"
            )));
        }
        let half = (size / 2) as i64;
        let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
        let row: Vec<f64> = (-half..=half)
            .map(|i| (-((i * i) as f64) / denom).exp())
            .collect();
        let sum: f64 = row.iter().sum();
        let row: Vec<f64> = row.iter().map(|v| v / sum).collect();

        let values: Vec<f32> = row
            .iter()
            .flat_map(|&a| row.iter().map(move |&b| (a * b) as f32))
            .collect();
        Self::from_float(size, size, &values)
    }

    /// Mask size.
    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Mask width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Mask height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Element type.
    pub fn kernel_type(&self) -> KernelType {
        match self.data {
            KernelData::Int { .. } => KernelType::Int,
            KernelData::Float(_) => KernelType::Float,
        }
    }

    /// Integer values and normalization factor, for integer kernels.
    pub fn int_values(&self) -> Option<(&[i32], i32)> {
        match &self.data {
            KernelData::Int { values, factor } => Some((values, *factor)),
            KernelData::Float(_) => None,
        }
    }

    /// Float values, for float kernels.
    pub fn float_values(&self) -> Option<&[f32]> {
        match &self.data {
            KernelData::Float(values) => Some(values),
            KernelData::Int { .. } => None,
        }
    }

    /// Float equivalent of this kernel with the factor folded in.
    ///
    /// Each value is divided by the factor and rounded to the nearest `f32`,
    /// so the result is pre-normalized but not exact (a 3x3 box becomes
    /// nine copies of `1.0 / 9.0`). Float kernels are returned unchanged.
    pub fn to_float(&self) -> Kernel {
        match &self.data {
            KernelData::Float(_) => self.clone(),
            KernelData::Int { values, factor } => Kernel {
                size: self.size,
                data: KernelData::Float(
                    values
                        .iter()
                        .map(|&v| (f64::from(v) / f64::from(*factor)) as f32)
                        .collect(),
                ),
            },
        }
    }

    /// Integer equivalent of this kernel, if every value is an integer.
    ///
    /// The result has factor 1. Integer kernels are returned unchanged.
    pub fn to_int_exact(&self) -> Option<Kernel> {
        match &self.data {
            KernelData::Int { .. } => Some(self.clone()),
            KernelData::Float(values) => {
                let values = values
                    .iter()
                    .map(|&v| {
                        // i32::MAX is not an f32; 2^31 is the first value past it
                        let exact = v.fract() == 0.0
                            && (-2_147_483_648.0..2_147_483_648.0).contains(&v);
                        exact.then_some(v as i32)
                    })
                    .collect::<Option<Vec<i32>>>()?;
                Some(Kernel {
                    size: self.size,
                    data: KernelData::Int { values, factor: 1 },
                })
            }
        }
    }

    /// The kernel in the other element type, when it can be derived.
    ///
    /// Integer kernels always have a float form, rounded as in
    /// [`to_float`](Self::to_float). Float kernels only have an integer form
    /// when all values are integral and fit `i32`; that form is exact.
    pub fn alternate(&self) -> Option<Kernel> {
        match self.kernel_type() {
            KernelType::Int => Some(self.to_float()),
            KernelType::Float => self.to_int_exact(),
        }
    }

    /// Kernel in the requested element type, if derivable.
    pub fn converted(&self, ty: KernelType) -> Option<Kernel> {
        if ty == self.kernel_type() {
            Some(self.clone())
        } else {
            self.alternate()
        }
    }
}

/// Built-in constant kernels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KernelPreset {
    /// 3x3 Sobel, horizontal gradient
    SobelX3,
    /// 3x3 Sobel, vertical gradient
    SobelY3,
    /// 5x5 Sobel, horizontal gradient
    SobelX5,
    /// 5x5 Sobel, vertical gradient
    SobelY5,
    /// 3x3 binomial blur, factor 16
    Gauss3,
    /// 5x5 binomial blur, factor 256
    Gauss5,
    /// 3x3 Laplace
    Laplace3,
    /// 5x5 Laplace
    Laplace5,
}

#[rustfmt::skip]
const SOBEL_X3: [i32; 9] = [
    -1, 0, 1,
    -2, 0, 2,
    -1, 0, 1,
];

#[rustfmt::skip]
const SOBEL_Y3: [i32; 9] = [
    -1, -2, -1,
     0,  0,  0,
     1,  2,  1,
];

#[rustfmt::skip]
const SOBEL_X5: [i32; 25] = [
     -1,  -2, 0,  2, 1,
     -4,  -8, 0,  8, 4,
     -6, -12, 0, 12, 6,
     -4,  -8, 0,  8, 4,
     -1,  -2, 0,  2, 1,
];

#[rustfmt::skip]
const SOBEL_Y5: [i32; 25] = [
    -1, -4,  -6, -4, -1,
    -2, -8, -12, -8, -2,
     0,  0,   0,  0,  0,
     2,  8,  12,  8,  2,
     1,  4,   6,  4,  1,
];

#[rustfmt::skip]
const GAUSS3: [i32; 9] = [
    1, 2, 1,
    2, 4, 2,
    1, 2, 1,
];

#[rustfmt::skip]
const GAUSS5: [i32; 25] = [
    1,  4,  6,  4, 1,
    4, 16, 24, 16, 4,
    6, 24, 36, 24, 6,
    4, 16, 24, 16, 4,
    1,  4,  6,  4, 1,
];

#[rustfmt::skip]
const LAPLACE3: [i32; 9] = [
    1,  1, 1,
    1, -8, 1,
    1,  1, 1,
];

#[rustfmt::skip]
const LAPLACE5: [i32; 25] = [
    1, 1,   1, 1, 1,
    1, 1,   1, 1, 1,
    1, 1, -24, 1, 1,
    1, 1,   1, 1, 1,
    1, 1,   1, 1, 1,
];

impl KernelPreset {
    /// All presets.
    pub const ALL: [KernelPreset; 8] = [
        KernelPreset::SobelX3,
        KernelPreset::SobelY3,
        KernelPreset::SobelX5,
        KernelPreset::SobelY5,
        KernelPreset::Gauss3,
        KernelPreset::Gauss5,
        KernelPreset::Laplace3,
        KernelPreset::Laplace5,
    ];

    /// Mask values (row-major), mask side length and factor.
    pub fn values(self) -> (&'static [i32], u32, i32) {
        match self {
            KernelPreset::SobelX3 => (&SOBEL_X3, 3, 1),
            KernelPreset::SobelY3 => (&SOBEL_Y3, 3, 1),
            KernelPreset::SobelX5 => (&SOBEL_X5, 5, 1),
            KernelPreset::SobelY5 => (&SOBEL_Y5, 5, 1),
            KernelPreset::Gauss3 => (&GAUSS3, 3, 16),
            KernelPreset::Gauss5 => (&GAUSS5, 5, 256),
            KernelPreset::Laplace3 => (&LAPLACE3, 3, 1),
            KernelPreset::Laplace5 => (&LAPLACE5, 5, 1),
        }
    }

    /// Build an owned integer kernel from the preset.
    pub fn kernel(self) -> Kernel {
        let (values, side, factor) = self.values();
        Kernel {
            size: Size::new(side, side),
            data: KernelData::Int {
                values: values.to_vec(),
                factor,
            },
        }
    }
}

impl From<KernelPreset> for Kernel {
    fn from(preset: KernelPreset) -> Self {
        preset.kernel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_int_validation() {
        assert!(Kernel::from_int(3, 3, &[1; 9], 9).is_ok());
        assert!(Kernel::from_int(3, 3, &[1; 8], 9).is_err());
        assert!(Kernel::from_int(3, 3, &[1; 9], 0).is_err());
        assert!(Kernel::from_int(0, 3, &[], 1).is_err());
        assert!(Kernel::from_float(2, 1, &[1.0, f32::NAN]).is_err());
    }

    #[test]
    fn test_box_kernel() {
        let k = Kernel::box_kernel(3).unwrap();
        assert_eq!(k.kernel_type(), KernelType::Int);
        let (values, factor) = k.int_values().unwrap();
        assert_eq!(values, &[1; 9]);
        assert_eq!(factor, 9);
    }

    #[test]
    fn test_gaussian_normalized() {
        let k = Kernel::gaussian(5, 1.2).unwrap();
        let values = k.float_values().unwrap();
        let sum: f32 = values.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        // symmetric and peaked in the center
        assert_eq!(values[0], values[24]);
        assert!(values[12] > values[11]);
        assert!(Kernel::gaussian(4, 1.0).is_err());
        assert!(Kernel::gaussian(3, 0.0).is_err());
    }

    #[test]
    fn test_alternates() {
        let k = Kernel::from_int(1, 2, &[1, 3], 4).unwrap();
        let f = k.alternate().unwrap();
        assert_eq!(f.float_values().unwrap(), &[0.25, 0.75]);

        let exact = Kernel::from_float(2, 1, &[2.0, -3.0]).unwrap();
        let i = exact.alternate().unwrap();
        assert_eq!(i.int_values().unwrap(), (&[2, -3][..], 1));

        let fractional = Kernel::from_float(2, 1, &[0.5, 0.5]).unwrap();
        assert!(fractional.alternate().is_none());
        assert!(fractional.converted(KernelType::Float).is_some());
    }

    #[test]
    fn test_presets() {
        for preset in KernelPreset::ALL {
            let (values, side, _) = preset.values();
            assert_eq!(values.len(), (side * side) as usize);
        }
        // smoothing presets sum to their factor, derivative presets to zero
        for preset in [KernelPreset::Gauss3, KernelPreset::Gauss5] {
            let (values, _, factor) = preset.values();
            assert_eq!(values.iter().sum::<i32>(), factor);
        }
        for preset in [
            KernelPreset::SobelX5,
            KernelPreset::SobelY3,
            KernelPreset::Laplace3,
            KernelPreset::Laplace5,
        ] {
            assert_eq!(preset.values().0.iter().sum::<i32>(), 0);
        }
        let k: Kernel = KernelPreset::Laplace3.into();
        assert_eq!(k.int_values().unwrap().0[4], -8);
    }

    #[test]
    fn test_to_int_exact_range() {
        let top = Kernel::from_float(1, 1, &[2_147_483_648.0]).unwrap();
        assert!(top.to_int_exact().is_none());

        let bottom = Kernel::from_float(1, 1, &[-2_147_483_648.0]).unwrap();
        let bottom = bottom.to_int_exact().unwrap();
        assert_eq!(bottom.int_values(), Some((&[i32::MIN][..], 1)));

        // largest f32 below 2^31
        let near = Kernel::from_float(1, 1, &[2_147_483_520.0]).unwrap();
        let near = near.to_int_exact().unwrap();
        assert_eq!(near.int_values(), Some((&[2_147_483_520][..], 1)));
    }

    #[test]
    fn test_float_form_is_rounded() {
        let box3 = Kernel::box_kernel(3).unwrap().to_float();
        assert!(box3.float_values().unwrap().iter().all(|&v| v == 1.0f32 / 9.0));
        let sum: f64 = box3.float_values().unwrap().iter().map(|&v| f64::from(v)).sum();
        assert!(sum != 1.0);
        assert!((sum - 1.0).abs() < 1e-6);
    }
}
