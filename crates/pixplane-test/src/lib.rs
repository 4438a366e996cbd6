//! pixplane-test - Regression test framework for pixplane
//!
//! This crate provides a regression test framework supporting three modes:
//!
//! - **Generate**: Create golden files for comparison
//! - **Compare**: Compare results with golden files
//! - **Display**: Run tests without comparison (visual inspection)
//!
//! It also builds the synthetic images the regression tests run on.
//!
//! # Usage
//!
//! ```ignore
//! use pixplane_test::{RegParams, constant_image};
//!
//! let mut rp = RegParams::new("convolve");
//! rp.compare_values(100.0, value as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "generate", "compare", or "display"

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

use pixplane_core::{AnyImage, Depth, Format, Image, ImageVisitorMut, Sample, Size, make};
use std::fs;

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // pixplane-test is at crates/pixplane-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to the golden files directory
pub fn golden_dir() -> String {
    format!("{}/tests/golden", workspace_root())
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}

/// Create the golden and regout directories if they are missing
pub fn ensure_output_dirs() -> TestResult<()> {
    for dir in [golden_dir(), regout_dir()] {
        fs::create_dir_all(&dir).map_err(|e| TestError::DirectoryCreate {
            path: dir.clone(),
            message: e.to_string(),
        })?;
    }
    Ok(())
}

struct FillWith<F>(F);

impl<F: Fn(u32, u32, usize) -> f64> ImageVisitorMut for FillWith<F> {
    type Output = pixplane_core::Result<()>;

    fn visit_mut<T: Sample>(self, image: &mut Image<T>) -> Self::Output {
        let width = image.width().max(1) as usize;
        for ch in 0..image.channels() {
            let data = image.channel_data_mut(ch)?;
            for (i, v) in data.iter_mut().enumerate() {
                *v = T::clip_from_f64((self.0)((i % width) as u32, (i / width) as u32, ch));
            }
        }
        Ok(())
    }
}

fn build<F: Fn(u32, u32, usize) -> f64>(
    name: &str,
    depth: Depth,
    width: u32,
    height: u32,
    format: Format,
    f: F,
) -> TestResult<AnyImage> {
    let to_err = |e: pixplane_core::Error| TestError::ImageBuild {
        name: name.to_string(),
        message: e.to_string(),
    };
    let mut image = make(depth, Size::new(width, height), format, None, None).map_err(to_err)?;
    image.visit_mut(FillWith(f)).map_err(to_err)?;
    Ok(image)
}

/// Image with every sample of every channel set to `value`
///
/// `value` is clipped to the depth's range.
pub fn constant_image(
    depth: Depth,
    width: u32,
    height: u32,
    format: Format,
    value: f64,
) -> TestResult<AnyImage> {
    build("constant", depth, width, height, format, |_, _, _| value)
}

/// Image whose sample at `(x, y)` in channel `c` is `x + y * width + c`
///
/// Values beyond the depth's range saturate.
pub fn ramp_image(depth: Depth, width: u32, height: u32, format: Format) -> TestResult<AnyImage> {
    build("ramp", depth, width, height, format, move |x, y, c| {
        (x + y * width) as f64 + c as f64
    })
}

/// Checkerboard of `cell` x `cell` squares alternating between `lo` and `hi`
///
/// The top-left cell is `hi`.
pub fn checker_image(
    depth: Depth,
    width: u32,
    height: u32,
    cell: u32,
    lo: f64,
    hi: f64,
) -> TestResult<AnyImage> {
    let cell = cell.max(1);
    build("checker", depth, width, height, Format::Gray, move |x, y, _| {
        if (x / cell + y / cell) % 2 == 0 { hi } else { lo }
    })
}
