//! Regression test parameters and operations

use crate::{ensure_output_dirs, golden_dir, regout_dir};
use crate::error::TestResult;
use pixplane_core::{AnyImage, Depth};
use std::fs;
use std::path::Path;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Generate golden files
    Generate,
    /// Compare with golden files (default)
    #[default]
    Compare,
    /// Display mode - run without comparison
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("REGTEST_MODE").unwrap_or_default())
    }

    /// Parse mode from a string; anything unknown means compare
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "generate" => Self::Generate,
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// Tracks the test name, the index of the current check, the mode and
/// whether every check so far has passed.
pub struct RegParams {
    /// Name of the test (e.g., "convolve")
    pub test_name: String,
    /// Current test index (incremented before each check)
    index: usize,
    /// Test mode (generate, compare, or display)
    pub mode: RegTestMode,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// The mode is taken from the `REGTEST_MODE` environment variable.
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        if let Err(e) = ensure_output_dirs() {
            eprintln!("{e}");
        }

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current test index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn fail(&mut self, msg: String) {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
    }

    /// Compare two floating-point values
    ///
    /// Returns `true` if `actual` is within `delta` of `expected`.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta || diff.is_nan() {
            self.fail(format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            ));
            false
        } else {
            true
        }
    }

    /// Compare two images for exact equality
    ///
    /// Depth, size, channel count and format must match, and every sample of
    /// every channel must be equal. ROIs are not compared.
    pub fn compare_images(&mut self, img1: &AnyImage, img2: &AnyImage) -> bool {
        self.index += 1;

        if img1.depth() != img2.depth()
            || img1.size() != img2.size()
            || img1.channels() != img2.channels()
            || img1.format() != img2.format()
        {
            self.fail(format!(
                "Failure in {}_reg: image comparison for index {} - metadata mismatch \
                 ({} {} x{} vs {} {} x{})",
                self.test_name,
                self.index,
                img1.size(),
                img1.depth(),
                img1.channels(),
                img2.size(),
                img2.depth(),
                img2.channels()
            ));
            return false;
        }

        match first_difference(img1, img2) {
            Ok(None) => true,
            Ok(Some((ch, idx))) => {
                let width = img1.width().max(1) as usize;
                self.fail(format!(
                    "Failure in {}_reg: image comparison for index {} - sample mismatch \
                     at ({}, {}) in channel {}",
                    self.test_name,
                    self.index,
                    idx % width,
                    idx / width,
                    ch
                ));
                false
            }
            Err(e) => {
                self.fail(format!(
                    "Failure in {}_reg: image comparison for index {} - {}",
                    self.test_name, self.index, e
                ));
                false
            }
        }
    }

    /// Compare two binary data arrays
    pub fn compare_strings(&mut self, data1: &[u8], data2: &[u8]) -> bool {
        self.index += 1;

        if data1 != data2 {
            self.fail(format!(
                "Failure in {}_reg: string comparison for index {}\n\
                 sizes: {} vs {}",
                self.test_name,
                self.index,
                data1.len(),
                data2.len()
            ));
            false
        } else {
            true
        }
    }

    /// Write data to file and check against golden file
    ///
    /// `ext` is the file extension (e.g., "txt", "csv").
    pub fn write_data_and_check(&mut self, data: &[u8], ext: &str) -> TestResult<()> {
        self.index += 1;

        let local_path = format!(
            "{}/{}.{:02}.{}",
            regout_dir(),
            self.test_name,
            self.index,
            ext
        );

        fs::write(&local_path, data)?;
        self.check_file(&local_path)
    }

    /// Check a file against its golden counterpart
    ///
    /// In generate mode, copies the file to golden. In compare mode,
    /// compares with the golden file, creating it on first run. In display
    /// mode, does nothing.
    fn check_file(&mut self, local_path: &str) -> TestResult<()> {
        let ext = Path::new(local_path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        let golden_path = format!(
            "{}/{}_golden.{:02}.{}",
            golden_dir(),
            self.test_name,
            self.index,
            ext
        );

        match self.mode {
            RegTestMode::Generate => {
                fs::copy(local_path, &golden_path)?;
                eprintln!("Generated: {}", golden_path);
            }
            RegTestMode::Compare => {
                if !Path::new(&golden_path).exists() {
                    fs::copy(local_path, &golden_path)?;
                    eprintln!("No golden file yet, generated: {}", golden_path);
                    return Ok(());
                }

                let local_data = fs::read(local_path)?;
                let golden_data = fs::read(&golden_path)?;

                if local_data != golden_data {
                    self.fail(format!(
                        "Failure in {}_reg, index {}: comparing {} with {}",
                        self.test_name, self.index, local_path, golden_path
                    ));
                }
            }
            RegTestMode::Display => {}
        }

        Ok(())
    }

    /// Clean up and report results
    ///
    /// Returns `true` if all checks passed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all tests have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

/// Locate the first differing sample as `(channel, index)`.
fn first_difference(
    img1: &AnyImage,
    img2: &AnyImage,
) -> pixplane_core::Result<Option<(usize, usize)>> {
    let a = img1.convert(Depth::F64)?.into_image::<f64>()?;
    let b = img2.convert(Depth::F64)?.into_image::<f64>()?;
    for ch in 0..a.channels() {
        let (da, db) = (a.channel_data(ch)?, b.channel_data(ch)?);
        if let Some(idx) = da
            .iter()
            .zip(db.iter())
            .position(|(x, y)| x != y && !(x.is_nan() && y.is_nan()))
        {
            return Ok(Some((ch, idx)));
        }
    }
    Ok(None)
}
