//! Regression test parameters and operations

use crate::error::TestError;
use rapp_core::Bitmap;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Compare results (default)
    #[default]
    Compare,
    /// Compare results and print the bitmaps involved
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// Tracks the test name, the running comparison index and every failure
/// recorded so far. Comparisons never panic; the test asserts on
/// [`RegParams::cleanup`] at the end.
pub struct RegParams {
    /// Name of the test (e.g., "bitblt")
    pub test_name: String,
    /// Current test index (incremented before each comparison)
    index: usize,
    /// Test mode
    pub mode: RegTestMode,
    /// Recorded failures
    failures: Vec<TestError>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// # Arguments
    ///
    /// * `test_name` - Name of the test (e.g., "bitblt")
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
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

    fn fail(&mut self, err: TestError) {
        eprintln!("Failure in {}_reg: {}", self.test_name, err);
        self.failures.push(err);
    }

    /// Compare two numeric values
    ///
    /// # Arguments
    ///
    /// * `expected` - Expected value
    /// * `actual` - Actual computed value
    /// * `delta` - Maximum allowed difference
    ///
    /// # Returns
    ///
    /// `true` if values match within delta, `false` otherwise.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        if (expected - actual).abs() > delta {
            self.fail(TestError::ValueMismatch {
                index: self.index,
                expected,
                actual,
                delta,
            });
            false
        } else {
            true
        }
    }

    /// Compare two byte strings for equality
    pub fn compare_strings(&mut self, data1: &[u8], data2: &[u8]) -> bool {
        self.index += 1;
        if data1 != data2 {
            let at = data1
                .iter()
                .zip(data2)
                .position(|(a, b)| a != b)
                .unwrap_or(data1.len().min(data2.len()));
            self.fail(TestError::ValueMismatch {
                index: self.index,
                expected: data1.get(at).map_or(-1.0, |&b| b as f64),
                actual: data2.get(at).map_or(-1.0, |&b| b as f64),
                delta: 0.0,
            });
            false
        } else {
            true
        }
    }

    /// Compare the image pixels of two bitmaps. Margins are ignored.
    pub fn compare_bitmaps(&mut self, expected: &Bitmap, actual: &Bitmap) -> bool {
        self.index += 1;
        match expected.first_difference(actual) {
            None => true,
            Some((x, y)) => {
                if self.display() {
                    eprintln!("expected:\n{expected}actual:\n{actual}");
                }
                self.fail(TestError::BitmapMismatch {
                    index: self.index,
                    x,
                    y,
                });
                false
            }
        }
    }

    /// Clean up and report results
    ///
    /// # Returns
    ///
    /// `true` if all comparisons passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        if self.failures.is_empty() {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.failures.is_empty()
    }

    /// Check if all comparisons have passed so far
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Get list of failures
    pub fn failures(&self) -> &[TestError] {
        &self.failures
    }
}
