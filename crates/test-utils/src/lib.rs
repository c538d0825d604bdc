//! Shared test utilities for the CTM query workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Test data path helpers
//! - Skip macros for optional model files
//! - Synthetic thermal model generators
//! - CDL fixtures
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Macro to skip a test if the required file is not found.
///
/// Real thermal models are tens to hundreds of megabytes and are not
/// committed; tests that need one skip when it is absent.
///
/// ```ignore
/// use test_utils::require_test_file;
///
/// #[test]
/// fn test_lee_model() {
///     let path = require_test_file!("Lee_2025.nc");
/// }
/// ```
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!(
                    "SKIPPED: Test file '{}' not found. Download the model or set TEST_DATA_DIR.",
                    $name
                );
                return;
            }
        }
    }};
}

/// Assert two `f64` values are within `epsilon` (default `1e-9`).
///
/// NaN never compares equal, so a NaN on either side fails.
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(interp.point(-117.5, 34.0, 1000.0)?, 36.25);
/// assert_approx_eq!(gradient, 25.0, 1e-6);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr) => {
        $crate::assert_approx_eq!($left, $right, 1e-9)
    };
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let (left, right, epsilon): (f64, f64, f64) = ($left as f64, $right as f64, $epsilon as f64);
        if !((left - right).abs() <= epsilon) {
            panic!(
                "values differ: {} = {:?}, {} = {:?} (tolerance {:?})",
                stringify!($left),
                left,
                stringify!($right),
                right,
                epsilon
            );
        }
    }};
}
