//! Shared test utilities for the radial travel-time workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Binary grid encoders
//! - Sample grids with known geometry
//! - Temporary library directories
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{GridBuilder, LibraryFixture, SpokeSpec};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Assert two floats agree within a tolerance.
///
/// ```
/// use test_utils::assert_close;
///
/// assert_close!(0.1 + 0.2, 0.3, 1e-12);
/// ```
#[macro_export]
macro_rules! assert_close {
    ($left:expr, $right:expr, $tol:expr) => {{
        let (left, right, tol): (f64, f64, f64) = ($left, $right, $tol);
        assert!(
            (left - right).abs() <= tol,
            "assert_close failed: {} vs {} (tolerance {})",
            left,
            right,
            tol
        );
    }};
}
