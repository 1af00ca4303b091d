//! Utility functions for lineflow.
//!
//! Floating-point comparison helpers and NaN-prefix inspection, shared by
//! the test suites and exposed for user convenience.
//!
//! # Example
//!
//! ```
//! use lineflow::utils::{approx_eq, count_nan_prefix, EPSILON};
//!
//! assert!(approx_eq(1.0 / 3.0, 0.333333333333333, EPSILON * 10.0));
//! assert_eq!(count_nan_prefix(&[f64::NAN, f64::NAN, 1.0, f64::NAN]), 2);
//! ```

use crate::traits::SeriesElement;

/// Standard epsilon for high-precision floating-point comparisons.
pub const EPSILON: f64 = 1e-10;

/// Looser epsilon for comparisons involving accumulated floating-point
/// operations.
pub const LOOSE_EPSILON: f64 = 1e-6;

/// Approximate equality check for floating-point values.
///
/// Returns `true` if `a` and `b` are within `tolerance` of each other, or
/// if both are NaN (for testing convenience).
#[inline]
#[must_use]
pub fn approx_eq<T: SeriesElement>(a: T, b: T, tolerance: T) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }
    (a - b).abs() < tolerance
}

/// Relative approximate equality check for floating-point values.
///
/// More appropriate than absolute tolerance when comparing values of
/// varying magnitudes.
#[inline]
#[must_use]
pub fn approx_eq_relative<T: SeriesElement>(a: T, b: T, rel_tolerance: T) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }
    let diff = (a - b).abs();
    let max_abs = a.abs().max(b.abs());
    if max_abs == T::zero() {
        return diff == T::zero();
    }
    diff / max_abs < rel_tolerance
}

/// Counts the leading NaN values of a slice — the warm-up prefix of an
/// output line.
#[must_use]
pub fn count_nan_prefix<T: SeriesElement>(data: &[T]) -> usize {
    data.iter().take_while(|x| x.is_nan()).count()
}

/// Counts every NaN value in a slice.
#[must_use]
pub fn count_nans<T: SeriesElement>(data: &[T]) -> usize {
    data.iter().filter(|x| x.is_nan()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_eq_basic() {
        assert!(approx_eq(1.0, 1.0 + 1e-11, EPSILON));
        assert!(!approx_eq(1.0, 2.0, EPSILON));
    }

    #[test]
    fn test_approx_eq_nan_handling() {
        assert!(approx_eq(f64::NAN, f64::NAN, EPSILON));
        assert!(!approx_eq(f64::NAN, 1.0, EPSILON));
        assert!(!approx_eq(1.0, f64::NAN, EPSILON));
    }

    #[test]
    fn test_approx_eq_relative() {
        assert!(approx_eq_relative(1e10, 1e10 + 1.0, 1e-9));
        assert!(!approx_eq_relative(1.0, 1.1, 1e-3));
        assert!(approx_eq_relative(0.0, 0.0, 1e-10));
    }

    #[test]
    fn test_count_nan_prefix() {
        assert_eq!(count_nan_prefix(&[f64::NAN, f64::NAN, 1.0]), 2);
        assert_eq!(count_nan_prefix(&[1.0, f64::NAN]), 0);
        let empty: [f64; 0] = [];
        assert_eq!(count_nan_prefix(&empty), 0);
    }

    #[test]
    fn test_count_nans() {
        assert_eq!(count_nans(&[f64::NAN, 1.0, f64::NAN]), 2);
        assert_eq!(count_nans(&[1.0, 2.0]), 0);
    }
}
