//! Core traits for lineflow numeric operations.
//!
//! The primary trait is [`SeriesElement`], which provides a common interface
//! for numeric operations on time series data, abstracting over `f32` and
//! `f64`. Uninitialized line slots hold NaN, so the element type must carry
//! the full IEEE float surface.
//!
//! # Example
//!
//! ```
//! use lineflow::traits::SeriesElement;
//!
//! fn mean<T: SeriesElement>(data: &[T]) -> lineflow::Result<T> {
//!     let n = T::from_usize(data.len())?;
//!     let sum = data.iter().fold(T::zero(), |acc, &x| acc + x);
//!     Ok(sum / n)
//! }
//!
//! let m = mean(&[1.0_f64, 2.0, 3.0]).unwrap();
//! assert!((m - 2.0).abs() < 1e-10);
//! ```

use num_traits::{Float, NumCast};

use crate::error::{Error, Result};

/// A trait for types that can be used as elements in a line buffer.
///
/// This abstracts over `f32` and `f64`, extending `num_traits::Float` with
/// the conversions the engine needs for period arithmetic.
///
/// # Type Bounds
///
/// - `Float`: standard floating-point operations (NaN handling, arithmetic)
/// - `NumCast`: safe conversion between numeric types
/// - `Copy` + `Default`: values are cheap to move and have a zero default
/// - `'static`: elements are stored in boxed node logic
pub trait SeriesElement: Float + NumCast + Copy + Default + 'static {
    /// Creates a series element from a `usize` value.
    ///
    /// Commonly used to convert period parameters to the element type.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the value cannot be
    /// represented in this type.
    #[inline]
    fn from_usize(value: usize) -> Result<Self> {
        <Self as NumCast>::from(value).ok_or(Error::NumericConversion {
            context: "usize to series element",
        })
    }

    /// Creates a series element from an `f64` value.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the value cannot be
    /// represented in this type.
    #[inline]
    fn from_f64(value: f64) -> Result<Self> {
        <Self as NumCast>::from(value).ok_or(Error::NumericConversion {
            context: "f64 to series element",
        })
    }

    /// Returns the constant 2 as this type.
    ///
    /// Used in EMA smoothing: `alpha = 2 / (period + 1)`.
    #[inline]
    #[must_use]
    fn two() -> Self {
        // Safe unwrap: 2 is always representable in Float types
        <Self as NumCast>::from(2).unwrap()
    }
}

// Blanket implementation for all types that satisfy the bounds
impl<T: Float + NumCast + Copy + Default + 'static> SeriesElement for T {}

/// Validates that a period is usable for warm-up arithmetic.
///
/// # Errors
///
/// Returns `Error::InvalidPeriod` if the period is zero.
#[inline]
pub const fn validate_period(period: usize) -> Result<()> {
    if period == 0 {
        Err(Error::InvalidPeriod {
            period,
            reason: "period must be at least 1",
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_element_from_usize() {
        let val: f64 = SeriesElement::from_usize(42).unwrap();
        assert!((val - 42.0).abs() < 1e-10);

        let val_f32: f32 = SeriesElement::from_usize(100).unwrap();
        assert!((val_f32 - 100.0).abs() < 1e-5);
    }

    #[test]
    fn test_series_element_from_f64() {
        let val: f64 = SeriesElement::from_f64(std::f64::consts::PI).unwrap();
        assert!((val - std::f64::consts::PI).abs() < 1e-10);
    }

    #[test]
    fn test_series_element_two() {
        let two_f64: f64 = SeriesElement::two();
        assert!((two_f64 - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_validate_period_success() {
        assert!(validate_period(1).is_ok());
        assert!(validate_period(100).is_ok());
    }

    #[test]
    fn test_validate_period_zero() {
        let result = validate_period(0);
        match result {
            Err(Error::InvalidPeriod { period, reason }) => {
                assert_eq!(period, 0);
                assert!(!reason.is_empty());
            }
            _ => panic!("Expected InvalidPeriod error"),
        }
    }

    #[test]
    fn test_nan_is_representable() {
        let nan: f64 = Float::nan();
        assert!(nan.is_nan());
    }
}
