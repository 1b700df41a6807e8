//! Numeric type abstractions for arithmetic-only code paths.
//!
//! [`IntOrNumeric`] is implemented for every integer and floating-point scalar
//! that [`Traits`](crate::traits::Traits) reports as `IS_INT_OR_NUMERIC`.
//! [`Ordered`] gives those types a total order so they can live in a
//! `BinaryHeap`.

use core::cmp::Ordering;
use core::fmt;
use num_traits::{Bounded, NumCast, ToPrimitive};

/// Trait for the integer and floating-point scalars.
///
/// # Example
///
/// ```rust
/// use fz_core::IntOrNumeric;
///
/// fn midpoint<T: IntOrNumeric>(a: T, b: T) -> Option<T> {
///     T::from_f64_lossy((a.to_f64_lossy() + b.to_f64_lossy()) / 2.0)
/// }
///
/// assert_eq!(midpoint(2i32, 3i32), Some(2));
/// assert_eq!(midpoint(2.0f64, 3.0f64), Some(2.5));
/// ```
pub trait IntOrNumeric:
    Copy + PartialOrd + NumCast + ToPrimitive + Bounded + Default + fmt::Debug + 'static
{
    /// Whether the type is a floating-point type.
    const IS_FLOAT: bool;

    /// Convert to `f64`, losing precision for wide integers.
    #[must_use]
    fn to_f64_lossy(self) -> f64;

    /// Narrow an `f64` into this type.
    ///
    /// Integers truncate toward zero. Returns `None` when the value is out of
    /// range (or NaN for integer targets).
    #[must_use]
    fn from_f64_lossy(value: f64) -> Option<Self> {
        <Self as NumCast>::from(value)
    }

    /// Convert from any other numeric type, failing when out of range.
    #[must_use]
    fn cast_from<U: IntOrNumeric>(value: U) -> Option<Self> {
        <Self as NumCast>::from(value)
    }

    /// Total comparison; NaN orders after every other value.
    #[must_use]
    fn total_cmp_fn(&self, other: &Self) -> Ordering;
}

macro_rules! impl_int_or_numeric_for_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntOrNumeric for $ty {
                const IS_FLOAT: bool = false;

                #[inline]
                fn to_f64_lossy(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn total_cmp_fn(&self, other: &Self) -> Ordering {
                    self.cmp(other)
                }
            }
        )*
    };
}

impl_int_or_numeric_for_int!(i8, i16, i32, i64, u8, u16, u32, u64);

impl IntOrNumeric for f32 {
    const IS_FLOAT: bool = true;

    #[inline]
    fn to_f64_lossy(self) -> f64 {
        <f64 as From<Self>>::from(self)
    }

    #[inline]
    fn total_cmp_fn(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}

impl IntOrNumeric for f64 {
    const IS_FLOAT: bool = true;

    #[inline]
    fn to_f64_lossy(self) -> f64 {
        self
    }

    #[inline]
    fn total_cmp_fn(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}

/// Wrapper that orders a numeric value with [`IntOrNumeric::total_cmp_fn`].
#[derive(Clone, Copy, Debug)]
pub struct Ordered<T>(pub T);

impl<T: IntOrNumeric> PartialEq for Ordered<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp_fn(&other.0) == Ordering::Equal
    }
}

impl<T: IntOrNumeric> Eq for Ordered<T> {}

impl<T: IntOrNumeric> PartialOrd for Ordered<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: IntOrNumeric> Ord for Ordered<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp_fn(&other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    #[test]
    fn test_is_float() {
        assert!(f32::IS_FLOAT);
        assert!(f64::IS_FLOAT);
        assert!(!i8::IS_FLOAT);
        assert!(!u64::IS_FLOAT);
    }

    #[test]
    fn test_to_f64_lossy() {
        assert_eq!(42.5f32.to_f64_lossy(), 42.5);
        assert_eq!((-7i16).to_f64_lossy(), -7.0);
        assert_eq!(7u64.to_f64_lossy(), 7.0);
    }

    #[test]
    fn test_from_f64_lossy_truncates_integers() {
        assert_eq!(i32::from_f64_lossy(2.5), Some(2));
        assert_eq!(i32::from_f64_lossy(-2.5), Some(-2));
        assert_eq!(u8::from_f64_lossy(300.0), None);
        assert_eq!(i64::from_f64_lossy(f64::NAN), None);
        assert_eq!(f32::from_f64_lossy(0.5), Some(0.5f32));
    }

    #[test]
    fn test_cast_from() {
        assert_eq!(i8::cast_from(100i64), Some(100i8));
        assert_eq!(i8::cast_from(1000i64), None);
        assert_eq!(f64::cast_from(3u16), Some(3.0));
    }

    #[test]
    fn test_total_cmp_nan_ordering() {
        let mut values = vec![1.0f64, f64::NAN, 2.0, 0.5];
        values.sort_by(|a, b| a.total_cmp_fn(b));

        assert_eq!(values[0], 0.5);
        assert_eq!(values[1], 1.0);
        assert_eq!(values[2], 2.0);
        assert!(values[3].is_nan());
    }

    #[test]
    fn test_ordered_in_heap() {
        let mut heap: BinaryHeap<Ordered<f64>> = [3.0, 1.0, 2.0].into_iter().map(Ordered).collect();
        assert_eq!(heap.pop().map(|v| v.0), Some(3.0));
        assert_eq!(heap.pop().map(|v| v.0), Some(2.0));
        assert_eq!(heap.pop().map(|v| v.0), Some(1.0));
    }
}
