//! Element type bounds for array storage and arithmetic.

use std::fmt::Debug;

/// Bound satisfied by every element an `NdArray` can hold.
///
/// Elements are plain floating-point values: copyable, comparable, and closed
/// under the four IEEE arithmetic operations (division by zero yields
/// `inf`/`nan` rather than an error).
pub trait Element: num_traits::Float + Debug + Default + 'static {
    /// Convert a count or position into an element, as used by `arange`.
    fn from_usize(n: usize) -> Self {
        <Self as num_traits::NumCast>::from(n).unwrap_or_else(Self::nan)
    }
}

impl<T> Element for T where T: num_traits::Float + Debug + Default + 'static {}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_element<T: Element>() {}

    #[test]
    fn test_float_types() {
        assert_element::<f32>();
        assert_element::<f64>();
    }

    #[test]
    fn test_from_usize() {
        assert_eq!(<f64 as Element>::from_usize(7), 7.0);
        assert_eq!(<f32 as Element>::from_usize(0), 0.0);
    }

    #[test]
    fn test_ieee_division() {
        fn div<T: Element>(a: T, b: T) -> T {
            a / b
        }
        assert!(div(1.0f64, 0.0).is_infinite());
        assert!(div(0.0f64, 0.0).is_nan());
    }
}
