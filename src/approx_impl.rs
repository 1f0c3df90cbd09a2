//! `approx` comparisons for arrays, enabled by the `approx` feature.
//!
//! Arrays compare approximately equal when their shapes match and every
//! pair of corresponding elements does.

use approx::{AbsDiffEq, RelativeEq, UlpsEq};

use crate::array::NdArray;
use crate::Element;

impl<T> AbsDiffEq for NdArray<T>
where
    T: Element + AbsDiffEq<Epsilon = T>,
{
    type Epsilon = T;

    fn default_epsilon() -> T {
        T::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: T) -> bool {
        self.shape() == other.shape()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a.abs_diff_eq(&b, epsilon))
    }
}

impl<T> RelativeEq for NdArray<T>
where
    T: Element + RelativeEq<Epsilon = T>,
{
    fn default_max_relative() -> T {
        T::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: T, max_relative: T) -> bool {
        self.shape() == other.shape()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a.relative_eq(&b, epsilon, max_relative))
    }
}

impl<T> UlpsEq for NdArray<T>
where
    T: Element + UlpsEq<Epsilon = T>,
{
    fn default_max_ulps() -> u32 {
        T::default_max_ulps()
    }

    fn ulps_eq(&self, other: &Self, epsilon: T, max_ulps: u32) -> bool {
        self.shape() == other.shape()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a.ulps_eq(&b, epsilon, max_ulps))
    }
}
