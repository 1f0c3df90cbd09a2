//! Elementwise arithmetic.
//!
//! Binary operators with an array or scalar operand produce new owned
//! arrays; compound assignment operators write through the left-hand view.
//! The `try_*` methods report [`NdError::ShapeMismatch`](crate::NdError)
//! where the operators panic.

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::array::NdArray;
use crate::{Element, Result};

impl<T: Element> NdArray<T> {
    /// New owned array of `f` applied pairwise to `self` and `other`.
    pub fn zip_map<F>(&self, other: &Self, mut f: F) -> Result<Self>
    where
        F: FnMut(T, T) -> T,
    {
        self.check_same_shape(other)?;
        let data: Vec<T> = self
            .iter()
            .zip(other.iter())
            .map(|(a, b)| f(a, b))
            .collect();
        NdArray::from_shape_vec(&self.shape(), data)
    }

    pub fn try_add(&self, other: &Self) -> Result<Self> {
        self.zip_map(other, |a, b| a + b)
    }

    pub fn try_sub(&self, other: &Self) -> Result<Self> {
        self.zip_map(other, |a, b| a - b)
    }

    pub fn try_mul(&self, other: &Self) -> Result<Self> {
        self.zip_map(other, |a, b| a * b)
    }

    pub fn try_div(&self, other: &Self) -> Result<Self> {
        self.zip_map(other, |a, b| a / b)
    }

    /// In-place `self += other`; `other` may share this view's buffer.
    pub fn try_add_assign(&mut self, other: &Self) -> Result<()> {
        self.zip_apply(other, |a, b| a + b)
    }

    pub fn try_sub_assign(&mut self, other: &Self) -> Result<()> {
        self.zip_apply(other, |a, b| a - b)
    }

    pub fn try_mul_assign(&mut self, other: &Self) -> Result<()> {
        self.zip_apply(other, |a, b| a * b)
    }

    pub fn try_div_assign(&mut self, other: &Self) -> Result<()> {
        self.zip_apply(other, |a, b| a / b)
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $try:ident, $assign_trait:ident, $assign_method:ident, $try_assign:ident, $op:tt) => {
        /// # Panics
        /// Panics if the shapes differ.
        impl<T: Element> $trait<&NdArray<T>> for &NdArray<T> {
            type Output = NdArray<T>;

            fn $method(self, rhs: &NdArray<T>) -> NdArray<T> {
                match self.$try(rhs) {
                    Ok(out) => out,
                    Err(err) => panic!("{}: {err}", stringify!($method)),
                }
            }
        }

        /// # Panics
        /// Panics if the shapes differ.
        impl<T: Element> $trait<&NdArray<T>> for NdArray<T> {
            type Output = NdArray<T>;

            fn $method(self, rhs: &NdArray<T>) -> NdArray<T> {
                &self $op rhs
            }
        }

        impl<T: Element> $trait<T> for &NdArray<T> {
            type Output = NdArray<T>;

            fn $method(self, rhs: T) -> NdArray<T> {
                self.map(|x| x $op rhs)
            }
        }

        impl<T: Element> $trait<T> for NdArray<T> {
            type Output = NdArray<T>;

            fn $method(self, rhs: T) -> NdArray<T> {
                &self $op rhs
            }
        }

        impl<T: Element> $assign_trait<T> for NdArray<T> {
            fn $assign_method(&mut self, rhs: T) {
                self.apply_inplace(|x| x $op rhs);
            }
        }

        /// # Panics
        /// Panics if the shapes differ.
        impl<T: Element> $assign_trait<&NdArray<T>> for NdArray<T> {
            fn $assign_method(&mut self, rhs: &NdArray<T>) {
                if let Err(err) = self.$try_assign(rhs) {
                    panic!("{}: {err}", stringify!($assign_method));
                }
            }
        }
    };
}

impl_binary_op!(Add, add, try_add, AddAssign, add_assign, try_add_assign, +);
impl_binary_op!(Sub, sub, try_sub, SubAssign, sub_assign, try_sub_assign, -);
impl_binary_op!(Mul, mul, try_mul, MulAssign, mul_assign, try_mul_assign, *);
impl_binary_op!(Div, div, try_div, DivAssign, div_assign, try_div_assign, /);

impl<T: Element> Neg for &NdArray<T> {
    type Output = NdArray<T>;

    fn neg(self) -> NdArray<T> {
        self.map(|x| -x)
    }
}

impl<T: Element> Neg for NdArray<T> {
    type Output = NdArray<T>;

    fn neg(self) -> NdArray<T> {
        -&self
    }
}

#[cfg(test)]
mod tests {
    use crate::{s, NdArray, NdError};
    use approx::assert_relative_eq;

    #[test]
    fn test_scalar_ops_make_new_arrays() {
        let a = NdArray::<f64>::full(&[2, 3], 2.0);
        let b = &a + 1.0;
        assert!(b.iter().all(|x| x == 3.0));
        assert!(!b.shares(&a));
        assert!(a.iter().all(|x| x == 2.0));

        assert!((&a - 0.5).iter().all(|x| x == 1.5));
        assert!((&a * 4.0).iter().all(|x| x == 8.0));
        assert!((a / 8.0).iter().all(|x| x == 0.25));
    }

    #[test]
    fn test_array_ops() {
        let a = NdArray::from_vec(vec![1.0, 2.0, 3.0]);
        let b = NdArray::from_vec(vec![4.0, 5.0, 6.0]);
        assert_eq!((&a + &b).to_vec(), vec![5.0, 7.0, 9.0]);
        assert_eq!((&b - &a).to_vec(), vec![3.0, 3.0, 3.0]);
        assert_eq!((&a * &b).to_vec(), vec![4.0, 10.0, 18.0]);
        let q = &b / &a;
        assert_relative_eq!(q.get(&[2]).unwrap(), 2.0);
        assert_eq!((-&a).to_vec(), vec![-1.0, -2.0, -3.0]);
    }

    #[test]
    fn test_compound_assign_in_place() {
        let mut a = NdArray::<f64>::full(&[4], 2.0);
        let alias = a.share();
        a += &alias;
        assert!(a.iter().all(|x| x == 4.0));
        assert!(alias.iter().all(|x| x == 4.0));

        a -= 1.0;
        a *= 2.0;
        a /= 3.0;
        assert!(a.iter().all(|x| x == 2.0));
    }

    #[test]
    fn test_assign_through_view_reaches_parent() {
        let a = NdArray::<f64>::zeros(&[2, 3]);
        let mut row = a.at(1).unwrap();
        row += 5.0;
        assert_eq!(a.to_vec(), vec![0.0, 0.0, 0.0, 5.0, 5.0, 5.0]);

        let mut col = a.select(s![.., 0]).unwrap();
        col *= &NdArray::from_vec(vec![3.0, 2.0]);
        assert_eq!(a.to_vec(), vec![0.0, 0.0, 0.0, 10.0, 5.0, 5.0]);
    }

    #[test]
    fn test_shape_mismatch() {
        let a = NdArray::<f64>::zeros(&[2, 3]);
        let b = NdArray::<f64>::zeros(&[3, 2]);
        assert!(matches!(a.try_add(&b), Err(NdError::ShapeMismatch(..))));
        let mut c = a.share();
        assert!(matches!(
            c.try_mul_assign(&b),
            Err(NdError::ShapeMismatch(..))
        ));
    }

    #[test]
    #[should_panic(expected = "shape mismatch")]
    fn test_operator_panics_on_mismatch() {
        let a = NdArray::<f64>::zeros(&[2]);
        let b = NdArray::<f64>::zeros(&[3]);
        let _ = &a + &b;
    }

    #[test]
    fn test_division_by_zero_is_ieee() {
        let a = NdArray::<f64>::from_vec(vec![1.0, 0.0, -1.0]);
        let q = &a / 0.0;
        let v = q.to_vec();
        assert!(v[0].is_infinite() && v[0] > 0.0);
        assert!(v[1].is_nan());
        assert!(v[2].is_infinite() && v[2] < 0.0);
    }

    #[test]
    fn test_ops_on_strided_view() {
        let a = NdArray::<f64>::arange(10);
        let evens = a.select(s![(0, 10, 2)]).unwrap();
        let odds = a.select(s![(1, 10, 2)]).unwrap();
        let sum = &evens + &odds;
        assert_eq!(sum.to_vec(), vec![1.0, 5.0, 9.0, 13.0, 17.0]);
        assert!(sum.is_contiguous());
    }
}
