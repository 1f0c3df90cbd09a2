//! Reference-counted N-dimensional arrays with strided selector views.
//!
//! An [`NdArray`] pairs a shared flat [`Buffer`] with a [`Selector`] that
//! picks which elements are visible and in what shape. Slicing produces new
//! views over the same buffer; nothing is copied until asked for.
//!
//! # Core Types
//!
//! - [`NdArray`]: dense floating-point array or view of runtime rank
//! - [`Buffer`]: the shared, reference-counted element block
//! - [`Selector`] / [`AxisSelection`]: index arithmetic (from `ndsel-selector`)
//!
//! # Own, share, copy
//!
//! - [`NdArray::share`]: another handle to the same view ([`NdArray::is`] holds)
//! - [`NdArray::copy`]: an independent, contiguous copy of the visible elements
//! - [`NdArray::rebind`]: make an existing handle refer to another view
//!
//! # Example
//!
//! ```rust
//! use ndsel::{s, NdArray};
//!
//! let a = NdArray::<f64>::zeros(&[3, 4]);
//! let mut row = a.select(s![1]).unwrap();
//! row.fill(2.0);
//!
//! // The view writes through to `a`.
//! assert!(row.shares(&a));
//! assert_eq!(a.get(&[1, 3]).unwrap(), 2.0);
//! assert_eq!(a.get(&[0, 3]).unwrap(), 0.0);
//!
//! // Arithmetic produces new arrays.
//! let b = &row + 1.0;
//! assert!(!b.shares(&a));
//! assert!(b.iter().all(|x| x == 3.0));
//! ```
//!
//! # Logging
//!
//! Buffer allocations are reported at `debug` level and view creation at
//! `trace` level through the [`log`] facade. No logger is installed.

pub mod array;
pub mod buffer;
pub mod iter;
pub mod ops;
pub mod stack;

#[cfg(feature = "approx")]
mod approx_impl;

pub use array::NdArray;
pub use buffer::Buffer;
pub use iter::{IndexedIter, Iter};
pub use stack::stack;

pub use ndsel_selector::{s, AxisSelection, Indices, SVec, Selector, SelectorError};
pub use ndsel_traits::Element;

/// Errors raised by array operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NdError {
    #[error(transparent)]
    Selector(#[from] SelectorError),

    #[error("shape mismatch: {0:?} vs {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),

    #[error("cannot resize to {0:?}: array already owns data")]
    ResizeOnNonEmpty(Vec<usize>),

    #[error("array has no buffer")]
    NoBuffer,
}

impl NdError {
    /// Whether this is an out-of-bounds index, wherever it was detected.
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(
            self,
            NdError::Selector(SelectorError::IndexOutOfBounds { .. })
        )
    }
}

/// Result type for array operations.
pub type Result<T> = std::result::Result<T, NdError>;
