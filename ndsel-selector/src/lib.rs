//! Strided N-dimensional index selectors.
//!
//! A [`Selector`] describes a rectangular, possibly strided sub-region of a
//! row-major index space: for every axis it records the full `extent` of the
//! parent space and the visible `start..stop` window walked with a `stride`
//! (the "skip"). It carries no data; `ndsel` pairs it with a shared buffer.
//!
//! # Example
//!
//! ```rust
//! use ndsel_selector::{s, Selector};
//!
//! let sel = Selector::new(&[10, 12]);
//! let rows = sel.select(s![2..8]).unwrap();
//! assert_eq!(rows.shape().as_slice(), &[6, 12]);
//!
//! // Selecting within a selection composes.
//! let inner = rows.select(s![2..4]).unwrap();
//! assert_eq!(inner, sel.select(s![4..6]).unwrap());
//!
//! // A single index drops the axis.
//! let column = sel.select(s![.., 3]).unwrap();
//! assert_eq!(column.rank(), 1);
//! assert_eq!(column.size(), 10);
//! ```

pub mod axis;
pub mod iter;
pub mod selector;

pub use axis::AxisSelection;
pub use iter::Indices;
pub use selector::Selector;

use smallvec::SmallVec;

/// Number of axes stored inline before per-axis vectors spill to the heap.
pub const INLINE_RANK: usize = 8;

/// Per-axis storage used throughout the selector API.
pub type SVec<T> = SmallVec<[T; INLINE_RANK]>;

/// Errors raised by selector arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("index {index} out of bounds for axis {axis} of length {len}")]
    IndexOutOfBounds { axis: usize, index: usize, len: usize },

    #[error("axis {axis} cannot be merged with the next axis into a single run")]
    InvalidCollapse { axis: usize },

    #[error("invalid axis {axis} for rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },

    #[error("rank mismatch: {0} vs {1}")]
    RankMismatch(usize, usize),

    #[error("invalid selector: {0}")]
    InvalidSelector(String),
}

/// Result type for selector operations.
pub type Result<T> = std::result::Result<T, SelectorError>;
