//! Per-axis selection arguments for [`Selector::select`](crate::Selector::select).

use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive};

/// What to keep of one axis.
///
/// Positions are relative to the axis' currently visible elements, so a
/// selection applied to an already-sliced selector is expressed in the
/// slice's own coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisSelection {
    /// Keep the axis unchanged.
    All,
    /// Fix the axis at one position; the axis is removed.
    Index(usize),
    /// Keep every `step`-th element of `start..stop`. A missing `stop` means
    /// the end of the axis.
    Range {
        start: usize,
        stop: Option<usize>,
        step: usize,
    },
}

impl AxisSelection {
    /// Unit-step range `start..stop`.
    pub fn range(start: usize, stop: usize) -> Self {
        Self::Range {
            start,
            stop: Some(stop),
            step: 1,
        }
    }

    /// Range `start..stop` walked with `step`.
    pub fn strided(start: usize, stop: usize, step: usize) -> Self {
        Self::Range {
            start,
            stop: Some(stop),
            step,
        }
    }

    /// Whether this selection removes its axis.
    pub fn reduces_dim(&self) -> bool {
        matches!(self, Self::Index(_))
    }
}

// Negative indices never name an element; they map to a position that fails
// the bounds check.
fn to_position<I: TryInto<usize>>(i: I) -> usize {
    i.try_into().unwrap_or(usize::MAX)
}

macro_rules! impl_axis_selection_from {
    ($($int:ty),+) => {
        $(
            impl From<$int> for AxisSelection {
                fn from(i: $int) -> Self {
                    AxisSelection::Index(to_position(i))
                }
            }

            impl From<Range<$int>> for AxisSelection {
                fn from(r: Range<$int>) -> Self {
                    AxisSelection::range(to_position(r.start), to_position(r.end))
                }
            }

            impl From<RangeFrom<$int>> for AxisSelection {
                fn from(r: RangeFrom<$int>) -> Self {
                    AxisSelection::Range {
                        start: to_position(r.start),
                        stop: None,
                        step: 1,
                    }
                }
            }

            impl From<RangeTo<$int>> for AxisSelection {
                fn from(r: RangeTo<$int>) -> Self {
                    AxisSelection::range(0, to_position(r.end))
                }
            }

            impl From<RangeInclusive<$int>> for AxisSelection {
                fn from(r: RangeInclusive<$int>) -> Self {
                    AxisSelection::range(
                        to_position(*r.start()),
                        to_position(*r.end()).saturating_add(1),
                    )
                }
            }

            impl From<RangeToInclusive<$int>> for AxisSelection {
                fn from(r: RangeToInclusive<$int>) -> Self {
                    AxisSelection::range(0, to_position(r.end).saturating_add(1))
                }
            }

            impl From<($int, $int)> for AxisSelection {
                fn from((start, stop): ($int, $int)) -> Self {
                    AxisSelection::range(to_position(start), to_position(stop))
                }
            }

            impl From<($int, $int, $int)> for AxisSelection {
                fn from((start, stop, step): ($int, $int, $int)) -> Self {
                    AxisSelection::strided(to_position(start), to_position(stop), to_position(step))
                }
            }
        )+
    };
}

impl_axis_selection_from!(usize, u32, i32, i64);

impl From<RangeFull> for AxisSelection {
    fn from(_: RangeFull) -> Self {
        AxisSelection::All
    }
}

/// Build a `&[AxisSelection]` from indices, ranges, `..` and
/// `(start, stop)` / `(start, stop, step)` tuples.
///
/// ```rust
/// use ndsel_selector::{s, AxisSelection};
///
/// let sel = s![1, 0..4, .., (0, 10, 2)];
/// assert_eq!(sel[0], AxisSelection::Index(1));
/// assert_eq!(sel[2], AxisSelection::All);
/// assert_eq!(sel[3], AxisSelection::strided(0, 10, 2));
/// ```
#[macro_export]
macro_rules! s {
    () => {
        &[] as &[$crate::AxisSelection]
    };
    ($($sel:expr),+ $(,)?) => {
        &[$($crate::AxisSelection::from($sel)),+]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(AxisSelection::from(3usize), AxisSelection::Index(3));
        assert_eq!(AxisSelection::from(2..5), AxisSelection::range(2, 5));
        assert_eq!(AxisSelection::from(2..=5), AxisSelection::range(2, 6));
        assert_eq!(AxisSelection::from(..4), AxisSelection::range(0, 4));
        assert_eq!(AxisSelection::from(..=4), AxisSelection::range(0, 5));
        assert_eq!(
            AxisSelection::from(3..),
            AxisSelection::Range {
                start: 3,
                stop: None,
                step: 1
            }
        );
        assert_eq!(AxisSelection::from(..), AxisSelection::All);
        assert_eq!(AxisSelection::from((1, 9, 3)), AxisSelection::strided(1, 9, 3));
    }

    #[test]
    fn test_negative_index_is_unreachable() {
        assert_eq!(AxisSelection::from(-1), AxisSelection::Index(usize::MAX));
    }

    #[test]
    fn test_reduces_dim() {
        assert!(AxisSelection::Index(0).reduces_dim());
        assert!(!AxisSelection::All.reduces_dim());
        assert!(!AxisSelection::range(0, 1).reduces_dim());
    }

    #[test]
    fn test_macro() {
        let sel = s![0, 1..3, ..];
        assert_eq!(sel.len(), 3);
        assert!(s![].is_empty());
    }
}
