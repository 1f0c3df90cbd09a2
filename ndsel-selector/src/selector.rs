//! The [`Selector`] value type and its index arithmetic.

use smallvec::smallvec;

use crate::axis::AxisSelection;
use crate::iter::Indices;
use crate::{Result, SVec, SelectorError};

// ============================================================================
// Helpers
// ============================================================================

/// Row-major strides of a dense block with the given extents.
pub fn row_major_strides(extent: &[usize]) -> SVec<usize> {
    let mut strides: SVec<usize> = smallvec![1; extent.len()];
    for i in (0..extent.len().saturating_sub(1)).rev() {
        strides[i] = strides[i + 1] * extent[i + 1];
    }
    strides
}

/// Visible elements of a `start..stop` window walked with `stride`.
#[inline]
fn window_len(start: usize, stop: usize, stride: usize) -> usize {
    stop.saturating_sub(start).div_ceil(stride)
}

/// Two adjacent axes seen as one arithmetic progression of flat positions.
#[derive(Debug, Clone, Copy)]
struct Run {
    start: usize,
    step: usize,
    len: usize,
}

// ============================================================================
// Selector
// ============================================================================

/// A rectangular, possibly strided window into a row-major index space.
///
/// Each axis has an `extent` (the size of the parent space), a half-open
/// `start..stop` window and a `stride`. The window is visited at
/// `start, start + stride, ...` while below `stop`, so the visible length of
/// an axis is `ceil((stop - start) / stride)`.
///
/// Selectors are values: every operation except [`next`](Self::next) returns
/// a new selector. Equality is structural over all four per-axis vectors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    extent: SVec<usize>,
    start: SVec<usize>,
    stop: SVec<usize>,
    stride: SVec<usize>,
}

impl Default for Selector {
    fn default() -> Self {
        Self::scalar()
    }
}

impl Selector {
    /// Selector covering every element of a space with the given extents.
    pub fn new(extent: &[usize]) -> Self {
        Self {
            extent: SVec::from_slice(extent),
            start: smallvec![0; extent.len()],
            stop: SVec::from_slice(extent),
            stride: smallvec![1; extent.len()],
        }
    }

    /// The rank-0 selector. It has no axes and exactly one element.
    pub fn scalar() -> Self {
        Self {
            extent: SVec::new(),
            start: SVec::new(),
            stop: SVec::new(),
            stride: SVec::new(),
        }
    }

    /// Build a selector from explicit per-axis parts.
    ///
    /// Requires equal lengths, `stride >= 1` and
    /// `start <= stop <= extent` on every axis.
    pub fn from_parts(
        extent: &[usize],
        start: &[usize],
        stop: &[usize],
        stride: &[usize],
    ) -> Result<Self> {
        let rank = extent.len();
        for len in [start.len(), stop.len(), stride.len()] {
            if len != rank {
                return Err(SelectorError::RankMismatch(len, rank));
            }
        }
        for axis in 0..rank {
            if stride[axis] == 0 {
                return Err(SelectorError::InvalidSelector(format!(
                    "zero stride on axis {axis}"
                )));
            }
            if start[axis] > stop[axis] || stop[axis] > extent[axis] {
                return Err(SelectorError::InvalidSelector(format!(
                    "window {}..{} on axis {axis} does not fit extent {}",
                    start[axis], stop[axis], extent[axis]
                )));
            }
        }
        Ok(Self {
            extent: SVec::from_slice(extent),
            start: SVec::from_slice(start),
            stop: SVec::from_slice(stop),
            stride: SVec::from_slice(stride),
        })
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.extent.len()
    }

    #[inline]
    pub fn extent(&self) -> &[usize] {
        &self.extent
    }

    #[inline]
    pub fn start(&self) -> &[usize] {
        &self.start
    }

    #[inline]
    pub fn stop(&self) -> &[usize] {
        &self.stop
    }

    #[inline]
    pub fn stride(&self) -> &[usize] {
        &self.stride
    }

    /// Visible length of one axis.
    #[inline]
    pub fn len_of(&self, axis: usize) -> usize {
        window_len(self.start[axis], self.stop[axis], self.stride[axis])
    }

    /// Visible length of every axis.
    pub fn shape(&self) -> SVec<usize> {
        (0..self.rank()).map(|axis| self.len_of(axis)).collect()
    }

    /// Number of visible elements; 1 for rank 0.
    pub fn size(&self) -> usize {
        (0..self.rank()).map(|axis| self.len_of(axis)).product()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Flat-position step between neighbours along each axis.
    pub fn strides(&self) -> SVec<usize> {
        let mut strides = row_major_strides(&self.extent);
        for (s, k) in strides.iter_mut().zip(self.stride.iter()) {
            *s *= k;
        }
        strides
    }

    /// Whether the selector covers its whole space in order.
    pub fn is_contiguous(&self) -> bool {
        (0..self.rank()).all(|axis| {
            self.start[axis] == 0 && self.stop[axis] == self.extent[axis] && self.stride[axis] == 1
        })
    }

    /// Whether a view-relative index lies inside [`shape`](Self::shape).
    pub fn contains(&self, index: &[usize]) -> bool {
        index.len() == self.rank()
            && index
                .iter()
                .enumerate()
                .all(|(axis, &i)| i < self.len_of(axis))
    }

    fn check_axis(&self, axis: usize) -> Result<()> {
        if axis >= self.rank() {
            return Err(SelectorError::InvalidAxis {
                axis,
                rank: self.rank(),
            });
        }
        Ok(())
    }

    /// Flat position of a view-relative index.
    pub fn flat_offset(&self, index: &[usize]) -> Result<usize> {
        if index.len() != self.rank() {
            return Err(SelectorError::RankMismatch(index.len(), self.rank()));
        }
        let row = row_major_strides(&self.extent);
        let mut offset = 0;
        for (axis, &i) in index.iter().enumerate() {
            let len = self.len_of(axis);
            if i >= len {
                return Err(SelectorError::IndexOutOfBounds {
                    axis,
                    index: i,
                    len,
                });
            }
            offset += (self.start[axis] + i * self.stride[axis]) * row[axis];
        }
        Ok(offset)
    }

    /// Flat position of an absolute index, as produced by [`next`](Self::next).
    pub fn flat_position(&self, absolute: &[usize]) -> usize {
        debug_assert_eq!(absolute.len(), self.rank());
        let row = row_major_strides(&self.extent);
        absolute.iter().zip(row.iter()).map(|(i, s)| i * s).sum()
    }

    /// Map an absolute index back to view-relative coordinates.
    pub fn relative(&self, absolute: &[usize]) -> SVec<usize> {
        absolute
            .iter()
            .enumerate()
            .map(|(axis, &i)| (i - self.start[axis]) / self.stride[axis])
            .collect()
    }

    // ------------------------------------------------------------------------
    // Narrowing
    // ------------------------------------------------------------------------

    /// Narrow one axis to `start..stop` (relative), walked with `step`.
    pub fn narrow(&self, axis: usize, start: usize, stop: usize, step: usize) -> Result<Self> {
        self.check_axis(axis)?;
        if step == 0 {
            return Err(SelectorError::InvalidSelector(format!(
                "zero step on axis {axis}"
            )));
        }
        let len = self.len_of(axis);
        if start > len {
            return Err(SelectorError::IndexOutOfBounds {
                axis,
                index: start,
                len,
            });
        }
        if stop > len {
            return Err(SelectorError::IndexOutOfBounds {
                axis,
                index: stop,
                len,
            });
        }
        if start > stop {
            return Err(SelectorError::InvalidSelector(format!(
                "range {start}..{stop} on axis {axis} is reversed"
            )));
        }

        let mut out = self.clone();
        let base = self.start[axis];
        let k = self.stride[axis];
        out.stop[axis] = self.stop[axis].min(base + stop * k);
        out.start[axis] = (base + start * k).min(out.stop[axis]);
        out.stride[axis] = k * step;
        log::trace!(
            "narrow axis {axis}: {}..{} step {} -> {}..{} step {}",
            self.start[axis],
            self.stop[axis],
            k,
            out.start[axis],
            out.stop[axis],
            out.stride[axis]
        );
        Ok(out)
    }

    /// Multiply the stride of one axis by `k`, keeping its window.
    pub fn skip(&self, axis: usize, k: usize) -> Result<Self> {
        self.check_axis(axis)?;
        if k == 0 {
            return Err(SelectorError::InvalidSelector(format!(
                "zero skip on axis {axis}"
            )));
        }
        let mut out = self.clone();
        out.stride[axis] *= k;
        Ok(out)
    }

    /// Fix one axis at a relative position and remove it.
    ///
    /// The axis is narrowed to a single element and then combined with a
    /// neighbour, so the result still addresses the same buffer positions.
    /// Fixing the only axis of a rank-1 selector yields the rank-0 selector,
    /// which carries no position; use [`flat_offset`](Self::flat_offset) to
    /// locate that element.
    pub fn fix(&self, axis: usize, index: usize) -> Result<Self> {
        self.check_axis(axis)?;
        let len = self.len_of(axis);
        if index >= len {
            return Err(SelectorError::IndexOutOfBounds { axis, index, len });
        }
        let narrowed = self.narrow(axis, index, index + 1, 1)?;
        match self.rank() {
            1 => Ok(Self::scalar()),
            rank if axis + 1 < rank => narrowed.combine(axis),
            _ => narrowed.combine(axis - 1),
        }
    }

    /// Apply per-axis selections.
    ///
    /// Selections address the leading axes in order; axes without a
    /// selection are kept whole. Each [`AxisSelection::Index`] removes its
    /// axis, so the result rank is `rank - #indices`.
    pub fn select(&self, selections: &[AxisSelection]) -> Result<Self> {
        if selections.len() > self.rank() {
            return Err(SelectorError::RankMismatch(selections.len(), self.rank()));
        }
        let mut out = self.clone();
        // Position in `out` of the axis the next selection applies to.
        let mut axis = 0;
        for selection in selections {
            match *selection {
                AxisSelection::All => axis += 1,
                AxisSelection::Index(i) => out = out.fix(axis, i)?,
                AxisSelection::Range { start, stop, step } => {
                    let stop = stop.unwrap_or_else(|| out.len_of(axis));
                    out = out.narrow(axis, start, stop, step)?;
                    axis += 1;
                }
            }
        }
        Ok(out)
    }

    /// Forget the parent space: the visible region becomes a dense,
    /// zero-based space of the same shape.
    pub fn reset(&self) -> Self {
        Self::new(&self.shape())
    }

    // ------------------------------------------------------------------------
    // Merging axes
    // ------------------------------------------------------------------------

    /// Visible positions of `axis` and `axis + 1` in the merged axis, when
    /// they form one arithmetic progression.
    fn merged_run(&self, axis: usize) -> Result<Option<Run>> {
        if axis + 1 >= self.rank() {
            return Err(SelectorError::InvalidAxis {
                axis: axis + 1,
                rank: self.rank(),
            });
        }
        let inner_extent = self.extent[axis + 1];
        let outer_len = self.len_of(axis);
        let inner_len = self.len_of(axis + 1);
        let outer_step = self.stride[axis] * inner_extent;
        let inner_step = self.stride[axis + 1];

        let step = if outer_len <= 1 {
            inner_step
        } else if inner_len <= 1 {
            outer_step
        } else if inner_step * inner_len == outer_step {
            // Rows tile: the last element of one row is one step before the
            // first element of the next.
            inner_step
        } else {
            return Ok(None);
        };

        Ok(Some(Run {
            start: self.start[axis] * inner_extent + self.start[axis + 1],
            step,
            len: outer_len * inner_len,
        }))
    }

    /// Replace `axis` and `axis + 1` with one axis holding `run`.
    fn merge(&self, axis: usize, run: Run) -> Self {
        let extent = self.extent[axis] * self.extent[axis + 1];
        let (start, stop) = if run.len == 0 {
            let at = run.start.min(extent);
            (at, at)
        } else {
            (run.start, run.start + (run.len - 1) * run.step + 1)
        };

        let mut out = self.clone();
        out.extent[axis] = extent;
        out.start[axis] = start;
        out.stop[axis] = stop;
        out.stride[axis] = run.step;
        out.extent.remove(axis + 1);
        out.start.remove(axis + 1);
        out.stop.remove(axis + 1);
        out.stride.remove(axis + 1);
        out
    }

    /// Merge `axis` and `axis + 1` into one unit-stride axis.
    ///
    /// The visible elements of both axes must occupy consecutive flat
    /// positions; the new window starts at
    /// `start[axis] * extent[axis + 1] + start[axis + 1]`. Strided windows
    /// that leave gaps are rejected with [`SelectorError::InvalidCollapse`];
    /// [`combine`](Self::combine) accepts them when the gaps are regular.
    pub fn collapse(&self, axis: usize) -> Result<Self> {
        match self.merged_run(axis)? {
            Some(run) if run.step == 1 || run.len <= 1 => {
                log::trace!("collapse axis {axis}: flat start {}", run.start);
                Ok(self.merge(axis, Run { step: 1, ..run }))
            }
            _ => Err(SelectorError::InvalidCollapse { axis }),
        }
    }

    /// Merge `axis` and `axis + 1` into one axis, keeping a skip.
    ///
    /// Accepts any pair whose visible elements form one arithmetic
    /// progression of flat positions. That is the case when either axis
    /// shows at most one element, or when the inner rows tile exactly. The
    /// progression's step becomes the merged axis' stride.
    pub fn combine(&self, axis: usize) -> Result<Self> {
        match self.merged_run(axis)? {
            Some(run) => {
                log::trace!(
                    "combine axis {axis}: flat start {} skip {}",
                    run.start,
                    run.step
                );
                Ok(self.merge(axis, run))
            }
            None => Err(SelectorError::InvalidCollapse { axis }),
        }
    }

    // ------------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------------

    /// The absolute index of the first visible element, or `None` if the
    /// selector is empty. For rank 0 this is the empty index.
    pub fn first(&self) -> Option<SVec<usize>> {
        if self.is_empty() {
            None
        } else {
            Some(self.start.clone())
        }
    }

    /// Advance an absolute index to the next visible element, last axis
    /// fastest.
    ///
    /// Returns `false` once the region is exhausted; `index` is then left
    /// equal to `stop`.
    pub fn next(&self, index: &mut [usize]) -> bool {
        debug_assert_eq!(index.len(), self.rank());
        if !self.is_empty() {
            for axis in (0..self.rank()).rev() {
                index[axis] += self.stride[axis];
                if index[axis] < self.stop[axis] {
                    return true;
                }
                index[axis] = self.start[axis];
            }
        }
        index.copy_from_slice(&self.stop);
        false
    }

    /// Iterate the absolute indices of all visible elements.
    pub fn indices(&self) -> Indices<'_> {
        Indices::new(self)
    }
}

impl<'a> IntoIterator for &'a Selector {
    type Item = SVec<usize>;
    type IntoIter = Indices<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.indices()
    }
}
