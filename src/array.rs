//! The [`NdArray`] container and its view operations.

use std::fmt;

use ndsel_selector::{AxisSelection, SVec, Selector};

use crate::buffer::Buffer;
use crate::iter::{IndexedIter, Iter};
use crate::{Element, NdError, Result};

/// Dense floating-point array of runtime rank, or a view into one.
///
/// An array is a handle: a shared [`Buffer`] plus a [`Selector`] saying which
/// buffer positions are visible and in what shape, and a base `offset` added
/// to every position. Views created by [`select`](Self::select) or
/// [`at`](Self::at) share the buffer with their parent, so writes through a
/// view are visible through the parent.
///
/// Handles are not `Clone`: use [`share`](Self::share) for another handle to
/// the same view and [`copy`](Self::copy) for independent storage.
pub struct NdArray<T: Element = f64> {
    buffer: Option<Buffer<T>>,
    selector: Selector,
    offset: usize,
}

impl<T: Element> Default for NdArray<T> {
    fn default() -> Self {
        Self::empty(1)
    }
}

// ============================================================================
// Construction
// ============================================================================

impl<T: Element> NdArray<T> {
    fn view(buffer: Option<Buffer<T>>, selector: Selector, offset: usize) -> Self {
        Self {
            buffer,
            selector,
            offset,
        }
    }

    /// Array of the given rank with no buffer and zero length on every axis.
    pub fn empty(rank: usize) -> Self {
        Self::view(None, Selector::new(&vec![0; rank]), 0)
    }

    /// Owned array with every element set to `value`.
    pub fn full(shape: &[usize], value: T) -> Self {
        let len = shape.iter().product();
        Self::view(Some(Buffer::filled(len, value)), Selector::new(shape), 0)
    }

    pub fn zeros(shape: &[usize]) -> Self {
        Self::full(shape, T::zero())
    }

    pub fn ones(shape: &[usize]) -> Self {
        Self::full(shape, T::one())
    }

    /// Rank-1 array holding `data`.
    pub fn from_vec(data: Vec<T>) -> Self {
        let len = data.len();
        Self::view(Some(Buffer::from_vec(data)), Selector::new(&[len]), 0)
    }

    /// Array of the given shape over row-major `data`.
    pub fn from_shape_vec(shape: &[usize], data: Vec<T>) -> Result<Self> {
        let len: usize = shape.iter().product();
        if len != data.len() {
            return Err(NdError::ShapeMismatch(shape.to_vec(), vec![data.len()]));
        }
        Ok(Self::view(
            Some(Buffer::from_vec(data)),
            Selector::new(shape),
            0,
        ))
    }

    /// Array whose element at each index is `f(index)`.
    pub fn from_fn<F>(shape: &[usize], mut f: F) -> Self
    where
        F: FnMut(&[usize]) -> T,
    {
        let selector = Selector::new(shape);
        let data: Vec<T> = selector.indices().map(|index| f(index.as_slice())).collect();
        Self::view(Some(Buffer::from_vec(data)), selector, 0)
    }

    /// Rank-1 array `0, 1, ..., n - 1`.
    pub fn arange(n: usize) -> Self {
        Self::from_vec((0..n).map(T::from_usize).collect())
    }

    /// Array of the given shape holding `0, 1, 2, ...` in row-major order.
    pub fn arange_shape(shape: &[usize]) -> Self {
        let len = shape.iter().product();
        let data: Vec<T> = (0..len).map(T::from_usize).collect();
        Self::view(Some(Buffer::from_vec(data)), Selector::new(shape), 0)
    }

    /// Rank-0 array holding one value.
    pub fn scalar(value: T) -> Self {
        Self::view(Some(Buffer::filled(1, value)), Selector::scalar(), 0)
    }

    /// Allocate zero-filled storage for an array without a buffer.
    pub fn resize(&mut self, shape: &[usize]) -> Result<()> {
        if self.buffer.is_some() {
            return Err(NdError::ResizeOnNonEmpty(shape.to_vec()));
        }
        *self = Self::zeros(shape);
        Ok(())
    }
}

impl<T: Element> From<T> for NdArray<T> {
    fn from(value: T) -> Self {
        Self::scalar(value)
    }
}

impl<T: Element> From<Vec<T>> for NdArray<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}

// ============================================================================
// Queries
// ============================================================================

impl<T: Element> NdArray<T> {
    #[inline]
    pub fn rank(&self) -> usize {
        self.selector.rank()
    }

    #[inline]
    pub fn shape(&self) -> SVec<usize> {
        self.selector.shape()
    }

    /// Number of visible elements; 0 without a buffer.
    pub fn size(&self) -> usize {
        match self.buffer {
            Some(_) => self.selector.size(),
            None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    #[inline]
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    #[inline]
    pub fn buffer(&self) -> Option<&Buffer<T>> {
        self.buffer.as_ref()
    }

    /// Base buffer position added to every selector position.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Whether a view-relative index addresses an element.
    pub fn contains(&self, index: &[usize]) -> bool {
        self.buffer.is_some() && self.selector.contains(index)
    }

    /// First buffer position when the visible elements occupy consecutive
    /// positions in iteration order.
    fn contiguous_start(&self) -> Option<usize> {
        let mut selector = self.selector.clone();
        while selector.rank() > 1 {
            selector = selector.collapse(0).ok()?;
        }
        match selector.rank() {
            0 => Some(self.offset),
            _ if selector.stride()[0] == 1 || selector.size() <= 1 => {
                Some(self.offset + selector.start()[0])
            }
            _ => None,
        }
    }

    /// Whether the visible elements are stored back to back, in order.
    pub fn is_contiguous(&self) -> bool {
        self.buffer.is_some() && self.contiguous_start().is_some()
    }

    /// Buffer and position of a view-relative index.
    fn locate(&self, index: &[usize]) -> Result<(&Buffer<T>, usize)> {
        let buffer = self.buffer.as_ref().ok_or(NdError::NoBuffer)?;
        Ok((buffer, self.offset + self.selector.flat_offset(index)?))
    }

    /// Buffer positions of the visible elements, in iteration order.
    /// Only meaningful when the array has a buffer.
    pub(crate) fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.selector
            .indices()
            .map(move |index| self.offset + self.selector.flat_position(&index))
    }
}

// ============================================================================
// Identity
// ============================================================================

impl<T: Element> NdArray<T> {
    /// Another handle to the same buffer, selector and offset.
    pub fn share(&self) -> Self {
        Self::view(self.buffer.clone(), self.selector.clone(), self.offset)
    }

    /// Independent, contiguous copy of the visible elements.
    pub fn copy(&self) -> Self {
        let selector = self.selector.reset();
        match self.buffer {
            Some(_) => Self::view(Some(Buffer::from_vec(self.to_vec())), selector, 0),
            None => Self::view(None, selector, 0),
        }
    }

    /// Make this handle refer to `other`'s view. Values are not copied.
    pub fn rebind(&mut self, other: &Self) {
        self.buffer = other.buffer.clone();
        self.selector = other.selector.clone();
        self.offset = other.offset;
    }

    /// Whether both handles use the same buffer. Two handles without a
    /// buffer count as sharing.
    pub fn shares(&self, other: &Self) -> bool {
        match (&self.buffer, &other.buffer) {
            (Some(a), Some(b)) => a.ptr_eq(b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Whether both handles are the same view of the same buffer.
    pub fn is(&self, other: &Self) -> bool {
        self.shares(other) && self.selector == other.selector && self.offset == other.offset
    }
}

// ============================================================================
// Views
// ============================================================================

impl<T: Element> NdArray<T> {
    /// View selected by per-axis selections; shares the buffer.
    ///
    /// Each [`AxisSelection::Index`] removes an axis. Positions are relative
    /// to this view.
    pub fn select(&self, selections: &[AxisSelection]) -> Result<Self> {
        let rank = self.rank();
        if rank > 0 && selections.len() == rank && selections.iter().all(|s| s.reduces_dim()) {
            // Every axis fixed: the element position moves into the offset.
            let index: SVec<usize> = selections
                .iter()
                .filter_map(|s| match *s {
                    AxisSelection::Index(i) => Some(i),
                    _ => None,
                })
                .collect();
            let offset = self.offset + self.selector.flat_offset(&index)?;
            log::trace!("select element at position {offset}");
            return Ok(Self::view(self.buffer.clone(), Selector::scalar(), offset));
        }
        let selector = self.selector.select(selections)?;
        log::trace!(
            "select view: shape {:?} -> {:?}",
            self.shape().as_slice(),
            selector.shape().as_slice()
        );
        Ok(Self::view(self.buffer.clone(), selector, self.offset))
    }

    /// View with the leading axis fixed at `i`.
    pub fn at(&self, i: usize) -> Result<Self> {
        self.select(&[AxisSelection::Index(i)])
    }

    /// Same elements in a new shape.
    ///
    /// Shares the buffer when the view is contiguous, otherwise reshapes a
    /// copy.
    pub fn reshape(&self, shape: &[usize]) -> Result<Self> {
        let len: usize = shape.iter().product();
        if len != self.selector.size() {
            return Err(NdError::ShapeMismatch(
                shape.to_vec(),
                self.shape().to_vec(),
            ));
        }
        match (self.buffer.is_some(), self.contiguous_start()) {
            (true, Some(start)) => Ok(Self::view(
                self.buffer.clone(),
                Selector::new(shape),
                start,
            )),
            (true, None) => {
                log::debug!("reshape of a strided view copies {len} elements");
                self.copy().reshape(shape)
            }
            (false, _) => Ok(Self::view(None, Selector::new(shape), 0)),
        }
    }
}

// ============================================================================
// Element access
// ============================================================================

impl<T: Element> NdArray<T> {
    /// Value at a view-relative index.
    pub fn get(&self, index: &[usize]) -> Result<T> {
        let (buffer, pos) = self.locate(index)?;
        Ok(buffer.get(pos))
    }

    /// Write the value at a view-relative index.
    pub fn set(&mut self, index: &[usize], value: T) -> Result<()> {
        let (buffer, pos) = self.locate(index)?;
        buffer.set(pos, value);
        Ok(())
    }

    /// Value of a rank-0 array.
    pub fn value(&self) -> Result<T> {
        self.get(&[])
    }

    /// Write the value of a rank-0 array.
    pub fn set_value(&mut self, value: T) -> Result<()> {
        self.set(&[], value)
    }

    /// Visible elements in iteration order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Visible elements with their view-relative indices.
    pub fn indexed_iter(&self) -> IndexedIter<'_, T> {
        IndexedIter::new(self)
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    pub fn sum(&self) -> T {
        self.iter().fold(T::zero(), |acc, x| acc + x)
    }

    /// New owned array of `f` applied to every element.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: FnMut(T) -> T,
    {
        let data: Vec<T> = self.iter().map(f).collect();
        match self.buffer {
            Some(_) => Self::view(Some(Buffer::from_vec(data)), self.selector.reset(), 0),
            None => Self::view(None, self.selector.reset(), 0),
        }
    }
}

// ============================================================================
// Mutation through the view
// ============================================================================

impl<T: Element> NdArray<T> {
    /// Replace every visible element with `f(element)`.
    pub fn apply_inplace<F>(&mut self, mut f: F)
    where
        F: FnMut(T) -> T,
    {
        let Some(buffer) = &self.buffer else {
            return;
        };
        // The closure may read through another handle on this buffer.
        let updated: Vec<T> = self.iter().map(&mut f).collect();
        let mut data = buffer.borrow_mut();
        for (pos, value) in self.positions().zip(updated) {
            data[pos] = value;
        }
    }

    /// Set every visible element to `value`.
    pub fn fill(&mut self, value: T) {
        self.apply_inplace(|_| value);
    }

    /// Combine every visible element with the matching element of `other`.
    ///
    /// `other` is read completely before the first write, so it may alias
    /// this view.
    pub(crate) fn zip_apply<F>(&mut self, other: &Self, mut f: F) -> Result<()>
    where
        F: FnMut(T, T) -> T,
    {
        self.check_same_shape(other)?;
        let values = other.to_vec();
        let Some(buffer) = &self.buffer else {
            return if values.is_empty() {
                Ok(())
            } else {
                Err(NdError::NoBuffer)
            };
        };
        let mut data = buffer.borrow_mut();
        for (pos, v) in self.positions().zip(values) {
            data[pos] = f(data[pos], v);
        }
        Ok(())
    }

    /// Copy the values of `other` into this view elementwise.
    pub fn assign(&mut self, other: &Self) -> Result<()> {
        self.zip_apply(other, |_, v| v)
    }

    pub(crate) fn check_same_shape(&self, other: &Self) -> Result<()> {
        let (a, b) = (self.shape(), other.shape());
        if a != b {
            return Err(NdError::ShapeMismatch(a.to_vec(), b.to_vec()));
        }
        Ok(())
    }
}

// ============================================================================
// Comparison and formatting
// ============================================================================

/// Value equality. Arrays of different shapes are unequal.
impl<T: Element> PartialEq for NdArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape()
            && self.size() == other.size()
            && self.iter().eq(other.iter())
    }
}

/// A rank-0 array equals the value it holds.
impl<T: Element> PartialEq<T> for NdArray<T> {
    fn eq(&self, other: &T) -> bool {
        self.rank() == 0 && self.value().is_ok_and(|v| v == *other)
    }
}

impl<T: Element> fmt::Debug for NdArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NdArray")
            .field("shape", &self.shape().as_slice())
            .field("data", &self.to_vec())
            .finish()
    }
}
