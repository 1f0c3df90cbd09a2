//! Reference-counted element storage shared between array views.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// A flat block of elements shared by every view created from it.
///
/// Cloning a `Buffer` clones the handle, not the elements. The block is an
/// unsynchronized mutable cell: it is neither `Send` nor `Sync`, and writes
/// through one handle are visible through all others.
pub struct Buffer<T> {
    data: Rc<RefCell<Vec<T>>>,
}

impl<T> Clone for Buffer<T> {
    fn clone(&self) -> Self {
        Self {
            data: Rc::clone(&self.data),
        }
    }
}

impl<T> Buffer<T> {
    /// Take ownership of `data` as a new block.
    pub fn from_vec(data: Vec<T>) -> Self {
        log::debug!("allocate buffer of {} elements", data.len());
        Self {
            data: Rc::new(RefCell::new(data)),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.borrow().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether both handles refer to the same block.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    /// Number of live handles to this block.
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.data)
    }

    pub fn borrow(&self) -> Ref<'_, Vec<T>> {
        self.data.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Vec<T>> {
        self.data.borrow_mut()
    }
}

impl<T: Copy> Buffer<T> {
    /// Block of `len` copies of `value`.
    pub fn filled(len: usize, value: T) -> Self {
        Self::from_vec(vec![value; len])
    }

    /// Read one element.
    ///
    /// # Panics
    /// Panics if `pos` is outside the block.
    #[inline]
    pub fn get(&self, pos: usize) -> T {
        self.data.borrow()[pos]
    }

    /// Write one element.
    ///
    /// # Panics
    /// Panics if `pos` is outside the block.
    #[inline]
    pub fn set(&self, pos: usize, value: T) {
        self.data.borrow_mut()[pos] = value;
    }
}

impl<T: fmt::Debug> fmt::Debug for Buffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("len", &self.data.borrow().len())
            .field("handles", &Rc::strong_count(&self.data))
            .finish()
    }
}
