//! Element iterators over an array's visible region.

use std::iter::FusedIterator;

use ndsel_selector::{Indices, SVec, Selector};

use crate::array::NdArray;
use crate::buffer::Buffer;
use crate::Element;

/// Walks the selector's absolute indices and reads the matching buffer
/// positions. Each read borrows the buffer only for that element, so other
/// handles may write between steps.
#[derive(Debug, Clone)]
struct Cursor<'a, T> {
    buffer: Option<&'a Buffer<T>>,
    selector: &'a Selector,
    indices: Indices<'a>,
    offset: usize,
}

impl<'a, T: Element> Cursor<'a, T> {
    fn new(array: &'a NdArray<T>) -> Self {
        Self {
            buffer: array.buffer(),
            selector: array.selector(),
            indices: array.selector().indices(),
            offset: array.offset(),
        }
    }

    fn step(&mut self) -> Option<(SVec<usize>, T)> {
        let buffer = self.buffer?;
        let index = self.indices.next()?;
        let value = buffer.get(self.offset + self.selector.flat_position(&index));
        Some((index, value))
    }

    fn remaining(&self) -> usize {
        match self.buffer {
            Some(_) => self.indices.len(),
            None => 0,
        }
    }
}

/// Iterator over the visible elements of an [`NdArray`], last axis fastest.
#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
    cursor: Cursor<'a, T>,
}

impl<'a, T: Element> Iter<'a, T> {
    pub(crate) fn new(array: &'a NdArray<T>) -> Self {
        Self {
            cursor: Cursor::new(array),
        }
    }
}

impl<T: Element> Iterator for Iter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.cursor.step().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.cursor.remaining();
        (n, Some(n))
    }
}

impl<T: Element> ExactSizeIterator for Iter<'_, T> {}

impl<T: Element> FusedIterator for Iter<'_, T> {}

/// Iterator over `(index, value)` pairs, with indices relative to the view.
#[derive(Debug, Clone)]
pub struct IndexedIter<'a, T> {
    cursor: Cursor<'a, T>,
}

impl<'a, T: Element> IndexedIter<'a, T> {
    pub(crate) fn new(array: &'a NdArray<T>) -> Self {
        Self {
            cursor: Cursor::new(array),
        }
    }
}

impl<T: Element> Iterator for IndexedIter<'_, T> {
    type Item = (SVec<usize>, T);

    fn next(&mut self) -> Option<Self::Item> {
        let (absolute, value) = self.cursor.step()?;
        Some((self.cursor.selector.relative(&absolute), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.cursor.remaining();
        (n, Some(n))
    }
}

impl<T: Element> ExactSizeIterator for IndexedIter<'_, T> {}

impl<'a, T: Element> IntoIterator for &'a NdArray<T> {
    type Item = T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::{s, NdArray};

    #[test]
    fn test_rank1_order() {
        let a = NdArray::from_vec(vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(a.size(), 5);
        assert_eq!(a.get(&[4]).unwrap(), 4.0);
        let seen: Vec<f64> = a.iter().collect();
        assert_eq!(seen, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_strided_view_skips_unselected() {
        let a = NdArray::<f64>::arange(12).reshape(&[3, 4]).unwrap();
        let v = a.select(s![(0, 3, 2), (1, 4, 2)]).unwrap();
        assert_eq!(v.iter().len(), 4);
        assert_eq!(v.to_vec(), vec![1.0, 3.0, 9.0, 11.0]);
    }

    #[test]
    fn test_restartable() {
        let a = NdArray::<f64>::arange(6);
        let first: Vec<f64> = a.iter().collect();
        let second: Vec<f64> = (&a).into_iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_indexed_iter_is_view_relative() {
        let a = NdArray::<f64>::arange(12).reshape(&[3, 4]).unwrap();
        let v = a.select(s![1..3, (1, 4, 2)]).unwrap();
        let pairs: Vec<(Vec<usize>, f64)> = v
            .indexed_iter()
            .map(|(index, value)| (index.to_vec(), value))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (vec![0, 0], 5.0),
                (vec![0, 1], 7.0),
                (vec![1, 0], 9.0),
                (vec![1, 1], 11.0),
            ]
        );
    }

    #[test]
    fn test_scalar_and_empty() {
        let x = NdArray::scalar(1.5);
        assert_eq!(x.iter().collect::<Vec<_>>(), vec![1.5]);
        let e = NdArray::<f64>::empty(2);
        assert_eq!(e.iter().count(), 0);
        assert_eq!(e.iter().len(), 0);
    }

    #[test]
    fn test_writes_between_steps_are_seen() {
        let a = NdArray::<f64>::zeros(&[3]);
        let mut b = a.share();
        let mut seen = Vec::new();
        for (i, x) in a.iter().enumerate() {
            seen.push(x);
            if i + 1 < 3 {
                b.set(&[i + 1], 1.0).unwrap();
            }
        }
        assert_eq!(seen, vec![0.0, 1.0, 1.0]);
    }
}
