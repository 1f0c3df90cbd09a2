//! Lazy traversal of a selector's visible indices.

use std::iter::FusedIterator;

use crate::{SVec, Selector};

/// Iterator over the absolute indices of a [`Selector`], last axis fastest.
///
/// Built on [`Selector::next`]; yields exactly [`Selector::size`] items.
/// Call [`Selector::indices`] again to restart.
#[derive(Debug, Clone)]
pub struct Indices<'a> {
    selector: &'a Selector,
    current: Option<SVec<usize>>,
    remaining: usize,
}

impl<'a> Indices<'a> {
    pub(crate) fn new(selector: &'a Selector) -> Self {
        Self {
            selector,
            current: selector.first(),
            remaining: selector.size(),
        }
    }
}

impl Iterator for Indices<'_> {
    type Item = SVec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.as_mut()?;
        let item = current.clone();
        if !self.selector.next(current) {
            self.current = None;
        }
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Indices<'_> {}

impl FusedIterator for Indices<'_> {}
