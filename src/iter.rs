//! Iterator types for [`Map`](crate::Map).
//!
//! All iterators walk the trie depth-first: a node's inline leaves in
//! fragment order, then each child subtree in fragment order. The sequence
//! depends only on the set of keys and the hasher.

use std::iter::FusedIterator;
use std::slice;
use std::sync::Arc;

use crate::node::{Leaf, Node};
use crate::value::Value;

/// Iterator over `(&str, &Value)` pairs in canonical order.
pub struct Iter<'a> {
    stack: Vec<&'a Node>,
    leaves: slice::Iter<'a, Arc<Leaf>>,
    remaining: usize,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(root: &'a Node, len: usize) -> Self {
        Self {
            stack: vec![root],
            leaves: slice::Iter::default(),
            remaining: len,
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(leaf) = self.leaves.next() {
                self.remaining -= 1;
                return Some((leaf.key.as_str(), &leaf.value));
            }
            match self.stack.pop()? {
                Node::Branch(branch) => {
                    self.leaves = branch.leaves.iter();
                    // Reversed so the lowest fragment is popped first.
                    self.stack
                        .extend(branch.children.iter().rev().map(AsRef::as_ref));
                }
                Node::Collision(bucket) => self.leaves = bucket.leaves.iter(),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

/// Iterator over keys in canonical order.
pub struct Keys<'a> {
    inner: Iter<'a>,
}

impl<'a> Keys<'a> {
    pub(crate) const fn new(inner: Iter<'a>) -> Self {
        Self { inner }
    }
}

impl<'a> Iterator for Keys<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Keys<'_> {}

impl FusedIterator for Keys<'_> {}

/// Iterator over values in canonical key order.
pub struct Values<'a> {
    inner: Iter<'a>,
}

impl<'a> Values<'a> {
    pub(crate) const fn new(inner: Iter<'a>) -> Self {
        Self { inner }
    }
}

impl<'a> Iterator for Values<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Values<'_> {}

impl FusedIterator for Values<'_> {}
