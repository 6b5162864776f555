//! Iterators and traversal walks over an `AvlMap`.

use std::collections::VecDeque;
use std::fmt;
use std::iter::FusedIterator;

use crate::node::{Link, Node};

/// An iterator over the entries of a map, in ascending key order.
pub struct Iter<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
    remaining: usize,
}

/// A mutable iterator over the entries of a map, in ascending key order.
pub struct IterMut<'a, K, V> {
    stack: Vec<(&'a K, &'a mut V, Option<&'a mut Node<K, V>>)>,
    remaining: usize,
}

/// An owning iterator over the entries of a map, in ascending key order.
pub struct IntoIter<K, V> {
    stack: Vec<Box<Node<K, V>>>,
    remaining: usize,
}

/// An iterator over the keys of a map.
pub struct Keys<'a, K, V> {
    iter: Iter<'a, K, V>,
}

/// An iterator over the values of a map.
pub struct Values<'a, K, V> {
    iter: Iter<'a, K, V>,
}

/// A mutable iterator over the values of a map.
pub struct ValuesMut<'a, K, V> {
    iter: IterMut<'a, K, V>,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(root: &'a Link<K, V>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left_spine(root.as_deref());
        iter
    }

    fn push_left_spine(&mut self, mut current: Option<&'a Node<K, V>>) {
        while let Some(node) = current {
            self.stack.push(node);
            current = node.left.as_deref();
        }
    }
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(crate) fn new(root: &'a mut Link<K, V>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left_spine(root.as_deref_mut());
        iter
    }

    fn push_left_spine(&mut self, mut current: Option<&'a mut Node<K, V>>) {
        while let Some(node) = current {
            let Node {
                key,
                value,
                left,
                right,
                ..
            } = node;
            self.stack.push((&*key, value, right.as_deref_mut()));
            current = left.as_deref_mut();
        }
    }
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(root: Link<K, V>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut current: Link<K, V>) {
        while let Some(mut node) = current {
            current = node.left.take();
            self.stack.push(node);
        }
    }
}

impl<'a, K, V> Keys<'a, K, V> {
    pub(crate) fn new(iter: Iter<'a, K, V>) -> Self {
        Self { iter }
    }
}

impl<'a, K, V> Values<'a, K, V> {
    pub(crate) fn new(iter: Iter<'a, K, V>) -> Self {
        Self { iter }
    }
}

impl<'a, K, V> ValuesMut<'a, K, V> {
    pub(crate) fn new(iter: IterMut<'a, K, V>) -> Self {
        Self { iter }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, value, right) = self.stack.pop()?;
        self.push_left_spine(right);
        self.remaining -= 1;
        Some((key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let mut node = self.stack.pop()?;
        self.push_left_spine(node.right.take());
        self.remaining -= 1;
        let Node { key, value, .. } = *node;
        Some((key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for Keys<'_, K, V> {}
impl<K, V> FusedIterator for Values<'_, K, V> {}
impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

// Auto derived Clone would require K: Clone and V: Clone
impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            iter: self.iter.clone(),
        }
    }
}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            iter: self.iter.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K: fmt::Debug, V> fmt::Debug for Keys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K, V: fmt::Debug> fmt::Debug for Values<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

pub(crate) fn preorder<K, V, F: FnMut(&K, &V)>(link: &Link<K, V>, f: &mut F) {
    if let Some(node) = link {
        f(&node.key, &node.value);
        preorder(&node.left, f);
        preorder(&node.right, f);
    }
}

pub(crate) fn inorder<K, V, F: FnMut(&K, &V)>(link: &Link<K, V>, f: &mut F) {
    if let Some(node) = link {
        inorder(&node.left, f);
        f(&node.key, &node.value);
        inorder(&node.right, f);
    }
}

pub(crate) fn postorder<K, V, F: FnMut(&K, &V)>(link: &Link<K, V>, f: &mut F) {
    if let Some(node) = link {
        postorder(&node.left, f);
        postorder(&node.right, f);
        f(&node.key, &node.value);
    }
}

pub(crate) fn level_order<K, V, F: FnMut(&K, &V)>(link: &Link<K, V>, f: &mut F) {
    let mut queue: VecDeque<&Node<K, V>> = link.as_deref().into_iter().collect();
    while let Some(node) = queue.pop_front() {
        f(&node.key, &node.value);
        queue.extend(node.left.as_deref());
        queue.extend(node.right.as_deref());
    }
}

/// Reverse in-order walk, right subtree first, passing each node's depth (root is 0).
pub(crate) fn sideways<K, V, F: FnMut(&K, &V, usize)>(link: &Link<K, V>, depth: usize, f: &mut F) {
    if let Some(node) = link {
        sideways(&node.right, depth + 1, f);
        f(&node.key, &node.value, depth);
        sideways(&node.left, depth + 1, f);
    }
}
