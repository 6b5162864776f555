//! An ordered map implemented with an AVL tree.

use std::borrow::Borrow;
use std::fmt;
use std::mem;

use crate::error::{InvariantViolation, MapError, Result};
use crate::iter::{self, IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
use crate::node::{self, Link};
use crate::observer::{NoopObserver, RebalanceObserver};

/// An ordered map implemented with an AVL tree.
///
/// Each node owns its two subtrees, so the map needs no parent links and no unsafe code.
/// The observer `O` is told about every rotation, see [`RebalanceObserver`].
///
/// ```
/// use avl_map::{AvlMap, MapError};
/// let mut map = AvlMap::new();
/// map.insert(0, "zero");
/// map.insert(1, "one");
/// map.insert(2, "two");
/// assert_eq!(map.get(&1), Some(&"one"));
/// assert!(map.remove(&1));
/// assert_eq!(map.value(&1), Err(MapError::KeyNotFound));
/// assert_eq!(map.min(), Ok(&0));
/// ```
pub struct AvlMap<K, V, O = NoopObserver> {
    root: Link<K, V>,
    num_nodes: usize,
    observer: O,
}

impl<K, V> AvlMap<K, V> {
    /// Creates an empty map.
    /// No memory is allocated until the first item is inserted.
    pub fn new() -> Self {
        Self::with_observer(NoopObserver)
    }
}

impl<K, V, O> AvlMap<K, V, O> {
    /// Creates an empty map that reports rotations to the given observer.
    pub fn with_observer(observer: O) -> Self {
        Self {
            root: None,
            num_nodes: 0,
            observer,
        }
    }

    /// Returns a reference to the rotation observer.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Returns a mutable reference to the rotation observer.
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Returns true if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Returns the height of the tree. A single entry has height 1, an empty map height 0.
    pub fn height(&self) -> usize {
        node::height(&self.root)
    }

    /// Clears the map, deallocating all memory.
    pub fn clear(&mut self) {
        let freed = node::destroy(&mut self.root);
        debug_assert_eq!(freed, self.num_nodes);
        self.num_nodes = 0;
    }

    /// Returns the smallest key.
    pub fn min(&self) -> Result<&K> {
        self.first_key_value().map(|(key, _)| key).ok_or(MapError::Empty)
    }

    /// Returns the greatest key.
    pub fn max(&self) -> Result<&K> {
        self.last_key_value().map(|(key, _)| key).ok_or(MapError::Empty)
    }

    /// Returns the entry with the smallest key, if any.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        node::leftmost(&self.root).map(|node| (&node.key, &node.value))
    }

    /// Returns the entry with the greatest key, if any.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        node::rightmost(&self.root).map(|node| (&node.key, &node.value))
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.root, self.num_nodes)
    }

    /// Gets a mutable iterator over the entries of the map, sorted by key.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(&mut self.root, self.num_nodes)
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Gets an iterator over the values of the map, in order by key.
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// Gets a mutable iterator over the values of the map, in order by key.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut::new(self.iter_mut())
    }

    /// Visits every entry, each node before its subtrees.
    pub fn traverse_pre_order<F: FnMut(&K, &V)>(&self, mut f: F) {
        iter::preorder(&self.root, &mut f);
    }

    /// Visits every entry in ascending key order.
    pub fn traverse_in_order<F: FnMut(&K, &V)>(&self, mut f: F) {
        iter::inorder(&self.root, &mut f);
    }

    /// Visits every entry, each node after its subtrees.
    pub fn traverse_post_order<F: FnMut(&K, &V)>(&self, mut f: F) {
        iter::postorder(&self.root, &mut f);
    }

    /// Visits every entry level by level, from the root down and left to right.
    pub fn traverse_level_order<F: FnMut(&K, &V)>(&self, mut f: F) {
        iter::level_order(&self.root, &mut f);
    }

    /// Visits every entry in descending key order together with its depth (the root has
    /// depth 0). Indenting each key by its depth draws the tree rotated a quarter turn.
    ///
    /// ```
    /// use avl_map::AvlMap;
    /// let map: AvlMap<_, _> = (1..=3).map(|k| (k, ())).collect();
    /// let mut lines = Vec::new();
    /// map.traverse_sideways(|k, _, depth| lines.push(format!("{}{}", "  ".repeat(depth), k)));
    /// assert_eq!(lines, ["  3", "2", "  1"]);
    /// ```
    pub fn traverse_sideways<F: FnMut(&K, &V, usize)>(&self, mut f: F) {
        iter::sideways(&self.root, 0, &mut f);
    }
}

impl<K: Ord, V, O> AvlMap<K, V, O> {
    /// Returns a reference to the value corresponding to the key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        node::search(&self.root, key).map(|node| &node.value)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        node::search_mut(&mut self.root, key).map(|node| &mut node.value)
    }

    /// Returns references to the key-value pair corresponding to the key.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        node::search(&self.root, key).map(|node| (&node.key, &node.value))
    }

    /// Returns true if the map contains a value for the key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        node::search(&self.root, key).is_some()
    }

    /// Returns a reference to the value corresponding to the key,
    /// or [`MapError::KeyNotFound`].
    pub fn value<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).ok_or(MapError::KeyNotFound)
    }

    /// Returns a mutable reference to the value corresponding to the key,
    /// or [`MapError::KeyNotFound`].
    pub fn value_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get_mut(key).ok_or(MapError::KeyNotFound)
    }

    /// Checks all structural invariants of the tree: key order, balance, cached heights and
    /// the element count.
    pub fn validate(&self) -> std::result::Result<(), InvariantViolation> {
        let mut count = 0;
        node::validate(&self.root, None, None, 0, &mut count)?;
        if count != self.num_nodes {
            return Err(InvariantViolation::LenMismatch {
                cached: self.num_nodes,
                actual: count,
            });
        }
        Ok(())
    }

    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        if let Err(violation) = self.validate() {
            panic!("inconsistent tree: {violation}");
        }
    }
}

impl<K: Ord, V, O: RebalanceObserver<K>> AvlMap<K, V, O> {
    /// Inserts a key-value pair into the map.
    ///
    /// Returns false and leaves the map untouched if the key is already present;
    /// the stored value is kept. Use [`replace`](Self::replace) to overwrite it.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        if node::insert(&mut self.root, key, value, &mut self.observer).is_some() {
            self.num_nodes += 1;
            return true;
        }
        false
    }

    /// Inserts a key-value pair into the map, overwriting the value of an existing key.
    /// Returns the previous value, if any.
    pub fn replace(&mut self, key: K, value: V) -> Option<V> {
        if let Some(current) = self.get_mut(&key) {
            return Some(mem::replace(current, value));
        }
        let inserted = self.insert(key, value);
        debug_assert!(inserted);
        None
    }

    /// Removes a key from the map.
    /// Returns whether the key was previously in the map.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).is_some()
    }

    /// Removes a key from the map, returning the stored key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let removed = node::remove(&mut self.root, key, &mut self.observer)?;
        debug_assert!(self.num_nodes >= 1);
        self.num_nodes -= 1;
        Some(removed)
    }
}

impl<K, V, O> Drop for AvlMap<K, V, O> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K, V, O: Default> Default for AvlMap<K, V, O> {
    fn default() -> Self {
        Self::with_observer(O::default())
    }
}

impl<K: Clone, V: Clone, O: Clone> Clone for AvlMap<K, V, O> {
    fn clone(&self) -> Self {
        Self {
            root: node::copy(&self.root),
            num_nodes: self.num_nodes,
            observer: self.observer.clone(),
        }
    }

    /// Replaces the contents of `self` with a copy of `source`.
    /// The copy is complete before the old tree is torn down, so a panicking `clone` of a
    /// key or value leaves `self` untouched.
    fn clone_from(&mut self, source: &Self) {
        let root = node::copy(&source.root);
        self.clear();
        self.root = root;
        self.num_nodes = source.num_nodes;
        self.observer.clone_from(&source.observer);
    }
}

impl<K: fmt::Debug, V: fmt::Debug, O> fmt::Debug for AvlMap<K, V, O> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq, O> PartialEq for AvlMap<K, V, O> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, O> Eq for AvlMap<K, V, O> {}

/// Builds a map from key-value pairs. When a key repeats, its first value is kept.
impl<K: Ord, V> FromIterator<(K, V)> for AvlMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V, O: RebalanceObserver<K>> Extend<(K, V)> for AvlMap<K, V, O> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K: Ord + Copy, V: Copy, O: RebalanceObserver<K>> Extend<(&'a K, &'a V)>
    for AvlMap<K, V, O>
{
    fn extend<I: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: I) {
        self.extend(iter.into_iter().map(|(&key, &value)| (key, value)));
    }
}

impl<'a, K, V, O> IntoIterator for &'a AvlMap<K, V, O> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, O> IntoIterator for &'a mut AvlMap<K, V, O> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, O> IntoIterator for AvlMap<K, V, O> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(mut self) -> Self::IntoIter {
        let root = self.root.take();
        let len = mem::take(&mut self.num_nodes);
        IntoIter::new(root, len)
    }
}
