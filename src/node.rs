//! Owned tree nodes and the recursive balancing engine.
//!
//! Every function here works on a `Link`, the owning slot a subtree hangs from (the map's
//! root or a node's child). Rotations replace the content of that slot, so callers never
//! have to patch parent pointers.

use std::borrow::Borrow;
use std::cmp::{self, Ordering};
use std::mem;

use crate::error::InvariantViolation;
use crate::observer::{RebalanceObserver, Rotation};

pub(crate) type Link<K, V> = Option<Box<Node<K, V>>>;

pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) height: usize,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    fn create(key: K, value: V) -> Box<Self> {
        Box::new(Node {
            key,
            value,
            height: 1,
            left: None,
            right: None,
        })
    }

    fn adjust_height(&mut self) {
        self.height = 1 + cmp::max(height(&self.left), height(&self.right));
    }

    /// Height of the left subtree minus height of the right subtree.
    fn balance(&self) -> isize {
        height(&self.left) as isize - height(&self.right) as isize
    }
}

pub(crate) fn height<K, V>(link: &Link<K, V>) -> usize {
    link.as_ref().map_or(0, |node| node.height)
}

fn balance<K, V>(link: &Link<K, V>) -> isize {
    link.as_ref().map_or(0, |node| node.balance())
}

pub(crate) fn search<'a, K, V, Q>(link: &'a Link<K, V>, key: &Q) -> Option<&'a Node<K, V>>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let mut current = link.as_deref();
    while let Some(node) = current {
        current = match key.cmp(node.key.borrow()) {
            Ordering::Equal => return Some(node),
            Ordering::Less => node.left.as_deref(),
            Ordering::Greater => node.right.as_deref(),
        };
    }
    None
}

pub(crate) fn search_mut<'a, K, V, Q>(
    link: &'a mut Link<K, V>,
    key: &Q,
) -> Option<&'a mut Node<K, V>>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let mut current = link.as_deref_mut();
    while let Some(node) = current {
        current = match key.cmp(node.key.borrow()) {
            Ordering::Equal => return Some(node),
            Ordering::Less => node.left.as_deref_mut(),
            Ordering::Greater => node.right.as_deref_mut(),
        };
    }
    None
}

pub(crate) fn leftmost<K, V>(link: &Link<K, V>) -> Option<&Node<K, V>> {
    let mut node = link.as_deref()?;
    while let Some(left) = node.left.as_deref() {
        node = left;
    }
    Some(node)
}

pub(crate) fn rightmost<K, V>(link: &Link<K, V>) -> Option<&Node<K, V>> {
    let mut node = link.as_deref()?;
    while let Some(right) = node.right.as_deref() {
        node = right;
    }
    Some(node)
}

/// Inserts a key-value pair below the given link.
///
/// Returns `None` if the key is already present, in which case nothing changes.
/// Otherwise returns how the new key compared to the key of the node stored at this link
/// (`Equal` if the node at this link is the new one). Ancestors use that result in place of
/// comparing the inserted key against their child's key when choosing a rotation.
pub(crate) fn insert<K, V, O>(
    link: &mut Link<K, V>,
    key: K,
    value: V,
    observer: &mut O,
) -> Option<Ordering>
where
    K: Ord,
    O: RebalanceObserver<K>,
{
    let node = match link {
        Some(node) => node,
        None => {
            *link = Some(Node::create(key, value));
            return Some(Ordering::Equal);
        }
    };

    let ordering = key.cmp(&node.key);
    let descended = match ordering {
        Ordering::Less => insert(&mut node.left, key, value, observer)?,
        Ordering::Greater => insert(&mut node.right, key, value, observer)?,
        Ordering::Equal => return None,
    };

    node.adjust_height();
    let factor = node.balance();
    if factor > 1 {
        // Left heavy, new key went into the left subtree
        match descended {
            Ordering::Less => rebalance(link, Rotation::Right, observer),
            _ => rebalance(link, Rotation::LeftRight, observer),
        }
    } else if factor < -1 {
        // Right heavy, new key went into the right subtree
        match descended {
            Ordering::Greater => rebalance(link, Rotation::Left, observer),
            _ => rebalance(link, Rotation::RightLeft, observer),
        }
    }
    Some(ordering)
}

/// Removes the key below the given link and returns the removed pair.
pub(crate) fn remove<K, V, Q, O>(
    link: &mut Link<K, V>,
    key: &Q,
    observer: &mut O,
) -> Option<(K, V)>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
    O: RebalanceObserver<K>,
{
    let node = link.as_mut()?;
    let removed = match key.cmp(node.key.borrow()) {
        Ordering::Less => remove(&mut node.left, key, observer)?,
        Ordering::Greater => remove(&mut node.right, key, observer)?,
        Ordering::Equal if node.left.is_some() && node.right.is_some() => {
            // Move the in-order predecessor into this node
            let (pred_key, pred_value) = remove_max(&mut node.left, observer)?;
            (
                mem::replace(&mut node.key, pred_key),
                mem::replace(&mut node.value, pred_value),
            )
        }
        Ordering::Equal => return take_stem(link),
    };
    rebalance_after_remove(link, observer);
    Some(removed)
}

/// Removes the node with the greatest key below the given link.
fn remove_max<K, V, O>(link: &mut Link<K, V>, observer: &mut O) -> Option<(K, V)>
where
    O: RebalanceObserver<K>,
{
    let node = link.as_mut()?;
    if node.right.is_none() {
        return take_stem(link);
    }
    let removed = remove_max(&mut node.right, observer)?;
    rebalance_after_remove(link, observer);
    Some(removed)
}

/// Unlinks a node with at most one child, moving the child into its place.
fn take_stem<K, V>(link: &mut Link<K, V>) -> Option<(K, V)> {
    let mut node = link.take()?;
    debug_assert!(node.left.is_none() || node.right.is_none());
    *link = node.left.take().or_else(|| node.right.take());
    let Node { key, value, .. } = *node;
    Some((key, value))
}

fn rebalance_after_remove<K, V, O>(link: &mut Link<K, V>, observer: &mut O)
where
    O: RebalanceObserver<K>,
{
    let Some(node) = link.as_mut() else {
        return;
    };
    node.adjust_height();
    let factor = node.balance();
    if factor > 1 {
        if balance(&node.left) >= 0 {
            rebalance(link, Rotation::Right, observer);
        } else {
            rebalance(link, Rotation::LeftRight, observer);
        }
    } else if factor < -1 {
        if balance(&node.right) <= 0 {
            rebalance(link, Rotation::Left, observer);
        } else {
            rebalance(link, Rotation::RightLeft, observer);
        }
    }
}

fn rebalance<K, V, O>(link: &mut Link<K, V>, rotation: Rotation, observer: &mut O)
where
    O: RebalanceObserver<K>,
{
    if let Some(node) = link.as_ref() {
        observer.before_rotation(rotation, &node.key);
    }
    match rotation {
        Rotation::Left => rotate_left(link),
        Rotation::Right => rotate_right(link),
        Rotation::LeftRight => {
            if let Some(node) = link.as_mut() {
                rotate_left(&mut node.left);
            }
            rotate_right(link);
        }
        Rotation::RightLeft => {
            if let Some(node) = link.as_mut() {
                rotate_right(&mut node.right);
            }
            rotate_left(link);
        }
    }
    if let Some(node) = link.as_ref() {
        observer.after_rotation(rotation, &node.key);
    }
}

//   p          r
//  / \        / \
// a   r  ->  p   c
//    / \    / \
//   b   c  a   b
fn rotate_left<K, V>(link: &mut Link<K, V>) {
    debug_assert!(
        link.as_ref().is_some_and(|pivot| pivot.right.is_some()),
        "rotate_left needs a right child"
    );
    let Some(mut pivot) = link.take() else {
        return;
    };
    let Some(mut root) = pivot.right.take() else {
        *link = Some(pivot);
        return;
    };
    pivot.right = root.left.take();
    pivot.adjust_height();
    root.left = Some(pivot);
    root.adjust_height();
    *link = Some(root);
}

//     p        l
//    / \      / \
//   l   c -> a   p
//  / \          / \
// a   b        b   c
fn rotate_right<K, V>(link: &mut Link<K, V>) {
    debug_assert!(
        link.as_ref().is_some_and(|pivot| pivot.left.is_some()),
        "rotate_right needs a left child"
    );
    let Some(mut pivot) = link.take() else {
        return;
    };
    let Some(mut root) = pivot.left.take() else {
        *link = Some(pivot);
        return;
    };
    pivot.left = root.right.take();
    pivot.adjust_height();
    root.right = Some(pivot);
    root.adjust_height();
    *link = Some(root);
}

/// Copies a subtree in pre-order, node by node, keeping the cached heights.
pub(crate) fn copy<K: Clone, V: Clone>(link: &Link<K, V>) -> Link<K, V> {
    link.as_ref().map(|node| {
        Box::new(Node {
            key: node.key.clone(),
            value: node.value.clone(),
            height: node.height,
            left: copy(&node.left),
            right: copy(&node.right),
        })
    })
}

/// Frees a subtree in post-order. Returns the number of nodes freed.
pub(crate) fn destroy<K, V>(link: &mut Link<K, V>) -> usize {
    match link.take() {
        None => 0,
        Some(mut node) => {
            let freed = destroy(&mut node.left) + destroy(&mut node.right);
            drop(node);
            freed + 1
        }
    }
}

/// Checks order, balance and cached heights of a subtree whose keys must lie strictly
/// between `lower` and `upper`. Counts visited nodes into `count` and returns the height.
pub(crate) fn validate<K: Ord, V>(
    link: &Link<K, V>,
    lower: Option<&K>,
    upper: Option<&K>,
    depth: usize,
    count: &mut usize,
) -> Result<usize, InvariantViolation> {
    let Some(node) = link else {
        return Ok(0);
    };
    let above_lower = lower.map_or(true, |lower| node.key > *lower);
    let below_upper = upper.map_or(true, |upper| node.key < *upper);
    if !(above_lower && below_upper) {
        return Err(InvariantViolation::Unordered { depth });
    }
    *count += 1;

    let left_height = validate(&node.left, lower, Some(&node.key), depth + 1, count)?;
    let right_height = validate(&node.right, Some(&node.key), upper, depth + 1, count)?;

    let actual = 1 + cmp::max(left_height, right_height);
    if node.height != actual {
        return Err(InvariantViolation::HeightMismatch {
            depth,
            cached: node.height,
            actual,
        });
    }
    let factor = left_height as isize - right_height as isize;
    if !(-1..=1).contains(&factor) {
        return Err(InvariantViolation::Unbalanced { depth, factor });
    }
    Ok(actual)
}
