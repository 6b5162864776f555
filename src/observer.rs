//! Hooks into the rebalancing engine.

use std::fmt;

/// The shape of a rebalancing step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    /// Single rotation of a right-heavy node.
    Left,
    /// Single rotation of a left-heavy node.
    Right,
    /// Left rotation of the left child followed by a right rotation of the node.
    LeftRight,
    /// Right rotation of the right child followed by a left rotation of the node.
    RightLeft,
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Rotation::Left => "left",
            Rotation::Right => "right",
            Rotation::LeftRight => "left-right",
            Rotation::RightLeft => "right-left",
        })
    }
}

/// Receives a notification around every rebalancing step.
///
/// `before_rotation` gets the key of the unbalanced node, `after_rotation` the key of the
/// node that took its place as subtree root.
pub trait RebalanceObserver<K> {
    /// Called before a rotation with the key of the unbalanced node.
    fn before_rotation(&mut self, _rotation: Rotation, _pivot: &K) {}

    /// Called after a rotation with the key of the new subtree root.
    fn after_rotation(&mut self, _rotation: Rotation, _root: &K) {}
}

/// Observer that ignores all notifications.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NoopObserver;

impl<K> RebalanceObserver<K> for NoopObserver {}

/// Observer that emits a `tracing` event at TRACE level for every rotation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TracingObserver;

impl<K: fmt::Debug> RebalanceObserver<K> for TracingObserver {
    fn before_rotation(&mut self, rotation: Rotation, pivot: &K) {
        tracing::trace!(%rotation, ?pivot, "rotating");
    }

    fn after_rotation(&mut self, rotation: Rotation, root: &K) {
        tracing::trace!(%rotation, ?root, "rotated");
    }
}
