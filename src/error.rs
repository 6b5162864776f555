use thiserror::Error;

/// Errors returned by fallible map queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("key not found")]
    KeyNotFound,
    #[error("map is empty")]
    Empty,
}

/// A broken structural invariant, as reported by [`AvlMap::validate`].
///
/// [`AvlMap::validate`]: crate::AvlMap::validate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("node at depth {depth} is outside the key range of its ancestors")]
    Unordered { depth: usize },
    #[error("node at depth {depth} has balance factor {factor}")]
    Unbalanced { depth: usize, factor: isize },
    #[error("node at depth {depth} caches height {cached}, actual height is {actual}")]
    HeightMismatch {
        depth: usize,
        cached: usize,
        actual: usize,
    },
    #[error("map reports {cached} entries but holds {actual}")]
    LenMismatch { cached: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, MapError>;
