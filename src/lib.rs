//! An ordered map implemented with an AVL tree.
//!
//! Every node owns its subtrees exclusively. Insertion and removal recurse from the root to the
//! affected node and restore the AVL condition on the way back up, so lookups, insertions and
//! removals take logarithmic time regardless of the insertion order.
//!
//! ```
//! use avl_map::{AvlMap, MapError};
//!
//! let mut map = AvlMap::new();
//! for key in 1..=7 {
//!     map.insert(key, key * 10);
//! }
//! assert_eq!(map.height(), 3);
//! assert_eq!(map.value(&4), Ok(&40));
//! assert_eq!(map.value(&8), Err(MapError::KeyNotFound));
//!
//! // Inserting an existing key keeps the stored value
//! assert!(!map.insert(4, 0));
//! assert_eq!(map.replace(4, 0), Some(40));
//!
//! map.clear();
//! assert_eq!(map.max(), Err(MapError::Empty));
//! ```

mod error;
mod iter;
mod map;
mod node;
mod observer;

pub use error::{InvariantViolation, MapError, Result};
pub use iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
pub use map::AvlMap;
pub use observer::{NoopObserver, RebalanceObserver, Rotation, TracingObserver};
