//! An ordered map backed by a red-black tree whose nodes live in a slab.
//!
//! Nodes are addressed by their slab index, which never changes while the node
//! is in the tree: insertion attaches new nodes without moving existing ones,
//! and deletion relinks nodes instead of moving bindings between them.
//! This makes [`Cursor`]s stable: erasing one binding never disturbs a cursor
//! on another binding.
//!
//! ```
//! use rbtree_slab::{Position, RbTreeMap};
//!
//! let mut map = RbTreeMap::new();
//! map.insert(3, "c");
//! map.insert(1, "a");
//! let (two, inserted) = map.insert(2, "b");
//! assert!(inserted);
//!
//! let one = map.find(&1);
//! map.erase(map.find(&3)).unwrap();
//! assert_eq!(one.get(&map).unwrap(), (&1, &"a"));
//! assert_eq!(two.get(&map).unwrap(), (&2, &"b"));
//! ```
mod tracing_helpers;

pub mod compare;
pub mod error;
pub mod generic;

#[cfg(feature = "std-slab")]
use slab::Slab;

pub use compare::{ByFn, Compare, Greater, Less};
pub use error::Error;
pub use generic::map::{ConstCursor, Cursor, MapId, Position, RbTreeExt, RbTreeExtMut};

/// Red-black tree map based on `Slab`.
#[cfg(feature = "std-slab")]
pub type RbTreeMap<K, V, L = Less> = generic::RbTreeMap<K, V, Slab<generic::Node<K, V>>, L>;
