use crate::{
	generic::{
		map::{RbTreeExt, RbTreeExtMut, RbTreeMap},
		node::Node,
	},
	Error,
};
use cc_traits::{SimpleCollectionMut, SimpleCollectionRef, Slab, SlabMut};
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_MAP_ID: AtomicUsize = AtomicUsize::new(0);

/// Identity of a map instance.
///
/// Every map, including every clone, gets its own identity.
/// Cursors remember the identity of the map that created them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct MapId(usize);

impl MapId {
	#[inline]
	pub(crate) fn fresh() -> MapId {
		MapId(NEXT_MAP_ID.fetch_add(1, Ordering::Relaxed))
	}
}

mod sealed {
	use super::MapId;

	/// Content of a position: the map identity, then the node id with the
	/// generation of that node. `None` is the end position.
	#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
	pub struct Raw {
		pub(crate) map: MapId,
		pub(crate) node: Option<(usize, u64)>,
	}

	pub trait Sealed {
		fn raw(&self) -> Raw;

		fn from_raw(raw: Raw) -> Self;
	}

	impl Sealed for super::Cursor {
		#[inline]
		fn raw(&self) -> Raw {
			self.raw
		}

		#[inline]
		fn from_raw(raw: Raw) -> Self {
			super::Cursor { raw }
		}
	}

	impl Sealed for super::ConstCursor {
		#[inline]
		fn raw(&self) -> Raw {
			self.raw
		}

		#[inline]
		fn from_raw(raw: Raw) -> Self {
			super::ConstCursor { raw }
		}
	}
}

use sealed::{Raw, Sealed};

/// Position in a map.
///
/// A position is either a binding of the map or the end position, one past the
/// last binding. It does not borrow the map: every operation takes the map as
/// parameter and fails with [`Error::InvalidIterator`] if the position does not
/// belong to it, or if its binding has been removed.
///
/// This trait is implemented by [`Cursor`] and [`ConstCursor`] only.
/// Positions are obtained from the map and cannot be built by hand.
///
/// ```
/// use rbtree_slab::{Error, Position, RbTreeMap};
///
/// let mut map = RbTreeMap::new();
/// map.insert(1, 'a');
/// map.insert(2, 'b');
///
/// let mut cursor = map.begin();
/// cursor.move_next(&map).unwrap();
/// assert_eq!(cursor.get(&map), Ok((&2, &'b')));
///
/// cursor.move_next(&map).unwrap();
/// assert!(cursor.is_end());
/// assert_eq!(cursor.move_next(&map), Err(Error::InvalidIterator));
/// ```
pub trait Position: Copy + Sealed {
	/// Whether this kind of position grants mutable access to values.
	const MUTABLE: bool;

	/// Identity of the map this position belongs to.
	#[inline]
	fn map_id(&self) -> MapId {
		self.raw().map
	}

	/// Identifier of the node at this position, `None` for the end position.
	#[inline]
	fn node_id(&self) -> Option<usize> {
		self.raw().node.map(|(id, _)| id)
	}

	#[inline]
	fn is_end(&self) -> bool {
		self.raw().node.is_none()
	}

	/// Returns the binding at this position.
	#[inline]
	fn get<'a, K, V, C: Slab<Node<K, V>>, L>(
		&self,
		map: &'a RbTreeMap<K, V, C, L>,
	) -> Result<(&'a K, &'a V), Error>
	where
		C: SimpleCollectionRef,
	{
		match map.check(self)? {
			Some(id) => Ok(map.node(id).item().as_pair()),
			None => Err(Error::InvalidIterator),
		}
	}

	/// Move to the next binding in key order.
	///
	/// Moving past the last binding gives the end position.
	/// Fails if this is the end position.
	#[inline]
	fn move_next<K, V, C: Slab<Node<K, V>>, L>(
		&mut self,
		map: &RbTreeMap<K, V, C, L>,
	) -> Result<(), Error>
	where
		C: SimpleCollectionRef,
	{
		let node = map.next_position(&*self)?;
		*self = map.position(node);
		Ok(())
	}

	/// Move to the previous binding in key order.
	///
	/// The end position moves to the last binding.
	/// Fails on the first binding, or on the end position of an empty map.
	#[inline]
	fn move_prev<K, V, C: Slab<Node<K, V>>, L>(
		&mut self,
		map: &RbTreeMap<K, V, C, L>,
	) -> Result<(), Error>
	where
		C: SimpleCollectionRef,
	{
		let node = map.prev_position(&*self)?;
		*self = map.position(node);
		Ok(())
	}
}

/// Position granting mutable access to the value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Cursor {
	raw: Raw,
}

impl Position for Cursor {
	const MUTABLE: bool = true;
}

impl Cursor {
	#[inline]
	pub(crate) fn end_of(map: MapId) -> Cursor {
		Cursor {
			raw: Raw { map, node: None },
		}
	}

	/// Returns the binding at this position, with a mutable value.
	///
	/// The key is never accessible mutably.
	#[inline]
	pub fn get_mut<'a, K, V, C: SlabMut<Node<K, V>>, L>(
		&self,
		map: &'a mut RbTreeMap<K, V, C, L>,
	) -> Result<(&'a K, &'a mut V), Error>
	where
		C: SimpleCollectionRef,
		C: SimpleCollectionMut,
	{
		match map.check(self)? {
			Some(id) => Ok(map.node_mut(id).item_mut().as_pair_mut()),
			None => Err(Error::InvalidIterator),
		}
	}

	/// Returns a mutable reference to the value at this position.
	///
	/// ```
	/// use rbtree_slab::RbTreeMap;
	///
	/// let mut map = RbTreeMap::new();
	/// let (cursor, _) = map.insert("a", 1);
	/// *cursor.value_mut(&mut map).unwrap() += 1;
	/// assert_eq!(map["a"], 2);
	/// ```
	#[inline]
	pub fn value_mut<'a, K, V, C: SlabMut<Node<K, V>>, L>(
		&self,
		map: &'a mut RbTreeMap<K, V, C, L>,
	) -> Result<&'a mut V, Error>
	where
		C: SimpleCollectionRef,
		C: SimpleCollectionMut,
	{
		self.get_mut(map).map(|(_, value)| value)
	}
}

/// Read-only position.
///
/// Every [`Cursor`] converts into a `ConstCursor` naming the same position,
/// but not the other way around.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ConstCursor {
	raw: Raw,
}

impl Position for ConstCursor {
	const MUTABLE: bool = false;
}

impl ConstCursor {
	#[inline]
	pub(crate) fn end_of(map: MapId) -> ConstCursor {
		ConstCursor {
			raw: Raw { map, node: None },
		}
	}
}

impl From<Cursor> for ConstCursor {
	#[inline]
	fn from(cursor: Cursor) -> ConstCursor {
		ConstCursor { raw: cursor.raw }
	}
}

impl PartialEq<ConstCursor> for Cursor {
	#[inline]
	fn eq(&self, other: &ConstCursor) -> bool {
		self.raw == other.raw
	}
}

impl PartialEq<Cursor> for ConstCursor {
	#[inline]
	fn eq(&self, other: &Cursor) -> bool {
		other == self
	}
}

impl<K, V, C: Slab<Node<K, V>>, L> RbTreeMap<K, V, C, L>
where
	C: SimpleCollectionRef,
{
	#[inline]
	pub(crate) fn position<P: Position>(&self, node: Option<usize>) -> P {
		P::from_raw(Raw {
			map: self.id,
			node: node.map(|id| (id, self.node(id).generation())),
		})
	}

	/// Resolve a position of this map into a node id, `None` being the end position.
	///
	/// The node must still hold the binding the position was taken from: a slot
	/// reused by a later insertion has another generation.
	#[inline]
	pub(crate) fn check<P: Position>(&self, position: &P) -> Result<Option<usize>, Error> {
		let raw = position.raw();
		if raw.map != self.id {
			return Err(Error::InvalidIterator);
		}

		match raw.node {
			Some((id, generation)) => match self.try_node(id) {
				Some(node) if node.generation() == generation => Ok(Some(id)),
				_ => Err(Error::InvalidIterator),
			},
			None => Ok(None),
		}
	}

	#[inline]
	fn next_position<P: Position>(&self, position: &P) -> Result<Option<usize>, Error> {
		match self.check(position)? {
			Some(id) => Ok(self.successor(id)),
			None => Err(Error::InvalidIterator),
		}
	}

	#[inline]
	fn prev_position<P: Position>(&self, position: &P) -> Result<Option<usize>, Error> {
		let prev = match self.check(position)? {
			Some(id) => self.predecessor(id),
			None => self.last_id(),
		};

		prev.map(Some).ok_or(Error::InvalidIterator)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::RbTreeMap;

	#[test]
	fn map_identities_are_unique() {
		let a: RbTreeMap<i32, i32> = RbTreeMap::new();
		let b = a.clone();
		assert_ne!(a.end(), b.end());
		assert_eq!(a.end(), a.cend());
	}

	#[test]
	fn stale_cursor_is_detected() {
		let mut map = RbTreeMap::new();
		let (cursor, _) = map.insert(1, ());
		map.erase(cursor).unwrap();
		assert_eq!(cursor.get(&map), Err(Error::InvalidIterator));
		assert_eq!(map.erase(cursor), Err(Error::InvalidIterator));
	}

	#[test]
	fn generations_follow_insertions() {
		let mut map = RbTreeMap::new();
		let (a, _) = map.insert(1, ());
		let (b, _) = map.insert(2, ());
		assert_eq!(a.raw().node.map(|(_, g)| g), Some(0));
		assert_eq!(b.raw().node.map(|(_, g)| g), Some(1));

		// a duplicate insertion allocates nothing.
		map.insert(1, ());
		map.erase(a).unwrap();
		let (c, _) = map.insert(3, ());
		assert_eq!(c.raw().node.map(|(_, g)| g), Some(2));
		assert_eq!(c.node_id(), a.node_id());
		assert_eq!(map.check(&a), Err(Error::InvalidIterator));
		assert_eq!(map.check(&b), Ok(b.node_id()));
	}
}
