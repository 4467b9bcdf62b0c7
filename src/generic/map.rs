use crate::{
	compare::{Compare, Less},
	generic::node::{Item, Node},
	tracing_helpers::debug_log,
	Error,
};
use cc_traits::{SimpleCollectionMut, SimpleCollectionRef, Slab, SlabMut};
use std::{
	borrow::Borrow,
	cmp::Ordering,
	collections::VecDeque,
	fmt,
	hash::{Hash, Hasher},
	iter::{DoubleEndedIterator, ExactSizeIterator, FromIterator, FusedIterator},
	marker::PhantomData,
	ops::Index,
};

mod cursor;
mod ext;

pub use cursor::*;
pub use ext::*;

/// An ordered map based on a red-black tree.
///
/// Nodes are allocated in a slab-like container (`C`) and link to each other
/// through their identifier in the container. A node keeps its identifier for
/// its whole life in the tree, so positions in the map ([`Cursor`]s) remain
/// valid across insertions and across removals of other bindings.
///
/// Keys are ordered by the comparator `L`, a strict less-than predicate.
/// Two keys are equivalent when neither is less than the other,
/// and the map contains at most one binding per class of equivalent keys.
///
/// # Basic usage
///
/// ```
/// use rbtree_slab::RbTreeMap;
///
/// let mut scores = RbTreeMap::new();
/// scores.insert("alice", 10);
/// scores.insert("carol", 7);
/// scores.insert("bob", 12);
///
/// // inserting an existing key leaves the map unchanged.
/// let (_, inserted) = scores.insert("alice", 0);
/// assert!(!inserted);
/// assert_eq!(scores["alice"], 10);
///
/// // `at` fails on an absent key, `get_or_insert_default` inserts it.
/// assert!(scores.at("dave").is_err());
/// *scores.get_or_insert_default("dave") += 3;
/// assert_eq!(scores.at("dave"), Ok(&3));
///
/// let names: Vec<_> = scores.keys().copied().collect();
/// assert_eq!(names, ["alice", "bob", "carol", "dave"]);
/// ```
///
/// # Cursors
///
/// A [`Cursor`] names a binding of a given map, or the end position.
/// It does not borrow the map, which must be passed to every cursor operation.
/// Using a cursor with another map, or after its binding has been erased,
/// fails with [`Error::InvalidIterator`].
///
/// ```
/// use rbtree_slab::{Error, Position, RbTreeMap};
///
/// let mut map: RbTreeMap<i32, &str> = (1..=5).zip(["a", "b", "c", "d", "e"]).collect();
///
/// let three = map.find(&3);
/// let four = map.find(&4);
/// assert_eq!(map.erase(three), Ok((3, "c")));
/// assert_eq!(four.get(&map), Ok((&4, &"d")));
/// assert_eq!(map.erase(three), Err(Error::InvalidIterator));
/// assert_eq!(map.erase(map.end()), Err(Error::InvalidIterator));
/// ```
///
/// ## Extended API
///
/// This crate provides the two traits [`RbTreeExt`] and [`RbTreeExtMut`] that can be imported to
/// expose low-level operations on [`RbTreeMap`], such as rotations or node relinking.
///
/// # Correctness
///
/// It is a logic error for a key to be modified in such a way that the key's ordering relative
/// to any other key, as determined by the comparator, changes while it is in the map.
/// This is normally only possible through [`Cell`](`std::cell::Cell`),
/// [`RefCell`](`std::cell::RefCell`), global state, I/O, or unsafe code.
pub struct RbTreeMap<K, V, C, L = Less> {
	/// Allocated nodes.
	nodes: C,

	/// Root node id.
	root: Option<usize>,

	/// Number of items in the tree.
	len: usize,

	/// Key comparator.
	compare: L,

	/// Identity of this map, shared by its cursors.
	id: MapId,

	/// Generation given to the next inserted node.
	generation: u64,

	k: PhantomData<K>,
	v: PhantomData<V>,
}

impl<K, V, C> RbTreeMap<K, V, C> {
	/// Create a new empty map, ordered by [`Ord`].
	#[inline]
	pub fn new() -> RbTreeMap<K, V, C>
	where
		C: Default,
	{
		RbTreeMap::with_compare(Less)
	}
}

impl<K, V, C, L> RbTreeMap<K, V, C, L> {
	/// Create a new empty map ordered by the given comparator.
	#[inline]
	pub fn with_compare(compare: L) -> RbTreeMap<K, V, C, L>
	where
		C: Default,
	{
		RbTreeMap {
			nodes: Default::default(),
			root: None,
			len: 0,
			compare,
			id: MapId::fresh(),
			generation: 0,
			k: PhantomData,
			v: PhantomData,
		}
	}

	/// Returns `true` if the map contains no elements.
	///
	/// # Example
	///
	/// ```
	/// use rbtree_slab::RbTreeMap;
	///
	/// let mut a = RbTreeMap::new();
	/// assert!(a.is_empty());
	/// a.insert(1, "a");
	/// assert!(!a.is_empty());
	/// ```
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.root.is_none()
	}

	/// Returns the number of elements in the map.
	#[inline]
	pub fn len(&self) -> usize {
		self.len
	}

	/// Key comparator of the map.
	#[inline]
	pub fn comparator(&self) -> &L {
		&self.compare
	}

	/// Identity of the map.
	#[inline]
	pub fn map_id(&self) -> MapId {
		self.id
	}

	/// Cursor on the end position.
	#[inline]
	pub fn end(&self) -> Cursor {
		Cursor::end_of(self.id)
	}

	/// Read-only cursor on the end position.
	#[inline]
	pub fn cend(&self) -> ConstCursor {
		ConstCursor::end_of(self.id)
	}
}

impl<K, V, C: Slab<Node<K, V>>, L> RbTreeMap<K, V, C, L>
where
	C: SimpleCollectionRef,
{
	/// Returns a reference to the value corresponding to the key.
	///
	/// The supplied key may be any borrowed form of the map's key type, but the ordering
	/// on the borrowed form *must* match the ordering on the key type.
	///
	/// # Example
	///
	/// ```
	/// use rbtree_slab::RbTreeMap;
	///
	/// let mut map = RbTreeMap::new();
	/// map.insert(1, "a");
	/// assert_eq!(map.get(&1), Some(&"a"));
	/// assert_eq!(map.get(&2), None);
	/// ```
	#[inline]
	pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V>
	where
		K: Borrow<Q>,
		L: Compare<Q>,
	{
		self.find_node(key).map(|id| self.node(id).value())
	}

	/// Returns the key-value pair corresponding to the supplied key.
	#[inline]
	pub fn get_key_value<Q: ?Sized>(&self, key: &Q) -> Option<(&K, &V)>
	where
		K: Borrow<Q>,
		L: Compare<Q>,
	{
		self.find_node(key).map(|id| self.node(id).item().as_pair())
	}

	/// Returns a reference to the value corresponding to the key,
	/// or [`Error::KeyNotFound`] if there is none.
	///
	/// # Example
	///
	/// ```
	/// use rbtree_slab::{Error, RbTreeMap};
	///
	/// let mut map = RbTreeMap::new();
	/// map.insert(1, "a");
	/// assert_eq!(map.at(&1), Ok(&"a"));
	/// assert_eq!(map.at(&2), Err(Error::KeyNotFound));
	/// ```
	#[inline]
	pub fn at<Q: ?Sized>(&self, key: &Q) -> Result<&V, Error>
	where
		K: Borrow<Q>,
		L: Compare<Q>,
	{
		self.get(key).ok_or(Error::KeyNotFound)
	}

	/// Returns `true` if the map contains a value for the specified key.
	#[inline]
	pub fn contains_key<Q: ?Sized>(&self, key: &Q) -> bool
	where
		K: Borrow<Q>,
		L: Compare<Q>,
	{
		self.find_node(key).is_some()
	}

	/// Returns the number of bindings for the given key, either `0` or `1`.
	#[inline]
	pub fn count<Q: ?Sized>(&self, key: &Q) -> usize
	where
		K: Borrow<Q>,
		L: Compare<Q>,
	{
		self.contains_key(key) as usize
	}

	/// Returns the first key-value pair in the map.
	/// The key in this pair is the minimum key in the map.
	///
	/// # Example
	///
	/// ```
	/// use rbtree_slab::RbTreeMap;
	///
	/// let mut map = RbTreeMap::new();
	/// assert_eq!(map.first_key_value(), None);
	/// map.insert(1, "b");
	/// map.insert(2, "a");
	/// assert_eq!(map.first_key_value(), Some((&1, &"b")));
	/// ```
	#[inline]
	pub fn first_key_value(&self) -> Option<(&K, &V)> {
		self.first_id().map(|id| self.node(id).item().as_pair())
	}

	/// Returns the last key-value pair in the map.
	/// The key in this pair is the maximum key in the map.
	#[inline]
	pub fn last_key_value(&self) -> Option<(&K, &V)> {
		self.last_id().map(|id| self.node(id).item().as_pair())
	}

	/// Returns the `index`-th key-value pair in key order, starting from `0`.
	///
	/// # Example
	///
	/// ```
	/// use rbtree_slab::RbTreeMap;
	///
	/// let map: RbTreeMap<_, _> = [(30, 'c'), (10, 'a'), (20, 'b')].into_iter().collect();
	/// assert_eq!(map.get_index(1), Some((&20, &'b')));
	/// assert_eq!(map.index_of(&30), Some(2));
	/// assert_eq!(map.get_index(3), None);
	/// ```
	#[inline]
	pub fn get_index(&self, index: usize) -> Option<(&K, &V)> {
		self.nth_id(index).map(|id| self.node(id).item().as_pair())
	}

	/// Returns the position in key order of the given key.
	#[inline]
	pub fn index_of<Q: ?Sized>(&self, key: &Q) -> Option<usize>
	where
		K: Borrow<Q>,
		L: Compare<Q>,
	{
		self.find_node(key).map(|id| self.rank_of(id))
	}

	/// Returns a cursor on the binding of the given key,
	/// or the end position if there is none.
	#[inline]
	pub fn find<Q: ?Sized>(&self, key: &Q) -> Cursor
	where
		K: Borrow<Q>,
		L: Compare<Q>,
	{
		self.position(self.find_node(key))
	}

	/// Read-only version of [`RbTreeMap::find`].
	#[inline]
	pub fn cfind<Q: ?Sized>(&self, key: &Q) -> ConstCursor
	where
		K: Borrow<Q>,
		L: Compare<Q>,
	{
		self.position(self.find_node(key))
	}

	/// Returns a cursor on the first binding,
	/// or the end position if the map is empty.
	#[inline]
	pub fn begin(&self) -> Cursor {
		self.position(self.first_id())
	}

	/// Read-only version of [`RbTreeMap::begin`].
	#[inline]
	pub fn cbegin(&self) -> ConstCursor {
		self.position(self.first_id())
	}

	/// Gets an iterator over the entries of the map, sorted by key.
	///
	/// # Example
	///
	/// ```
	/// use rbtree_slab::RbTreeMap;
	///
	/// let mut map = RbTreeMap::new();
	/// map.insert(3, "c");
	/// map.insert(2, "b");
	/// map.insert(1, "a");
	///
	/// for (key, value) in map.iter() {
	///     println!("{}: {}", key, value);
	/// }
	///
	/// let (first_key, first_value) = map.iter().next().unwrap();
	/// assert_eq!((*first_key, *first_value), (1, "a"));
	/// ```
	#[inline]
	pub fn iter(&self) -> Iter<K, V, C, L> {
		Iter::new(self)
	}

	/// Gets an iterator over the keys of the map, in sorted order.
	#[inline]
	pub fn keys(&self) -> Keys<K, V, C, L> {
		Keys { inner: self.iter() }
	}

	/// Gets an iterator over the values of the map, in order by key.
	#[inline]
	pub fn values(&self) -> Values<K, V, C, L> {
		Values { inner: self.iter() }
	}

	/// Write the tree in the DOT graph descrption language.
	///
	/// Red nodes are filled in red, black nodes in black.
	/// Each node shows its key, value and subtree size.
	///
	/// Requires the `dot` feature.
	#[cfg(feature = "dot")]
	#[inline]
	pub fn dot_write<W: std::io::Write>(&self, f: &mut W) -> std::io::Result<()>
	where
		K: std::fmt::Display,
		V: std::fmt::Display,
	{
		write!(
			f,
			"digraph tree {{\n\tnode [shape=record style=filled fontcolor=white];\n"
		)?;
		if let Some(id) = self.root {
			self.dot_write_node(f, id)?
		}
		write!(f, "}}")
	}

	/// Write the given node in the DOT graph descrption language.
	///
	/// Requires the `dot` feature.
	#[cfg(feature = "dot")]
	#[inline]
	fn dot_write_node<W: std::io::Write>(&self, f: &mut W, id: usize) -> std::io::Result<()>
	where
		K: std::fmt::Display,
		V: std::fmt::Display,
	{
		let name = format!("n{}", id);
		let node = self.node(id);

		write!(f, "\t{} [label=\"", name)?;
		node.dot_write_label(f)?;
		writeln!(f, "];")?;

		for child_id in node.children() {
			self.dot_write_node(f, child_id)?;
			let child_name = format!("n{}", child_id);
			writeln!(f, "\t{} -> {}", name, child_name)?;
		}

		Ok(())
	}
}

impl<K, V, C: SlabMut<Node<K, V>>, L> RbTreeMap<K, V, C, L>
where
	C: SimpleCollectionRef,
	C: SimpleCollectionMut,
{
	/// Clears the map, removing all elements.
	///
	/// Every cursor on the map becomes invalid.
	///
	/// # Example
	///
	/// ```
	/// use rbtree_slab::RbTreeMap;
	///
	/// let mut a = RbTreeMap::new();
	/// a.insert(1, "a");
	/// a.clear();
	/// assert!(a.is_empty());
	/// ```
	#[inline]
	pub fn clear(&mut self)
	where
		C: cc_traits::Clear,
	{
		debug_log!(len = self.len, "clear");
		self.root = None;
		self.len = 0;
		self.nodes.clear()
	}

	/// Returns a mutable reference to the value corresponding to the key.
	///
	/// # Example
	///
	/// ```
	/// use rbtree_slab::RbTreeMap;
	///
	/// let mut map = RbTreeMap::new();
	/// map.insert(1, "a");
	/// if let Some(x) = map.get_mut(&1) {
	///     *x = "b";
	/// }
	/// assert_eq!(map[&1], "b");
	/// ```
	#[inline]
	pub fn get_mut<Q: ?Sized>(&mut self, key: &Q) -> Option<&mut V>
	where
		K: Borrow<Q>,
		L: Compare<Q>,
	{
		match self.find_node(key) {
			Some(id) => Some(self.node_mut(id).value_mut()),
			None => None,
		}
	}

	/// Returns a mutable reference to the value corresponding to the key,
	/// or [`Error::KeyNotFound`] if there is none.
	#[inline]
	pub fn at_mut<Q: ?Sized>(&mut self, key: &Q) -> Result<&mut V, Error>
	where
		K: Borrow<Q>,
		L: Compare<Q>,
	{
		self.get_mut(key).ok_or(Error::KeyNotFound)
	}

	/// Insert a key-value pair in the map, unless the key is already present.
	///
	/// Returns a cursor on the binding of the key, and `true` if the binding
	/// has been inserted. If the key was already present, the map is left
	/// untouched and `value` is dropped.
	///
	/// # Example
	///
	/// ```
	/// use rbtree_slab::{Position, RbTreeMap};
	///
	/// let mut map = RbTreeMap::new();
	/// let (cursor, inserted) = map.insert(37, "a");
	/// assert!(inserted);
	///
	/// let (again, inserted) = map.insert(37, "b");
	/// assert!(!inserted);
	/// assert_eq!(again, cursor);
	/// assert_eq!(cursor.get(&map), Ok((&37, &"a")));
	/// ```
	#[inline]
	pub fn insert(&mut self, key: K, value: V) -> (Cursor, bool)
	where
		L: Compare<K>,
	{
		let (id, inserted) = self.insert_item(key, value);
		(self.position(Some(id)), inserted)
	}

	/// Returns a mutable reference to the value of the given key,
	/// inserting the default value first if the key is absent.
	///
	/// # Example
	///
	/// ```
	/// use rbtree_slab::RbTreeMap;
	///
	/// let mut counts: RbTreeMap<char, usize> = RbTreeMap::new();
	/// for c in "hello".chars() {
	///     *counts.get_or_insert_default(c) += 1;
	/// }
	/// assert_eq!(counts[&'l'], 2);
	/// assert_eq!(counts.len(), 4);
	/// ```
	#[inline]
	pub fn get_or_insert_default(&mut self, key: K) -> &mut V
	where
		V: Default,
		L: Compare<K>,
	{
		let id = match self.find_node(&key) {
			Some(id) => id,
			None => self.insert_new(key, V::default()),
		};

		self.node_mut(id).value_mut()
	}

	/// Set the value of the given key, inserting it if necessary.
	///
	/// Returns the previous value of the key, if any.
	/// The key already in the map is kept.
	///
	/// # Example
	///
	/// ```
	/// use rbtree_slab::RbTreeMap;
	///
	/// let mut map = RbTreeMap::new();
	/// assert_eq!(map.replace(37, "a"), None);
	/// assert_eq!(map.replace(37, "b"), Some("a"));
	/// assert_eq!(map[&37], "b");
	/// ```
	#[inline]
	pub fn replace(&mut self, key: K, value: V) -> Option<V>
	where
		L: Compare<K>,
	{
		match self.find_node(&key) {
			Some(id) => Some(self.node_mut(id).item_mut().set_value(value)),
			None => {
				self.insert_new(key, value);
				None
			}
		}
	}

	/// Remove the binding at the given position and return it.
	///
	/// Fails with [`Error::InvalidIterator`] if the position is the end position,
	/// belongs to another map, or names a binding that has already been removed.
	/// Cursors on other bindings stay valid.
	#[inline]
	pub fn erase<P: Position>(&mut self, position: P) -> Result<(K, V), Error>
	where
		L: Compare<K>,
	{
		match self.check(&position)? {
			Some(id) => Ok(self.erase_node(id).into_pair()),
			None => Err(Error::InvalidIterator),
		}
	}

	/// Removes a key from the map, returning the value at the key if the key
	/// was previously in the map.
	///
	/// # Example
	///
	/// ```
	/// use rbtree_slab::RbTreeMap;
	///
	/// let mut map = RbTreeMap::new();
	/// map.insert(1, "a");
	/// assert_eq!(map.remove(&1), Some("a"));
	/// assert_eq!(map.remove(&1), None);
	/// ```
	#[inline]
	pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> Option<V>
	where
		K: Borrow<Q>,
		L: Compare<Q> + Compare<K>,
	{
		self.remove_entry(key).map(|(_, value)| value)
	}

	/// Removes a key from the map, returning the stored key and value if the key
	/// was previously in the map.
	#[inline]
	pub fn remove_entry<Q: ?Sized>(&mut self, key: &Q) -> Option<(K, V)>
	where
		K: Borrow<Q>,
		L: Compare<Q> + Compare<K>,
	{
		match self.find_node(key) {
			Some(id) => Some(self.erase_node(id).into_pair()),
			None => None,
		}
	}

	/// Removes and returns the first element in the map.
	/// The key of this element is the minimum key that was in the map.
	#[inline]
	pub fn pop_first(&mut self) -> Option<(K, V)>
	where
		L: Compare<K>,
	{
		match self.first_id() {
			Some(id) => Some(self.erase_node(id).into_pair()),
			None => None,
		}
	}

	/// Removes and returns the last element in the map.
	/// The key of this element is the maximum key that was in the map.
	#[inline]
	pub fn pop_last(&mut self) -> Option<(K, V)>
	where
		L: Compare<K>,
	{
		match self.last_id() {
			Some(id) => Some(self.erase_node(id).into_pair()),
			None => None,
		}
	}

	/// Retains only the elements specified by the predicate.
	///
	/// In other words, remove all pairs `(k, v)` such that `f(&k, &mut v)` returns `false`.
	///
	/// # Example
	///
	/// ```
	/// use rbtree_slab::RbTreeMap;
	///
	/// let mut map: RbTreeMap<i32, i32> = (0..8).map(|x| (x, x*10)).collect();
	/// // Keep only the elements with even-numbered keys.
	/// map.retain(|&k, _| k % 2 == 0);
	/// assert!(map.into_iter().eq(vec![(0, 0), (2, 20), (4, 40), (6, 60)]));
	/// ```
	#[inline]
	pub fn retain<F>(&mut self, mut f: F)
	where
		L: Compare<K>,
		F: FnMut(&K, &mut V) -> bool,
	{
		let mut current = self.first_id();
		while let Some(id) = current {
			// node ids survive the removal of other nodes.
			current = self.successor(id);

			let (key, value) = self.node_mut(id).item_mut().as_pair_mut();
			if !f(key, value) {
				self.erase_node(id);
			}
		}
	}

	/// Gets a mutable iterator over the entries of the map, sorted by key.
	///
	/// # Example
	///
	/// ```
	/// use rbtree_slab::RbTreeMap;
	///
	/// let mut map = RbTreeMap::new();
	/// map.insert("a", 1);
	/// map.insert("b", 2);
	/// map.insert("c", 3);
	///
	/// // add 10 to the value if the key isn't "a"
	/// for (key, value) in map.iter_mut() {
	///     if key != &"a" {
	///         *value += 10;
	///     }
	/// }
	/// assert_eq!(map[&"c"], 13);
	/// ```
	#[inline]
	pub fn iter_mut(&mut self) -> IterMut<K, V, C, L> {
		IterMut::new(self)
	}

	/// Gets a mutable iterator over the values of the map, in order by key.
	#[inline]
	pub fn values_mut(&mut self) -> ValuesMut<K, V, C, L> {
		ValuesMut {
			inner: self.iter_mut(),
		}
	}
}

impl<K: Clone, V: Clone, C: SlabMut<Node<K, V>> + Default, L: Clone> Clone for RbTreeMap<K, V, C, L>
where
	C: SimpleCollectionRef,
	C: SimpleCollectionMut,
{
	/// Deep copy of the map.
	///
	/// The copy has its own identity: cursors of `self` are not valid on it.
	fn clone(&self) -> Self {
		let mut map = RbTreeMap::with_compare(self.compare.clone());
		if let Some(root) = self.root {
			map.root = Some(map.copy_subtree(self, root));
			map.len = self.len;
		}

		map.generation = self.generation;

		map
	}
}

impl<K, Q: ?Sized, V, C: Slab<Node<K, V>>, L> Index<&Q> for RbTreeMap<K, V, C, L>
where
	K: Borrow<Q>,
	L: Compare<Q>,
	C: SimpleCollectionRef,
{
	type Output = V;

	/// Returns a reference to the value corresponding to the supplied key.
	///
	/// # Panics
	///
	/// Panics if the key is not present in the map.
	#[inline]
	fn index(&self, key: &Q) -> &V {
		self.get(key).expect("no entry found for key")
	}
}

impl<K: PartialEq, V: PartialEq, C: Slab<Node<K, V>>, L> PartialEq for RbTreeMap<K, V, C, L>
where
	C: SimpleCollectionRef,
{
	fn eq(&self, other: &Self) -> bool {
		self.len() == other.len() && self.iter().eq(other.iter())
	}
}

impl<K: Eq, V: Eq, C: Slab<Node<K, V>>, L> Eq for RbTreeMap<K, V, C, L> where C: SimpleCollectionRef {}

impl<K: PartialOrd, V: PartialOrd, C: Slab<Node<K, V>>, L> PartialOrd for RbTreeMap<K, V, C, L>
where
	C: SimpleCollectionRef,
{
	#[inline]
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		self.iter().partial_cmp(other.iter())
	}
}

impl<K: Ord, V: Ord, C: Slab<Node<K, V>>, L> Ord for RbTreeMap<K, V, C, L>
where
	C: SimpleCollectionRef,
{
	#[inline]
	fn cmp(&self, other: &Self) -> Ordering {
		self.iter().cmp(other.iter())
	}
}

impl<K: Hash, V: Hash, C: Slab<Node<K, V>>, L> Hash for RbTreeMap<K, V, C, L>
where
	C: SimpleCollectionRef,
{
	#[inline]
	fn hash<H: Hasher>(&self, h: &mut H) {
		for (k, v) in self {
			k.hash(h);
			v.hash(h);
		}
	}
}

impl<K: fmt::Debug, V: fmt::Debug, C: Slab<Node<K, V>>, L> fmt::Debug for RbTreeMap<K, V, C, L>
where
	C: SimpleCollectionRef,
{
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_map().entries(self.iter()).finish()
	}
}

impl<K, V, C: Default, L: Default> Default for RbTreeMap<K, V, C, L> {
	#[inline]
	fn default() -> Self {
		RbTreeMap::with_compare(L::default())
	}
}

impl<K, V, C: SlabMut<Node<K, V>> + Default, L: Compare<K> + Default> FromIterator<(K, V)>
	for RbTreeMap<K, V, C, L>
where
	C: SimpleCollectionRef,
	C: SimpleCollectionMut,
{
	/// Build a map from the given bindings.
	///
	/// When a key appears more than once, its first binding is kept.
	#[inline]
	fn from_iter<T>(iter: T) -> RbTreeMap<K, V, C, L>
	where
		T: IntoIterator<Item = (K, V)>,
	{
		let mut map = RbTreeMap::default();
		map.extend(iter);
		map
	}
}

impl<K, V, C: SlabMut<Node<K, V>>, L: Compare<K>> Extend<(K, V)> for RbTreeMap<K, V, C, L>
where
	C: SimpleCollectionRef,
	C: SimpleCollectionMut,
{
	#[inline]
	fn extend<T>(&mut self, iter: T)
	where
		T: IntoIterator<Item = (K, V)>,
	{
		for (key, value) in iter {
			self.insert(key, value);
		}
	}
}

impl<'a, K: Copy, V: Copy, C: SlabMut<Node<K, V>>, L: Compare<K>> Extend<(&'a K, &'a V)>
	for RbTreeMap<K, V, C, L>
where
	C: SimpleCollectionRef,
	C: SimpleCollectionMut,
{
	#[inline]
	fn extend<T>(&mut self, iter: T)
	where
		T: IntoIterator<Item = (&'a K, &'a V)>,
	{
		self.extend(iter.into_iter().map(|(&key, &value)| (key, value)));
	}
}

pub struct Iter<'a, K, V, C, L> {
	/// The tree reference.
	map: &'a RbTreeMap<K, V, C, L>,

	/// Next node from the front.
	front: Option<usize>,

	/// Next node from the back.
	back: Option<usize>,

	len: usize,
}

impl<'a, K, V, C: Slab<Node<K, V>>, L> Iter<'a, K, V, C, L>
where
	C: SimpleCollectionRef,
{
	#[inline]
	fn new(map: &'a RbTreeMap<K, V, C, L>) -> Self {
		Iter {
			map,
			front: map.first_id(),
			back: map.last_id(),
			len: map.len(),
		}
	}
}

impl<'a, K, V, C: Slab<Node<K, V>>, L> Iterator for Iter<'a, K, V, C, L>
where
	C: SimpleCollectionRef,
{
	type Item = (&'a K, &'a V);

	#[inline]
	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.len, Some(self.len))
	}

	#[inline]
	fn next(&mut self) -> Option<(&'a K, &'a V)> {
		if self.len == 0 {
			return None;
		}

		let id = self.front?;
		self.len -= 1;
		self.front = self.map.successor(id);
		Some(self.map.node(id).item().as_pair())
	}
}

impl<'a, K, V, C: Slab<Node<K, V>>, L> FusedIterator for Iter<'a, K, V, C, L> where
	C: SimpleCollectionRef
{
}
impl<'a, K, V, C: Slab<Node<K, V>>, L> ExactSizeIterator for Iter<'a, K, V, C, L> where
	C: SimpleCollectionRef
{
}

impl<'a, K, V, C: Slab<Node<K, V>>, L> DoubleEndedIterator for Iter<'a, K, V, C, L>
where
	C: SimpleCollectionRef,
{
	#[inline]
	fn next_back(&mut self) -> Option<(&'a K, &'a V)> {
		if self.len == 0 {
			return None;
		}

		let id = self.back?;
		self.len -= 1;
		self.back = self.map.predecessor(id);
		Some(self.map.node(id).item().as_pair())
	}
}

impl<'a, K, V, C: Slab<Node<K, V>>, L> IntoIterator for &'a RbTreeMap<K, V, C, L>
where
	C: SimpleCollectionRef,
{
	type IntoIter = Iter<'a, K, V, C, L>;
	type Item = (&'a K, &'a V);

	#[inline]
	fn into_iter(self) -> Iter<'a, K, V, C, L> {
		self.iter()
	}
}

pub struct IterMut<'a, K, V, C, L> {
	/// The tree reference.
	map: &'a mut RbTreeMap<K, V, C, L>,

	/// Next node from the front.
	front: Option<usize>,

	/// Next node from the back.
	back: Option<usize>,

	len: usize,
}

impl<'a, K, V, C: SlabMut<Node<K, V>>, L> IterMut<'a, K, V, C, L>
where
	C: SimpleCollectionRef,
	C: SimpleCollectionMut,
{
	#[inline]
	fn new(map: &'a mut RbTreeMap<K, V, C, L>) -> Self {
		let front = map.first_id();
		let back = map.last_id();
		let len = map.len();
		IterMut {
			map,
			front,
			back,
			len,
		}
	}

	#[inline]
	fn item_at(&mut self, id: usize) -> &'a mut Item<K, V> {
		let item: *mut Item<K, V> = self.map.node_mut(id).item_mut();
		// `len` keeps `front` and `back` from crossing, so each node is emitted at
		// most once and the returned items are disjoint. The storage itself is
		// reborrowed mutably on every call, which Stacked Borrows rejects while
		// earlier items are alive.
		// TODO: take item pointers from a single storage borrow (needs slab iteration in `cc-traits`).
		unsafe { &mut *item }
	}
}

impl<'a, K, V, C: SlabMut<Node<K, V>>, L> Iterator for IterMut<'a, K, V, C, L>
where
	C: SimpleCollectionRef,
	C: SimpleCollectionMut,
{
	type Item = (&'a K, &'a mut V);

	#[inline]
	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.len, Some(self.len))
	}

	#[inline]
	fn next(&mut self) -> Option<(&'a K, &'a mut V)> {
		if self.len == 0 {
			return None;
		}

		let id = self.front?;
		self.len -= 1;
		self.front = self.map.successor(id);
		Some(self.item_at(id).as_pair_mut())
	}
}

impl<'a, K, V, C: SlabMut<Node<K, V>>, L> FusedIterator for IterMut<'a, K, V, C, L>
where
	C: SimpleCollectionRef,
	C: SimpleCollectionMut,
{
}
impl<'a, K, V, C: SlabMut<Node<K, V>>, L> ExactSizeIterator for IterMut<'a, K, V, C, L>
where
	C: SimpleCollectionRef,
	C: SimpleCollectionMut,
{
}

impl<'a, K, V, C: SlabMut<Node<K, V>>, L> DoubleEndedIterator for IterMut<'a, K, V, C, L>
where
	C: SimpleCollectionRef,
	C: SimpleCollectionMut,
{
	#[inline]
	fn next_back(&mut self) -> Option<(&'a K, &'a mut V)> {
		if self.len == 0 {
			return None;
		}

		let id = self.back?;
		self.len -= 1;
		self.back = self.map.predecessor(id);
		Some(self.item_at(id).as_pair_mut())
	}
}

impl<'a, K, V, C: SlabMut<Node<K, V>>, L> IntoIterator for &'a mut RbTreeMap<K, V, C, L>
where
	C: SimpleCollectionRef,
	C: SimpleCollectionMut,
{
	type IntoIter = IterMut<'a, K, V, C, L>;
	type Item = (&'a K, &'a mut V);

	#[inline]
	fn into_iter(self) -> IterMut<'a, K, V, C, L> {
		self.iter_mut()
	}
}

/// Owning iterator over the bindings of a map.
///
/// Bindings not consumed by the iterator are dropped with it.
pub struct IntoIter<K, V, C, L> {
	/// The tree, whose nodes are released as they are emitted.
	map: RbTreeMap<K, V, C, L>,

	/// Remaining nodes, in key order.
	ids: VecDeque<usize>,
}

impl<K, V, C: SlabMut<Node<K, V>>, L> IntoIter<K, V, C, L>
where
	C: SimpleCollectionRef,
	C: SimpleCollectionMut,
{
	#[inline]
	pub fn new(map: RbTreeMap<K, V, C, L>) -> Self {
		let mut ids = VecDeque::with_capacity(map.len());
		let mut current = map.first_id();
		while let Some(id) = current {
			ids.push_back(id);
			current = map.successor(id);
		}

		IntoIter { map, ids }
	}
}

impl<K, V, C: SlabMut<Node<K, V>>, L> Iterator for IntoIter<K, V, C, L>
where
	C: SimpleCollectionRef,
	C: SimpleCollectionMut,
{
	type Item = (K, V);

	#[inline]
	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.ids.len(), Some(self.ids.len()))
	}

	#[inline]
	fn next(&mut self) -> Option<(K, V)> {
		let id = self.ids.pop_front()?;
		Some(self.map.release_node(id).into_item().into_pair())
	}
}

impl<K, V, C: SlabMut<Node<K, V>>, L> FusedIterator for IntoIter<K, V, C, L>
where
	C: SimpleCollectionRef,
	C: SimpleCollectionMut,
{
}
impl<K, V, C: SlabMut<Node<K, V>>, L> ExactSizeIterator for IntoIter<K, V, C, L>
where
	C: SimpleCollectionRef,
	C: SimpleCollectionMut,
{
}

impl<K, V, C: SlabMut<Node<K, V>>, L> DoubleEndedIterator for IntoIter<K, V, C, L>
where
	C: SimpleCollectionRef,
	C: SimpleCollectionMut,
{
	#[inline]
	fn next_back(&mut self) -> Option<(K, V)> {
		let id = self.ids.pop_back()?;
		Some(self.map.release_node(id).into_item().into_pair())
	}
}

impl<K, V, C: SlabMut<Node<K, V>>, L> IntoIterator for RbTreeMap<K, V, C, L>
where
	C: SimpleCollectionRef,
	C: SimpleCollectionMut,
{
	type IntoIter = IntoIter<K, V, C, L>;
	type Item = (K, V);

	/// Gets an owning iterator over the entries of the map, sorted by key.
	///
	/// # Example
	///
	/// ```
	/// use rbtree_slab::RbTreeMap;
	///
	/// let mut map = RbTreeMap::new();
	/// map.insert(3, "c");
	/// map.insert(2, "b");
	/// map.insert(1, "a");
	///
	/// let vec: Vec<_> = map.into_iter().collect();
	/// assert_eq!(vec, [(1, "a"), (2, "b"), (3, "c")]);
	/// ```
	#[inline]
	fn into_iter(self) -> IntoIter<K, V, C, L> {
		IntoIter::new(self)
	}
}

pub struct Keys<'a, K, V, C, L> {
	inner: Iter<'a, K, V, C, L>,
}

impl<'a, K, V, C: Slab<Node<K, V>>, L> FusedIterator for Keys<'a, K, V, C, L> where
	C: SimpleCollectionRef
{
}
impl<'a, K, V, C: Slab<Node<K, V>>, L> ExactSizeIterator for Keys<'a, K, V, C, L> where
	C: SimpleCollectionRef
{
}

impl<'a, K, V, C: Slab<Node<K, V>>, L> Iterator for Keys<'a, K, V, C, L>
where
	C: SimpleCollectionRef,
{
	type Item = &'a K;

	#[inline]
	fn size_hint(&self) -> (usize, Option<usize>) {
		self.inner.size_hint()
	}

	#[inline]
	fn next(&mut self) -> Option<&'a K> {
		self.inner.next().map(|(k, _)| k)
	}
}

impl<'a, K, V, C: Slab<Node<K, V>>, L> DoubleEndedIterator for Keys<'a, K, V, C, L>
where
	C: SimpleCollectionRef,
{
	#[inline]
	fn next_back(&mut self) -> Option<&'a K> {
		self.inner.next_back().map(|(k, _)| k)
	}
}

pub struct Values<'a, K, V, C, L> {
	inner: Iter<'a, K, V, C, L>,
}

impl<'a, K, V, C: Slab<Node<K, V>>, L> FusedIterator for Values<'a, K, V, C, L> where
	C: SimpleCollectionRef
{
}
impl<'a, K, V, C: Slab<Node<K, V>>, L> ExactSizeIterator for Values<'a, K, V, C, L> where
	C: SimpleCollectionRef
{
}

impl<'a, K, V, C: Slab<Node<K, V>>, L> Iterator for Values<'a, K, V, C, L>
where
	C: SimpleCollectionRef,
{
	type Item = &'a V;

	#[inline]
	fn size_hint(&self) -> (usize, Option<usize>) {
		self.inner.size_hint()
	}

	#[inline]
	fn next(&mut self) -> Option<&'a V> {
		self.inner.next().map(|(_, v)| v)
	}
}

impl<'a, K, V, C: Slab<Node<K, V>>, L> DoubleEndedIterator for Values<'a, K, V, C, L>
where
	C: SimpleCollectionRef,
{
	#[inline]
	fn next_back(&mut self) -> Option<&'a V> {
		self.inner.next_back().map(|(_, v)| v)
	}
}

pub struct ValuesMut<'a, K, V, C, L> {
	inner: IterMut<'a, K, V, C, L>,
}

impl<'a, K, V, C: SlabMut<Node<K, V>>, L> FusedIterator for ValuesMut<'a, K, V, C, L>
where
	C: SimpleCollectionRef,
	C: SimpleCollectionMut,
{
}
impl<'a, K, V, C: SlabMut<Node<K, V>>, L> ExactSizeIterator for ValuesMut<'a, K, V, C, L>
where
	C: SimpleCollectionRef,
	C: SimpleCollectionMut,
{
}

impl<'a, K, V, C: SlabMut<Node<K, V>>, L> Iterator for ValuesMut<'a, K, V, C, L>
where
	C: SimpleCollectionRef,
	C: SimpleCollectionMut,
{
	type Item = &'a mut V;

	#[inline]
	fn size_hint(&self) -> (usize, Option<usize>) {
		self.inner.size_hint()
	}

	#[inline]
	fn next(&mut self) -> Option<&'a mut V> {
		self.inner.next().map(|(_, v)| v)
	}
}

impl<'a, K, V, C: SlabMut<Node<K, V>>, L> DoubleEndedIterator for ValuesMut<'a, K, V, C, L>
where
	C: SimpleCollectionRef,
	C: SimpleCollectionMut,
{
	#[inline]
	fn next_back(&mut self) -> Option<&'a mut V> {
		self.inner.next_back().map(|(_, v)| v)
	}
}
