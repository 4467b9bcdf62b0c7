use crate::{
	compare::Compare,
	generic::{
		map::RbTreeMap,
		node::{Color, Item, Node, Side},
	},
	tracing_helpers::{debug_log, trace_log},
};
use cc_traits::{SimpleCollectionMut, SimpleCollectionRef, Slab, SlabMut};
use smallvec::SmallVec;
use std::{borrow::Borrow, cmp::Ordering};

/// Extension methods.
///
/// This trait can be imported to access the internal methods of the red-black tree.
/// These methods are not intended to be directly called by users, but can be used to
/// extends the data structure with new functionalities.
pub trait RbTreeExt<K, V> {
	/// Comparator used to order the keys.
	type Order;

	/// Get the root node id.
	///
	/// Returns `None` if the tree is empty.
	fn root_id(&self) -> Option<usize>;

	/// Get the node associated to the given `id`.
	///
	/// Panics if `id` is not the identifier of a node of the tree.
	fn node(&self, id: usize) -> &Node<K, V>;

	/// Get the node associated to the given `id`, if any.
	fn try_node(&self, id: usize) -> Option<&Node<K, V>>;

	/// Returns `true` if the given node exists and is red.
	///
	/// Absent children are black.
	fn is_red(&self, id: Option<usize>) -> bool;

	/// Size of the subtree rooted at `id`, `0` for an absent child.
	fn subtree_len(&self, id: Option<usize>) -> usize;

	/// Side of `id` under its parent, or `None` for the root.
	fn side_of(&self, id: usize) -> Option<Side>;

	/// Find the node holding a key equivalent to `key`.
	fn find_node<Q: ?Sized>(&self, key: &Q) -> Option<usize>
	where
		K: Borrow<Q>,
		Self::Order: Compare<Q>;

	/// Leftmost node of the subtree rooted at `id`.
	fn leftmost(&self, id: usize) -> usize;

	/// Rightmost node of the subtree rooted at `id`.
	fn rightmost(&self, id: usize) -> usize;

	/// Node holding the smallest key.
	fn first_id(&self) -> Option<usize>;

	/// Node holding the greatest key.
	fn last_id(&self) -> Option<usize>;

	/// Next node in key order.
	///
	/// Returns `None` if `id` is the last node.
	fn successor(&self, id: usize) -> Option<usize>;

	/// Previous node in key order.
	///
	/// Returns `None` if `id` is the first node.
	fn predecessor(&self, id: usize) -> Option<usize>;

	/// Node holding the `index`-th smallest key.
	fn nth_id(&self, index: usize) -> Option<usize>;

	/// Number of nodes holding a smaller key than `id`.
	fn rank_of(&self, id: usize) -> usize;

	/// Validate the tree.
	///
	/// Checks the search tree order, the parent links, the subtree sizes and the
	/// red-black coloring rules, and returns the number of black nodes on every
	/// path from the root to an absent child.
	///
	/// Panics if the tree is not a valid red-black tree.
	fn validate(&self) -> usize
	where
		Self::Order: Compare<K>;
}

pub trait RbTreeExtMut<K, V>: RbTreeExt<K, V> {
	/// Get the node associated to the given `id` mutabily.
	///
	/// Panics if `id` is not the identifier of a node of the tree.
	fn node_mut(&mut self, id: usize) -> &mut Node<K, V>;

	/// Allocate a free identifier for the given node.
	fn allocate_node(&mut self, node: Node<K, V>) -> usize;

	/// Release the given node identifier and return the node it used to identify.
	fn release_node(&mut self, id: usize) -> Node<K, V>;

	/// Recompute the size of `id` from its children.
	fn update_size(&mut self, id: usize);

	/// Add one to (`grow`) or remove one from the size of `id` and of all its ancestors.
	fn size_adjust(&mut self, id: Option<usize>, grow: bool);

	/// Make `new` take the place of `old` as a child of `parent`,
	/// or as the root if `parent` is `None`.
	///
	/// The parent link of `new` is not updated.
	fn replace_child(&mut self, parent: Option<usize>, old: usize, new: Option<usize>);

	/// Rotate the node `id` toward `dir`.
	///
	/// The child of `id` on the opposite side takes its place and is returned.
	///
	/// Panics if `id` has no such child.
	fn rotate(&mut self, id: usize, dir: Side) -> usize;

	/// Rotate the node `id` to the left, with its right child replacing it.
	/// ```text
	///    id              r0
	///   /  \            /  \
	///  l0   r0  ---->  id  r1
	///      /  \       /  \
	///     l1  r1     l0  l1
	/// ```
	fn rotate_left(&mut self, id: usize) -> usize {
		self.rotate(id, Side::Left)
	}

	/// Rotate the node `id` to the right, with its left child replacing it.
	/// ```text
	///       id            l0
	///      /  \          /  \
	///     l0  r0  ---->  l1  id
	///    /  \               /  \
	///   l1  r1             r1  r0
	/// ```
	fn rotate_right(&mut self, id: usize) -> usize {
		self.rotate(id, Side::Right)
	}

	/// Fix a red-red violation between the red node `id` and its parent.
	fn fix_red_red(&mut self, id: usize);

	/// Exchange the tree positions of two nodes.
	///
	/// Parent and children links, colors and sizes are exchanged.
	/// Items stay in their nodes.
	fn relink(&mut self, a: usize, b: usize);

	/// Insert a binding whose key is not already in the tree.
	///
	/// Returns the id of the new node.
	fn insert_new(&mut self, key: K, value: V) -> usize
	where
		Self::Order: Compare<K>;

	/// Insert a binding, unless the key is already in the tree.
	///
	/// Returns the id of the node holding the key and `true` if it has been inserted.
	fn insert_item(&mut self, key: K, value: V) -> (usize, bool)
	where
		Self::Order: Compare<K>;

	/// Remove the node `id` from the tree and return its item.
	fn erase_node(&mut self, id: usize) -> Item<K, V>
	where
		Self::Order: Compare<K>;

	/// Deep copy of the subtree rooted at `id` in `source` into this tree storage.
	///
	/// Returns the id of the copied subtree root, whose parent link is `None`.
	fn copy_subtree(&mut self, source: &Self, id: usize) -> usize
	where
		K: Clone,
		V: Clone;
}

impl<K, V, C: Slab<Node<K, V>>, L> RbTreeExt<K, V> for RbTreeMap<K, V, C, L>
where
	C: SimpleCollectionRef,
{
	type Order = L;

	#[inline]
	fn root_id(&self) -> Option<usize> {
		self.root
	}

	#[inline]
	fn node(&self, id: usize) -> &Node<K, V> {
		match self.try_node(id) {
			Some(node) => node,
			None => panic!("no node with id {}", id),
		}
	}

	#[inline]
	fn try_node(&self, id: usize) -> Option<&Node<K, V>> {
		self.nodes.get(id).map(C::into_ref)
	}

	#[inline]
	fn is_red(&self, id: Option<usize>) -> bool {
		match id {
			Some(id) => self.node(id).is_red(),
			None => false,
		}
	}

	#[inline]
	fn subtree_len(&self, id: Option<usize>) -> usize {
		match id {
			Some(id) => self.node(id).size(),
			None => 0,
		}
	}

	#[inline]
	fn side_of(&self, id: usize) -> Option<Side> {
		self.node(id)
			.parent()
			.and_then(|parent| self.node(parent).side_of(id))
	}

	fn find_node<Q: ?Sized>(&self, key: &Q) -> Option<usize>
	where
		K: Borrow<Q>,
		L: Compare<Q>,
	{
		let mut cur = self.root;
		while let Some(id) = cur {
			let node = self.node(id);
			match self.compare.compare(key, node.key().borrow()) {
				Ordering::Less => cur = node.left(),
				Ordering::Greater => cur = node.right(),
				Ordering::Equal => return Some(id),
			}
		}

		None
	}

	#[inline]
	fn leftmost(&self, mut id: usize) -> usize {
		while let Some(left) = self.node(id).left() {
			id = left
		}

		id
	}

	#[inline]
	fn rightmost(&self, mut id: usize) -> usize {
		while let Some(right) = self.node(id).right() {
			id = right
		}

		id
	}

	#[inline]
	fn first_id(&self) -> Option<usize> {
		self.root.map(|root| self.leftmost(root))
	}

	#[inline]
	fn last_id(&self) -> Option<usize> {
		self.root.map(|root| self.rightmost(root))
	}

	fn successor(&self, mut id: usize) -> Option<usize> {
		if let Some(right) = self.node(id).right() {
			return Some(self.leftmost(right));
		}

		while let Some(parent) = self.node(id).parent() {
			if self.node(parent).right() == Some(id) {
				id = parent
			} else {
				return Some(parent);
			}
		}

		None
	}

	fn predecessor(&self, mut id: usize) -> Option<usize> {
		if let Some(left) = self.node(id).left() {
			return Some(self.rightmost(left));
		}

		while let Some(parent) = self.node(id).parent() {
			if self.node(parent).left() == Some(id) {
				id = parent
			} else {
				return Some(parent);
			}
		}

		None
	}

	fn nth_id(&self, mut index: usize) -> Option<usize> {
		let mut cur = self.root;
		while let Some(id) = cur {
			let node = self.node(id);
			let left_len = self.subtree_len(node.left());
			if index < left_len {
				cur = node.left()
			} else if index == left_len {
				return Some(id);
			} else {
				index -= left_len + 1;
				cur = node.right()
			}
		}

		None
	}

	fn rank_of(&self, mut id: usize) -> usize {
		let mut rank = self.subtree_len(self.node(id).left());
		while let Some(parent) = self.node(id).parent() {
			let parent_node = self.node(parent);
			if parent_node.right() == Some(id) {
				rank += 1 + self.subtree_len(parent_node.left())
			}
			id = parent
		}

		rank
	}

	fn validate(&self) -> usize
	where
		L: Compare<K>,
	{
		let root = match self.root {
			Some(root) => root,
			None => {
				if self.len != 0 {
					panic!("empty tree with length {}", self.len)
				}
				return 0;
			}
		};

		if self.node(root).parent().is_some() {
			panic!("root has a parent")
		}

		if self.node(root).is_red() {
			panic!("root is red")
		}

		// (node, expected parent, black nodes above, lower bound, upper bound)
		let mut stack: SmallVec<[(usize, Option<usize>, usize, Option<usize>, Option<usize>); 64]> =
			SmallVec::new();
		stack.push((root, None, 0, None, None));

		let mut black_height = None;
		let mut count = 0;
		while let Some((id, parent, blacks, lower, upper)) = stack.pop() {
			let node = self.node(id);
			count += 1;

			if node.parent() != parent {
				panic!("wrong parent link in node {}", id)
			}

			if let Some(lower) = lower {
				if !self.compare.less(self.node(lower).key(), node.key()) {
					panic!("node {} is not greater than node {}", id, lower)
				}
			}

			if let Some(upper) = upper {
				if !self.compare.less(node.key(), self.node(upper).key()) {
					panic!("node {} is not less than node {}", id, upper)
				}
			}

			if node.is_red() && (self.is_red(node.left()) || self.is_red(node.right())) {
				panic!("red node {} has a red child", id)
			}

			let expected_size = 1 + self.subtree_len(node.left()) + self.subtree_len(node.right());
			if node.size() != expected_size {
				panic!(
					"node {} has size {} instead of {}",
					id,
					node.size(),
					expected_size
				)
			}

			let blacks = if node.is_red() { blacks } else { blacks + 1 };

			if node.left().is_none() || node.right().is_none() {
				match black_height {
					None => black_height = Some(blacks),
					Some(h) => {
						if h != blacks {
							panic!("tree not balanced")
						}
					}
				}
			}

			if let Some(right) = node.right() {
				stack.push((right, Some(id), blacks, Some(id), upper))
			}

			if let Some(left) = node.left() {
				stack.push((left, Some(id), blacks, lower, Some(id)))
			}
		}

		if count != self.len || self.node(root).size() != self.len {
			panic!("tree has {} nodes but length {}", count, self.len)
		}

		black_height.unwrap_or(0)
	}
}

impl<K, V, C: SlabMut<Node<K, V>>, L> RbTreeExtMut<K, V> for RbTreeMap<K, V, C, L>
where
	C: SimpleCollectionRef,
	C: SimpleCollectionMut,
{
	#[inline]
	fn node_mut(&mut self, id: usize) -> &mut Node<K, V> {
		match self.nodes.get_mut(id) {
			Some(node) => C::into_mut(node),
			None => panic!("no node with id {}", id),
		}
	}

	#[inline]
	fn allocate_node(&mut self, node: Node<K, V>) -> usize {
		self.nodes.insert(node)
	}

	#[inline]
	fn release_node(&mut self, id: usize) -> Node<K, V> {
		match self.nodes.remove(id) {
			Some(node) => node,
			None => panic!("no node with id {}", id),
		}
	}

	#[inline]
	fn update_size(&mut self, id: usize) {
		let node = self.node(id);
		let size = 1 + self.subtree_len(node.left()) + self.subtree_len(node.right());
		self.node_mut(id).set_size(size)
	}

	#[inline]
	fn size_adjust(&mut self, mut id: Option<usize>, grow: bool) {
		while let Some(current) = id {
			let node = self.node_mut(current);
			let size = if grow { node.size() + 1 } else { node.size() - 1 };
			node.set_size(size);
			id = node.parent()
		}
	}

	#[inline]
	fn replace_child(&mut self, parent: Option<usize>, old: usize, new: Option<usize>) {
		match parent {
			Some(parent) => {
				let node = self.node_mut(parent);
				if node.left() == Some(old) {
					node.set_child(Side::Left, new)
				} else {
					node.set_child(Side::Right, new)
				}
			}
			None => self.root = new,
		}
	}

	fn rotate(&mut self, id: usize, dir: Side) -> usize {
		let up = match self.node(id).child(dir.opposite()) {
			Some(up) => up,
			None => panic!(
				"cannot rotate node {} {:?}: no {:?} child",
				id,
				dir,
				dir.opposite()
			),
		};

		let parent = self.node(id).parent();
		let inner = self.node(up).child(dir);

		self.node_mut(id).set_child(dir.opposite(), inner);
		if let Some(inner) = inner {
			self.node_mut(inner).set_parent(Some(id))
		}

		self.replace_child(parent, id, Some(up));
		self.node_mut(up).set_parent(parent);

		self.node_mut(up).set_child(dir, Some(id));
		self.node_mut(id).set_parent(Some(up));

		self.update_size(id);
		self.update_size(up);

		trace_log!(node = id, up, ?dir, "rotate");
		up
	}

	fn fix_red_red(&mut self, id: usize) {
		let parent = match self.node(id).parent() {
			Some(parent) => parent,
			None => {
				self.node_mut(id).set_color(Color::Black);
				return;
			}
		};

		if !self.node(id).is_red() || !self.node(parent).is_red() {
			return;
		}

		let grand_parent = match self.node(parent).parent() {
			Some(grand_parent) => grand_parent,
			None => {
				self.node_mut(parent).set_color(Color::Black);
				return;
			}
		};

		let parent_side = match self.node(grand_parent).side_of(parent) {
			Some(side) => side,
			None => panic!("broken parent link in node {}", parent),
		};

		let side = match self.node(parent).side_of(id) {
			Some(side) => side,
			None => panic!("broken parent link in node {}", id),
		};

		let top = if side == parent_side {
			self.rotate(grand_parent, parent_side.opposite())
		} else {
			self.rotate(parent, side.opposite());
			self.rotate(grand_parent, parent_side.opposite())
		};

		let top_color = self.node(top).color();
		let grand_parent_color = self.node(grand_parent).color();
		self.node_mut(top).set_color(grand_parent_color);
		self.node_mut(grand_parent).set_color(top_color);
	}

	fn relink(&mut self, a: usize, b: usize) {
		if a == b {
			return;
		}

		let swap = |id: Option<usize>| {
			id.map(|id| {
				if id == a {
					b
				} else if id == b {
					a
				} else {
					id
				}
			})
		};

		let a_side = self.side_of(a);
		let b_side = self.side_of(b);

		let (a_parent, a_left, a_right, a_color, a_size) = {
			let node = self.node(a);
			(node.parent(), node.left(), node.right(), node.color(), node.size())
		};

		let (b_parent, b_left, b_right, b_color, b_size) = {
			let node = self.node(b);
			(node.parent(), node.left(), node.right(), node.color(), node.size())
		};

		{
			let node = self.node_mut(a);
			node.set_parent(swap(b_parent));
			node.set_child(Side::Left, swap(b_left));
			node.set_child(Side::Right, swap(b_right));
			node.set_color(b_color);
			node.set_size(b_size);
		}

		{
			let node = self.node_mut(b);
			node.set_parent(swap(a_parent));
			node.set_child(Side::Left, swap(a_left));
			node.set_child(Side::Right, swap(a_right));
			node.set_color(a_color);
			node.set_size(a_size);
		}

		for (id, other, side) in [(a, b, b_side), (b, a, a_side)] {
			let children: SmallVec<[usize; 2]> = self.node(id).children().collect();
			for child in children {
				if child != other {
					self.node_mut(child).set_parent(Some(id))
				}
			}

			match (self.node(id).parent(), side) {
				(Some(parent), _) if parent == other => (),
				(Some(parent), Some(side)) => self.node_mut(parent).set_child(side, Some(id)),
				(Some(parent), None) => panic!("broken parent link in node {}", parent),
				(None, _) => self.root = Some(id),
			}
		}

		trace_log!(a, b, "relink");
	}

	fn insert_new(&mut self, key: K, value: V) -> usize
	where
		L: Compare<K>,
	{
		let generation = self.generation;
		self.generation += 1;

		let mut cur = match self.root {
			Some(root) => root,
			None => {
				let id = self.allocate_node(Node::new(None, Item::new(key, value), generation));
				self.node_mut(id).set_color(Color::Black);
				self.root = Some(id);
				self.len = 1;
				debug_log!(node = id, "insert root");
				return id;
			}
		};

		let id = loop {
			let (left, right) = {
				let node = self.node(cur);
				(node.left(), node.right())
			};

			// split the 4-node on the way down.
			if self.is_red(left) && self.is_red(right) {
				self.node_mut(cur).set_color(Color::Red);
				for child in left.into_iter().chain(right) {
					self.node_mut(child).set_color(Color::Black)
				}
				trace_log!(node = cur, "split");
				self.fix_red_red(cur);
			}

			let side = if self.compare.less(&key, self.node(cur).key()) {
				Side::Left
			} else {
				Side::Right
			};

			match self.node(cur).child(side) {
				Some(child) => cur = child,
				None => {
					let id = self.allocate_node(Node::new(Some(cur), Item::new(key, value), generation));
					self.node_mut(cur).set_child(side, Some(id));
					break id;
				}
			}
		};

		self.len += 1;
		self.size_adjust(Some(cur), true);
		self.fix_red_red(id);

		if let Some(root) = self.root {
			self.node_mut(root).set_color(Color::Black)
		}

		debug_log!(node = id, len = self.len, "insert");
		id
	}

	#[inline]
	fn insert_item(&mut self, key: K, value: V) -> (usize, bool)
	where
		L: Compare<K>,
	{
		match self.find_node(&key) {
			Some(id) => (id, false),
			None => (self.insert_new(key, value), true),
		}
	}

	fn erase_node(&mut self, target: usize) -> Item<K, V>
	where
		L: Compare<K>,
	{
		let mut q = match self.root {
			Some(root) => root,
			None => panic!("no node with id {} in an empty tree", target),
		};

		// Descend toward the target, then toward its in-order successor,
		// making sure that the node we stop on is red.
		loop {
			let dir = if q == target || !self.compare.less(self.node(target).key(), self.node(q).key()) {
				Side::Right
			} else {
				Side::Left
			};

			let next = self.node(q).child(dir);

			// push a red node down.
			if !self.is_red(Some(q)) && !self.is_red(next) {
				let other = self.node(q).child(dir.opposite());
				if self.is_red(other) {
					let top = self.rotate(q, dir);
					self.node_mut(q).set_color(Color::Red);
					self.node_mut(top).set_color(Color::Black);
				} else if let Some(parent) = self.node(q).parent() {
					let last = match self.node(parent).side_of(q) {
						Some(side) => side,
						None => panic!("broken parent link in node {}", q),
					};

					if let Some(sibling) = self.node(parent).child(last.opposite()) {
						let near = self.node(sibling).child(last);
						let far = self.node(sibling).child(last.opposite());

						if !self.is_red(near) && !self.is_red(far) {
							self.node_mut(parent).set_color(Color::Black);
							self.node_mut(sibling).set_color(Color::Red);
							self.node_mut(q).set_color(Color::Red);
						} else {
							let top = if self.is_red(near) {
								self.rotate(sibling, last.opposite());
								self.rotate(parent, last)
							} else {
								self.rotate(parent, last)
							};

							self.node_mut(q).set_color(Color::Red);
							self.node_mut(top).set_color(Color::Red);
							let (left, right) = {
								let node = self.node(top);
								(node.left(), node.right())
							};
							for child in left.into_iter().chain(right) {
								self.node_mut(child).set_color(Color::Black)
							}
						}
					}
				}
			}

			match next {
				Some(next) => q = next,
				None => break,
			}
		}

		if q != target {
			self.relink(target, q)
		}

		let (parent, child) = {
			let node = self.node(target);
			(node.parent(), node.left().or(node.right()))
		};

		self.replace_child(parent, target, child);
		if let Some(child) = child {
			self.node_mut(child).set_parent(parent)
		}

		self.size_adjust(parent, false);
		self.len -= 1;

		if let Some(root) = self.root {
			self.node_mut(root).set_color(Color::Black)
		}

		debug_log!(node = target, len = self.len, "erase");
		self.release_node(target).into_item()
	}

	fn copy_subtree(&mut self, source: &Self, id: usize) -> usize
	where
		K: Clone,
		V: Clone,
	{
		let mut stack: SmallVec<[(usize, Option<(usize, Side)>); 64]> = SmallVec::new();
		stack.push((id, None));

		let mut copy_root = None;
		while let Some((source_id, attach)) = stack.pop() {
			let node = source.node(source_id);
			let copy_id = self.allocate_node(node.detached_copy(attach.map(|(parent, _)| parent)));

			match attach {
				Some((parent, side)) => self.node_mut(parent).set_child(side, Some(copy_id)),
				None => copy_root = Some(copy_id),
			}

			if let Some(right) = node.right() {
				stack.push((right, Some((copy_id, Side::Right))))
			}

			if let Some(left) = node.left() {
				stack.push((left, Some((copy_id, Side::Left))))
			}
		}

		match copy_root {
			Some(root) => root,
			None => panic!("no node copied"),
		}
	}
}
