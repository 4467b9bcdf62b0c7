use std::fmt;

mod item;

pub use item::Item;

/// Node color.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Color {
	Red,
	Black,
}

/// Side of a child relative to its parent.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Side {
	Left,
	Right,
}

impl Side {
	#[inline]
	pub fn opposite(self) -> Side {
		match self {
			Side::Left => Side::Right,
			Side::Right => Side::Left,
		}
	}
}

/// Red-black tree node.
///
/// Links are identifiers of other nodes in the same storage.
/// The `left` and `right` links own their subtrees, in the sense that the node
/// subtree is exactly what is reachable through them.
/// The `parent` link is a back-reference used for traversal and rotations only.
pub struct Node<K, V> {
	item: Item<K, V>,
	color: Color,

	/// Insertion stamp, unique among the nodes a map has ever allocated.
	///
	/// It stays with the item when links are exchanged, and tells a node apart
	/// from an older one that lived in the same slot.
	generation: u64,

	/// Number of nodes in the subtree rooted at this node.
	size: usize,

	parent: Option<usize>,
	left: Option<usize>,
	right: Option<usize>,
}

impl<K, V> Node<K, V> {
	/// Create a new red leaf node.
	#[inline]
	pub fn new(parent: Option<usize>, item: Item<K, V>, generation: u64) -> Node<K, V> {
		Node {
			item,
			color: Color::Red,
			generation,
			size: 1,
			parent,
			left: None,
			right: None,
		}
	}

	/// Copy this node's item, color, generation and size into a new node without children.
	#[inline]
	pub fn detached_copy(&self, parent: Option<usize>) -> Node<K, V>
	where
		K: Clone,
		V: Clone,
	{
		Node {
			item: self.item.clone(),
			color: self.color,
			generation: self.generation,
			size: self.size,
			parent,
			left: None,
			right: None,
		}
	}

	#[inline]
	pub fn item(&self) -> &Item<K, V> {
		&self.item
	}

	#[inline]
	pub fn item_mut(&mut self) -> &mut Item<K, V> {
		&mut self.item
	}

	#[inline]
	pub fn into_item(self) -> Item<K, V> {
		self.item
	}

	#[inline]
	pub fn key(&self) -> &K {
		self.item.key()
	}

	#[inline]
	pub fn value(&self) -> &V {
		self.item.value()
	}

	#[inline]
	pub fn value_mut(&mut self) -> &mut V {
		self.item.value_mut()
	}

	#[inline]
	pub fn color(&self) -> Color {
		self.color
	}

	#[inline]
	pub fn set_color(&mut self, color: Color) {
		self.color = color
	}

	#[inline]
	pub fn is_red(&self) -> bool {
		self.color == Color::Red
	}

	#[inline]
	pub fn generation(&self) -> u64 {
		self.generation
	}

	#[inline]
	pub fn size(&self) -> usize {
		self.size
	}

	#[inline]
	pub fn set_size(&mut self, size: usize) {
		self.size = size
	}

	#[inline]
	pub fn parent(&self) -> Option<usize> {
		self.parent
	}

	#[inline]
	pub fn set_parent(&mut self, parent: Option<usize>) {
		self.parent = parent
	}

	#[inline]
	pub fn left(&self) -> Option<usize> {
		self.left
	}

	#[inline]
	pub fn right(&self) -> Option<usize> {
		self.right
	}

	#[inline]
	pub fn child(&self, side: Side) -> Option<usize> {
		match side {
			Side::Left => self.left,
			Side::Right => self.right,
		}
	}

	#[inline]
	pub fn set_child(&mut self, side: Side, child: Option<usize>) {
		match side {
			Side::Left => self.left = child,
			Side::Right => self.right = child,
		}
	}

	/// Returns the side of the given child, if it is a child of this node.
	#[inline]
	pub fn side_of(&self, child: usize) -> Option<Side> {
		if self.left == Some(child) {
			Some(Side::Left)
		} else if self.right == Some(child) {
			Some(Side::Right)
		} else {
			None
		}
	}

	#[inline]
	pub fn children(&self) -> impl Iterator<Item = usize> {
		self.left.into_iter().chain(self.right)
	}

	/// Write the node label and attributes in the DOT graph description language.
	#[cfg(feature = "dot")]
	#[inline]
	pub fn dot_write_label<W: std::io::Write>(&self, f: &mut W) -> std::io::Result<()>
	where
		K: std::fmt::Display,
		V: std::fmt::Display,
	{
		let fill = match self.color {
			Color::Red => "firebrick",
			Color::Black => "black",
		};

		write!(
			f,
			"{}|{}|{}\" fillcolor={}",
			self.key(),
			self.value(),
			self.size,
			fill
		)
	}
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Node<K, V> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("Node")
			.field("key", self.key())
			.field("value", self.value())
			.field("color", &self.color)
			.field("generation", &self.generation)
			.field("size", &self.size)
			.field("parent", &self.parent)
			.field("left", &self.left)
			.field("right", &self.right)
			.finish()
	}
}
