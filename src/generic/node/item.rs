/// Key-value binding stored in a node.
///
/// The key is immutable once the item is created:
/// only the value can be accessed mutably.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Item<K, V> {
	key: K,
	value: V,
}

impl<K, V> Item<K, V> {
	#[inline]
	pub fn new(key: K, value: V) -> Item<K, V> {
		Item { key, value }
	}

	#[inline]
	pub fn key(&self) -> &K {
		&self.key
	}

	#[inline]
	pub fn value(&self) -> &V {
		&self.value
	}

	#[inline]
	pub fn value_mut(&mut self) -> &mut V {
		&mut self.value
	}

	/// Replace the value, returning the old one.
	#[inline]
	pub fn set_value(&mut self, value: V) -> V {
		std::mem::replace(&mut self.value, value)
	}

	#[inline]
	pub fn as_pair(&self) -> (&K, &V) {
		(&self.key, &self.value)
	}

	#[inline]
	pub fn as_pair_mut(&mut self) -> (&K, &mut V) {
		(&self.key, &mut self.value)
	}

	#[inline]
	pub fn into_pair(self) -> (K, V) {
		(self.key, self.value)
	}
}
