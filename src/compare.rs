//! Key comparators.
//!
//! A comparator is a strict weak ordering given as a less-than predicate.
//! Two keys are equivalent when neither is less than the other.
use std::cmp::Ordering;

/// Strict less-than predicate on `T`.
pub trait Compare<T: ?Sized> {
	/// Returns `true` if `a` is strictly less than `b`.
	fn less(&self, a: &T, b: &T) -> bool;

	/// Three-way comparison derived from [`Compare::less`].
	#[inline]
	fn compare(&self, a: &T, b: &T) -> Ordering {
		if self.less(a, b) {
			Ordering::Less
		} else if self.less(b, a) {
			Ordering::Greater
		} else {
			Ordering::Equal
		}
	}
}

/// Natural order, given by [`Ord`].
///
/// This is the default comparator of the map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Less;

impl<T: Ord + ?Sized> Compare<T> for Less {
	#[inline]
	fn less(&self, a: &T, b: &T) -> bool {
		a < b
	}

	#[inline]
	fn compare(&self, a: &T, b: &T) -> Ordering {
		a.cmp(b)
	}
}

/// Reverse of the natural order.
///
/// ```
/// use rbtree_slab::{Greater, RbTreeMap};
///
/// let mut map = RbTreeMap::with_compare(Greater);
/// map.insert(1, 'a');
/// map.insert(2, 'b');
/// assert_eq!(map.keys().copied().collect::<Vec<_>>(), [2, 1]);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Greater;

impl<T: Ord + ?Sized> Compare<T> for Greater {
	#[inline]
	fn less(&self, a: &T, b: &T) -> bool {
		a > b
	}

	#[inline]
	fn compare(&self, a: &T, b: &T) -> Ordering {
		b.cmp(a)
	}
}

/// Comparator given by a less-than closure.
///
/// ```
/// use rbtree_slab::{ByFn, RbTreeMap};
///
/// let mut map = RbTreeMap::with_compare(ByFn(|a: &&str, b: &&str| a.len() < b.len()));
/// map.insert("three", 3);
/// map.insert("one", 1);
/// map.insert("two", 2); // same length as "one"
/// assert_eq!(map.len(), 2);
/// assert_eq!(map.get(&"six"), Some(&1));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ByFn<F>(pub F);

impl<T: ?Sized, F: Fn(&T, &T) -> bool> Compare<T> for ByFn<F> {
	#[inline]
	fn less(&self, a: &T, b: &T) -> bool {
		(self.0)(a, b)
	}
}
