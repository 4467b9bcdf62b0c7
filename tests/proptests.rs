//! Property-based tests for the map.
//!
//! Random operation sequences are checked against `std::collections::BTreeMap`,
//! and the tree is validated after every mutation.

use proptest::prelude::*;
use rbtree_slab::{Error, Greater, Position, RbTreeExt, RbTreeMap};
use std::collections::BTreeMap;

/// Keys are drawn from a small range so that sequences hit existing keys often.
const KEY_RANGE: u16 = 64;

#[derive(Debug, Clone)]
enum Op {
	Insert(u16, u32),
	Replace(u16, u32),
	Remove(u16),
	EraseFound(u16),
	Default(u16),
	At(u16),
	PopFirst,
	PopLast,
}

fn key() -> impl Strategy<Value = u16> {
	0..KEY_RANGE
}

fn operations(max_ops: usize) -> impl Strategy<Value = Vec<Op>> {
	prop::collection::vec(
		prop_oneof![
			4 => (key(), any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
			1 => (key(), any::<u32>()).prop_map(|(k, v)| Op::Replace(k, v)),
			2 => key().prop_map(Op::Remove),
			2 => key().prop_map(Op::EraseFound),
			1 => key().prop_map(Op::Default),
			1 => key().prop_map(Op::At),
			1 => Just(Op::PopFirst),
			1 => Just(Op::PopLast),
		],
		0..=max_ops,
	)
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(200))]

	/// Random operation sequences should match BTreeMap behavior.
	#[test]
	fn differential_random_ops(ops in operations(200)) {
		let mut map: RbTreeMap<u16, u32> = RbTreeMap::new();
		let mut oracle: BTreeMap<u16, u32> = BTreeMap::new();

		for op in ops {
			match op {
				Op::Insert(key, value) => {
					let (cursor, inserted) = map.insert(key, value);
					prop_assert_eq!(inserted, !oracle.contains_key(&key));
					oracle.entry(key).or_insert(value);
					prop_assert_eq!(cursor.get(&map).unwrap(), (&key, &oracle[&key]));
				}
				Op::Replace(key, value) => {
					prop_assert_eq!(map.replace(key, value), oracle.insert(key, value));
				}
				Op::Remove(key) => {
					prop_assert_eq!(map.remove(&key), oracle.remove(&key));
				}
				Op::EraseFound(key) => {
					let expected = oracle.remove_entry(&key).ok_or(Error::InvalidIterator);
					prop_assert_eq!(map.erase(map.find(&key)), expected);
				}
				Op::Default(key) => {
					let value = *map.get_or_insert_default(key);
					prop_assert_eq!(value, *oracle.entry(key).or_default());
				}
				Op::At(key) => {
					let expected = oracle.get(&key).ok_or(Error::KeyNotFound);
					prop_assert_eq!(map.at(&key), expected);
				}
				Op::PopFirst => {
					prop_assert_eq!(map.pop_first(), oracle.pop_first());
				}
				Op::PopLast => {
					prop_assert_eq!(map.pop_last(), oracle.pop_last());
				}
			}

			map.validate();
			prop_assert_eq!(map.len(), oracle.len());
		}

		prop_assert!(map.iter().eq(oracle.iter()));
		prop_assert!(map.iter().rev().eq(oracle.iter().rev()));
	}

	/// Inserting keys already present must not modify the tree at all.
	#[test]
	fn duplicate_insert_is_noop(keys in prop::collection::vec(key(), 1..100), candidate in key()) {
		let mut map: RbTreeMap<u16, u16> = keys.iter().map(|&k| (k, k)).collect();
		let present = map.contains_key(&candidate);
		let before: Vec<_> = map.iter().map(|(k, v)| (*k, *v, map.find(k))).collect();
		let root = map.root_id();

		let (cursor, inserted) = map.insert(candidate, u16::MAX);
		prop_assert_eq!(inserted, !present);

		if present {
			prop_assert_eq!(cursor, map.find(&candidate));
			prop_assert_eq!(map.root_id(), root);
			let after: Vec<_> = map.iter().map(|(k, v)| (*k, *v, map.find(k))).collect();
			prop_assert_eq!(after, before);
		}

		map.validate();
	}

	/// Subtree sizes give the rank of every key.
	#[test]
	fn order_statistics_match_sorted_order(keys in prop::collection::btree_set(any::<u32>(), 0..200)) {
		let map: RbTreeMap<u32, ()> = keys.iter().map(|&k| (k, ())).collect();

		for (i, key) in keys.iter().enumerate() {
			prop_assert_eq!(map.get_index(i).map(|(k, _)| k), Some(key));
			prop_assert_eq!(map.index_of(key), Some(i));
		}

		prop_assert_eq!(map.get_index(keys.len()), None);
	}

	/// Cursors on surviving keys keep naming the same binding.
	#[test]
	fn cursors_are_stable(keys in prop::collection::btree_set(key(), 1..64), erased in prop::collection::vec(key(), 0..64)) {
		let mut map: RbTreeMap<u16, u32> = keys.iter().map(|&k| (k, k as u32 * 7)).collect();
		let cursors: Vec<_> = keys.iter().map(|&k| (k, map.find(&k))).collect();

		for key in erased {
			map.remove(&key);
		}

		for (key, cursor) in cursors {
			match map.get(&key) {
				Some(value) => prop_assert_eq!(cursor.get(&map), Ok((&key, value))),
				None => prop_assert_eq!(cursor.get(&map), Err(Error::InvalidIterator)),
			}
		}
	}

	/// A custom comparator orders the map accordingly.
	#[test]
	fn reverse_comparator(keys in prop::collection::vec(any::<i64>(), 0..100)) {
		let mut map = RbTreeMap::with_compare(Greater);
		for &k in &keys {
			map.insert(k, ());
		}
		map.validate();

		let mut expected = keys.clone();
		expected.sort_unstable_by(|a, b| b.cmp(a));
		expected.dedup();
		prop_assert!(map.keys().eq(expected.iter()));
	}
}
