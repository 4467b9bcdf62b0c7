use rbtree_slab::{ConstCursor, Cursor, Error, Position, RbTreeExt, RbTreeMap};

fn sample() -> RbTreeMap<i32, String> {
	(1..=20).map(|i| (i * 10, format!("v{}", i))).collect()
}

/// Collect the keys by walking cursors forward from `begin`.
fn walk_forward<P: Position>(map: &RbTreeMap<i32, String>, mut cursor: P) -> Vec<i32> {
	let mut keys = Vec::new();
	while !cursor.is_end() {
		keys.push(*cursor.get(map).unwrap().0);
		cursor.move_next(map).unwrap();
	}
	keys
}

#[test]
pub fn forward_and_backward() {
	let map = sample();
	let keys: Vec<_> = map.keys().copied().collect();

	assert_eq!(walk_forward(&map, map.begin()), keys);
	assert_eq!(walk_forward(&map, map.cbegin()), keys);

	let mut cursor = map.end();
	let mut backward = Vec::new();
	while cursor != map.begin() {
		cursor.move_prev(&map).unwrap();
		backward.push(*cursor.get(&map).unwrap().0);
	}
	backward.reverse();
	assert_eq!(backward, keys);
}

#[test]
pub fn navigation_errors() {
	let map = sample();

	let mut end = map.end();
	assert_eq!(end.get(&map), Err(Error::InvalidIterator));
	assert_eq!(end.move_next(&map), Err(Error::InvalidIterator));
	assert_eq!(end, map.end());

	let mut first = map.begin();
	assert_eq!(first.move_prev(&map), Err(Error::InvalidIterator));
	assert_eq!(first, map.begin());

	let empty: RbTreeMap<i32, String> = RbTreeMap::new();
	assert_eq!(empty.begin(), empty.end());
	let mut end = empty.cend();
	assert_eq!(end.move_prev(&empty), Err(Error::InvalidIterator));
}

#[test]
pub fn last_element_moves_to_end() {
	let map = sample();
	let mut last = map.find(&200);
	last.move_next(&map).unwrap();
	assert!(last.is_end());
	assert_eq!(last, map.end());

	last.move_prev(&map).unwrap();
	assert_eq!(last, map.find(&200));
}

#[test]
pub fn erase_end_fails() {
	let mut map = sample();
	let before = map.clone();

	assert_eq!(map.erase(map.end()), Err(Error::InvalidIterator));
	assert_eq!(map.erase(map.find(&15)), Err(Error::InvalidIterator));
	assert_eq!(map, before);
}

#[test]
pub fn foreign_cursor() {
	let mut a = sample();
	let b = a.clone();

	let cursor = b.find(&100);
	assert!(!cursor.is_end());
	assert_eq!(cursor.get(&a), Err(Error::InvalidIterator));
	assert_eq!(a.erase(cursor), Err(Error::InvalidIterator));
	assert_eq!(a.erase(b.end()), Err(Error::InvalidIterator));
	assert_eq!(a.len(), 20);
	assert_ne!(a.find(&100), cursor);
}

#[test]
pub fn reused_slot_is_not_reachable() {
	let mut map = RbTreeMap::new();
	let (one, _) = map.insert(1, "a");
	let (two, _) = map.insert(2, "b");

	assert_eq!(map.erase(one), Ok((1, "a")));
	let (three, inserted) = map.insert(3, "c");
	assert!(inserted);

	// the new binding lands in the slot freed by the erasure.
	assert_eq!(three.node_id(), one.node_id());
	assert_ne!(three, one);

	assert_eq!(one.get(&map), Err(Error::InvalidIterator));
	assert_eq!(ConstCursor::from(one).get(&map), Err(Error::InvalidIterator));
	assert_eq!(one.value_mut(&mut map), Err(Error::InvalidIterator));
	let mut stale = one;
	assert_eq!(stale.move_next(&map), Err(Error::InvalidIterator));
	assert_eq!(stale, one);
	assert_eq!(map.erase(one), Err(Error::InvalidIterator));

	assert_eq!(map.len(), 2);
	assert_eq!(three.get(&map), Ok((&3, &"c")));
	assert_eq!(two.get(&map), Ok((&2, &"b")));
	assert_eq!(map.keys().copied().collect::<Vec<_>>(), [2, 3]);
	map.validate();
}

#[test]
pub fn erase_through_const_cursor() {
	let mut map = sample();

	for key in [100, 10, 200, 60] {
		let len = map.len();
		let cursor = map.cfind(&key);
		assert_eq!(map.erase(cursor), Ok((key, format!("v{}", key / 10))));
		assert_eq!(map.len(), len - 1);
		assert_eq!(map.count(&key), 0);
		assert_eq!(map.erase(cursor), Err(Error::InvalidIterator));
		map.validate();
	}

	assert_eq!(map.len(), 16);
}

#[test]
pub fn stability_across_erase() {
	let mut map = sample();
	let cursors: Vec<(i32, Cursor)> = (1..=20).map(|i| (i * 10, map.find(&(i * 10)))).collect();

	// erase every other key, including nodes with two children.
	for (key, cursor) in cursors.iter().step_by(2) {
		let (k, _) = map.erase(*cursor).unwrap();
		assert_eq!(k, *key);

		for (other, other_cursor) in &cursors {
			if map.contains_key(other) {
				let (k, v) = other_cursor.get(&map).unwrap();
				assert_eq!(k, other);
				assert_eq!(*v, format!("v{}", other / 10));
			}
		}
	}

	for (key, cursor) in cursors.iter().skip(1).step_by(2) {
		assert_eq!(*cursor, map.find(key));
	}
}

#[test]
pub fn stability_across_insert() {
	let mut map = sample();
	let cursor = map.find(&50);

	for i in 0..100 {
		map.insert(i * 3 + 1, String::new());
	}

	assert_eq!(cursor.get(&map), Ok((&50, &"v5".to_string())));
	assert_eq!(cursor, map.find(&50));
}

#[test]
pub fn mutable_access() {
	let mut map = sample();
	let cursor = map.find(&30);

	cursor.value_mut(&mut map).unwrap().push('!');
	assert_eq!(map[&30], "v3!");

	let (key, value) = cursor.get_mut(&mut map).unwrap();
	assert_eq!(*key, 30);
	value.clear();
	assert_eq!(map[&30], "");

	assert_eq!(map.end().value_mut(&mut map), Err(Error::InvalidIterator));
}

#[test]
pub fn const_conversion() {
	let map = sample();
	let cursor = map.find(&70);
	let read_only = ConstCursor::from(cursor);

	assert_eq!(read_only, cursor);
	assert_eq!(cursor, read_only);
	assert_eq!(read_only, map.cfind(&70));
	assert_eq!(read_only.get(&map), cursor.get(&map));
	assert!(map.cfind(&75).is_end());

	fn grants_mutation<P: Position>(_: &P) -> bool {
		P::MUTABLE
	}

	assert!(grants_mutation(&cursor));
	assert!(!grants_mutation(&read_only));
}
