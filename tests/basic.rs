use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};
use rbtree_slab::{Position, RbTreeExt, RbTreeMap};

const SEED: &[u8; 16] = b"testseedtestseed";

#[test]
pub fn insert() {
	let mut map: RbTreeMap<usize, usize> = RbTreeMap::new();

	for (key, value) in &ITEMS {
		let (_, inserted) = map.insert(*key, *value);
		if !inserted {
			println!("duplicate: {}", key);
		}
		map.validate();
	}

	assert_eq!(map.len(), 100);
}

#[test]
pub fn remove() {
	let mut map: RbTreeMap<usize, usize> = RbTreeMap::new();

	let mut items = ITEMS;

	for (key, value) in &items {
		map.insert(*key, *value);
	}

	let mut rng = SmallRng::from_seed(*SEED);
	items.shuffle(&mut rng);

	for (key, value) in &items {
		assert_eq!(map.remove(key), Some(*value));
		map.validate();
	}

	assert!(map.is_empty())
}

#[test]
pub fn duplicate_insert_leaves_tree_unchanged() {
	let mut map: RbTreeMap<usize, usize> = RbTreeMap::new();

	for (key, value) in &ITEMS {
		map.insert(*key, *value);
	}

	let before = format!("{:?}", map);
	let shape: Vec<_> = (0..map.len())
		.map(|i| {
			let id = map.nth_id(i).unwrap();
			let node = map.node(id);
			(id, node.is_red(), node.size(), node.parent())
		})
		.collect();

	for (key, _) in &ITEMS {
		let (cursor, inserted) = map.insert(*key, 0);
		assert!(!inserted);
		assert_eq!(cursor.get(&map).unwrap().0, key);
	}

	assert_eq!(format!("{:?}", map), before);
	for (i, (id, red, size, parent)) in shape.into_iter().enumerate() {
		let node = map.node(id);
		assert_eq!(map.nth_id(i), Some(id));
		assert_eq!((node.is_red(), node.size(), node.parent()), (red, size, parent));
	}
}

#[test]
pub fn erase_find() {
	let mut map: RbTreeMap<usize, usize> = ITEMS.iter().copied().collect();

	let mut items = ITEMS;
	let mut rng = SmallRng::from_seed(*SEED);
	items.shuffle(&mut rng);

	for (n, (key, value)) in items.iter().enumerate() {
		let len = map.len();
		assert_eq!(map.erase(map.find(key)), Ok((*key, *value)));
		assert_eq!(map.len(), len - 1);
		assert_eq!(map.count(key), 0);
		map.validate();

		let remaining = &items[(n + 1)..];
		assert!(remaining.iter().all(|(k, v)| map.get(k) == Some(v)));
	}
}

#[test]
pub fn neighbours() {
	let map: RbTreeMap<usize, usize> = ITEMS.iter().copied().collect();

	for (key, _) in &ITEMS {
		let id = map.find_node(key).unwrap();

		if let Some(before) = map.predecessor(id) {
			assert!(map.node(before).key() < key);
			assert_eq!(map.successor(before), Some(id))
		}

		if let Some(after) = map.successor(id) {
			assert!(map.node(after).key() > key);
			assert_eq!(map.predecessor(after), Some(id))
		}
	}
}

#[test]
pub fn interleaved() {
	let items = ITEMS;

	for k in 1..items.len() {
		let mut map: RbTreeMap<usize, usize> = RbTreeMap::new();

		for (key, value) in &items[..k] {
			map.insert(*key, *value);
		}

		for (key, value) in &items[..k] {
			assert_eq!(map.remove(key), Some(*value));
			map.validate();
			map.insert(*key, *value);
			map.validate();
		}

		assert_eq!(map.len(), k);
	}
}

#[test]
pub fn update() {
	let mut map: RbTreeMap<usize, usize> = RbTreeMap::new();

	for (key, value) in &ITEMS {
		if key % 2 == 0 {
			map.insert(*key, *value);
		}
	}

	for (key, value) in &ITEMS {
		match map.get(key).copied() {
			Some(current_value) => {
				if current_value % 2 == 0 {
					map.remove(key);
				} else {
					assert_eq!(map.replace(*key, 10000 - *value), Some(current_value));
				}
			}
			None => {
				*map.get_or_insert_default(*key) = *value;
			}
		}

		map.validate();
	}

	for (key, value) in &ITEMS {
		let shoud_be_present = *key % 2 == 1 || *value % 2 == 1;

		match map.get(key) {
			Some(current_value) => {
				if !shoud_be_present {
					panic!("binding {}:{} should not be present", *key, *value);
				}

				if *key % 2 == 0 && *value % 2 == 1 {
					assert_eq!(*current_value, 10000 - *value)
				} else {
					assert_eq!(*current_value, *value)
				}
			}
			None => {
				if shoud_be_present {
					panic!("binding {}:{} should be present", *key, *value);
				}
			}
		}
	}
}

#[test]
pub fn order_statistics() {
	let map: RbTreeMap<usize, usize> = ITEMS.iter().copied().collect();

	let mut sorted = ITEMS;
	sorted.sort();

	for (i, (key, value)) in sorted.iter().enumerate() {
		assert_eq!(map.get_index(i), Some((key, value)));
		assert_eq!(map.index_of(key), Some(i));
	}

	assert_eq!(map.get_index(sorted.len()), None);
}

const ITEMS: [(usize, usize); 100] = [
	(4223, 5948),
	(8175, 4629),
	(1411, 7458),
	(9208, 4040),
	(1246, 2287),
	(6568, 7583),
	(5426, 491),
	(7850, 8789),
	(2034, 9388),
	(1408, 7331),
	(7346, 5820),
	(9712, 4253),
	(5430, 7253),
	(1662, 5278),
	(9322, 777),
	(9256, 8116),
	(7971, 8071),
	(648, 3082),
	(7510, 2207),
	(8394, 7839),
	(57, 8834),
	(7770, 5437),
	(6388, 6755),
	(9177, 9904),
	(6487, 5143),
	(2231, 688),
	(7389, 4472),
	(577, 1930),
	(9130, 3222),
	(2230, 8268),
	(1211, 2354),
	(9237, 3643),
	(2912, 8471),
	(8783, 4977),
	(4325, 9566),
	(9355, 528),
	(9814, 9342),
	(1641, 6027),
	(3009, 8304),
	(4199, 2688),
	(7011, 9579),
	(8391, 8562),
	(1097, 5448),
	(1224, 5844),
	(5309, 2846),
	(7493, 8845),
	(3682, 48),
	(9165, 2755),
	(9959, 7420),
	(8158, 2616),
	(3210, 7795),
	(4418, 7790),
	(5592, 4184),
	(4111, 885),
	(742, 952),
	(2486, 6088),
	(6797, 271),
	(8829, 3005),
	(6444, 5818),
	(6566, 8783),
	(913, 2886),
	(2325, 1260),
	(4382, 3045),
	(5451, 1473),
	(9376, 8133),
	(9036, 4924),
	(5202, 7364),
	(9190, 5619),
	(8190, 2892),
	(9493, 500),
	(3043, 8315),
	(9220, 6396),
	(6400, 5692),
	(2709, 8547),
	(1218, 7403),
	(581, 117),
	(2577, 9373),
	(9349, 3186),
	(9021, 4874),
	(4207, 1781),
	(5201, 5305),
	(7889, 1996),
	(6327, 6377),
	(8120, 2338),
	(8213, 9072),
	(865, 6524),
	(5858, 5331),
	(1904, 3594),
	(9950, 8859),
	(518, 6551),
	(2674, 7081),
	(9848, 618),
	(5120, 5595),
	(259, 9662),
	(3077, 863),
	(4519, 7217),
	(3931, 6743),
	(2575, 6810),
	(1553, 5964),
	(4493, 3677)
];
