use std::{collections::HashMap, hash::Hash};

/// Keeps at most `cap` items per author, in input order. Greedy: earlier items are never evicted
/// to make room for later ones.
pub fn cap_per_author<T, K, F>(items: Vec<T>, cap: usize, author_of: F) -> Vec<T>
where
	K: Eq + Hash,
	F: Fn(&T) -> K,
{
	let mut seen: HashMap<K, usize> = HashMap::new();
	let mut out = Vec::with_capacity(items.len());

	for item in items {
		let count = seen.entry(author_of(&item)).or_insert(0);

		if *count < cap {
			*count += 1;

			out.push(item);
		}
	}

	out
}
