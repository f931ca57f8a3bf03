/// Inserts one sponsored item before every `stride`-th organic item, skipping the first block.
/// Stops inserting once the sponsored pool runs dry.
pub fn interleave_sponsored<T>(organic: Vec<T>, sponsored: Vec<T>, stride: usize) -> Vec<T> {
	if stride == 0 || sponsored.is_empty() {
		return organic;
	}

	let mut pool = sponsored.into_iter();
	let mut out = Vec::with_capacity(organic.len() + pool.len());

	for (idx, item) in organic.into_iter().enumerate() {
		if idx > 0
			&& idx % stride == 0
			&& let Some(ad) = pool.next()
		{
			out.push(ad);
		}

		out.push(item);
	}

	out
}

/// Number of insertions `interleave_sponsored` makes for the given sizes.
pub fn sponsored_slots(organic_len: usize, pool_len: usize, stride: usize) -> usize {
	if stride == 0 || organic_len == 0 {
		return 0;
	}

	((organic_len - 1) / stride).min(pool_len)
}

#[cfg(test)]
mod tests {
	use super::{interleave_sponsored, sponsored_slots};

	#[derive(Debug, Clone, PartialEq)]
	enum Slot {
		Organic(usize),
		Ad(char),
	}

	fn organic(len: usize) -> Vec<Slot> {
		(0..len).map(Slot::Organic).collect()
	}

	fn ads(labels: &str) -> Vec<Slot> {
		labels.chars().map(Slot::Ad).collect()
	}

	#[test]
	fn twenty_five_items_with_stride_ten_get_two_ads() {
		let mixed = interleave_sponsored(organic(25), ads("abcde"), 10);

		assert_eq!(mixed.len(), 27);
		assert_eq!(mixed[10], Slot::Ad('a'));
		assert_eq!(mixed[11], Slot::Organic(10));
		assert_eq!(mixed[21], Slot::Ad('b'));
		assert_eq!(mixed[22], Slot::Organic(20));
	}

	#[test]
	fn first_block_never_carries_an_ad() {
		let mixed = interleave_sponsored(organic(10), ads("abc"), 10);

		assert_eq!(mixed, organic(10));
	}

	#[test]
	fn exhausted_pool_stops_insertions() {
		let mixed = interleave_sponsored(organic(60), ads("a"), 10);
		let inserted = mixed.iter().filter(|slot| matches!(slot, Slot::Ad(_))).count();

		assert_eq!(inserted, 1);
		assert_eq!(mixed.len(), 61);
	}

	#[test]
	fn organic_order_is_untouched() {
		let mixed = interleave_sponsored(organic(33), ads("xyz"), 15);
		let organic_only: Vec<Slot> =
			mixed.into_iter().filter(|slot| matches!(slot, Slot::Organic(_))).collect();

		assert_eq!(organic_only, organic(33));
	}

	#[test]
	fn insertion_count_matches_formula() {
		for len in 0..64 {
			for pool in 0..6 {
				for stride in [1, 3, 10, 15] {
					let mixed = interleave_sponsored(organic(len), ads(&"abcdef"[..pool]), stride);
					let inserted = mixed.iter().filter(|slot| matches!(slot, Slot::Ad(_))).count();

					assert_eq!(inserted, sponsored_slots(len, pool, stride));

					if len > 0 {
						assert_eq!(inserted, ((len - 1) / stride).min(pool));
					}
				}
			}
		}
	}
}
