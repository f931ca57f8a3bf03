use std::time::{Duration, Instant};

use moka::Expiry;
use serde_json::Value;
use uuid::Uuid;

use crate::{
	BoxFuture, CacheStore, FeedService, Result, bounded,
	types::{CachedFeedSlice, FeedKind, PostView},
};

const ANONYMOUS: &str = "anonymous";

/// `feed:{kind}:{viewer}` with an optional `:{hashtag}` suffix. Anonymous viewers share one entry.
pub fn cache_key(kind: FeedKind, viewer_id: Option<Uuid>, hashtag: Option<&str>) -> String {
	let viewer = viewer_id.map(|id| id.to_string()).unwrap_or_else(|| ANONYMOUS.to_string());

	match hashtag {
		Some(tag) => format!("feed:{}:{viewer}:{tag}", kind.as_str()),
		None => format!("feed:{}:{viewer}", kind.as_str()),
	}
}

fn cache_key_prefix(key: &str) -> &str {
	match key.match_indices(':').nth(1) {
		Some((end, _)) => &key[..end],
		None => key,
	}
}

impl FeedService {
	/// Best effort. Any failure is logged and reported as a miss.
	pub(crate) async fn read_cached_slice(&self, key: &str) -> Option<Vec<PostView>> {
		let read = self.sources.cache.get(key);
		let payload = match bounded("cache read", self.io_timeout(), read).await {
			Ok(Some(payload)) => payload,
			Ok(None) => {
				tracing::info!(cache_key_prefix = cache_key_prefix(key), hit = false, "Cache miss.");

				return None;
			},
			Err(err) => {
				tracing::warn!(
					error = %err,
					cache_key_prefix = cache_key_prefix(key),
					"Cache read failed."
				);

				return None;
			},
		};

		match serde_json::from_value::<CachedFeedSlice>(payload) {
			Ok(slice) => {
				tracing::info!(
					cache_key_prefix = cache_key_prefix(key),
					hit = true,
					items = slice.items.len(),
					"Cache hit."
				);

				Some(slice.items)
			},
			Err(err) => {
				tracing::warn!(
					error = %err,
					cache_key_prefix = cache_key_prefix(key),
					"Cache payload decode failed."
				);

				None
			},
		}
	}

	/// Stores the first `slice_size` items. Failures are logged and never reach the caller.
	pub(crate) async fn write_cached_slice(&self, key: &str, items: &[PostView]) {
		let slice_size = self.cfg.cache.slice_size as usize;
		let slice = CachedFeedSlice { items: items.iter().take(slice_size).cloned().collect() };
		let payload = match serde_json::to_value(&slice) {
			Ok(value) => value,
			Err(err) => {
				tracing::warn!(
					error = %err,
					cache_key_prefix = cache_key_prefix(key),
					"Cache payload encode failed."
				);

				return;
			},
		};
		let ttl_seconds = self.cfg.cache.ttl_seconds;
		let write = self.sources.cache.set(key, payload, ttl_seconds);

		match bounded("cache write", self.io_timeout(), write).await {
			Ok(()) => {
				tracing::info!(
					cache_key_prefix = cache_key_prefix(key),
					items = slice.items.len(),
					ttl_seconds,
					"Cache stored."
				);
			},
			Err(err) => {
				tracing::warn!(
					error = %err,
					cache_key_prefix = cache_key_prefix(key),
					"Cache write failed."
				);
			},
		}
	}
}

#[derive(Clone)]
struct Entry {
	value: Value,
	ttl: Duration,
}

/// Each entry lives for the TTL it was written with. Rewrites restart the clock.
struct EntryTtl;
impl Expiry<String, Entry> for EntryTtl {
	fn expire_after_create(
		&self,
		_key: &String,
		entry: &Entry,
		_created_at: Instant,
	) -> Option<Duration> {
		Some(entry.ttl)
	}

	fn expire_after_update(
		&self,
		_key: &String,
		entry: &Entry,
		_updated_at: Instant,
		_duration_until_expiry: Option<Duration>,
	) -> Option<Duration> {
		Some(entry.ttl)
	}
}

/// Process-local cache, bounded by entry count and swept by moka as entries expire.
pub struct MemoryCache {
	entries: moka::sync::Cache<String, Entry>,
}
impl MemoryCache {
	pub fn new(max_entries: u64) -> Self {
		let entries =
			moka::sync::Cache::builder().max_capacity(max_entries).expire_after(EntryTtl).build();

		Self { entries }
	}

	/// Live entries after pending evictions have been applied.
	pub fn len(&self) -> u64 {
		self.entries.run_pending_tasks();

		self.entries.entry_count()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
impl CacheStore for MemoryCache {
	fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Value>>> {
		Box::pin(async move { Ok(self.entries.get(key).map(|entry| entry.value)) })
	}

	fn set<'a>(&'a self, key: &'a str, value: Value, ttl_seconds: u64) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			// A zero TTL would be stale on arrival.
			if ttl_seconds == 0 {
				self.entries.invalidate(key);
			} else {
				self.entries
					.insert(key.to_string(), Entry { value, ttl: Duration::from_secs(ttl_seconds) });
			}

			Ok(())
		})
	}

	fn purge_expired<'a>(&'a self) -> BoxFuture<'a, Result<u64>> {
		Box::pin(async move {
			let before = self.entries.entry_count();

			self.entries.run_pending_tasks();

			Ok(before.saturating_sub(self.entries.entry_count()))
		})
	}
}

impl FeedService {
	/// Sweeps expired entries from the cache backend. Failures are logged, not returned.
	pub async fn purge_expired_cache(&self) -> u64 {
		let purge = self.sources.cache.purge_expired();

		match bounded("cache purge", self.io_timeout(), purge).await {
			Ok(purged) => {
				tracing::info!(purged, "Cache purge complete.");

				purged
			},
			Err(err) => {
				tracing::warn!(error = %err, "Cache purge failed.");

				0
			},
		}
	}
}
