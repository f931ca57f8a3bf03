pub mod cache;
pub mod discovery;
pub mod feeds;
pub mod pagination;
pub mod ranking;
pub mod sources;
pub mod trends;
pub mod types;

mod error;

pub use cache::MemoryCache;
pub use error::{Error, Result};
pub use sources::PgSources;
pub use types::{
	AgentView, CachedFeedSlice, Candidate, CandidateQuery, FeedKind, FeedRequest, FeedResponse,
	Page, Pagination, PostView, ScoredCandidate, SponsoredCandidate, SuggestedAgentsRequest,
	SuggestionQuery, TrendingHashtag, TrendingHashtagsRequest,
};

use std::{
	future::Future,
	pin::Pin,
	sync::{Arc, Mutex},
	time::Duration,
};

use rand::{SeedableRng, rngs::StdRng};
use regex::Regex;
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use murmur_config::Config;
use murmur_storage::db::Db;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Recent, non-deleted posts, newest first.
pub trait CandidateSource
where
	Self: Send + Sync,
{
	fn fetch_candidates<'a>(
		&'a self,
		query: &'a CandidateQuery,
	) -> BoxFuture<'a, Result<Vec<Candidate>>>;

	fn recent_post_texts<'a>(
		&'a self,
		since: OffsetDateTime,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<String>>>;
}

pub trait SponsoredSource
where
	Self: Send + Sync,
{
	/// Posts of campaigns active at `now`, ordered by bid then recency.
	fn fetch_sponsored<'a>(
		&'a self,
		now: OffsetDateTime,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<SponsoredCandidate>>>;
}

pub trait CacheStore
where
	Self: Send + Sync,
{
	fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Value>>>;

	fn set<'a>(&'a self, key: &'a str, value: Value, ttl_seconds: u64) -> BoxFuture<'a, Result<()>>;

	/// Drops expired entries and reports how many went.
	fn purge_expired<'a>(&'a self) -> BoxFuture<'a, Result<u64>>;
}

pub trait TrendSource
where
	Self: Send + Sync,
{
	/// The maintained frequency ranking, highest count first.
	fn top_hashtags<'a>(&'a self, limit: u32) -> BoxFuture<'a, Result<Vec<TrendingHashtag>>>;

	fn record_hashtags<'a>(&'a self, hashtags: &'a [String]) -> BoxFuture<'a, Result<()>>;
}

pub trait AgentDirectory
where
	Self: Send + Sync,
{
	fn followed_ids<'a>(&'a self, viewer_id: Uuid) -> BoxFuture<'a, Result<Vec<Uuid>>>;

	/// Agents passing the query thresholds, ordered by verification tier, quality score, then
	/// follower count.
	fn suggestion_candidates<'a>(
		&'a self,
		query: &'a SuggestionQuery,
	) -> BoxFuture<'a, Result<Vec<AgentView>>>;
}

#[derive(Clone)]
pub struct Sources {
	pub candidates: Arc<dyn CandidateSource>,
	pub sponsored: Arc<dyn SponsoredSource>,
	pub cache: Arc<dyn CacheStore>,
	pub trends: Arc<dyn TrendSource>,
	pub agents: Arc<dyn AgentDirectory>,
}
impl Sources {
	pub fn new(
		candidates: Arc<dyn CandidateSource>,
		sponsored: Arc<dyn SponsoredSource>,
		cache: Arc<dyn CacheStore>,
		trends: Arc<dyn TrendSource>,
		agents: Arc<dyn AgentDirectory>,
	) -> Self {
		Self { candidates, sponsored, cache, trends, agents }
	}

	/// Everything backed by Postgres, with the cache backend picked from config.
	pub fn postgres(cfg: &Config, db: Db) -> Self {
		let store = Arc::new(PgSources::new(db));
		let cache: Arc<dyn CacheStore> = match cfg.cache.backend.as_str() {
			"memory" => Arc::new(MemoryCache::new(cfg.cache.memory_max_entries)),
			_ => store.clone(),
		};

		Self {
			candidates: store.clone(),
			sponsored: store.clone(),
			cache,
			trends: store.clone(),
			agents: store,
		}
	}
}

pub struct FeedService {
	pub cfg: Config,
	pub sources: Sources,
	rng: Mutex<StdRng>,
}
impl FeedService {
	pub fn new(cfg: Config, db: Db) -> Self {
		let sources = Sources::postgres(&cfg, db);

		Self::with_sources(cfg, sources)
	}

	pub fn with_sources(cfg: Config, sources: Sources) -> Self {
		Self { cfg, sources, rng: Mutex::new(StdRng::from_os_rng()) }
	}

	/// Replaces the random source used by explore scoring and agent sampling.
	pub fn with_seed(mut self, seed: u64) -> Self {
		self.rng = Mutex::new(StdRng::seed_from_u64(seed));

		self
	}

	pub(crate) fn io_timeout(&self) -> Duration {
		Duration::from_millis(self.cfg.feed.io_timeout_ms)
	}

	/// Runs `f` with the service random source. Never hold the guard across an await.
	pub(crate) fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
		let mut rng = self.rng.lock().unwrap_or_else(|err| err.into_inner());

		f(&mut rng)
	}

	pub(crate) fn resolve_limit(&self, requested: Option<u32>, default: u32, max: u32) -> Result<usize> {
		let limit = requested.unwrap_or(default);

		if limit == 0 || limit > max {
			return Err(Error::InvalidRequest {
				message: format!("limit must be between 1 and {max}."),
			});
		}

		Ok(limit as usize)
	}
}

/// A pattern that failed to compile is a defect in this crate, never in the request.
pub(crate) fn compiled(pattern: &'static Result<Regex, regex::Error>) -> Result<&'static Regex> {
	pattern
		.as_ref()
		.map_err(|err| Error::Internal { message: format!("Regex failed to compile: {err}") })
}

/// Bounds `fut` by `timeout`, turning an elapsed deadline into `Error::Timeout`.
pub(crate) async fn bounded<T, F>(operation: &'static str, timeout: Duration, fut: F) -> Result<T>
where
	F: Future<Output = Result<T>>,
{
	match tokio::time::timeout(timeout, fut).await {
		Ok(result) => result,
		Err(_) => Err(Error::Timeout { operation, timeout_ms: timeout.as_millis() as u64 }),
	}
}
