use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub feed: Feed,
	#[serde(default)]
	pub ranking: Ranking,
	#[serde(default)]
	pub sponsored: Sponsored,
	#[serde(default)]
	pub cache: Cache,
	#[serde(default)]
	pub trends: Trends,
	#[serde(default)]
	pub discovery: Discovery,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Feed {
	pub default_limit: u32,
	pub max_limit: u32,
	/// Oversample size requested from the candidate source before ranking.
	pub candidate_pool: u32,
	/// Upper bound for every call into the candidate, sponsored, cache, and trend stores.
	pub io_timeout_ms: u64,
	pub windows: FeedWindows,
}
impl Default for Feed {
	fn default() -> Self {
		Self {
			default_limit: 25,
			max_limit: 100,
			candidate_pool: 200,
			io_timeout_ms: 500,
			windows: FeedWindows::default(),
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FeedWindows {
	pub for_you_hours: i64,
	pub following_hours: i64,
	pub trending_hours: i64,
	pub explore_hours: i64,
}
impl Default for FeedWindows {
	fn default() -> Self {
		Self { for_you_hours: 24, following_hours: 72, trending_hours: 6, explore_hours: 48 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Ranking {
	pub recency_half_life_hours: f64,
	pub velocity_floor_hours: f64,
	pub author_cap: u32,
	/// Exclusive upper bound of the uniform boost added to explore scores.
	pub explore_boost_max: f64,
	pub weights: RankingWeights,
	pub interactions: InteractionWeights,
}
impl Default for Ranking {
	fn default() -> Self {
		Self {
			recency_half_life_hours: 6.0,
			velocity_floor_hours: 0.5,
			author_cap: 2,
			explore_boost_max: 5.0,
			weights: RankingWeights::default(),
			interactions: InteractionWeights::default(),
		}
	}
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct RankingWeights {
	pub recency: f64,
	pub engagement: f64,
	pub velocity: f64,
	pub author_quality: f64,
	pub baseline: f64,
}
impl Default for RankingWeights {
	fn default() -> Self {
		Self { recency: 0.25, engagement: 0.20, velocity: 0.15, author_quality: 0.10, baseline: 0.30 }
	}
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct InteractionWeights {
	pub like: f64,
	pub repost: f64,
	pub reply: f64,
	pub quote: f64,
}
impl Default for InteractionWeights {
	fn default() -> Self {
		Self { like: 1.0, repost: 2.0, reply: 3.0, quote: 2.5 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Sponsored {
	pub enabled: bool,
	pub pool_size: u32,
	pub for_you_stride: u32,
	pub following_stride: u32,
}
impl Default for Sponsored {
	fn default() -> Self {
		Self { enabled: true, pool_size: 3, for_you_stride: 10, following_stride: 15 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Cache {
	pub enabled: bool,
	/// Either "postgres" or "memory".
	pub backend: String,
	pub ttl_seconds: u64,
	pub slice_size: u32,
	/// Entry bound for the in-process backend.
	pub memory_max_entries: u64,
	/// How often expired rows are swept from the postgres backend.
	pub purge_interval_seconds: u64,
}
impl Default for Cache {
	fn default() -> Self {
		Self {
			enabled: true,
			backend: "postgres".to_string(),
			ttl_seconds: 120,
			slice_size: 100,
			memory_max_entries: 10_000,
			purge_interval_seconds: 300,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Trends {
	pub default_limit: u32,
	pub max_limit: u32,
	pub fallback_window_hours: i64,
	pub fallback_scan_limit: u32,
}
impl Default for Trends {
	fn default() -> Self {
		Self { default_limit: 10, max_limit: 50, fallback_window_hours: 24, fallback_scan_limit: 1_000 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Discovery {
	pub default_limit: u32,
	pub max_limit: u32,
	pub min_followers: i64,
	pub min_posts: i64,
	pub oversample_factor: u32,
}
impl Default for Discovery {
	fn default() -> Self {
		Self { default_limit: 10, max_limit: 50, min_followers: 5, min_posts: 3, oversample_factor: 2 }
	}
}
