mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Cache, Config, Discovery, Feed, FeedWindows, InteractionWeights, Postgres, Ranking,
	RankingWeights, Service, Sponsored, Storage, Trends,
};

use std::{fs, path::Path};

pub const CACHE_BACKENDS: [&str; 2] = ["postgres", "memory"];
/// Hard bound on posts read by the trending hashtag fallback scan.
pub const MAX_FALLBACK_SCAN: u32 = 1_000;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::Unreadable { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::Malformed { path: path.to_path_buf(), source: Box::new(err) })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Invalid {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Invalid {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}

	validate_feed(&cfg.feed)?;
	validate_ranking(&cfg.ranking)?;

	if cfg.sponsored.enabled
		&& (cfg.sponsored.for_you_stride == 0 || cfg.sponsored.following_stride == 0)
	{
		return Err(Error::Invalid {
			message: "sponsored strides must be greater than zero.".to_string(),
		});
	}
	if !CACHE_BACKENDS.contains(&cfg.cache.backend.as_str()) {
		return Err(Error::Invalid {
			message: "cache.backend must be one of postgres or memory.".to_string(),
		});
	}
	if cfg.cache.enabled {
		if cfg.cache.ttl_seconds == 0 {
			return Err(Error::Invalid {
				message: "cache.ttl_seconds must be greater than zero.".to_string(),
			});
		}
		if cfg.cache.slice_size < cfg.feed.max_limit {
			return Err(Error::Invalid {
				message: "cache.slice_size must be at least feed.max_limit.".to_string(),
			});
		}
		if cfg.cache.memory_max_entries == 0 {
			return Err(Error::Invalid {
				message: "cache.memory_max_entries must be greater than zero.".to_string(),
			});
		}
		if cfg.cache.purge_interval_seconds == 0 {
			return Err(Error::Invalid {
				message: "cache.purge_interval_seconds must be greater than zero.".to_string(),
			});
		}
	}
	if cfg.trends.default_limit == 0 || cfg.trends.default_limit > cfg.trends.max_limit {
		return Err(Error::Invalid {
			message: "trends.default_limit must be between 1 and trends.max_limit.".to_string(),
		});
	}
	if cfg.trends.fallback_window_hours <= 0 {
		return Err(Error::Invalid {
			message: "trends.fallback_window_hours must be greater than zero.".to_string(),
		});
	}
	if cfg.trends.fallback_scan_limit == 0 || cfg.trends.fallback_scan_limit > MAX_FALLBACK_SCAN {
		return Err(Error::Invalid {
			message: format!("trends.fallback_scan_limit must be between 1 and {MAX_FALLBACK_SCAN}."),
		});
	}
	if cfg.discovery.default_limit == 0 || cfg.discovery.default_limit > cfg.discovery.max_limit {
		return Err(Error::Invalid {
			message: "discovery.default_limit must be between 1 and discovery.max_limit."
				.to_string(),
		});
	}
	if cfg.discovery.oversample_factor == 0 {
		return Err(Error::Invalid {
			message: "discovery.oversample_factor must be greater than zero.".to_string(),
		});
	}
	if cfg.discovery.min_followers < 0 || cfg.discovery.min_posts < 0 {
		return Err(Error::Invalid {
			message: "discovery thresholds must be zero or greater.".to_string(),
		});
	}

	Ok(())
}

fn validate_feed(feed: &Feed) -> Result<()> {
	if feed.default_limit == 0 {
		return Err(Error::Invalid {
			message: "feed.default_limit must be greater than zero.".to_string(),
		});
	}
	if feed.default_limit > feed.max_limit {
		return Err(Error::Invalid {
			message: "feed.default_limit must be feed.max_limit or less.".to_string(),
		});
	}
	if feed.candidate_pool <= feed.max_limit {
		return Err(Error::Invalid {
			message: "feed.candidate_pool must be greater than feed.max_limit.".to_string(),
		});
	}
	if feed.io_timeout_ms == 0 {
		return Err(Error::Invalid {
			message: "feed.io_timeout_ms must be greater than zero.".to_string(),
		});
	}

	for (label, hours) in [
		("feed.windows.for_you_hours", feed.windows.for_you_hours),
		("feed.windows.following_hours", feed.windows.following_hours),
		("feed.windows.trending_hours", feed.windows.trending_hours),
		("feed.windows.explore_hours", feed.windows.explore_hours),
	] {
		if hours <= 0 {
			return Err(Error::Invalid { message: format!("{label} must be greater than zero.") });
		}
	}

	Ok(())
}

fn validate_ranking(ranking: &Ranking) -> Result<()> {
	let weights = &ranking.weights;
	let interactions = &ranking.interactions;

	for (label, value) in [
		("ranking.recency_half_life_hours", ranking.recency_half_life_hours),
		("ranking.velocity_floor_hours", ranking.velocity_floor_hours),
	] {
		if !value.is_finite() {
			return Err(Error::Invalid { message: format!("{label} must be a finite number.") });
		}
		if value <= 0.0 {
			return Err(Error::Invalid { message: format!("{label} must be greater than zero.") });
		}
	}
	for (label, value) in [
		("ranking.explore_boost_max", ranking.explore_boost_max),
		("ranking.weights.recency", weights.recency),
		("ranking.weights.engagement", weights.engagement),
		("ranking.weights.velocity", weights.velocity),
		("ranking.weights.author_quality", weights.author_quality),
		("ranking.weights.baseline", weights.baseline),
		("ranking.interactions.like", interactions.like),
		("ranking.interactions.repost", interactions.repost),
		("ranking.interactions.reply", interactions.reply),
		("ranking.interactions.quote", interactions.quote),
	] {
		if !value.is_finite() {
			return Err(Error::Invalid { message: format!("{label} must be a finite number.") });
		}
		if value < 0.0 {
			return Err(Error::Invalid { message: format!("{label} must be zero or greater.") });
		}
	}

	if weights.baseline <= 0.0 {
		return Err(Error::Invalid {
			message: "ranking.weights.baseline must be greater than zero.".to_string(),
		});
	}
	if ranking.author_cap == 0 {
		return Err(Error::Invalid {
			message: "ranking.author_cap must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let backend = cfg.cache.backend.trim().to_ascii_lowercase();

	cfg.cache.backend = if backend.is_empty() { "postgres".to_string() } else { backend };
	cfg.service.log_level = cfg.service.log_level.trim().to_string();
}
