use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;
use time::{Duration, OffsetDateTime};

use crate::{
	FeedService, Result, bounded, compiled,
	types::{Page, TrendingHashtag, TrendingHashtagsRequest},
};

static HASHTAG_TOKEN: LazyLock<Result<Regex, regex::Error>> =
	LazyLock::new(|| Regex::new(r"#[A-Za-z0-9_]+"));

/// Every `#word` token in `content`, lower-cased, in order of appearance. Repeats are kept.
pub fn extract_hashtags(content: &str) -> Result<Vec<String>> {
	let pattern = compiled(&HASHTAG_TOKEN)?;

	Ok(pattern.find_iter(content).map(|found| found.as_str().to_lowercase()).collect())
}

/// Counts tokens across `contents` and returns the `limit` most frequent, ties broken by name.
pub fn tally_hashtags<I, S>(contents: I, limit: usize) -> Result<Vec<TrendingHashtag>>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut counts: HashMap<String, i64> = HashMap::new();

	for content in contents {
		for tag in extract_hashtags(content.as_ref())? {
			*counts.entry(tag).or_insert(0) += 1;
		}
	}

	let mut ranked: Vec<TrendingHashtag> =
		counts.into_iter().map(|(hashtag, count)| TrendingHashtag { hashtag, count }).collect();

	ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.hashtag.cmp(&b.hashtag)));
	ranked.truncate(limit);

	Ok(ranked)
}

impl FeedService {
	/// The maintained ranking when it answers, otherwise a bounded scan of recent posts.
	pub async fn trending_hashtags(
		&self,
		req: TrendingHashtagsRequest,
	) -> Result<Page<TrendingHashtag>> {
		let cfg = &self.cfg.trends;
		let limit = self.resolve_limit(req.limit, cfg.default_limit, cfg.max_limit)?;
		let primary = self.sources.trends.top_hashtags(limit as u32);

		match bounded("top hashtags", self.io_timeout(), primary).await {
			Ok(mut ranked) if !ranked.is_empty() => {
				ranked.truncate(limit);

				return Ok(Page::complete(ranked));
			},
			Ok(_) => {
				tracing::info!("Maintained hashtag ranking is empty; scanning recent posts.");
			},
			Err(err) => {
				tracing::warn!(error = %err, "Maintained hashtag ranking unavailable; scanning recent posts.");
			},
		}

		let since = OffsetDateTime::now_utc() - Duration::hours(cfg.fallback_window_hours);
		let scan = self.sources.candidates.recent_post_texts(since, cfg.fallback_scan_limit);
		let texts = match bounded("recent post scan", self.io_timeout(), scan).await {
			Ok(texts) => texts,
			Err(err) => {
				tracing::warn!(error = %err, "Hashtag fallback scan failed.");

				Vec::new()
			},
		};
		let scanned = texts.len().min(cfg.fallback_scan_limit as usize);

		tracing::info!(scanned, "Hashtag fallback scan complete.");

		Ok(Page::complete(tally_hashtags(texts.iter().take(scanned), limit)?))
	}

	/// Maintenance hook for post creation. Returns the tags recorded.
	pub async fn record_post_hashtags(&self, content: &str) -> Result<Vec<String>> {
		let mut tags = extract_hashtags(content)?;

		tags.sort();
		tags.dedup();

		if tags.is_empty() {
			return Ok(tags);
		}

		let record = self.sources.trends.record_hashtags(&tags);

		bounded("record hashtags", self.io_timeout(), record).await?;

		Ok(tags)
	}
}
