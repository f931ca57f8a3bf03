use std::{collections::HashSet, sync::LazyLock};

use regex::Regex;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{
	Error, FeedService, Result, bounded, compiled,
	cache::cache_key,
	pagination::{decode_cursor, paginate},
	ranking::{
		cap_per_author, explore_score, interleave_sponsored, rank_candidates, relevance_score,
		trending_score,
	},
	types::{
		Candidate, CandidateQuery, FeedKind, FeedRequest, FeedResponse, Page, PostView,
		ScoredCandidate, SponsoredCandidate,
	},
};

static HASHTAG_BODY: LazyLock<Result<Regex, regex::Error>> =
	LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$"));

/// Per-request knobs resolved from the feed kind and config.
struct FeedPlan {
	window: Duration,
	stride: Option<usize>,
	cacheable: bool,
	/// Explore is unfiltered; a hashtag sent there is ignored.
	filters_hashtag: bool,
}

impl FeedService {
	pub async fn for_you(&self, req: FeedRequest) -> Result<FeedResponse> {
		self.assemble(FeedKind::ForYou, req, None).await
	}

	/// Posts from agents the viewer follows. Requires a viewer.
	pub async fn following(&self, req: FeedRequest) -> Result<FeedResponse> {
		let Some(viewer_id) = req.viewer_id else {
			return Err(Error::InvalidRequest {
				message: "Following feed requires a viewer.".to_string(),
			});
		};
		let lookup = self.sources.agents.followed_ids(viewer_id);
		let followed =
			match bounded("followed ids", self.io_timeout(), lookup).await {
				Ok(ids) => ids,
				Err(err) => {
					tracing::warn!(error = %err, feed = FeedKind::Following.as_str(), "Followed ids lookup failed.");

					Vec::new()
				},
			};

		if followed.is_empty() {
			// Validate the request shape even when there is nothing to show.
			self.feed_limit(req.limit)?;
			normalize_hashtag(req.hashtag.as_deref())?;

			return Ok(Page::empty());
		}

		self.assemble(FeedKind::Following, req, Some(followed)).await
	}

	pub async fn trending(&self, req: FeedRequest) -> Result<FeedResponse> {
		self.assemble(FeedKind::Trending, req, None).await
	}

	pub async fn explore(&self, req: FeedRequest) -> Result<FeedResponse> {
		self.assemble(FeedKind::Explore, req, None).await
	}

	pub async fn feed(&self, kind: FeedKind, req: FeedRequest) -> Result<FeedResponse> {
		match kind {
			FeedKind::ForYou => self.for_you(req).await,
			FeedKind::Following => self.following(req).await,
			FeedKind::Trending => self.trending(req).await,
			FeedKind::Explore => self.explore(req).await,
		}
	}

	fn feed_limit(&self, requested: Option<u32>) -> Result<usize> {
		self.resolve_limit(requested, self.cfg.feed.default_limit, self.cfg.feed.max_limit)
	}

	fn plan(&self, kind: FeedKind) -> FeedPlan {
		let windows = &self.cfg.feed.windows;
		let sponsored = &self.cfg.sponsored;
		let enabled_stride = |value: u32| sponsored.enabled.then_some(value as usize);
		let (hours, stride, cacheable) = match kind {
			FeedKind::ForYou => (windows.for_you_hours, enabled_stride(sponsored.for_you_stride), true),
			FeedKind::Following =>
				(windows.following_hours, enabled_stride(sponsored.following_stride), true),
			FeedKind::Trending => (windows.trending_hours, None, true),
			FeedKind::Explore => (windows.explore_hours, None, false),
		};

		FeedPlan {
			window: Duration::hours(hours),
			stride,
			cacheable: cacheable && self.cfg.cache.enabled,
			filters_hashtag: kind != FeedKind::Explore,
		}
	}

	async fn assemble(
		&self,
		kind: FeedKind,
		req: FeedRequest,
		author_ids: Option<Vec<Uuid>>,
	) -> Result<FeedResponse> {
		let limit = self.feed_limit(req.limit)?;
		let plan = self.plan(kind);
		let hashtag =
			if plan.filters_hashtag { normalize_hashtag(req.hashtag.as_deref())? } else { None };
		let cursor = req.cursor.as_deref().map(str::trim).filter(|raw| !raw.is_empty());
		let before = match cursor {
			Some(raw) => match decode_cursor(raw) {
				Some(id) => Some(id),
				None => {
					tracing::info!(feed = kind.as_str(), "Unrecognized cursor; returning an empty page.");

					return Ok(Page::empty());
				},
			},
			None => None,
		};
		// Trending is the same for everyone, so it is cached once per hashtag.
		let cache_viewer = if kind == FeedKind::Trending { None } else { req.viewer_id };
		let key = (plan.cacheable && before.is_none())
			.then(|| cache_key(kind, cache_viewer, hashtag.as_deref()));

		if let Some(key) = key.as_deref()
			&& let Some(items) = self.read_cached_slice(key).await
		{
			return Ok(paginate(items, limit));
		}

		let now = OffsetDateTime::now_utc();
		let query = CandidateQuery {
			since: now - plan.window,
			hashtag,
			author_ids,
			before,
			limit: self.cfg.feed.candidate_pool,
		};
		let Some(candidates) = self.fetch_candidates(kind, &query).await else {
			return Ok(Page::empty());
		};
		let ranked = self.rank(kind, candidates, now);
		let capped =
			cap_per_author(ranked, self.cfg.ranking.author_cap as usize, |item| item.candidate.author_id);
		let mut items: Vec<PostView> = capped.into_iter().map(PostView::organic).collect();

		if let Some(stride) = plan.stride
			&& before.is_none()
			&& !items.is_empty()
		{
			let sponsored = self.sponsored_pool(&items, now).await;

			items = interleave_sponsored(items, sponsored, stride);
		}

		tracing::info!(
			feed = kind.as_str(),
			items = items.len(),
			first_page = before.is_none(),
			"Feed assembled."
		);

		if let Some(key) = key.as_deref() {
			self.write_cached_slice(key, &items).await;
		}

		Ok(paginate(items, limit))
	}

	/// `None` when the source failed or timed out. Such results are served empty and never cached.
	async fn fetch_candidates(
		&self,
		kind: FeedKind,
		query: &CandidateQuery,
	) -> Option<Vec<Candidate>> {
		let fetch = self.sources.candidates.fetch_candidates(query);

		match bounded("candidate fetch", self.io_timeout(), fetch).await {
			Ok(candidates) => Some(candidates),
			Err(err) => {
				tracing::warn!(
					error = %err,
					feed = kind.as_str(),
					"Candidate fetch failed; serving an empty feed."
				);

				None
			},
		}
	}

	fn rank(&self, kind: FeedKind, candidates: Vec<Candidate>, now: OffsetDateTime) -> Vec<ScoredCandidate> {
		let cfg = &self.cfg.ranking;

		match kind {
			FeedKind::ForYou | FeedKind::Following =>
				rank_candidates(candidates, |item| relevance_score(item, now, cfg)),
			FeedKind::Trending => rank_candidates(candidates, |item| trending_score(item, now, cfg)),
			FeedKind::Explore => self.with_rng(|rng| {
				rank_candidates(candidates, |item| explore_score(item, cfg, &mut *rng))
			}),
		}
	}

	/// Active campaigns, minus posts already on the page. Failures mean no sponsored content.
	async fn sponsored_pool(&self, organic: &[PostView], now: OffsetDateTime) -> Vec<PostView> {
		let fetch = self.sources.sponsored.fetch_sponsored(now, self.cfg.sponsored.pool_size);
		let pool: Vec<SponsoredCandidate> =
			match bounded("sponsored fetch", self.io_timeout(), fetch).await {
				Ok(pool) => pool,
				Err(err) => {
					tracing::warn!(error = %err, "Sponsored pool unavailable; serving organic content only.");

					return Vec::new();
				},
			};
		let on_page: HashSet<Uuid> = organic.iter().map(|item| item.id).collect();

		pool.into_iter()
			.filter(|ad| !on_page.contains(&ad.candidate.id))
			.map(PostView::sponsored)
			.collect()
	}
}

/// Trims, accepts a leading `#`, lower-cases, and re-prefixes. Blank input means no filter.
pub fn normalize_hashtag(raw: Option<&str>) -> Result<Option<String>> {
	let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
		return Ok(None);
	};
	let body = raw.strip_prefix('#').unwrap_or(raw);
	let pattern = compiled(&HASHTAG_BODY)?;

	if !pattern.is_match(body) {
		return Err(Error::InvalidRequest {
			message: "hashtag must contain only letters, digits, or underscores.".to_string(),
		});
	}

	Ok(Some(format!("#{}", body.to_lowercase())))
}
