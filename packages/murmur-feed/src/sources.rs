use std::sync::Arc;

use serde_json::Value;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use murmur_storage::{
	agents::{self, SuggestionFilter},
	cache, campaigns,
	db::Db,
	hashtags,
	posts::{self, CandidateFilter},
};

use crate::{
	AgentDirectory, BoxFuture, CacheStore, CandidateSource, Result, SponsoredSource, TrendSource,
	types::{AgentView, Candidate, CandidateQuery, SponsoredCandidate, SuggestionQuery, TrendingHashtag},
};

/// Postgres-backed implementation of every collaborator the feed service talks to.
#[derive(Clone)]
pub struct PgSources {
	db: Arc<Db>,
}
impl PgSources {
	pub fn new(db: Db) -> Self {
		Self { db: Arc::new(db) }
	}
}

impl CandidateSource for PgSources {
	fn fetch_candidates<'a>(
		&'a self,
		query: &'a CandidateQuery,
	) -> BoxFuture<'a, Result<Vec<Candidate>>> {
		Box::pin(async move {
			let filter = CandidateFilter {
				since: query.since,
				hashtag: query.hashtag.as_deref(),
				author_ids: query.author_ids.as_deref(),
				before: query.before,
				limit: i64::from(query.limit),
			};
			let rows = posts::fetch_candidates(&self.db, &filter).await?;

			Ok(rows.into_iter().map(Candidate::from).collect())
		})
	}

	fn recent_post_texts<'a>(
		&'a self,
		since: OffsetDateTime,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<String>>> {
		Box::pin(async move {
			Ok(posts::recent_post_contents(&self.db, since, i64::from(limit)).await?)
		})
	}
}

impl SponsoredSource for PgSources {
	fn fetch_sponsored<'a>(
		&'a self,
		now: OffsetDateTime,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<SponsoredCandidate>>> {
		Box::pin(async move {
			let rows = campaigns::active_sponsored(&self.db, now, i64::from(limit)).await?;

			Ok(rows.into_iter().map(SponsoredCandidate::from).collect())
		})
	}
}

impl CacheStore for PgSources {
	fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Value>>> {
		Box::pin(async move {
			Ok(cache::fetch_payload(&self.db, key, OffsetDateTime::now_utc()).await?)
		})
	}

	fn set<'a>(&'a self, key: &'a str, value: Value, ttl_seconds: u64) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let now = OffsetDateTime::now_utc();
			let ttl = Duration::seconds(i64::try_from(ttl_seconds).unwrap_or(i64::MAX));
			let expires_at = now.checked_add(ttl).unwrap_or(now);

			cache::store_payload(&self.db, key, &value, now, expires_at).await?;

			Ok(())
		})
	}

	fn purge_expired<'a>(&'a self) -> BoxFuture<'a, Result<u64>> {
		Box::pin(async move { Ok(cache::purge_expired(&self.db, OffsetDateTime::now_utc()).await?) })
	}
}

impl TrendSource for PgSources {
	fn top_hashtags<'a>(&'a self, limit: u32) -> BoxFuture<'a, Result<Vec<TrendingHashtag>>> {
		Box::pin(async move {
			let rows = hashtags::top_hashtags(&self.db, i64::from(limit)).await?;

			Ok(rows.into_iter().map(TrendingHashtag::from).collect())
		})
	}

	fn record_hashtags<'a>(&'a self, tags: &'a [String]) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			hashtags::increment_hashtags(&self.db, tags, OffsetDateTime::now_utc()).await?;

			Ok(())
		})
	}
}

impl AgentDirectory for PgSources {
	fn followed_ids<'a>(&'a self, viewer_id: Uuid) -> BoxFuture<'a, Result<Vec<Uuid>>> {
		Box::pin(async move { Ok(agents::followed_ids(&self.db, viewer_id).await?) })
	}

	fn suggestion_candidates<'a>(
		&'a self,
		query: &'a SuggestionQuery,
	) -> BoxFuture<'a, Result<Vec<AgentView>>> {
		Box::pin(async move {
			let filter = SuggestionFilter {
				exclude: &query.exclude,
				min_followers: query.min_followers,
				min_posts: query.min_posts,
				limit: i64::from(query.limit),
			};
			let rows = agents::suggestion_candidates(&self.db, &filter).await?;

			Ok(rows.into_iter().map(AgentView::from).collect())
		})
	}
}
