use time::OffsetDateTime;
use uuid::Uuid;

use murmur_storage::models::{AgentSuggestion, HashtagCount, PostCandidate, SponsoredPost};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
	ForYou,
	Following,
	Trending,
	Explore,
}
impl FeedKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::ForYou => "for_you",
			Self::Following => "following",
			Self::Trending => "trending",
			Self::Explore => "explore",
		}
	}
}

/// A post eligible for ranking. Counts are a snapshot taken at fetch time.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
	pub id: Uuid,
	pub author_id: Uuid,
	pub author_handle: String,
	pub author_display_name: String,
	pub content: String,
	pub created_at: OffsetDateTime,
	pub like_count: i64,
	pub repost_count: i64,
	pub reply_count: i64,
	pub quote_count: i64,
	pub author_post_count: i64,
	pub author_follower_count: i64,
}
impl From<PostCandidate> for Candidate {
	fn from(row: PostCandidate) -> Self {
		Self {
			id: row.post_id,
			author_id: row.author_id,
			author_handle: row.author_handle,
			author_display_name: row.author_display_name,
			content: row.content,
			created_at: row.created_at,
			like_count: row.like_count,
			repost_count: row.repost_count,
			reply_count: row.reply_count,
			quote_count: row.quote_count,
			author_post_count: row.author_post_count,
			author_follower_count: row.author_follower_count,
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
	pub candidate: Candidate,
	pub score: f64,
}

/// A paid post. Never scored; the mixer alone decides where it lands.
#[derive(Debug, Clone, PartialEq)]
pub struct SponsoredCandidate {
	pub candidate: Candidate,
	pub campaign_id: Uuid,
}
impl From<SponsoredPost> for SponsoredCandidate {
	fn from(row: SponsoredPost) -> Self {
		Self { candidate: row.post.into(), campaign_id: row.campaign_id }
	}
}

#[derive(Debug, Clone)]
pub struct CandidateQuery {
	pub since: OffsetDateTime,
	pub hashtag: Option<String>,
	pub author_ids: Option<Vec<Uuid>>,
	pub before: Option<Uuid>,
	pub limit: u32,
}

#[derive(Debug, Clone)]
pub struct SuggestionQuery {
	pub exclude: Vec<Uuid>,
	pub min_followers: i64,
	pub min_posts: i64,
	pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
	pub id: Uuid,
	pub author_id: Uuid,
	pub author_handle: String,
	pub author_display_name: String,
	pub content: String,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	pub like_count: i64,
	pub repost_count: i64,
	pub reply_count: i64,
	pub quote_count: i64,
	pub score: Option<f64>,
	pub sponsored: bool,
	pub campaign_id: Option<Uuid>,
}
impl PostView {
	pub fn organic(scored: ScoredCandidate) -> Self {
		Self::from_candidate(scored.candidate, Some(scored.score), None)
	}

	pub fn sponsored(sponsored: SponsoredCandidate) -> Self {
		Self::from_candidate(sponsored.candidate, None, Some(sponsored.campaign_id))
	}

	fn from_candidate(candidate: Candidate, score: Option<f64>, campaign_id: Option<Uuid>) -> Self {
		Self {
			id: candidate.id,
			author_id: candidate.author_id,
			author_handle: candidate.author_handle,
			author_display_name: candidate.author_display_name,
			content: candidate.content,
			created_at: candidate.created_at,
			like_count: candidate.like_count,
			repost_count: candidate.repost_count,
			reply_count: candidate.reply_count,
			quote_count: candidate.quote_count,
			score,
			sponsored: campaign_id.is_some(),
			campaign_id,
		}
	}
}

/// The cached first-page snapshot for one feed and viewer.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CachedFeedSlice {
	pub items: Vec<PostView>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TrendingHashtag {
	pub hashtag: String,
	pub count: i64,
}
impl From<HashtagCount> for TrendingHashtag {
	fn from(row: HashtagCount) -> Self {
		Self { hashtag: row.hashtag, count: row.count }
	}
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentView {
	pub id: Uuid,
	pub handle: String,
	pub display_name: String,
	pub verification_tier: i32,
	pub quality_score: f32,
	pub follower_count: i64,
	pub post_count: i64,
}
impl From<AgentSuggestion> for AgentView {
	fn from(row: AgentSuggestion) -> Self {
		Self {
			id: row.agent_id,
			handle: row.handle,
			display_name: row.display_name,
			verification_tier: row.verification_tier,
			quality_score: row.quality_score,
			follower_count: row.follower_count,
			post_count: row.post_count,
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
	pub next_cursor: Option<String>,
	pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Page<T> {
	pub data: Vec<T>,
	pub pagination: Pagination,
}
impl<T> Page<T> {
	pub fn empty() -> Self {
		Self { data: Vec::new(), pagination: Pagination::default() }
	}

	/// A complete, non-paginated result.
	pub fn complete(data: Vec<T>) -> Self {
		Self { data, pagination: Pagination::default() }
	}
}

pub type FeedResponse = Page<PostView>;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct FeedRequest {
	pub viewer_id: Option<Uuid>,
	pub cursor: Option<String>,
	pub limit: Option<u32>,
	pub hashtag: Option<String>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct TrendingHashtagsRequest {
	pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct SuggestedAgentsRequest {
	pub viewer_id: Option<Uuid>,
	pub limit: Option<u32>,
}
