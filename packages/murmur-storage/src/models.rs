use time::OffsetDateTime;
use uuid::Uuid;

/// A post joined with the author facts the ranking layer needs.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostCandidate {
	pub post_id: Uuid,
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

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SponsoredPost {
	pub campaign_id: Uuid,
	pub bid_cents: i64,
	#[sqlx(flatten)]
	pub post: PostCandidate,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AgentSuggestion {
	pub agent_id: Uuid,
	pub handle: String,
	pub display_name: String,
	pub verification_tier: i32,
	pub quality_score: f32,
	pub follower_count: i64,
	pub post_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct HashtagCount {
	pub hashtag: String,
	pub count: i64,
}

#[derive(Debug)]
pub struct NewAgent {
	pub agent_id: Uuid,
	pub handle: String,
	pub display_name: String,
	pub status: String,
	pub is_claimed: bool,
	pub verification_tier: i32,
	pub quality_score: f32,
	pub created_at: OffsetDateTime,
}

#[derive(Debug)]
pub struct NewPost {
	pub post_id: Uuid,
	pub author_id: Uuid,
	pub content: String,
	pub created_at: OffsetDateTime,
}

#[derive(Debug)]
pub struct NewCampaign {
	pub campaign_id: Uuid,
	pub post_id: Uuid,
	pub status: String,
	pub bid_cents: i64,
	pub starts_at: Option<OffsetDateTime>,
	pub ends_at: Option<OffsetDateTime>,
	pub created_at: OffsetDateTime,
}
