mod diversity;
mod score;
mod sponsored;

pub use diversity::cap_per_author;
pub use score::{
	ScoreBreakdown, age_hours, cmp_score_desc, explore_score, interaction_total, rank_candidates,
	raw_engagement, relevance_breakdown, relevance_score, trending_score,
};
pub use sponsored::{interleave_sponsored, sponsored_slots};
