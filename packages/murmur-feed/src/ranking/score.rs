use std::cmp::Ordering;

use rand::Rng;
use time::OffsetDateTime;

use murmur_config::Ranking;

use crate::types::{Candidate, ScoredCandidate};

const SECONDS_PER_HOUR: f64 = 3_600.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
	pub age_hours: f64,
	pub raw_engagement: f64,
	pub recency: f64,
	pub engagement: f64,
	pub velocity: f64,
	pub author_quality: f64,
	pub score: f64,
}

/// Hours between `created_at` and `now`. Posts stamped in the future count as brand new.
pub fn age_hours(created_at: OffsetDateTime, now: OffsetDateTime) -> f64 {
	let seconds = (now - created_at).as_seconds_f64();

	(seconds / SECONDS_PER_HOUR).max(0.0)
}

pub fn raw_engagement(candidate: &Candidate, cfg: &Ranking) -> f64 {
	let weights = &cfg.interactions;

	candidate.like_count.max(0) as f64 * weights.like
		+ candidate.repost_count.max(0) as f64 * weights.repost
		+ candidate.reply_count.max(0) as f64 * weights.reply
		+ candidate.quote_count.max(0) as f64 * weights.quote
}

/// Likes, reposts, and replies only; quotes do not count toward momentum or explore quality.
pub fn interaction_total(candidate: &Candidate, cfg: &Ranking) -> f64 {
	let weights = &cfg.interactions;

	candidate.like_count.max(0) as f64 * weights.like
		+ candidate.repost_count.max(0) as f64 * weights.repost
		+ candidate.reply_count.max(0) as f64 * weights.reply
}

pub fn relevance_breakdown(
	candidate: &Candidate,
	now: OffsetDateTime,
	cfg: &Ranking,
) -> ScoreBreakdown {
	let age_hours = age_hours(candidate.created_at, now);
	let raw_engagement = raw_engagement(candidate, cfg);
	let recency = 0.5_f64.powf(age_hours / cfg.recency_half_life_hours);
	let engagement = raw_engagement / (age_hours + 2.0).log10();
	let velocity = raw_engagement / age_hours.max(cfg.velocity_floor_hours);
	let author_quality = (raw_engagement / candidate.author_post_count.max(1) as f64).min(1.0);
	let weights = &cfg.weights;
	let score = recency * weights.recency
		+ engagement * weights.engagement
		+ velocity * weights.velocity
		+ author_quality * weights.author_quality
		+ weights.baseline;

	ScoreBreakdown { age_hours, raw_engagement, recency, engagement, velocity, author_quality, score }
}

pub fn relevance_score(candidate: &Candidate, now: OffsetDateTime, cfg: &Ranking) -> f64 {
	relevance_breakdown(candidate, now, cfg).score
}

pub fn trending_score(candidate: &Candidate, now: OffsetDateTime, cfg: &Ranking) -> f64 {
	let age_hours = age_hours(candidate.created_at, now);

	interaction_total(candidate, cfg) / age_hours.max(cfg.velocity_floor_hours)
}

pub fn explore_score<R>(candidate: &Candidate, cfg: &Ranking, rng: &mut R) -> f64
where
	R: Rng,
{
	let boost =
		if cfg.explore_boost_max > 0.0 { rng.random_range(0.0..cfg.explore_boost_max) } else { 0.0 };

	interaction_total(candidate, cfg) + boost
}

pub fn cmp_score_desc(a: f64, b: f64) -> Ordering {
	b.total_cmp(&a)
}

/// Scores every candidate and sorts by score descending. The sort is stable, so equal scores keep
/// the fetch order (newest first).
pub fn rank_candidates<F>(candidates: Vec<Candidate>, mut score: F) -> Vec<ScoredCandidate>
where
	F: FnMut(&Candidate) -> f64,
{
	let mut scored: Vec<ScoredCandidate> = candidates
		.into_iter()
		.map(|candidate| {
			let score = score(&candidate);

			ScoredCandidate { candidate, score }
		})
		.collect();

	scored.sort_by(|a, b| cmp_score_desc(a.score, b.score));

	scored
}
