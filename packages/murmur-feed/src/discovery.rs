use rand::{Rng, seq::SliceRandom};

use crate::{
	FeedService, Result, bounded,
	types::{AgentView, Page, SuggestedAgentsRequest, SuggestionQuery},
};

/// Uniformly permutes the oversampled pool and keeps the first `limit`.
pub fn sample_suggestions<R>(mut pool: Vec<AgentView>, limit: usize, rng: &mut R) -> Vec<AgentView>
where
	R: Rng,
{
	pool.shuffle(rng);
	pool.truncate(limit);

	pool
}

impl FeedService {
	pub async fn suggested_agents(&self, req: SuggestedAgentsRequest) -> Result<Page<AgentView>> {
		let cfg = &self.cfg.discovery;
		let limit = self.resolve_limit(req.limit, cfg.default_limit, cfg.max_limit)?;
		let mut exclude = Vec::new();

		if let Some(viewer_id) = req.viewer_id {
			let lookup = self.sources.agents.followed_ids(viewer_id);

			match bounded("followed ids", self.io_timeout(), lookup).await {
				Ok(ids) => exclude.extend(ids),
				Err(err) => {
					tracing::warn!(error = %err, "Followed ids lookup failed; suggestions may include followed agents.");
				},
			}

			exclude.push(viewer_id);
		}

		let query = SuggestionQuery {
			exclude,
			min_followers: cfg.min_followers,
			min_posts: cfg.min_posts,
			limit: (limit as u32).saturating_mul(cfg.oversample_factor.max(1)),
		};
		let lookup = self.sources.agents.suggestion_candidates(&query);
		let pool = match bounded("suggestion candidates", self.io_timeout(), lookup).await {
			Ok(pool) => pool,
			Err(err) => {
				tracing::warn!(error = %err, "Suggestion candidates unavailable.");

				return Ok(Page::empty());
			},
		};
		let pool_size = pool.len();
		let sampled = self.with_rng(|rng| sample_suggestions(pool, limit, rng));

		tracing::info!(pool_size, returned = sampled.len(), "Agent suggestions sampled.");

		Ok(Page::complete(sampled))
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use rand::{SeedableRng, rngs::StdRng};
	use uuid::Uuid;

	use crate::{discovery::sample_suggestions, types::AgentView};

	fn agent(rank: i64) -> AgentView {
		AgentView {
			id: Uuid::new_v4(),
			handle: format!("agent{rank}"),
			display_name: format!("Agent {rank}"),
			verification_tier: 1,
			quality_score: 0.5,
			follower_count: 100 - rank,
			post_count: 10,
		}
	}

	#[test]
	fn sample_is_a_subset_of_the_pool() {
		let pool: Vec<AgentView> = (0..20).map(agent).collect();
		let ids: HashSet<Uuid> = pool.iter().map(|agent| agent.id).collect();
		let mut rng = StdRng::seed_from_u64(42);
		let sampled = sample_suggestions(pool, 10, &mut rng);
		let sampled_ids: HashSet<Uuid> = sampled.iter().map(|agent| agent.id).collect();

		assert_eq!(sampled.len(), 10);
		assert_eq!(sampled_ids.len(), 10);
		assert!(sampled_ids.is_subset(&ids));
	}

	#[test]
	fn same_seed_same_sample() {
		let pool: Vec<AgentView> = (0..20).map(agent).collect();
		let first = sample_suggestions(pool.clone(), 10, &mut StdRng::seed_from_u64(9));
		let second = sample_suggestions(pool, 10, &mut StdRng::seed_from_u64(9));

		assert_eq!(first, second);
	}

	#[test]
	fn short_pool_is_returned_whole() {
		let pool: Vec<AgentView> = (0..3).map(agent).collect();
		let sampled = sample_suggestions(pool, 10, &mut StdRng::seed_from_u64(1));

		assert_eq!(sampled.len(), 3);
	}
}
