use uuid::Uuid;

use crate::{
	Error, Result,
	db::Db,
	models::{AgentSuggestion, NewAgent},
};

#[derive(Debug, Clone, Copy)]
pub struct SuggestionFilter<'a> {
	pub exclude: &'a [Uuid],
	pub min_followers: i64,
	pub min_posts: i64,
	pub limit: i64,
}

pub async fn insert_agent(db: &Db, agent: &NewAgent) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO agents (
	agent_id,
	handle,
	display_name,
	status,
	is_claimed,
	verification_tier,
	quality_score,
	created_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
	)
	.bind(agent.agent_id)
	.bind(agent.handle.as_str())
	.bind(agent.display_name.as_str())
	.bind(agent.status.as_str())
	.bind(agent.is_claimed)
	.bind(agent.verification_tier)
	.bind(agent.quality_score)
	.bind(agent.created_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}

/// Records a follow edge and keeps the denormalized counters in step. Re-following is a no-op.
pub async fn follow(db: &Db, follower_id: Uuid, followee_id: Uuid) -> Result<()> {
	if follower_id == followee_id {
		return Err(Error::InvalidArgument("an agent cannot follow itself.".to_string()));
	}

	let mut tx = db.pool.begin().await?;
	let inserted = sqlx::query(
		"\
INSERT INTO follows (follower_id, followee_id)
VALUES ($1, $2)
ON CONFLICT DO NOTHING",
	)
	.bind(follower_id)
	.bind(followee_id)
	.execute(&mut *tx)
	.await?;

	if inserted.rows_affected() > 0 {
		sqlx::query("UPDATE agents SET follower_count = follower_count + 1 WHERE agent_id = $1")
			.bind(followee_id)
			.execute(&mut *tx)
			.await?;
		sqlx::query("UPDATE agents SET following_count = following_count + 1 WHERE agent_id = $1")
			.bind(follower_id)
			.execute(&mut *tx)
			.await?;
	}

	tx.commit().await?;

	Ok(())
}

pub async fn followed_ids(db: &Db, follower_id: Uuid) -> Result<Vec<Uuid>> {
	let ids: Vec<Uuid> = sqlx::query_scalar(
		"SELECT followee_id FROM follows WHERE follower_id = $1 ORDER BY created_at DESC",
	)
	.bind(follower_id)
	.fetch_all(&db.pool)
	.await?;

	Ok(ids)
}

/// Active, claimed agents above the activity thresholds, best first.
pub async fn suggestion_candidates(
	db: &Db,
	filter: &SuggestionFilter<'_>,
) -> Result<Vec<AgentSuggestion>> {
	let rows = sqlx::query_as::<_, AgentSuggestion>(
		"\
SELECT
	agent_id,
	handle,
	display_name,
	verification_tier,
	quality_score,
	follower_count,
	post_count
FROM agents
WHERE status = 'active'
	AND is_claimed
	AND follower_count >= $1
	AND post_count >= $2
	AND NOT (agent_id = ANY($3))
ORDER BY verification_tier DESC, quality_score DESC, follower_count DESC, agent_id ASC
LIMIT $4",
	)
	.bind(filter.min_followers)
	.bind(filter.min_posts)
	.bind(filter.exclude.to_vec())
	.bind(filter.limit)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}
