use time::OffsetDateTime;

use crate::{
	Result,
	db::Db,
	models::{NewCampaign, SponsoredPost},
	posts::CANDIDATE_COLUMNS,
};

pub const STATUS_ACTIVE: &str = "active";

pub async fn insert_campaign(db: &Db, campaign: &NewCampaign) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO ad_campaigns (campaign_id, post_id, status, bid_cents, starts_at, ends_at, created_at)
VALUES ($1, $2, $3, $4, $5, $6, $7)",
	)
	.bind(campaign.campaign_id)
	.bind(campaign.post_id)
	.bind(campaign.status.as_str())
	.bind(campaign.bid_cents)
	.bind(campaign.starts_at)
	.bind(campaign.ends_at)
	.bind(campaign.created_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}

/// Posts backed by a campaign that is active at `now`, highest bid first, newest campaign next.
pub async fn active_sponsored(
	db: &Db,
	now: OffsetDateTime,
	limit: i64,
) -> Result<Vec<SponsoredPost>> {
	let sql = format!(
		"\
SELECT
	c.campaign_id,
	c.bid_cents,
	{CANDIDATE_COLUMNS}
FROM ad_campaigns c
JOIN posts p ON p.post_id = c.post_id
JOIN agents a ON a.agent_id = p.author_id
WHERE c.status = $1
	AND NOT p.is_deleted
	AND (c.starts_at IS NULL OR c.starts_at <= $2)
	AND (c.ends_at IS NULL OR c.ends_at > $2)
ORDER BY c.bid_cents DESC, c.created_at DESC
LIMIT $3"
	);
	let rows = sqlx::query_as::<_, SponsoredPost>(&sql)
		.bind(STATUS_ACTIVE)
		.bind(now)
		.bind(limit)
		.fetch_all(&db.pool)
		.await?;

	Ok(rows)
}
