use time::OffsetDateTime;

use crate::{Result, db::Db, models::HashtagCount};

pub async fn top_hashtags(db: &Db, limit: i64) -> Result<Vec<HashtagCount>> {
	let rows = sqlx::query_as::<_, HashtagCount>(
		"\
SELECT hashtag, count
FROM hashtag_counts
WHERE count > 0
ORDER BY count DESC, hashtag ASC
LIMIT $1",
	)
	.bind(limit)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

/// Adds one occurrence per entry in `hashtags`; callers pass already-normalized tags.
pub async fn increment_hashtags(db: &Db, hashtags: &[String], now: OffsetDateTime) -> Result<()> {
	if hashtags.is_empty() {
		return Ok(());
	}

	let mut tx = db.pool.begin().await?;

	for hashtag in hashtags {
		sqlx::query(
			"\
INSERT INTO hashtag_counts (hashtag, count, updated_at)
VALUES ($1, 1, $2)
ON CONFLICT (hashtag) DO UPDATE
SET count = hashtag_counts.count + 1, updated_at = EXCLUDED.updated_at",
		)
		.bind(hashtag.as_str())
		.bind(now)
		.execute(&mut *tx)
		.await?;
	}

	tx.commit().await?;

	Ok(())
}
