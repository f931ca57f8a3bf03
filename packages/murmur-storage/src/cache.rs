use serde_json::Value;
use time::OffsetDateTime;

use crate::{Result, db::Db};

pub async fn fetch_payload(db: &Db, key: &str, now: OffsetDateTime) -> Result<Option<Value>> {
	let payload: Option<Value> = sqlx::query_scalar(
		"SELECT payload FROM feed_cache WHERE cache_key = $1 AND expires_at > $2",
	)
	.bind(key)
	.bind(now)
	.fetch_optional(&db.pool)
	.await?;

	Ok(payload)
}

/// Last write wins; concurrent writers for the same key simply overwrite each other.
pub async fn store_payload(
	db: &Db,
	key: &str,
	payload: &Value,
	now: OffsetDateTime,
	expires_at: OffsetDateTime,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO feed_cache (cache_key, payload, created_at, expires_at)
VALUES ($1, $2, $3, $4)
ON CONFLICT (cache_key) DO UPDATE
SET payload = EXCLUDED.payload, created_at = EXCLUDED.created_at, expires_at = EXCLUDED.expires_at",
	)
	.bind(key)
	.bind(payload)
	.bind(now)
	.bind(expires_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn purge_expired(db: &Db, now: OffsetDateTime) -> Result<u64> {
	let result =
		sqlx::query("DELETE FROM feed_cache WHERE expires_at <= $1").bind(now).execute(&db.pool).await?;

	Ok(result.rows_affected())
}
