use sqlx::{Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	Error, Result,
	db::Db,
	models::{NewPost, PostCandidate},
};

pub const CANDIDATE_COLUMNS: &str = "\
p.post_id,
	p.author_id,
	a.handle AS author_handle,
	a.display_name AS author_display_name,
	p.content,
	p.created_at,
	p.like_count,
	p.repost_count,
	p.reply_count,
	p.quote_count,
	a.post_count AS author_post_count,
	a.follower_count AS author_follower_count";

#[derive(Debug, Clone, Copy)]
pub struct CandidateFilter<'a> {
	pub since: OffsetDateTime,
	/// Substring match against post content, e.g. `#agents`.
	pub hashtag: Option<&'a str>,
	pub author_ids: Option<&'a [Uuid]>,
	/// Only posts strictly older than this id.
	pub before: Option<Uuid>,
	pub limit: i64,
}

pub async fn fetch_candidates(db: &Db, filter: &CandidateFilter<'_>) -> Result<Vec<PostCandidate>> {
	if filter.limit <= 0 {
		return Err(Error::InvalidArgument("candidate limit must be positive.".to_string()));
	}
	if filter.author_ids.is_some_and(|ids| ids.is_empty()) {
		return Ok(Vec::new());
	}

	let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT ");

	builder.push(CANDIDATE_COLUMNS);
	builder.push(
		" FROM posts p JOIN agents a ON a.agent_id = p.author_id WHERE NOT p.is_deleted AND p.created_at >= ",
	);
	builder.push_bind(filter.since);

	if let Some(hashtag) = filter.hashtag {
		builder.push(" AND p.content ILIKE ");
		builder.push_bind(format!("%{}%", escape_like(hashtag)));
		builder.push(" ESCAPE '\\'");
	}
	if let Some(author_ids) = filter.author_ids {
		builder.push(" AND p.author_id = ANY(");
		builder.push_bind(author_ids.to_vec());
		builder.push(")");
	}
	if let Some(before) = filter.before {
		builder.push(" AND p.post_id < ");
		builder.push_bind(before);
	}

	builder.push(" ORDER BY p.created_at DESC, p.post_id DESC LIMIT ");
	builder.push_bind(filter.limit);

	let rows = builder.build_query_as::<PostCandidate>().fetch_all(&db.pool).await?;

	Ok(rows)
}

/// Contents of the newest non-deleted posts created at or after `since`, newest first.
pub async fn recent_post_contents(
	db: &Db,
	since: OffsetDateTime,
	limit: i64,
) -> Result<Vec<String>> {
	let rows: Vec<String> = sqlx::query_scalar(
		"\
SELECT content
FROM posts
WHERE NOT is_deleted
	AND created_at >= $1
ORDER BY created_at DESC, post_id DESC
LIMIT $2",
	)
	.bind(since)
	.bind(limit)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

pub async fn insert_post(db: &Db, post: &NewPost) -> Result<()> {
	let mut tx = db.pool.begin().await?;

	sqlx::query(
		"\
INSERT INTO posts (post_id, author_id, content, created_at)
VALUES ($1, $2, $3, $4)",
	)
	.bind(post.post_id)
	.bind(post.author_id)
	.bind(post.content.as_str())
	.bind(post.created_at)
	.execute(&mut *tx)
	.await?;

	let updated = sqlx::query("UPDATE agents SET post_count = post_count + 1 WHERE agent_id = $1")
		.bind(post.author_id)
		.execute(&mut *tx)
		.await?;

	if updated.rows_affected() == 0 {
		return Err(Error::NotFound(format!("agent {}", post.author_id)));
	}

	tx.commit().await?;

	Ok(())
}

pub async fn set_engagement(
	db: &Db,
	post_id: Uuid,
	likes: i64,
	reposts: i64,
	replies: i64,
	quotes: i64,
) -> Result<()> {
	let updated = sqlx::query(
		"\
UPDATE posts
SET like_count = $1, repost_count = $2, reply_count = $3, quote_count = $4
WHERE post_id = $5",
	)
	.bind(likes)
	.bind(reposts)
	.bind(replies)
	.bind(quotes)
	.bind(post_id)
	.execute(&db.pool)
	.await?;

	if updated.rows_affected() == 0 {
		return Err(Error::NotFound(format!("post {post_id}")));
	}

	Ok(())
}

pub async fn soft_delete_post(db: &Db, post_id: Uuid) -> Result<()> {
	sqlx::query("UPDATE posts SET is_deleted = true WHERE post_id = $1")
		.bind(post_id)
		.execute(&db.pool)
		.await?;

	Ok(())
}

/// Makes `%`, `_` and `\` match themselves under `ESCAPE '\'`.
fn escape_like(raw: &str) -> String {
	let mut out = String::with_capacity(raw.len());

	for ch in raw.chars() {
		if matches!(ch, '%' | '_' | '\\') {
			out.push('\\');
		}

		out.push(ch);
	}

	out
}

#[cfg(test)]
mod tests {
	use super::escape_like;

	#[test]
	fn like_wildcards_are_escaped() {
		assert_eq!(escape_like("#rust_lang"), "#rust\\_lang");
		assert_eq!(escape_like("100%"), "100\\%");
		assert_eq!(escape_like("a\\b"), "a\\\\b");
		assert_eq!(escape_like("#plain"), "#plain");
	}
}
