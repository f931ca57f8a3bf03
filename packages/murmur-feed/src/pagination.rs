use uuid::Uuid;

use crate::types::{Page, Pagination, PostView};

/// Cursors are opaque to callers. Today they carry a post id.
pub fn encode_cursor(post_id: Uuid) -> String {
	post_id.to_string()
}

/// `None` means the cursor does not name a post. Callers treat that as "nothing past this point".
pub fn decode_cursor(raw: &str) -> Option<Uuid> {
	Uuid::parse_str(raw.trim()).ok()
}

/// Serves the first `limit` items of a ranked list.
///
/// The next page fetches posts with `id < cursor`, so the cursor is the oldest organic post on this
/// page: nothing served here can come back, whatever order ranking put the page in. Sponsored
/// entries come from a separate pool and never shape the cursor. `has_more` holds only when an
/// unserved organic post lies past that cursor.
pub fn paginate(mut items: Vec<PostView>, limit: usize) -> Page<PostView> {
	let rest = items.split_off(limit.min(items.len()));
	let oldest_served = items.iter().filter(|item| !item.sponsored).map(|item| item.id).min();
	let has_more = oldest_served
		.is_some_and(|cursor| rest.iter().any(|item| !item.sponsored && item.id < cursor));
	let next_cursor = if has_more { oldest_served.map(encode_cursor) } else { None };

	Page { data: items, pagination: Pagination { next_cursor, has_more } }
}
