pub fn render_schema() -> String {
	let init = include_str!("../../../sql/init.sql");

	expand_includes(init)
}

pub fn statements(sql: &str) -> impl Iterator<Item = &str> {
	sql.split(';').map(str::trim).filter(|statement| !statement.is_empty())
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"00_extensions.sql" => out.push_str(include_str!("../../../sql/00_extensions.sql")),
				"tables/001_agents.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_agents.sql")),
				"tables/002_follows.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_follows.sql")),
				"tables/003_posts.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_posts.sql")),
				"tables/004_ad_campaigns.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_ad_campaigns.sql")),
				"tables/005_hashtag_counts.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_hashtag_counts.sql")),
				"tables/006_feed_cache.sql" =>
					out.push_str(include_str!("../../../sql/tables/006_feed_cache.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}
