use std::sync::Arc;

use murmur_feed::FeedService;
use murmur_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<FeedService>,
}
impl AppState {
	pub async fn new(config: murmur_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		tracing::info!(cache_backend = config.cache.backend.as_str(), "Feed service ready.");

		Ok(Self::from_service(FeedService::new(config, db)))
	}

	pub fn from_service(service: FeedService) -> Self {
		Self { service: Arc::new(service) }
	}
}
