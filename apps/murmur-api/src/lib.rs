pub mod routes;
pub mod state;

use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use murmur_feed::FeedService;

use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(
	version = murmur_cli::VERSION,
	rename_all = "kebab",
	styles = murmur_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = murmur_config::load(&args.config)?;

	init_tracing(&config);

	let http_addr: SocketAddr = config.service.http_bind.parse()?;
	let purge_every = config
		.cache
		.enabled
		.then(|| Duration::from_secs(config.cache.purge_interval_seconds));
	let state = AppState::new(config).await?;

	if let Some(every) = purge_every {
		tokio::spawn(run_cache_purge(state.service.clone(), every));
	}

	let app = routes::router(state);
	let listener = TcpListener::bind(http_addr).await?;

	tracing::info!(%http_addr, "HTTP server listening.");

	axum::serve(listener, app).await?;

	Ok(())
}

/// Sweeps expired cache entries until the process exits.
pub async fn run_cache_purge(service: Arc<FeedService>, every: Duration) {
	loop {
		tokio::time::sleep(every).await;

		service.purge_expired_cache().await;
	}
}

fn init_tracing(config: &murmur_config::Config) {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();
}
