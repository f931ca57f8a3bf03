use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = murmur_api::Args::parse();

	murmur_api::run(args).await
}
