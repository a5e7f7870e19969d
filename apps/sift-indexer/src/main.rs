use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sift_ingest::Ingestor;
use sift_providers::EmbeddingClient;
use sift_storage::QdrantStore;

/// Rebuilds the search index from the configured data folder.
#[derive(Debug, Parser)]
#[command(
	version = sift_cli::VERSION,
	rename_all = "kebab",
	styles = sift_cli::styles(),
)]
struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	config: PathBuf,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = Args::parse();
	let config = sift_config::load(&args.config)?;
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	let config = Arc::new(config);
	let embedding = EmbeddingClient::new(&config.providers.embedding)?;
	let store = QdrantStore::new(&config.storage.qdrant)?;

	store.ensure_collection().await?;

	let report = Ingestor::new(config).run(&embedding, &store).await?;

	println!(
		"Indexed {} files ({} chunks), skipped {}.",
		report.files_indexed, report.chunks_indexed, report.files_skipped
	);

	Ok(())
}
