pub mod discover;
pub mod extract;

mod error;

pub use discover::{SourceFile, discover};
pub use error::{Error, Result};
pub use extract::extract_text;

use std::sync::Arc;

use tokio::{sync::OnceCell, task};
use uuid::Uuid;

use sift_chunking::{Chunk, Chunker, ChunkingConfig, Tokenizer};
use sift_config::Config;
use sift_providers::EmbeddingClient;
use sift_storage::{IndexedChunk, QdrantStore};

/// Counters for one ingestion run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestReport {
	pub files_indexed: u32,
	pub files_skipped: u32,
	pub chunks_indexed: u32,
}

/// Rebuilds the vector collection from the data folder.
///
/// The embedding client and the store are borrowed per run, so callers can share one instance
/// of each with the search path.
pub struct Ingestor {
	cfg: Arc<Config>,
	chunker: OnceCell<Arc<Chunker<Tokenizer>>>,
}
impl Ingestor {
	pub fn new(cfg: Arc<Config>) -> Self {
		Self { cfg, chunker: OnceCell::new() }
	}

	/// Indexes every document under the data folder, then drops points left by earlier runs.
	///
	/// The collection must already exist. Points are tagged with a fresh generation, so the
	/// collection stays queryable while the run is in progress. Unreadable files are skipped.
	/// Provider and store failures abort the run before anything is deleted.
	pub async fn run(
		&self,
		embedding: &EmbeddingClient,
		store: &QdrantStore,
	) -> Result<IngestReport> {
		let generation = Uuid::new_v4().to_string();
		let data_dir = &self.cfg.ingest.data_dir;
		let files = discover(data_dir);
		let chunker = self.chunker().await?;
		let mut report = IngestReport::default();

		tracing::info!(
			data_dir = %data_dir.display(),
			files = files.len(),
			%generation,
			"Ingestion started."
		);

		for file in &files {
			match self.index_file(file, &chunker, embedding, store, &generation).await {
				Ok(chunks) => {
					report.files_indexed += 1;
					report.chunks_indexed += chunks;

					tracing::info!(path = %file.path.display(), chunks, "Indexed document.");
				},
				Err(err) if err.is_file_local() => {
					report.files_skipped += 1;

					tracing::warn!(
						path = %file.path.display(),
						error = %err,
						"Skipping document."
					);
				},
				Err(err) => return Err(err),
			}
		}

		store.delete_other_generations(&generation).await?;

		tracing::info!(
			files_indexed = report.files_indexed,
			files_skipped = report.files_skipped,
			chunks_indexed = report.chunks_indexed,
			"Ingestion finished."
		);

		Ok(report)
	}

	async fn index_file(
		&self,
		file: &SourceFile,
		chunker: &Chunker<Tokenizer>,
		embedding: &EmbeddingClient,
		store: &QdrantStore,
		generation: &str,
	) -> Result<u32> {
		let text = extract_text(file, &self.cfg.ingest.pdftotext_bin).await?;
		let chunks = chunker.split(&text);
		let batch_size = self.cfg.ingest.embed_batch_size.max(1) as usize;
		let mut written = 0_u32;

		for batch in chunks.chunks(batch_size) {
			let texts: Vec<String> = batch.iter().map(|chunk| chunk.text.clone()).collect();
			let vectors = embedding.embed(&texts).await?;
			let points = indexed_chunks(file, batch, vectors);

			store.upsert(&points, generation).await?;

			written += points.len() as u32;
		}

		Ok(written)
	}

	async fn chunker(&self) -> Result<Arc<Chunker<Tokenizer>>> {
		let chunker = self
			.chunker
			.get_or_try_init(|| async {
				let chunking = &self.cfg.ingest.chunking;
				let repo = chunking
					.tokenizer_repo
					.clone()
					.unwrap_or_else(|| self.cfg.providers.embedding.model.clone());
				let cfg = ChunkingConfig {
					max_tokens: chunking.max_tokens,
					overlap_tokens: chunking.overlap_tokens,
				};
				let tokenizer = task::spawn_blocking(move || sift_chunking::load_tokenizer(&repo))
					.await
					.map_err(|err| Error::Tokenizer { message: err.to_string() })?
					.map_err(|err| Error::Tokenizer { message: err.to_string() })?;

				Ok::<_, Error>(Arc::new(Chunker::new(tokenizer, cfg)))
			})
			.await?;

		Ok(chunker.clone())
	}
}

/// Stable point id for a chunk, so re-indexing the same file overwrites its points.
pub fn point_id(path: &str, chunk_index: u32) -> Uuid {
	Uuid::new_v5(&Uuid::NAMESPACE_URL, format!("{path}:{chunk_index}").as_bytes())
}

/// Pairs chunks with their embeddings. Extra chunks or vectors on either side are dropped.
pub fn indexed_chunks(
	file: &SourceFile,
	chunks: &[Chunk],
	vectors: Vec<Vec<f32>>,
) -> Vec<IndexedChunk> {
	let path = file.path_string();
	let source = file.source();

	chunks
		.iter()
		.zip(vectors)
		.map(|(chunk, vector)| IndexedChunk {
			id: point_id(&path, chunk.chunk_index),
			vector,
			text: chunk.text.clone(),
			source: source.clone(),
			doc_type: file.kind.type_tag().to_string(),
			path: path.clone(),
			mtime: file.mtime,
			chunk_index: chunk.chunk_index,
		})
		.collect()
}
