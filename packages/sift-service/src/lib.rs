pub mod lazy;
pub mod reindex;
pub mod search;
pub mod upload;

mod error;

pub use error::{Error, Result};
pub use lazy::LazyResource;
pub use reindex::{Indexer, ReindexQueue, ReindexStatus};
pub use search::{SearchRequest, SearchResponse};
pub use upload::{UploadFile, UploadResponse, sanitize_file_name};

use std::{future::Future, pin::Pin, sync::Arc};

use sift_config::Config;
use sift_domain::{Candidate, Predicate, TieBreak};
use sift_ingest::Ingestor;
use sift_providers::EmbeddingClient;
use sift_storage::QdrantStore;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(&'a self, texts: &'a [String]) -> BoxFuture<'a, Result<Vec<Vec<f32>>>>;
}

pub trait VectorIndex
where
	Self: Send + Sync,
{
	/// Up to `limit` nearest candidates in store order.
	fn query<'a>(
		&'a self,
		vector: Vec<f32>,
		limit: u32,
		predicate: Option<&'a Predicate>,
	) -> BoxFuture<'a, Result<Vec<Candidate>>>;
}

pub struct SiftService {
	pub cfg: Arc<Config>,
	embedding: LazyResource<dyn EmbeddingProvider>,
	index: LazyResource<dyn VectorIndex>,
	tie_break: TieBreak,
	reindex: Option<ReindexQueue>,
}
impl SiftService {
	/// Service backed by the HTTP embedding client, Qdrant, and a background ingestion worker.
	///
	/// Must be called inside a Tokio runtime. The embedding client and the store are built on
	/// first use and shared by search and ingestion.
	pub fn new(cfg: Config) -> Self {
		let cfg = Arc::new(cfg);
		let clients = Arc::new(SharedClients::new(cfg.clone()));
		let indexer =
			IngestIndexer { ingestor: Ingestor::new(cfg.clone()), clients: clients.clone() };

		Self::from_resources(
			cfg,
			search_embedding(clients.clone()),
			search_index(clients),
			Some(ReindexQueue::spawn(Arc::new(indexer))),
		)
	}

	pub fn with_collaborators(
		cfg: Config,
		embedding: Arc<dyn EmbeddingProvider>,
		index: Arc<dyn VectorIndex>,
	) -> Self {
		Self::from_resources(
			Arc::new(cfg),
			LazyResource::ready("embedding", embedding),
			LazyResource::ready("vector_index", index),
			None,
		)
	}

	pub fn from_resources(
		cfg: Arc<Config>,
		embedding: LazyResource<dyn EmbeddingProvider>,
		index: LazyResource<dyn VectorIndex>,
		reindex: Option<ReindexQueue>,
	) -> Self {
		let tie_break = TieBreak::parse(&cfg.search.tie_break).unwrap_or_default();

		Self { cfg, embedding, index, tie_break, reindex }
	}

	pub fn with_reindex_queue(mut self, queue: ReindexQueue) -> Self {
		self.reindex = Some(queue);

		self
	}

	/// Queues a reindex. Returns `false` when no worker is attached or one is already pending.
	pub fn request_reindex(&self) -> bool {
		match &self.reindex {
			Some(queue) => queue.request(),
			None => {
				tracing::debug!("No reindex worker attached; skipping reindex request.");

				false
			},
		}
	}

	pub fn reindex_status(&self) -> Option<ReindexStatus> {
		self.reindex.as_ref().map(ReindexQueue::status)
	}
}

impl EmbeddingProvider for EmbeddingClient {
	fn embed<'a>(&'a self, texts: &'a [String]) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		Box::pin(async move { EmbeddingClient::embed(self, texts).await.map_err(Error::from) })
	}
}

impl VectorIndex for QdrantStore {
	fn query<'a>(
		&'a self,
		vector: Vec<f32>,
		limit: u32,
		predicate: Option<&'a Predicate>,
	) -> BoxFuture<'a, Result<Vec<Candidate>>> {
		Box::pin(async move {
			QdrantStore::query(self, vector, limit, predicate).await.map_err(Error::from)
		})
	}
}

/// Process-wide embedding client and Qdrant store, each built once on first use.
struct SharedClients {
	embedding: LazyResource<EmbeddingClient>,
	store: LazyResource<QdrantStore>,
}
impl SharedClients {
	fn new(cfg: Arc<Config>) -> Self {
		let embedding_cfg = cfg.clone();
		let embedding = LazyResource::new("embedding_client", move || {
			let cfg = embedding_cfg.clone();

			Box::pin(async move {
				let client = EmbeddingClient::new(&cfg.providers.embedding)?;

				Ok::<_, Error>(Arc::new(client))
			})
		});
		let store = LazyResource::new("qdrant_store", move || {
			let cfg = cfg.clone();

			Box::pin(async move {
				let store = QdrantStore::new(&cfg.storage.qdrant)?;

				store.ensure_collection().await?;

				Ok::<_, Error>(Arc::new(store))
			})
		});

		Self { embedding, store }
	}
}

struct IngestIndexer {
	ingestor: Ingestor,
	clients: Arc<SharedClients>,
}
impl Indexer for IngestIndexer {
	fn reindex(&self) -> BoxFuture<'_, Result<()>> {
		Box::pin(async move {
			let embedding = self.clients.embedding.get().await?;
			let store = self.clients.store.get().await?;

			self.ingestor.run(&embedding, &store).await?;

			Ok::<_, Error>(())
		})
	}
}

fn search_embedding(clients: Arc<SharedClients>) -> LazyResource<dyn EmbeddingProvider> {
	LazyResource::new("embedding", move || {
		let clients = clients.clone();

		Box::pin(async move {
			let client = clients.embedding.get().await?;

			Ok::<_, Error>(client as Arc<dyn EmbeddingProvider>)
		})
	})
}

fn search_index(clients: Arc<SharedClients>) -> LazyResource<dyn VectorIndex> {
	LazyResource::new("vector_index", move || {
		let clients = clients.clone();

		Box::pin(async move {
			let store = clients.store.get().await?;

			Ok::<_, Error>(store as Arc<dyn VectorIndex>)
		})
	})
}
