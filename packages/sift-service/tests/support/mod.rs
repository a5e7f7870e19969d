#![allow(dead_code)]

use std::{
	path::Path,
	sync::{
		Arc, Mutex,
		atomic::{AtomicUsize, Ordering},
	},
};

use serde_json::Map;

use sift_config::{
	Chunking, Config, EmbeddingProviderConfig, Ingest, Providers, Qdrant, Search, Security,
	Service, Storage,
};
use sift_domain::{Candidate, CandidateMetadata, Predicate};
use sift_service::{BoxFuture, EmbeddingProvider, Error, Indexer, Result, VectorIndex};

pub const DIM: u32 = 4;
pub const NOW: f64 = 1_750_000_000.0;

pub fn test_config(data_dir: &Path) -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
			static_dir: None,
			max_upload_bytes: 1_024 * 1_024,
			cors_allow_origins: Vec::new(),
		},
		storage: Storage {
			qdrant: Qdrant {
				url: "http://127.0.0.1:6334".to_string(),
				collection: "sift_test".to_string(),
				vector_dim: DIM,
			},
		},
		providers: Providers {
			embedding: EmbeddingProviderConfig {
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/embeddings".to_string(),
				model: "test-model".to_string(),
				dimensions: DIM,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
		},
		search: Search::default(),
		ingest: Ingest {
			data_dir: data_dir.to_path_buf(),
			chunking: Chunking::default(),
			pdftotext_bin: "pdftotext".to_string(),
			embed_batch_size: 8,
		},
		security: Security { bind_localhost_only: true },
	}
}

pub fn candidate(id: &str, distance: f32, mtime: Option<f64>) -> Candidate {
	Candidate {
		id: id.to_string(),
		text: format!("Text of {id}."),
		distance,
		metadata: CandidateMetadata {
			source: Some(format!("{id}.pdf")),
			doc_type: Some("pdf".to_string()),
			path: Some(format!("data/pdfs/{id}.pdf")),
			mtime,
		},
	}
}

#[derive(Default)]
pub struct FakeEmbedding {
	pub calls: AtomicUsize,
	pub fail: bool,
	pub dimensions: Option<usize>,
}
impl FakeEmbedding {
	pub fn failing() -> Self {
		Self { fail: true, ..Default::default() }
	}

	pub fn with_dimensions(dimensions: usize) -> Self {
		Self { dimensions: Some(dimensions), ..Default::default() }
	}

	pub fn count(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl EmbeddingProvider for FakeEmbedding {
	fn embed<'a>(&'a self, texts: &'a [String]) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let dim = self.dimensions.unwrap_or(DIM as usize);
		let fail = self.fail;

		Box::pin(async move {
			if fail {
				return Err(Error::Provider { message: "embedding backend down".to_string() });
			}

			Ok(vec![vec![0.5; dim]; texts.len()])
		})
	}
}

#[derive(Default)]
pub struct FakeIndex {
	pub candidates: Vec<Candidate>,
	pub fail: bool,
	pub calls: Mutex<Vec<(u32, Option<Predicate>)>>,
}
impl FakeIndex {
	pub fn with(candidates: Vec<Candidate>) -> Self {
		Self { candidates, ..Default::default() }
	}

	pub fn failing() -> Self {
		Self { fail: true, ..Default::default() }
	}

	pub fn calls(&self) -> Vec<(u32, Option<Predicate>)> {
		self.calls.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}
}
impl VectorIndex for FakeIndex {
	fn query<'a>(
		&'a self,
		_vector: Vec<f32>,
		limit: u32,
		predicate: Option<&'a Predicate>,
	) -> BoxFuture<'a, Result<Vec<Candidate>>> {
		self.calls
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.push((limit, predicate.cloned()));

		let result = if self.fail {
			Err(Error::Store { message: "index unavailable".to_string() })
		} else {
			Ok(self.candidates.iter().take(limit as usize).cloned().collect())
		};

		Box::pin(async move { result })
	}
}

#[derive(Default)]
pub struct CountingIndexer {
	pub runs: Arc<AtomicUsize>,
}
impl Indexer for CountingIndexer {
	fn reindex(&self) -> BoxFuture<'_, Result<()>> {
		self.runs.fetch_add(1, Ordering::SeqCst);

		Box::pin(async { Ok(()) })
	}
}
