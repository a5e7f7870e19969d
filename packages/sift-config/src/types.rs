use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub search: Search,
	pub ingest: Ingest,
	pub security: Security,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
	/// Optional. Built frontend directory containing `index.html` and `assets/`.
	#[serde(default)]
	pub static_dir: Option<PathBuf>,
	#[serde(default = "default_max_upload_bytes")]
	pub max_upload_bytes: usize,
	/// Empty means any origin is allowed.
	#[serde(default)]
	pub cors_allow_origins: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Storage {
	pub qdrant: Qdrant,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub collection: String,
	pub vector_dim: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	pub default_top_k: u32,
	pub max_top_k: u32,
	pub default_recency_boost: f32,
	/// One of `store_order` or `id`.
	pub tie_break: String,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			default_top_k: 10,
			max_top_k: 100,
			default_recency_boost: 0.3,
			tie_break: "store_order".to_string(),
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct Ingest {
	pub data_dir: PathBuf,
	#[serde(default)]
	pub chunking: Chunking,
	#[serde(default = "default_pdftotext_bin")]
	pub pdftotext_bin: String,
	#[serde(default = "default_embed_batch_size")]
	pub embed_batch_size: u32,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Chunking {
	pub max_tokens: u32,
	pub overlap_tokens: u32,
	/// Falls back to `providers.embedding.model` when unset.
	pub tokenizer_repo: Option<String>,
}
impl Default for Chunking {
	fn default() -> Self {
		Self { max_tokens: 512, overlap_tokens: 64, tokenizer_repo: None }
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
}

fn default_max_upload_bytes() -> usize {
	64 * 1_024 * 1_024
}

fn default_pdftotext_bin() -> String {
	"pdftotext".to_string()
}

fn default_embed_batch_size() -> u32 {
	32
}
