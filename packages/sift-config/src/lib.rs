mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Chunking, Config, EmbeddingProviderConfig, Ingest, Providers, Qdrant, Search, Security,
	Service, Storage,
};

use std::{fs, path::Path};

use sift_domain::TieBreak;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::Read { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config =
		toml::from_str(&raw).map_err(|err| Error::Parse { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);
	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(invalid("service.http_bind must be non-empty."));
	}
	if cfg.service.max_upload_bytes == 0 {
		return Err(invalid("service.max_upload_bytes must be greater than zero."));
	}
	if cfg.storage.qdrant.url.trim().is_empty() {
		return Err(invalid("storage.qdrant.url must be non-empty."));
	}
	if cfg.storage.qdrant.collection.trim().is_empty() {
		return Err(invalid("storage.qdrant.collection must be non-empty."));
	}

	let embedding = &cfg.providers.embedding;

	if embedding.dimensions == 0 {
		return Err(invalid("providers.embedding.dimensions must be greater than zero."));
	}
	if embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(invalid(
			"providers.embedding.dimensions must match storage.qdrant.vector_dim.",
		));
	}
	if embedding.api_key.trim().is_empty() {
		return Err(invalid("providers.embedding.api_key must be non-empty."));
	}
	if embedding.timeout_ms == 0 {
		return Err(invalid("providers.embedding.timeout_ms must be greater than zero."));
	}

	validate_search(&cfg.search)?;

	if cfg.ingest.data_dir.as_os_str().is_empty() {
		return Err(invalid("ingest.data_dir must be non-empty."));
	}
	if cfg.ingest.pdftotext_bin.trim().is_empty() {
		return Err(invalid("ingest.pdftotext_bin must be non-empty."));
	}
	if cfg.ingest.embed_batch_size == 0 {
		return Err(invalid("ingest.embed_batch_size must be greater than zero."));
	}
	if cfg.ingest.chunking.max_tokens == 0 {
		return Err(invalid("ingest.chunking.max_tokens must be greater than zero."));
	}
	if cfg.ingest.chunking.overlap_tokens >= cfg.ingest.chunking.max_tokens {
		return Err(invalid(
			"ingest.chunking.overlap_tokens must be less than ingest.chunking.max_tokens.",
		));
	}

	Ok(())
}

fn validate_search(search: &Search) -> Result<()> {
	if search.max_top_k == 0 {
		return Err(invalid("search.max_top_k must be greater than zero."));
	}
	if search.default_top_k == 0 || search.default_top_k > search.max_top_k {
		return Err(invalid("search.default_top_k must be between 1 and search.max_top_k."));
	}
	if !search.default_recency_boost.is_finite() {
		return Err(invalid("search.default_recency_boost must be a finite number."));
	}
	if !(0.0..=1.0).contains(&search.default_recency_boost) {
		return Err(invalid("search.default_recency_boost must be in the range 0.0-1.0."));
	}
	if TieBreak::parse(&search.tie_break).is_none() {
		let modes: Vec<&str> = TieBreak::ALL.iter().map(|mode| mode.as_str()).collect();

		return Err(invalid(&format!("search.tie_break must be one of {}.", modes.join(" or "))));
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.service.static_dir.as_ref().map(|dir| dir.as_os_str().is_empty()).unwrap_or(false) {
		cfg.service.static_dir = None;
	}
	if cfg
		.ingest
		.chunking
		.tokenizer_repo
		.as_deref()
		.map(|repo| repo.trim().is_empty())
		.unwrap_or(false)
	{
		cfg.ingest.chunking.tokenizer_repo = None;
	}

	cfg.service.cors_allow_origins.retain(|origin| !origin.trim().is_empty());
	cfg.search.tie_break = cfg.search.tie_break.trim().to_ascii_lowercase();
}

fn invalid(message: &str) -> Error {
	Error::Validation { message: message.to_string() }
}
