use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, Result, SiftService};
use sift_domain::{RankParams, ScoredResult, build_filter, rank_candidates, unix_seconds};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SearchRequest {
	pub query: String,
	#[serde(default)]
	pub top_k: Option<u32>,
	/// Document type tags to restrict to. Empty means any type.
	#[serde(default)]
	pub types: Option<Vec<String>>,
	#[serde(default)]
	pub max_age_days: Option<u32>,
	#[serde(default)]
	pub recency_boost: Option<f32>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SearchResponse {
	pub results: Vec<ScoredResult>,
}

struct ResolvedSearch {
	top_k: u32,
	recency_boost: f32,
}

impl SiftService {
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		self.search_at(req, unix_seconds(OffsetDateTime::now_utc())).await
	}

	/// Runs a search against a fixed `now` (seconds since the Unix epoch).
	pub async fn search_at(&self, req: SearchRequest, now: f64) -> Result<SearchResponse> {
		let resolved = self.resolve_search(&req)?;
		let embedding = self.embedding.get().await?;
		let vectors = embedding.embed(std::slice::from_ref(&req.query)).await?;
		let vector = single_vector(vectors, self.cfg.providers.embedding.dimensions)?;
		let predicate = build_filter(req.types.as_deref(), req.max_age_days, now);
		let index = self.index.get().await?;
		let candidates = index.query(vector, resolved.top_k, predicate.as_ref()).await?;
		let candidate_count = candidates.len();
		let params =
			RankParams { max_age_days: req.max_age_days, recency_boost: resolved.recency_boost, now };
		let results = rank_candidates(candidates, &params, self.tie_break);

		tracing::debug!(
			top_k = resolved.top_k,
			candidates = candidate_count,
			filtered = predicate.is_some(),
			tie_break = self.tie_break.as_str(),
			"Search ranked candidates."
		);

		Ok(SearchResponse { results })
	}

	fn resolve_search(&self, req: &SearchRequest) -> Result<ResolvedSearch> {
		let search = &self.cfg.search;

		if req.query.trim().is_empty() {
			return Err(invalid("query must be non-empty."));
		}

		let top_k = req.top_k.unwrap_or(search.default_top_k);

		if top_k == 0 {
			return Err(invalid("top_k must be greater than zero."));
		}
		if top_k > search.max_top_k {
			return Err(invalid(&format!("top_k must be at most {}.", search.max_top_k)));
		}

		let recency_boost = req.recency_boost.unwrap_or(search.default_recency_boost);

		if !recency_boost.is_finite() || !(0.0..=1.0).contains(&recency_boost) {
			return Err(invalid("recency_boost must be in the range 0.0-1.0."));
		}
		if let Some(types) = &req.types
			&& types.iter().any(|tag| tag.trim().is_empty())
		{
			return Err(invalid("types must not contain empty tags."));
		}

		Ok(ResolvedSearch { top_k, recency_boost })
	}
}

fn single_vector(vectors: Vec<Vec<f32>>, dimensions: u32) -> Result<Vec<f32>> {
	let count = vectors.len();
	let mut vectors = vectors.into_iter();
	let (Some(vector), None) = (vectors.next(), vectors.next()) else {
		return Err(Error::Provider {
			message: format!("Embedding provider returned {count} vectors for one query."),
		});
	};

	if vector.len() != dimensions as usize {
		return Err(Error::Provider {
			message: format!(
				"Embedding dimension mismatch: expected {dimensions}, got {}.",
				vector.len()
			),
		});
	}

	Ok(vector)
}

fn invalid(message: &str) -> Error {
	Error::InvalidRequest { message: message.to_string() }
}
