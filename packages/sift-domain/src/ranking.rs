use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::recency::recency_weight;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CandidateMetadata {
	pub source: Option<String>,
	pub doc_type: Option<String>,
	pub path: Option<String>,
	/// Seconds since the Unix epoch.
	pub mtime: Option<f64>,
}

/// One chunk returned by the vector store, in store order.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
	pub id: String,
	pub text: String,
	/// Store distance where 0 means identical and 1 means unrelated.
	pub distance: f32,
	pub metadata: CandidateMetadata,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ScoredResult {
	pub id: String,
	pub text: String,
	pub source: Option<String>,
	#[serde(rename = "type")]
	pub doc_type: Option<String>,
	pub path: Option<String>,
	pub score: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct RankParams {
	pub max_age_days: Option<u32>,
	pub recency_boost: f32,
	/// Sampled once per request, seconds since the Unix epoch.
	pub now: f64,
}

/// Ordering applied between results whose blended scores are equal.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TieBreak {
	/// Keep the order the store returned.
	#[default]
	StoreOrder,
	/// Ascending by result id.
	Id,
}
impl TieBreak {
	pub const ALL: [Self; 2] = [Self::StoreOrder, Self::Id];

	pub fn parse(raw: &str) -> Option<Self> {
		match raw {
			"store_order" => Some(Self::StoreOrder),
			"id" => Some(Self::Id),
			_ => None,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::StoreOrder => "store_order",
			Self::Id => "id",
		}
	}

	pub fn compare(self, a: &ScoredResult, b: &ScoredResult) -> Ordering {
		match self {
			Self::StoreOrder => Ordering::Equal,
			Self::Id => a.id.cmp(&b.id),
		}
	}
}

pub fn base_score(distance: f32) -> f32 {
	1.0 - distance
}

/// Both terms scale with `base`, so recency can discount relevance but never create it.
pub fn blend_score(base: f32, recency_weight: f32, recency_boost: f32) -> f32 {
	(1.0 - recency_boost) * base + recency_boost * base * recency_weight
}

/// Descending order with NaN sorted last.
pub fn cmp_f32_desc(a: f32, b: f32) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
	}
}

pub fn rank_candidates(
	candidates: Vec<Candidate>,
	params: &RankParams,
	tie_break: TieBreak,
) -> Vec<ScoredResult> {
	rank_candidates_by(candidates, params, |a, b| tie_break.compare(a, b))
}

/// Scores every candidate and sorts by blended score, deferring equal scores to `tie_break`.
///
/// The sort is stable, so a comparator returning `Equal` preserves store order.
pub fn rank_candidates_by<F>(
	candidates: Vec<Candidate>,
	params: &RankParams,
	tie_break: F,
) -> Vec<ScoredResult>
where
	F: Fn(&ScoredResult, &ScoredResult) -> Ordering,
{
	let mut scored: Vec<ScoredResult> =
		candidates.into_iter().map(|candidate| score_candidate(candidate, params)).collect();

	scored.sort_by(|a, b| cmp_f32_desc(a.score, b.score).then_with(|| tie_break(a, b)));

	scored
}

fn score_candidate(candidate: Candidate, params: &RankParams) -> ScoredResult {
	let Candidate { id, text, distance, metadata } = candidate;
	let base = base_score(distance);
	let mtime = metadata.mtime.unwrap_or(params.now);
	let weight = recency_weight(mtime, params.max_age_days, params.now);

	ScoredResult {
		id,
		text,
		source: metadata.source,
		doc_type: metadata.doc_type,
		path: metadata.path,
		score: blend_score(base, weight, params.recency_boost),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn nan_scores_sort_last() {
		let mut scores = vec![0.3_f32, f32::NAN, 0.9, 0.1];

		scores.sort_by(|a, b| cmp_f32_desc(*a, *b));

		assert_eq!(&scores[..3], &[0.9, 0.3, 0.1]);
		assert!(scores[3].is_nan());
	}

	#[test]
	fn tie_break_round_trips_through_labels() {
		for mode in TieBreak::ALL {
			assert_eq!(TieBreak::parse(mode.as_str()), Some(mode));
		}

		assert_eq!(TieBreak::parse("random"), None);
	}
}
