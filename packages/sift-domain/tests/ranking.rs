use std::cmp::Ordering;

use sift_domain::{
	Candidate, CandidateMetadata, RankParams, SECONDS_PER_DAY, ScoredResult, TieBreak, blend_score,
	rank_candidates, rank_candidates_by,
};

const NOW: f64 = 1_750_000_000.0;

fn candidate(id: &str, distance: f32, mtime: Option<f64>) -> Candidate {
	Candidate {
		id: id.to_string(),
		text: format!("text for {id}"),
		distance,
		metadata: CandidateMetadata {
			source: Some(format!("{id}.pdf")),
			doc_type: Some("pdf".to_string()),
			path: Some(format!("data/pdfs/{id}.pdf")),
			mtime,
		},
	}
}

fn params(max_age_days: Option<u32>, recency_boost: f32) -> RankParams {
	RankParams { max_age_days, recency_boost, now: NOW }
}

fn ids(results: &[ScoredResult]) -> Vec<&str> {
	results.iter().map(|result| result.id.as_str()).collect()
}

fn assert_sorted_desc(results: &[ScoredResult]) {
	for pair in results.windows(2) {
		assert!(pair[0].score >= pair[1].score, "{} before {}", pair[0].score, pair[1].score);
	}
}

#[test]
fn zero_boost_returns_base_score() {
	for base in [0.0_f32, 0.25, 0.5, 1.0] {
		for weight in [0.2_f32, 0.6, 1.0] {
			assert_eq!(blend_score(base, weight, 0.0), base);
		}
	}
}

#[test]
fn zero_base_always_scores_zero() {
	for boost in [0.0_f32, 0.3, 1.0] {
		for weight in [0.2_f32, 0.5, 1.0] {
			assert_eq!(blend_score(0.0, weight, boost), 0.0);
		}
	}
}

#[test]
fn blend_is_monotone_in_weight_and_base() {
	let steps: Vec<f32> = (0..=10).map(|step| step as f32 / 10.0).collect();
	let weights: Vec<f32> = (0..=8).map(|step| 0.2 + step as f32 / 10.0).collect();

	for &boost in &steps {
		for &base in &steps {
			for pair in weights.windows(2) {
				assert!(blend_score(base, pair[0], boost) <= blend_score(base, pair[1], boost));
			}
		}
		for &weight in &weights {
			for pair in steps.windows(2) {
				assert!(blend_score(pair[0], weight, boost) <= blend_score(pair[1], weight, boost));
			}
		}
	}
}

#[test]
fn budget_report_scenario_ranks_fresh_document_first() {
	let candidates = vec![
		candidate("stale", 0.4, Some(NOW - 10.0 * SECONDS_PER_DAY)),
		candidate("fresh", 0.1, Some(NOW)),
	];
	let results = rank_candidates(candidates, &params(Some(7), 0.5), TieBreak::StoreOrder);

	assert_eq!(ids(&results), vec!["fresh", "stale"]);
	assert!((results[0].score - 0.9).abs() < 1e-4, "fresh score {}", results[0].score);
	assert!((results[1].score - 0.36).abs() < 1e-4, "stale score {}", results[1].score);
}

#[test]
fn missing_mtime_is_not_penalized() {
	let candidates =
		vec![candidate("dated", 0.2, Some(NOW - 100.0 * SECONDS_PER_DAY)), candidate("undated", 0.2, None)];
	let results = rank_candidates(candidates, &params(Some(30), 1.0), TieBreak::StoreOrder);

	assert_eq!(ids(&results), vec!["undated", "dated"]);
	assert!((results[0].score - 0.8).abs() < 1e-6);
}

#[test]
fn missing_metadata_passes_through_as_none() {
	let bare = Candidate {
		id: "bare".to_string(),
		text: "no metadata".to_string(),
		distance: 0.5,
		metadata: CandidateMetadata::default(),
	};
	let results = rank_candidates(vec![bare], &params(Some(3), 0.3), TieBreak::StoreOrder);

	assert_eq!(results.len(), 1);
	assert_eq!(results[0].source, None);
	assert_eq!(results[0].doc_type, None);
	assert_eq!(results[0].path, None);
	assert!((results[0].score - 0.5).abs() < 1e-6);
}

#[test]
fn empty_candidates_produce_empty_results() {
	assert!(rank_candidates(Vec::new(), &params(None, 0.3), TieBreak::StoreOrder).is_empty());
}

#[test]
fn single_candidate_is_returned() {
	let results =
		rank_candidates(vec![candidate("only", 0.3, None)], &params(None, 0.3), TieBreak::Id);

	assert_eq!(ids(&results), vec!["only"]);
}

#[test]
fn equal_scores_keep_store_order_by_default() {
	let candidates = vec![
		candidate("c", 0.25, None),
		candidate("a", 0.25, None),
		candidate("b", 0.25, None),
	];
	let results = rank_candidates(candidates, &params(None, 0.3), TieBreak::StoreOrder);

	assert_eq!(ids(&results), vec!["c", "a", "b"]);
	assert_sorted_desc(&results);
}

#[test]
fn id_tie_break_orders_equal_scores_by_id() {
	let candidates = vec![
		candidate("c", 0.25, None),
		candidate("a", 0.25, None),
		candidate("z", 0.05, None),
		candidate("b", 0.25, None),
	];
	let results = rank_candidates(candidates, &params(None, 0.3), TieBreak::Id);

	assert_eq!(ids(&results), vec!["z", "a", "b", "c"]);
}

#[test]
fn custom_comparator_overrides_tie_break() {
	let candidates = vec![candidate("a", 0.5, None), candidate("b", 0.5, None)];
	let results =
		rank_candidates_by(candidates, &params(None, 0.3), |a, b| b.id.cmp(&a.id));

	assert_eq!(ids(&results), vec!["b", "a"]);
}

#[test]
fn comparator_never_outranks_score() {
	let candidates = vec![candidate("a", 0.6, None), candidate("b", 0.1, None)];
	let results = rank_candidates_by(candidates, &params(None, 0.3), |_, _| Ordering::Less);

	assert_eq!(ids(&results), vec!["b", "a"]);
}

#[test]
fn mixed_candidates_are_sorted_descending() {
	let candidates = vec![
		candidate("a", 0.7, Some(NOW)),
		candidate("b", 0.2, Some(NOW - 40.0 * SECONDS_PER_DAY)),
		candidate("c", 0.35, Some(NOW - 2.0 * SECONDS_PER_DAY)),
		candidate("d", 1.2, None),
		candidate("e", 0.0, Some(NOW + SECONDS_PER_DAY)),
	];
	let results = rank_candidates(candidates, &params(Some(14), 0.4), TieBreak::StoreOrder);

	assert_eq!(results.len(), 5);
	assert_eq!(results[0].id, "e");
	assert_sorted_desc(&results);
}

#[test]
fn scored_result_serializes_type_field() {
	let results =
		rank_candidates(vec![candidate("doc", 0.1, None)], &params(None, 0.3), TieBreak::StoreOrder);
	let json = serde_json::to_value(&results[0]).expect("Failed to serialize result.");

	assert_eq!(json["type"], "pdf");
	assert_eq!(json["source"], "doc.pdf");
	assert_eq!(json["path"], "data/pdfs/doc.pdf");
	assert!(json.get("doc_type").is_none());
}
