pub mod document;
pub mod filter;
pub mod ranking;
pub mod recency;

pub use document::DocumentKind;
pub use filter::{Predicate, build_filter};
pub use ranking::{
	Candidate, CandidateMetadata, RankParams, ScoredResult, TieBreak, base_score, blend_score,
	cmp_f32_desc, rank_candidates, rank_candidates_by,
};
pub use recency::{RECENCY_FLOOR, SECONDS_PER_DAY, recency_weight, unix_seconds};
