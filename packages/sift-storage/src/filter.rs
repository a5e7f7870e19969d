use qdrant_client::qdrant::{Condition, Filter, Range};

use sift_domain::{
	Predicate,
	filter::{MTIME_FIELD, TYPE_FIELD},
};

/// Translates a store-agnostic predicate into a Qdrant filter.
pub fn to_qdrant_filter(predicate: &Predicate) -> Filter {
	Filter::all(conditions(predicate))
}

fn conditions(predicate: &Predicate) -> Vec<Condition> {
	match predicate {
		Predicate::TypeIn(types) => vec![Condition::matches(TYPE_FIELD, types.clone())],
		Predicate::MtimeGte(cutoff) => vec![Condition::range(
			MTIME_FIELD,
			Range { gte: Some(*cutoff), ..Default::default() },
		)],
		Predicate::And(children) => children.iter().flat_map(conditions).collect(),
	}
}
