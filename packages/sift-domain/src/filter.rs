use std::collections::BTreeSet;

use crate::recency::SECONDS_PER_DAY;

pub const TYPE_FIELD: &str = "type";
pub const MTIME_FIELD: &str = "mtime";

/// Attribute predicate handed to the vector store.
///
/// "No filter" is expressed as `Option::<Predicate>::None`, never as an empty `And`.
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
	/// Stored `type` attribute is one of the listed tags.
	TypeIn(Vec<String>),
	/// Stored `mtime` attribute is at or after the cutoff (seconds since epoch).
	MtimeGte(f64),
	And(Vec<Predicate>),
}
impl Predicate {
	/// Payload fields this predicate constrains, deduplicated.
	pub fn fields(&self) -> BTreeSet<&'static str> {
		let mut out = BTreeSet::new();

		self.collect_fields(&mut out);

		out
	}

	fn collect_fields(&self, out: &mut BTreeSet<&'static str>) {
		match self {
			Self::TypeIn(_) => {
				out.insert(TYPE_FIELD);
			},
			Self::MtimeGte(_) => {
				out.insert(MTIME_FIELD);
			},
			Self::And(children) =>
				for child in children {
					child.collect_fields(out);
				},
		}
	}
}

pub fn build_filter(
	types: Option<&[String]>,
	max_age_days: Option<u32>,
	now: f64,
) -> Option<Predicate> {
	let mut clauses = Vec::with_capacity(2);

	if let Some(types) = types
		&& !types.is_empty()
	{
		let unique: BTreeSet<&String> = types.iter().collect();

		clauses.push(Predicate::TypeIn(unique.into_iter().cloned().collect()));
	}
	if let Some(days) = max_age_days {
		clauses.push(Predicate::MtimeGte(now - f64::from(days) * SECONDS_PER_DAY));
	}

	match clauses.len() {
		0 => None,
		1 => clauses.pop(),
		_ => Some(Predicate::And(clauses)),
	}
}
