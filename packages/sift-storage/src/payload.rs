use std::collections::HashMap;

use qdrant_client::{
	Payload,
	qdrant::{PointId, ScoredPoint, Value, point_id::PointIdOptions, value::Kind},
};
use serde_json::Value as JsonValue;

use sift_domain::{Candidate, CandidateMetadata};

pub const TEXT_FIELD: &str = "text";
pub const SOURCE_FIELD: &str = "source";
pub const TYPE_FIELD: &str = sift_domain::filter::TYPE_FIELD;
pub const PATH_FIELD: &str = "path";
pub const MTIME_FIELD: &str = sift_domain::filter::MTIME_FIELD;
pub const CHUNK_INDEX_FIELD: &str = "chunk_index";
pub const GENERATION_FIELD: &str = "generation";

/// A chunk ready to be written, with its embedding and stored attributes.
#[derive(Clone, Debug)]
pub struct IndexedChunk {
	pub id: uuid::Uuid,
	pub vector: Vec<f32>,
	pub text: String,
	pub source: String,
	pub doc_type: String,
	pub path: String,
	pub mtime: f64,
	pub chunk_index: u32,
}
impl IndexedChunk {
	pub fn payload(&self, generation: &str) -> Payload {
		let mut payload = Payload::new();

		payload.insert(TEXT_FIELD, self.text.clone());
		payload.insert(SOURCE_FIELD, self.source.clone());
		payload.insert(TYPE_FIELD, self.doc_type.clone());
		payload.insert(PATH_FIELD, self.path.clone());
		payload.insert(MTIME_FIELD, JsonValue::from(self.mtime));
		payload.insert(CHUNK_INDEX_FIELD, JsonValue::from(self.chunk_index));
		payload.insert(GENERATION_FIELD, generation.to_string());

		payload
	}
}

/// Decodes a scored point. Qdrant's cosine score is a similarity, so distance is `1 - score`.
pub fn candidate_from_point(point: ScoredPoint) -> Option<Candidate> {
	let id = point.id.as_ref().and_then(point_id_string)?;
	let payload = point.payload;

	Some(Candidate {
		id,
		text: payload_string(&payload, TEXT_FIELD).unwrap_or_default(),
		distance: 1.0 - point.score,
		metadata: CandidateMetadata {
			source: payload_string(&payload, SOURCE_FIELD),
			doc_type: payload_string(&payload, TYPE_FIELD),
			path: payload_string(&payload, PATH_FIELD),
			mtime: payload_f64(&payload, MTIME_FIELD),
		},
	})
}

fn point_id_string(point_id: &PointId) -> Option<String> {
	match point_id.point_id_options.as_ref()? {
		PointIdOptions::Uuid(id) => Some(id.clone()),
		PointIdOptions::Num(num) => Some(num.to_string()),
	}
}

fn payload_string(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
	match payload.get(key)?.kind.as_ref()? {
		Kind::StringValue(text) => Some(text.clone()),
		_ => None,
	}
}

fn payload_f64(payload: &HashMap<String, Value>, key: &str) -> Option<f64> {
	match payload.get(key)?.kind.as_ref()? {
		Kind::DoubleValue(value) => Some(*value),
		Kind::IntegerValue(value) => Some(*value as f64),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn string_value(text: &str) -> Value {
		Value { kind: Some(Kind::StringValue(text.to_string())) }
	}

	#[test]
	fn decodes_point_with_full_payload() {
		let mut payload = HashMap::new();

		payload.insert(TEXT_FIELD.to_string(), string_value("Quarterly budget."));
		payload.insert(SOURCE_FIELD.to_string(), string_value("budget.pdf"));
		payload.insert(TYPE_FIELD.to_string(), string_value("pdf"));
		payload.insert(PATH_FIELD.to_string(), string_value("data/pdfs/budget.pdf"));
		payload.insert(MTIME_FIELD.to_string(), Value { kind: Some(Kind::IntegerValue(1_700)) });

		let point = ScoredPoint {
			id: Some(PointId::from(7_u64)),
			payload,
			score: 0.75,
			..Default::default()
		};
		let candidate = candidate_from_point(point).expect("Expected a candidate.");

		assert_eq!(candidate.id, "7");
		assert_eq!(candidate.text, "Quarterly budget.");
		assert!((candidate.distance - 0.25).abs() < 1e-6);
		assert_eq!(candidate.metadata.doc_type.as_deref(), Some("pdf"));
		assert_eq!(candidate.metadata.mtime, Some(1_700.0));
	}

	#[test]
	fn missing_attributes_decode_as_none() {
		let point = ScoredPoint {
			id: Some(PointId::from("0f7c1f0e-8a4e-4d8b-9a55-0d5d3a1f6c11".to_string())),
			score: 0.5,
			..Default::default()
		};
		let candidate = candidate_from_point(point).expect("Expected a candidate.");

		assert_eq!(candidate.text, "");
		assert_eq!(candidate.metadata, CandidateMetadata::default());
	}

	#[test]
	fn point_without_id_is_dropped() {
		assert!(candidate_from_point(ScoredPoint::default()).is_none());
	}
}
