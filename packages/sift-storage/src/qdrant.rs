use qdrant_client::qdrant::{
	Condition, CreateCollectionBuilder, CreateFieldIndexCollection, DeletePointsBuilder, Distance,
	FieldType, Filter, PointStruct, Query, QueryPointsBuilder, UpsertPointsBuilder,
	VectorParamsBuilder,
};

use crate::{
	Error, Result,
	filter::to_qdrant_filter,
	payload::{self, GENERATION_FIELD, IndexedChunk},
};
use sift_domain::{Candidate, Predicate};

const FIELD_INDEXES: [(&str, FieldType); 3] = [
	(payload::TYPE_FIELD, FieldType::Keyword),
	(payload::MTIME_FIELD, FieldType::Float),
	(GENERATION_FIELD, FieldType::Keyword),
];

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_dim: u32,
}
impl QdrantStore {
	pub fn new(cfg: &sift_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client, collection: cfg.collection.clone(), vector_dim: cfg.vector_dim })
	}

	/// Creates the cosine collection and its payload indexes when it does not exist yet.
	pub async fn ensure_collection(&self) -> Result<()> {
		if self.client.collection_exists(self.collection.clone()).await? {
			return Ok(());
		}

		self.client
			.create_collection(
				CreateCollectionBuilder::new(self.collection.clone()).vectors_config(
					VectorParamsBuilder::new(u64::from(self.vector_dim), Distance::Cosine),
				),
			)
			.await?;

		for (field_name, field_type) in FIELD_INDEXES {
			let request = CreateFieldIndexCollection {
				collection_name: self.collection.clone(),
				wait: Some(true),
				field_name: field_name.to_string(),
				field_type: Some(field_type as i32),
				field_index_params: None,
				ordering: None,
			};

			self.client.create_field_index(request).await?;
		}

		tracing::info!(
			collection = %self.collection,
			dim = self.vector_dim,
			"Created Qdrant collection."
		);

		Ok(())
	}

	/// Nearest-neighbour query returning candidates in store order.
	pub async fn query(
		&self,
		vector: Vec<f32>,
		limit: u32,
		predicate: Option<&Predicate>,
	) -> Result<Vec<Candidate>> {
		self.check_dim(vector.len())?;

		let mut search = QueryPointsBuilder::new(self.collection.clone())
			.query(Query::new_nearest(vector))
			.limit(u64::from(limit))
			.with_payload(true);

		if let Some(predicate) = predicate {
			search = search.filter(to_qdrant_filter(predicate));
		}

		let response = self.client.query(search).await?;
		let candidates: Vec<Candidate> =
			response.result.into_iter().filter_map(payload::candidate_from_point).collect();

		tracing::debug!(
			collection = %self.collection,
			count = candidates.len(),
			"Qdrant query finished."
		);

		Ok(candidates)
	}

	/// Writes chunks tagged with `generation`, replacing points with the same id.
	pub async fn upsert(&self, chunks: &[IndexedChunk], generation: &str) -> Result<()> {
		if chunks.is_empty() {
			return Ok(());
		}

		let mut points = Vec::with_capacity(chunks.len());

		for chunk in chunks {
			self.check_dim(chunk.vector.len())?;

			points.push(PointStruct::new(
				chunk.id.to_string(),
				chunk.vector.clone(),
				chunk.payload(generation),
			));
		}

		self.client
			.upsert_points(UpsertPointsBuilder::new(self.collection.clone(), points).wait(true))
			.await?;

		Ok(())
	}

	/// Removes every point not written by `generation`.
	pub async fn delete_other_generations(&self, generation: &str) -> Result<()> {
		let filter =
			Filter::must_not([Condition::matches(GENERATION_FIELD, generation.to_string())]);

		self.client
			.delete_points(DeletePointsBuilder::new(self.collection.clone()).points(filter).wait(true))
			.await?;

		Ok(())
	}

	fn check_dim(&self, len: usize) -> Result<()> {
		if len != self.vector_dim as usize {
			return Err(Error::InvalidArgument(format!(
				"Vector dimension {len} does not match collection dimension {}.",
				self.vector_dim
			)));
		}

		Ok(())
	}
}
