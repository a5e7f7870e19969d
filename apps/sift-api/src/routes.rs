use std::path::Path;

use axum::{
	Json, Router,
	extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartError},
	http::{HeaderValue, StatusCode},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;
use tower_http::{
	cors::{AllowOrigin, Any, CorsLayer},
	services::{ServeDir, ServeFile},
};

use crate::state::AppState;
use sift_service::{
	Error, ReindexStatus, SearchRequest, SearchResponse, UploadFile, UploadResponse,
};

const UPLOAD_FIELD: &str = "files";

pub fn router(state: AppState) -> Router {
	let cfg = state.service.cfg.clone();
	let api = Router::new()
		.route("/health", get(health))
		.route("/search", post(search))
		.route("/upload", post(upload))
		.route("/reindex/status", get(reindex_status))
		.layer(DefaultBodyLimit::max(cfg.service.max_upload_bytes))
		.with_state(state);
	let app = match cfg.service.static_dir.as_deref() {
		Some(dir) if dir.is_dir() => {
			tracing::info!(static_dir = %dir.display(), "Serving frontend assets.");

			api.nest_service("/assets", ServeDir::new(dir.join("assets")))
				.fallback_service(static_files(dir))
		},
		Some(dir) => {
			tracing::warn!(
				static_dir = %dir.display(),
				"Static directory not found; frontend disabled."
			);

			api
		},
		None => api,
	};

	app.layer(cors_layer(&cfg.service.cors_allow_origins))
}

/// Serves files under `dir`, falling back to `index.html` for client-side routes.
///
/// `/assets` is mounted separately, so a missing asset is a 404 rather than the SPA shell.
fn static_files(dir: &Path) -> ServeDir<ServeFile> {
	ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
	if origins.is_empty() {
		return CorsLayer::permissive();
	}

	let origins: Vec<HeaderValue> = origins
		.iter()
		.filter_map(|origin| match HeaderValue::from_str(origin) {
			Ok(value) => Some(value),
			Err(err) => {
				tracing::warn!(%origin, error = %err, "Ignoring invalid CORS origin.");

				None
			},
		})
		.collect();

	CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	Json(payload): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
	let response = state.service.search(payload).await?;

	Ok(Json(response))
}

async fn upload(
	State(state): State<AppState>,
	mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
	let mut files = Vec::new();

	while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
		if field.name() != Some(UPLOAD_FIELD) {
			continue;
		}

		let file_name = field.file_name().unwrap_or_default().to_string();
		let bytes = field.bytes().await.map_err(multipart_error)?;

		files.push(UploadFile { file_name, bytes: bytes.to_vec() });
	}

	let response = state.service.upload(files).await?;

	Ok(Json(response))
}

async fn reindex_status(State(state): State<AppState>) -> Result<Json<ReindexStatus>, ApiError> {
	let status = state.service.reindex_status().ok_or_else(|| {
		json_error(
			StatusCode::SERVICE_UNAVAILABLE,
			"reindex_unavailable",
			"No reindex worker is running.",
		)
	})?;

	Ok(Json(status))
}

fn multipart_error(err: MultipartError) -> ApiError {
	json_error(err.status(), "invalid_multipart", err.body_text())
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message } =>
				json_error(StatusCode::BAD_REQUEST, "invalid_request", message),
			Error::Upload { message } =>
				json_error(StatusCode::BAD_REQUEST, "invalid_upload", message),
			Error::Provider { message } => {
				tracing::error!(error = %message, "Embedding provider failed.");

				json_error(StatusCode::BAD_GATEWAY, "provider_error", message)
			},
			Error::Store { message } => {
				tracing::error!(error = %message, "Vector store failed.");

				json_error(StatusCode::BAD_GATEWAY, "store_error", message)
			},
			Error::Ingest { message } => {
				tracing::error!(error = %message, "Ingestion failed.");

				json_error(StatusCode::INTERNAL_SERVER_ERROR, "ingest_error", message)
			},
			Error::Io(err) => {
				tracing::error!(error = %err, "I/O failure while handling request.");

				json_error(
					StatusCode::INTERNAL_SERVER_ERROR,
					"internal_error",
					"Internal server error.",
				)
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
	ApiError::new(status, code, message)
}
