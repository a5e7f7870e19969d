pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Store error: {message}")]
	Store { message: String },
	#[error("{message}")]
	Upload { message: String },
	#[error("Ingestion error: {message}")]
	Ingest { message: String },
	#[error(transparent)]
	Io(#[from] std::io::Error),
}
impl From<sift_providers::Error> for Error {
	fn from(err: sift_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
impl From<sift_storage::Error> for Error {
	fn from(err: sift_storage::Error) -> Self {
		Self::Store { message: err.to_string() }
	}
}
impl From<sift_ingest::Error> for Error {
	fn from(err: sift_ingest::Error) -> Self {
		Self::Ingest { message: err.to_string() }
	}
}
