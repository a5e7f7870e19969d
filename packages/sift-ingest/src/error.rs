use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to load tokenizer: {message}")]
	Tokenizer { message: String },
	#[error("Failed to extract text from {path:?}: {message}")]
	Extract { path: PathBuf, message: String },
	#[error(transparent)]
	Io(#[from] std::io::Error),
	#[error(transparent)]
	Provider(#[from] sift_providers::Error),
	#[error(transparent)]
	Storage(#[from] sift_storage::Error),
}
impl Error {
	/// File-scoped failures skip the file; everything else aborts the run.
	pub fn is_file_local(&self) -> bool {
		matches!(self, Self::Extract { .. } | Self::Io(_))
	}
}
