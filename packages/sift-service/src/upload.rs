use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::{Error, Result, SiftService};
use sift_domain::DocumentKind;

/// One uploaded file as received from the transport.
#[derive(Clone, Debug)]
pub struct UploadFile {
	pub file_name: String,
	pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct UploadResponse {
	pub status: String,
	pub files: Vec<String>,
}

struct PlannedWrite {
	name: String,
	target: PathBuf,
	bytes: Vec<u8>,
}

impl SiftService {
	/// Stores uploaded documents under the data folder and queues a reindex.
	///
	/// Every file is checked before any is written, so a rejected upload leaves the data folder
	/// untouched. Existing files with the same name are overwritten.
	pub async fn upload(&self, files: Vec<UploadFile>) -> Result<UploadResponse> {
		if files.is_empty() {
			return Err(Error::Upload { message: "No files were provided.".to_string() });
		}

		let data_dir = &self.cfg.ingest.data_dir;
		let mut planned = Vec::with_capacity(files.len());

		for file in files {
			let name = sanitize_file_name(&file.file_name).ok_or_else(|| Error::Upload {
				message: format!("Invalid file name: {:?}.", file.file_name),
			})?;
			let kind = upload_kind(&name)?;

			planned.push(PlannedWrite {
				target: data_dir.join(kind.dir_name()).join(&name),
				name,
				bytes: file.bytes,
			});
		}

		let mut stored = Vec::with_capacity(planned.len());

		for write in planned {
			if let Some(parent) = write.target.parent() {
				fs::create_dir_all(parent).await?;
			}

			fs::write(&write.target, &write.bytes).await?;

			tracing::info!(
				path = %write.target.display(),
				bytes = write.bytes.len(),
				"Stored upload."
			);

			stored.push(write.name);
		}

		self.request_reindex();

		Ok(UploadResponse { status: "ok".to_string(), files: stored })
	}
}

/// Strips directory components from a client-supplied file name.
pub fn sanitize_file_name(raw: &str) -> Option<String> {
	let name = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();

	if name.is_empty() || name == "." || name == ".." {
		return None;
	}

	Some(name.to_string())
}

fn upload_kind(name: &str) -> Result<DocumentKind> {
	let ext = Path::new(name)
		.extension()
		.map(|ext| format!(".{}", ext.to_string_lossy().to_ascii_lowercase()))
		.unwrap_or_default();

	DocumentKind::from_extension(&ext)
		.ok_or_else(|| Error::Upload { message: format!("Unsupported file type: {ext}") })
}
