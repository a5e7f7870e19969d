use std::path::Path;

use tokio::{fs, process::Command};

use crate::{Error, Result, discover::SourceFile};
use sift_domain::DocumentKind;

/// Reads the plain text of a document.
pub async fn extract_text(file: &SourceFile, pdftotext_bin: &str) -> Result<String> {
	match file.kind {
		DocumentKind::Pdf => pdf_text(&file.path, pdftotext_bin).await,
		DocumentKind::Markdown | DocumentKind::Notes => {
			let bytes = fs::read(&file.path).await?;

			Ok(String::from_utf8_lossy(&bytes).into_owned())
		},
	}
}

async fn pdf_text(path: &Path, pdftotext_bin: &str) -> Result<String> {
	let output = Command::new(pdftotext_bin)
		.arg("-layout")
		.arg(path)
		.arg("-")
		.output()
		.await
		.map_err(|err| Error::Extract {
			path: path.to_path_buf(),
			message: format!("Failed to run {pdftotext_bin}: {err}."),
		})?;

	if !output.status.success() {
		return Err(Error::Extract {
			path: path.to_path_buf(),
			message: format!(
				"{pdftotext_bin} exited with {}: {}",
				output.status,
				String::from_utf8_lossy(&output.stderr).trim()
			),
		});
	}

	Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
