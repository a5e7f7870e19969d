use std::{
	path::{Path, PathBuf},
	time::SystemTime,
};

use time::OffsetDateTime;
use walkdir::WalkDir;

use sift_domain::{DocumentKind, unix_seconds};

/// A document found under the data folder.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceFile {
	pub path: PathBuf,
	pub kind: DocumentKind,
	/// Seconds since the Unix epoch.
	pub mtime: f64,
}
impl SourceFile {
	pub fn source(&self) -> String {
		self.path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default()
	}

	pub fn path_string(&self) -> String {
		self.path.to_string_lossy().into_owned()
	}
}

/// Lists indexable files under each kind's folder, sorted by path.
///
/// A file counts only when its extension matches the folder it sits in. Missing folders and
/// entries that cannot be read, such as dangling links, are skipped.
pub fn discover(data_dir: &Path) -> Vec<SourceFile> {
	let mut files = Vec::new();

	for kind in DocumentKind::ALL {
		let dir = data_dir.join(kind.dir_name());

		if !dir.is_dir() {
			tracing::debug!(dir = %dir.display(), "Skipping missing document folder.");

			continue;
		}

		for entry in WalkDir::new(&dir).follow_links(true).sort_by_file_name() {
			let entry = match entry {
				Ok(entry) => entry,
				Err(err) => {
					tracing::warn!(
						path = ?err.path(),
						error = %err,
						"Skipping unreadable directory entry."
					);

					continue;
				},
			};

			if !entry.file_type().is_file() || is_hidden(entry.path()) {
				continue;
			}

			let matches_kind = entry
				.path()
				.extension()
				.and_then(|ext| ext.to_str())
				.and_then(DocumentKind::from_extension)
				== Some(kind);

			if !matches_kind {
				continue;
			}

			let modified = match entry.metadata() {
				Ok(metadata) => metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
				Err(err) => {
					tracing::warn!(
						path = %entry.path().display(),
						error = %err,
						"Skipping unreadable file."
					);

					continue;
				},
			};

			files.push(SourceFile {
				path: entry.into_path(),
				kind,
				mtime: unix_seconds(OffsetDateTime::from(modified)),
			});
		}
	}

	files.sort_by(|a, b| a.path.cmp(&b.path));

	files
}

fn is_hidden(path: &Path) -> bool {
	path.file_name().and_then(|name| name.to_str()).is_some_and(|name| name.starts_with('.'))
}
