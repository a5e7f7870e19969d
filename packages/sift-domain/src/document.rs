use serde::{Deserialize, Serialize};

/// Document families accepted for upload and indexing.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
	Pdf,
	Markdown,
	Notes,
}
impl DocumentKind {
	pub const ALL: [Self; 3] = [Self::Pdf, Self::Markdown, Self::Notes];

	/// Accepts an extension with or without the leading dot, case-insensitively.
	pub fn from_extension(ext: &str) -> Option<Self> {
		let ext = ext.strip_prefix('.').unwrap_or(ext);

		match ext.to_ascii_lowercase().as_str() {
			"pdf" => Some(Self::Pdf),
			"md" => Some(Self::Markdown),
			"txt" => Some(Self::Notes),
			_ => None,
		}
	}

	/// Subdirectory of the data folder holding documents of this kind.
	pub fn dir_name(self) -> &'static str {
		match self {
			Self::Pdf => "pdfs",
			Self::Markdown => "markdown",
			Self::Notes => "notes",
		}
	}

	/// Value stored in the `type` payload attribute.
	pub fn type_tag(self) -> &'static str {
		match self {
			Self::Pdf => "pdf",
			Self::Markdown => "markdown",
			Self::Notes => "notes",
		}
	}

	pub fn extension(self) -> &'static str {
		match self {
			Self::Pdf => ".pdf",
			Self::Markdown => ".md",
			Self::Notes => ".txt",
		}
	}
}
