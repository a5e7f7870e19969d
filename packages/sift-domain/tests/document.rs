use sift_domain::DocumentKind;

#[test]
fn extensions_map_to_kinds_case_insensitively() {
	assert_eq!(DocumentKind::from_extension(".PDF"), Some(DocumentKind::Pdf));
	assert_eq!(DocumentKind::from_extension("md"), Some(DocumentKind::Markdown));
	assert_eq!(DocumentKind::from_extension(".txt"), Some(DocumentKind::Notes));
	assert_eq!(DocumentKind::from_extension(".docx"), None);
	assert_eq!(DocumentKind::from_extension(""), None);
}

#[test]
fn kinds_have_distinct_directories_and_tags() {
	for kind in DocumentKind::ALL {
		assert_eq!(DocumentKind::from_extension(kind.extension()), Some(kind));
	}

	assert_eq!(DocumentKind::Pdf.dir_name(), "pdfs");
	assert_eq!(DocumentKind::Markdown.dir_name(), "markdown");
	assert_eq!(DocumentKind::Notes.dir_name(), "notes");
	assert_eq!(DocumentKind::Markdown.type_tag(), "markdown");
}
