mod support;

use std::{
	fs,
	sync::{Arc, atomic::Ordering},
	time::Duration,
};

use tokio::time;

use sift_service::{Error, ReindexQueue, SiftService, UploadFile};

use support::{CountingIndexer, FakeEmbedding, FakeIndex, test_config};

fn service(data_dir: &std::path::Path) -> SiftService {
	SiftService::with_collaborators(
		test_config(data_dir),
		Arc::new(FakeEmbedding::default()),
		Arc::new(FakeIndex::default()),
	)
}

fn file(name: &str, contents: &str) -> UploadFile {
	UploadFile { file_name: name.to_string(), bytes: contents.as_bytes().to_vec() }
}

#[tokio::test]
async fn files_land_in_type_folders() {
	let dir = tempfile::tempdir().expect("Failed to create temp dir.");
	let svc = service(dir.path());
	let response = svc
		.upload(vec![
			file("report.PDF", "%PDF-1.4"),
			file("plan.md", "# Plan"),
			file("todo.txt", "Milk."),
		])
		.await
		.expect("Upload failed.");

	assert_eq!(response.status, "ok");
	assert_eq!(response.files, vec!["report.PDF", "plan.md", "todo.txt"]);
	assert!(dir.path().join("pdfs/report.PDF").is_file());
	assert_eq!(
		fs::read_to_string(dir.path().join("markdown/plan.md")).expect("Missing file."),
		"# Plan"
	);
	assert!(dir.path().join("notes/todo.txt").is_file());
}

#[tokio::test]
async fn unsupported_file_rejects_whole_upload() {
	let dir = tempfile::tempdir().expect("Failed to create temp dir.");
	let svc = service(dir.path());
	let err = svc
		.upload(vec![file("plan.md", "# Plan"), file("setup.exe", "MZ")])
		.await
		.expect_err("Expected rejection.");

	assert!(matches!(err, Error::Upload { .. }));
	assert_eq!(err.to_string(), "Unsupported file type: .exe");
	assert!(!dir.path().join("markdown").exists());
}

#[tokio::test]
async fn uploads_overwrite_and_strip_directories() {
	let dir = tempfile::tempdir().expect("Failed to create temp dir.");
	let svc = service(dir.path());

	svc.upload(vec![file("notes.txt", "old")]).await.expect("Upload failed.");

	let response =
		svc.upload(vec![file("../../notes.txt", "new")]).await.expect("Upload failed.");

	assert_eq!(response.files, vec!["notes.txt"]);
	assert_eq!(
		fs::read_to_string(dir.path().join("notes/notes.txt")).expect("Missing file."),
		"new"
	);
}

#[tokio::test]
async fn empty_upload_is_rejected() {
	let dir = tempfile::tempdir().expect("Failed to create temp dir.");
	let err = service(dir.path()).upload(Vec::new()).await.expect_err("Expected rejection.");

	assert!(matches!(err, Error::Upload { .. }));
}

#[tokio::test]
async fn upload_queues_reindex() {
	let dir = tempfile::tempdir().expect("Failed to create temp dir.");
	let indexer = CountingIndexer::default();
	let runs = indexer.runs.clone();
	let svc = service(dir.path()).with_reindex_queue(ReindexQueue::spawn(Arc::new(indexer)));

	svc.upload(vec![file("plan.md", "# Plan")]).await.expect("Upload failed.");

	let queue_done = async {
		while svc.reindex_status().is_some_and(|status| status.runs_completed == 0) {
			time::sleep(Duration::from_millis(10)).await;
		}
	};

	time::timeout(Duration::from_secs(5), queue_done).await.expect("Reindex never ran.");

	assert_eq!(runs.load(Ordering::SeqCst), 1);
}
