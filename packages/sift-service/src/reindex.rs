use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{
	mpsc::{self, error::TrySendError},
	watch,
};

use crate::{BoxFuture, Result};

/// Rebuilds the index from the data folder.
pub trait Indexer
where
	Self: Send + Sync,
{
	fn reindex(&self) -> BoxFuture<'_, Result<()>>;
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct ReindexStatus {
	pub running: bool,
	/// A run is queued behind the current one.
	pub pending: bool,
	pub runs_completed: u64,
	pub runs_failed: u64,
	pub last_error: Option<String>,
}

/// Single background worker that runs reindex requests one at a time.
///
/// At most one request waits behind the running one. Further requests made while one is pending
/// are absorbed by it.
#[derive(Clone)]
pub struct ReindexQueue {
	tx: mpsc::Sender<()>,
	status: watch::Receiver<ReindexStatus>,
}
impl ReindexQueue {
	/// Starts the worker on the current Tokio runtime.
	pub fn spawn(indexer: Arc<dyn Indexer>) -> Self {
		let (tx, mut rx) = mpsc::channel::<()>(1);
		let (status_tx, status) = watch::channel(ReindexStatus::default());

		tokio::spawn(async move {
			while rx.recv().await.is_some() {
				status_tx.send_modify(|status| status.running = true);

				tracing::info!("Reindex started.");

				let result = indexer.reindex().await;

				status_tx.send_modify(|status| {
					status.running = false;

					match &result {
						Ok(()) => {
							status.runs_completed += 1;
							status.last_error = None;
						},
						Err(err) => {
							status.runs_failed += 1;
							status.last_error = Some(err.to_string());
						},
					}
				});

				match result {
					Ok(()) => tracing::info!("Reindex finished."),
					Err(err) => tracing::error!(error = %err, "Reindex failed."),
				}
			}
		});

		Self { tx, status }
	}

	/// Returns `false` when the request was absorbed by one already pending.
	pub fn request(&self) -> bool {
		match self.tx.try_send(()) {
			Ok(()) => true,
			Err(TrySendError::Full(())) => {
				tracing::debug!("Reindex already pending; request coalesced.");

				false
			},
			Err(TrySendError::Closed(())) => {
				tracing::warn!("Reindex worker has stopped; request dropped.");

				false
			},
		}
	}

	pub fn status(&self) -> ReindexStatus {
		let mut status = self.status.borrow().clone();

		status.pending = self.tx.capacity() == 0;

		status
	}

	pub fn subscribe(&self) -> watch::Receiver<ReindexStatus> {
		self.status.clone()
	}
}
