use std::sync::Arc;

use sift_service::SiftService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<SiftService>,
}
impl AppState {
	/// Must be called inside a Tokio runtime, which starts the reindex worker.
	pub fn new(config: sift_config::Config) -> Self {
		Self { service: Arc::new(SiftService::new(config)) }
	}

	pub fn from_service(service: SiftService) -> Self {
		Self { service: Arc::new(service) }
	}
}
