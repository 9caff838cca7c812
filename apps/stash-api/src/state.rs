use std::sync::Arc;

use stash_service::StashService;
use stash_storage::{blobs::BlobStore, db::Db};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<StashService>,
}
impl AppState {
	pub async fn new(config: stash_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let blobs = BlobStore::new(&config.storage.blobs, &config.service.public_base)?;
		let service = StashService::new(config, db, blobs);

		Ok(Self { service: Arc::new(service) })
	}

	pub fn with_service(service: Arc<StashService>) -> Self {
		Self { service }
	}
}
