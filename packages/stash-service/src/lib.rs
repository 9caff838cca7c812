pub mod links;
pub mod resumes;
pub mod snippets;
pub mod time_serde;

mod error;

pub use error::{Error, Result};
pub use resumes::ResumeUrl;

use std::{future::Future, pin::Pin, sync::Arc};

use stash_config::Config;
use stash_providers::identity::{self, AuthUser};
use stash_storage::{blobs::BlobStore, db::Db};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Seam over the external identity verifier so tests can vouch for users
/// without a live auth service.
pub trait IdentityProvider
where
	Self: Send + Sync,
{
	fn verify<'a>(
		&'a self,
		cfg: &'a stash_config::AuthVerifier,
		token: &'a str,
	) -> BoxFuture<'a, stash_providers::Result<Option<AuthUser>>>;
}

struct DefaultIdentity;

impl IdentityProvider for DefaultIdentity {
	fn verify<'a>(
		&'a self,
		cfg: &'a stash_config::AuthVerifier,
		token: &'a str,
	) -> BoxFuture<'a, stash_providers::Result<Option<AuthUser>>> {
		Box::pin(identity::verify(cfg, token))
	}
}

pub struct StashService {
	pub cfg: Config,
	pub db: Db,
	pub blobs: BlobStore,
	pub identity: Arc<dyn IdentityProvider>,
}

impl StashService {
	pub fn new(cfg: Config, db: Db, blobs: BlobStore) -> Self {
		Self { cfg, db, blobs, identity: Arc::new(DefaultIdentity) }
	}

	pub fn with_identity(
		cfg: Config,
		db: Db,
		blobs: BlobStore,
		identity: Arc<dyn IdentityProvider>,
	) -> Self {
		Self { cfg, db, blobs, identity }
	}

	/// Exchange a bearer credential for the owning user. Any verifier outcome
	/// other than a positive match is an unauthorized request; transport
	/// failures are logged but not distinguished to the caller.
	pub async fn authenticate(&self, token: &str) -> Result<AuthUser> {
		match self.identity.verify(&self.cfg.auth, token).await {
			Ok(Some(user)) => Ok(user),
			Ok(None) => Err(Error::Unauthorized),
			Err(err) => {
				tracing::warn!(error = %err, "Identity verifier call failed.");

				Err(Error::Unauthorized)
			},
		}
	}
}
