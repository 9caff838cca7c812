use std::path::{Path, PathBuf};

use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, Result};

/// Filesystem-backed blob store for uploaded resume files.
///
/// Files live under `<root>/<user_id>/<uuid>.pdf` and are only reachable from
/// the outside through a signed URL: `<public_base>/blobs/<storage_path>`
/// carrying an expiry and a keyed blake3 MAC over `<storage_path>:<expires>`.
pub struct BlobStore {
	root: PathBuf,
	public_base: String,
	key: [u8; 32],
	ttl_secs: i64,
}

#[derive(Debug, Clone)]
pub struct SignedUrl {
	pub url: String,
	pub expires_at: OffsetDateTime,
}

impl BlobStore {
	pub fn new(cfg: &stash_config::Blobs, public_base: &str) -> Result<Self> {
		let decoded = hex::decode(&cfg.signing_key)
			.map_err(|_| Error::InvalidArgument("signing_key must be hex.".to_string()))?;
		let key: [u8; 32] = decoded
			.try_into()
			.map_err(|_| Error::InvalidArgument("signing_key must be 32 bytes.".to_string()))?;

		Ok(Self {
			root: PathBuf::from(&cfg.root),
			public_base: public_base.trim_end_matches('/').to_string(),
			key,
			ttl_secs: cfg.signed_url_ttl_secs,
		})
	}

	/// Store a new blob for `user_id`, returning its storage path.
	pub async fn put(&self, user_id: &str, bytes: &[u8]) -> Result<String> {
		validate_segment(user_id)?;

		let storage_path = format!("{user_id}/{}.pdf", Uuid::new_v4());
		let full = self.root.join(&storage_path);

		if let Some(parent) = full.parent() {
			tokio::fs::create_dir_all(parent).await?;
		}

		tokio::fs::write(&full, bytes).await?;

		Ok(storage_path)
	}

	pub async fn remove(&self, storage_path: &str) -> Result<()> {
		let full = self.resolve(storage_path)?;

		match tokio::fs::remove_file(&full).await {
			Ok(()) => Ok(()),
			Err(err) if err.kind() == std::io::ErrorKind::NotFound =>
				Err(Error::NotFound(storage_path.to_string())),
			Err(err) => Err(err.into()),
		}
	}

	pub async fn read(&self, storage_path: &str) -> Result<Vec<u8>> {
		let full = self.resolve(storage_path)?;

		match tokio::fs::read(&full).await {
			Ok(bytes) => Ok(bytes),
			Err(err) if err.kind() == std::io::ErrorKind::NotFound =>
				Err(Error::NotFound(storage_path.to_string())),
			Err(err) => Err(err.into()),
		}
	}

	/// Mint a fresh, time-limited URL for a blob. Every call produces a new
	/// expiry, so callers must not reuse previously issued URLs.
	pub fn signed_url(&self, storage_path: &str, now: OffsetDateTime) -> Result<SignedUrl> {
		validate_storage_path(storage_path)?;

		let expires_at = now + time::Duration::seconds(self.ttl_secs);
		let expires = expires_at.unix_timestamp();
		let sig = self.mac(storage_path, expires);

		Ok(SignedUrl {
			url: format!(
				"{}/blobs/{storage_path}?expires={expires}&sig={sig}",
				self.public_base
			),
			expires_at,
		})
	}

	/// Check a presented capability against the path it claims to grant.
	pub fn verify(
		&self,
		storage_path: &str,
		expires: i64,
		sig: &str,
		now: OffsetDateTime,
	) -> bool {
		if validate_storage_path(storage_path).is_err() {
			return false;
		}
		if now.unix_timestamp() > expires {
			return false;
		}

		let Ok(presented) = hex::decode(sig) else {
			return false;
		};
		let Ok(presented) = <[u8; 32]>::try_from(presented) else {
			return false;
		};
		let expected = blake3::keyed_hash(&self.key, mac_input(storage_path, expires).as_bytes());

		// blake3's comparison against raw bytes is constant-time.
		expected == presented
	}

	fn resolve(&self, storage_path: &str) -> Result<PathBuf> {
		validate_storage_path(storage_path)?;

		Ok(self.root.join(storage_path))
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	fn mac(&self, storage_path: &str, expires: i64) -> String {
		hex::encode(
			blake3::keyed_hash(&self.key, mac_input(storage_path, expires).as_bytes()).as_bytes(),
		)
	}
}

fn mac_input(storage_path: &str, expires: i64) -> String {
	format!("{storage_path}:{expires}")
}

fn validate_storage_path(storage_path: &str) -> Result<()> {
	let segments: Vec<&str> = storage_path.split('/').collect();

	if segments.len() != 2 {
		return Err(Error::InvalidArgument("Storage path must be user/file.".to_string()));
	}

	for segment in segments {
		validate_segment(segment)?;
	}

	Ok(())
}

fn validate_segment(segment: &str) -> Result<()> {
	if segment.is_empty()
		|| segment == "."
		|| segment == ".."
		|| segment.contains(['/', '\\', '\0'])
	{
		return Err(Error::InvalidArgument("Invalid storage path segment.".to_string()));
	}

	Ok(())
}
