pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Unauthorized.")]
	Unauthorized,
	#[error("{message}")]
	Validation { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Blob store error: {message}")]
	Blob { message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<stash_domain::Error> for Error {
	fn from(err: stash_domain::Error) -> Self {
		match err {
			stash_domain::Error::Validation { message } => Self::Validation { message },
		}
	}
}

impl From<stash_storage::Error> for Error {
	fn from(err: stash_storage::Error) -> Self {
		match err {
			stash_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			stash_storage::Error::Blob(inner) => Self::Blob { message: inner.to_string() },
			stash_storage::Error::InvalidArgument(message) => Self::Blob { message },
			stash_storage::Error::NotFound(message) =>
				Self::NotFound { message },
		}
	}
}
