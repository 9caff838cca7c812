pub mod link;
pub mod matching;
pub mod resume;
pub mod snippet;

pub use link::{CreateLink, LinkRecord, UpdateLink};
pub use resume::{ALLOWED_RESUME_CONTENT_TYPE, MAX_RESUME_BYTES, ResumeRecord, UploadResume};
pub use snippet::{CreateSnippet, SnippetRecord, UpdateSnippet};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{message}")]
	Validation { message: String },
}

impl Error {
	pub fn validation(message: impl Into<String>) -> Self {
		Self::Validation { message: message.into() }
	}
}
