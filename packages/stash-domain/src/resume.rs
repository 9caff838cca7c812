use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

pub const MAX_LABEL_CHARS: usize = 100;
pub const MAX_ROLE_TYPE_CHARS: usize = 100;
pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;
pub const ALLOWED_RESUME_CONTENT_TYPE: &str = "application/pdf";

/// Resume metadata as served to clients. The storage path never leaves the
/// gateway; retrieval goes through a freshly minted signed URL.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResumeRecord {
	pub id: Uuid,
	pub label: String,
	pub role_type: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadResume {
	pub label: String,
	#[serde(default)]
	pub role_type: Option<String>,
}

impl UploadResume {
	pub fn validate(&self) -> Result<()> {
		if self.label.trim().is_empty() {
			return Err(Error::validation("Label is required."));
		}
		if self.label.chars().count() > MAX_LABEL_CHARS {
			return Err(Error::validation("Label must be 100 characters or fewer."));
		}
		if let Some(role_type) = self.role_type.as_deref()
			&& role_type.chars().count() > MAX_ROLE_TYPE_CHARS
		{
			return Err(Error::validation("Role type must be 100 characters or fewer."));
		}

		Ok(())
	}
}

pub fn validate_resume_file(content_type: &str, len: usize) -> Result<()> {
	if content_type != ALLOWED_RESUME_CONTENT_TYPE {
		return Err(Error::validation("Only PDF files are allowed."));
	}
	if len == 0 {
		return Err(Error::validation("File is required."));
	}
	if len > MAX_RESUME_BYTES {
		return Err(Error::validation("File must be under 5MB."));
	}

	Ok(())
}
