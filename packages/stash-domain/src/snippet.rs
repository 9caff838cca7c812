use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_BODY_CHARS: usize = 10_000;
pub const MAX_TAGS: usize = 10;
pub const MAX_TAG_CHARS: usize = 50;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SnippetRecord {
	pub id: Uuid,
	pub title: String,
	pub body: String,
	pub tags: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateSnippet {
	pub title: String,
	pub body: String,
	#[serde(default)]
	pub tags: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateSnippet {
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	pub body: Option<String>,
	#[serde(default)]
	pub tags: Option<Vec<String>>,
}

impl CreateSnippet {
	pub fn validate(&self) -> Result<()> {
		validate_title(&self.title)?;
		validate_body(&self.body)?;
		validate_tags(&self.tags)
	}
}

impl UpdateSnippet {
	pub fn validate(&self) -> Result<()> {
		if self.title.is_none() && self.body.is_none() && self.tags.is_none() {
			return Err(Error::validation("At least one field must be provided."));
		}
		if let Some(title) = self.title.as_deref() {
			validate_title(title)?;
		}
		if let Some(body) = self.body.as_deref() {
			validate_body(body)?;
		}
		if let Some(tags) = self.tags.as_deref() {
			validate_tags(tags)?;
		}

		Ok(())
	}
}

fn validate_title(title: &str) -> Result<()> {
	if title.trim().is_empty() {
		return Err(Error::validation("Title is required."));
	}
	if title.chars().count() > MAX_TITLE_CHARS {
		return Err(Error::validation("Title must be 200 characters or fewer."));
	}

	Ok(())
}

fn validate_body(body: &str) -> Result<()> {
	if body.trim().is_empty() {
		return Err(Error::validation("Body is required."));
	}
	if body.chars().count() > MAX_BODY_CHARS {
		return Err(Error::validation("Body must be 10000 characters or fewer."));
	}

	Ok(())
}

fn validate_tags(tags: &[String]) -> Result<()> {
	if tags.len() > MAX_TAGS {
		return Err(Error::validation("At most 10 tags are allowed."));
	}
	if tags.iter().any(|tag| tag.chars().count() > MAX_TAG_CHARS) {
		return Err(Error::validation("Tags must be 50 characters or fewer."));
	}

	Ok(())
}
