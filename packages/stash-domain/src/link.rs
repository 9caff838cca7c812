use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

pub const MAX_LABEL_CHARS: usize = 100;
pub const MAX_CATEGORY_CHARS: usize = 50;
pub const MAX_ICON_CHARS: usize = 10;

/// A saved link as it travels over the wire.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LinkRecord {
	pub id: Uuid,
	pub label: String,
	pub url: String,
	pub category: String,
	pub icon: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateLink {
	pub label: String,
	pub url: String,
	#[serde(default)]
	pub category: Option<String>,
	#[serde(default)]
	pub icon: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateLink {
	#[serde(default)]
	pub label: Option<String>,
	#[serde(default)]
	pub url: Option<String>,
	#[serde(default)]
	pub category: Option<String>,
	#[serde(default)]
	pub icon: Option<String>,
}

impl CreateLink {
	pub fn validate(&self) -> Result<()> {
		validate_label(&self.label)?;
		validate_url(&self.url)?;

		if let Some(category) = self.category.as_deref() {
			validate_category(category)?;
		}
		if let Some(icon) = self.icon.as_deref() {
			validate_icon(icon)?;
		}

		Ok(())
	}
}

impl UpdateLink {
	pub fn validate(&self) -> Result<()> {
		if self.label.is_none()
			&& self.url.is_none()
			&& self.category.is_none()
			&& self.icon.is_none()
		{
			return Err(Error::validation("At least one field must be provided."));
		}
		if let Some(label) = self.label.as_deref() {
			validate_label(label)?;
		}
		if let Some(url) = self.url.as_deref() {
			validate_url(url)?;
		}
		if let Some(category) = self.category.as_deref() {
			validate_category(category)?;
		}
		if let Some(icon) = self.icon.as_deref() {
			validate_icon(icon)?;
		}

		Ok(())
	}
}

fn validate_label(label: &str) -> Result<()> {
	if label.trim().is_empty() {
		return Err(Error::validation("Label is required."));
	}
	if label.chars().count() > MAX_LABEL_CHARS {
		return Err(Error::validation("Label must be 100 characters or fewer."));
	}

	Ok(())
}

/// Accepts absolute http/https URLs only. A scheme plus a non-empty host is
/// the floor; anything after that is the link owner's business.
pub fn validate_url(url: &str) -> Result<()> {
	let rest = url
		.strip_prefix("https://")
		.or_else(|| url.strip_prefix("http://"))
		.ok_or_else(|| Error::validation("Must be a valid URL."))?;
	let host = rest.split(['/', '?', '#']).next().unwrap_or("");

	if host.is_empty() || url.chars().any(char::is_whitespace) {
		return Err(Error::validation("Must be a valid URL."));
	}

	Ok(())
}

fn validate_category(category: &str) -> Result<()> {
	if category.chars().count() > MAX_CATEGORY_CHARS {
		return Err(Error::validation("Category must be 50 characters or fewer."));
	}

	Ok(())
}

fn validate_icon(icon: &str) -> Result<()> {
	if icon.chars().count() > MAX_ICON_CHARS {
		return Err(Error::validation("Icon must be 10 characters or fewer."));
	}

	Ok(())
}
