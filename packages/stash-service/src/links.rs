use stash_domain::{CreateLink, LinkRecord, UpdateLink};
use stash_storage::models::LinkRow;
use uuid::Uuid;

use crate::{Error, Result, StashService};

const DEFAULT_CATEGORY: &str = "general";

impl StashService {
	pub async fn list_links(&self, user_id: &str) -> Result<Vec<LinkRecord>> {
		let rows: Vec<LinkRow> = sqlx::query_as(
			"\
SELECT link_id, user_id, label, url, category, icon, created_at
FROM links
WHERE user_id = $1
ORDER BY created_at DESC",
		)
		.bind(user_id)
		.fetch_all(&self.db.pool)
		.await?;

		Ok(rows.into_iter().map(to_record).collect())
	}

	pub async fn create_link(&self, user_id: &str, input: CreateLink) -> Result<LinkRecord> {
		input.validate()?;

		let category = input.category.as_deref().unwrap_or(DEFAULT_CATEGORY);
		let row: LinkRow = sqlx::query_as(
			"\
INSERT INTO links (user_id, label, url, category, icon)
VALUES ($1, $2, $3, $4, $5)
RETURNING link_id, user_id, label, url, category, icon, created_at",
		)
		.bind(user_id)
		.bind(&input.label)
		.bind(&input.url)
		.bind(category)
		.bind(&input.icon)
		.fetch_one(&self.db.pool)
		.await?;

		Ok(to_record(row))
	}

	pub async fn update_link(
		&self,
		user_id: &str,
		link_id: Uuid,
		patch: UpdateLink,
	) -> Result<LinkRecord> {
		patch.validate()?;

		// A foreign row and an absent row look the same to the caller.
		let row: Option<LinkRow> = sqlx::query_as(
			"\
UPDATE links
SET label = COALESCE($3, label),
	url = COALESCE($4, url),
	category = COALESCE($5, category),
	icon = COALESCE($6, icon)
WHERE link_id = $1 AND user_id = $2
RETURNING link_id, user_id, label, url, category, icon, created_at",
		)
		.bind(link_id)
		.bind(user_id)
		.bind(&patch.label)
		.bind(&patch.url)
		.bind(&patch.category)
		.bind(&patch.icon)
		.fetch_optional(&self.db.pool)
		.await?;

		row.map(to_record).ok_or_else(|| Error::NotFound { message: "Link not found.".to_string() })
	}

	pub async fn delete_link(&self, user_id: &str, link_id: Uuid) -> Result<()> {
		let result = sqlx::query("DELETE FROM links WHERE link_id = $1 AND user_id = $2")
			.bind(link_id)
			.bind(user_id)
			.execute(&self.db.pool)
			.await?;

		if result.rows_affected() == 0 {
			return Err(Error::NotFound { message: "Link not found.".to_string() });
		}

		Ok(())
	}
}

fn to_record(row: LinkRow) -> LinkRecord {
	LinkRecord {
		id: row.link_id,
		label: row.label,
		url: row.url,
		category: row.category,
		icon: row.icon,
	}
}
