use stash_domain::{CreateSnippet, SnippetRecord, UpdateSnippet};
use stash_storage::models::SnippetRow;
use uuid::Uuid;

use crate::{Error, Result, StashService};

impl StashService {
	/// List the user's snippets, newest first, optionally narrowed to those
	/// whose title or body contains `search` (case-insensitive).
	pub async fn list_snippets(
		&self,
		user_id: &str,
		search: Option<&str>,
	) -> Result<Vec<SnippetRecord>> {
		let rows: Vec<SnippetRow> = match search.map(str::trim).filter(|s| !s.is_empty()) {
			Some(needle) => {
				let pattern = format!("%{}%", escape_like(needle));

				sqlx::query_as(
					"\
SELECT snippet_id, user_id, title, body, tags, created_at
FROM snippets
WHERE user_id = $1 AND (title ILIKE $2 ESCAPE '\\' OR body ILIKE $2 ESCAPE '\\')
ORDER BY created_at DESC",
				)
				.bind(user_id)
				.bind(pattern)
				.fetch_all(&self.db.pool)
				.await?
			},
			None =>
				sqlx::query_as(
					"\
SELECT snippet_id, user_id, title, body, tags, created_at
FROM snippets
WHERE user_id = $1
ORDER BY created_at DESC",
				)
				.bind(user_id)
				.fetch_all(&self.db.pool)
				.await?,
		};

		Ok(rows.into_iter().map(to_record).collect())
	}

	pub async fn create_snippet(
		&self,
		user_id: &str,
		input: CreateSnippet,
	) -> Result<SnippetRecord> {
		input.validate()?;

		let row: SnippetRow = sqlx::query_as(
			"\
INSERT INTO snippets (user_id, title, body, tags)
VALUES ($1, $2, $3, $4)
RETURNING snippet_id, user_id, title, body, tags, created_at",
		)
		.bind(user_id)
		.bind(&input.title)
		.bind(&input.body)
		.bind(&input.tags)
		.fetch_one(&self.db.pool)
		.await?;

		Ok(to_record(row))
	}

	pub async fn update_snippet(
		&self,
		user_id: &str,
		snippet_id: Uuid,
		patch: UpdateSnippet,
	) -> Result<SnippetRecord> {
		patch.validate()?;

		let row: Option<SnippetRow> = sqlx::query_as(
			"\
UPDATE snippets
SET title = COALESCE($3, title),
	body = COALESCE($4, body),
	tags = COALESCE($5, tags)
WHERE snippet_id = $1 AND user_id = $2
RETURNING snippet_id, user_id, title, body, tags, created_at",
		)
		.bind(snippet_id)
		.bind(user_id)
		.bind(&patch.title)
		.bind(&patch.body)
		.bind(&patch.tags)
		.fetch_optional(&self.db.pool)
		.await?;

		row.map(to_record)
			.ok_or_else(|| Error::NotFound { message: "Snippet not found.".to_string() })
	}

	pub async fn delete_snippet(&self, user_id: &str, snippet_id: Uuid) -> Result<()> {
		let result = sqlx::query("DELETE FROM snippets WHERE snippet_id = $1 AND user_id = $2")
			.bind(snippet_id)
			.bind(user_id)
			.execute(&self.db.pool)
			.await?;

		if result.rows_affected() == 0 {
			return Err(Error::NotFound { message: "Snippet not found.".to_string() });
		}

		Ok(())
	}
}

fn to_record(row: SnippetRow) -> SnippetRecord {
	SnippetRecord { id: row.snippet_id, title: row.title, body: row.body, tags: row.tags }
}

/// Escape LIKE wildcards so user text matches literally.
fn escape_like(needle: &str) -> String {
	let mut escaped = String::with_capacity(needle.len());

	for ch in needle.chars() {
		if matches!(ch, '%' | '_' | '\\') {
			escaped.push('\\');
		}

		escaped.push(ch);
	}

	escaped
}
