use serde::{Deserialize, Serialize};
use stash_domain::{ResumeRecord, UploadResume, resume::validate_resume_file};
use stash_storage::models::ResumeRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, Result, StashService};

/// A freshly minted, time-limited retrieval link for one resume file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResumeUrl {
	pub url: String,
	#[serde(rename = "expiresAt", with = "crate::time_serde")]
	pub expires_at: OffsetDateTime,
}

impl StashService {
	pub async fn list_resumes(&self, user_id: &str) -> Result<Vec<ResumeRecord>> {
		let rows: Vec<ResumeRow> = sqlx::query_as(
			"\
SELECT resume_id, user_id, label, role_type, storage_path, created_at
FROM resumes
WHERE user_id = $1
ORDER BY created_at DESC",
		)
		.bind(user_id)
		.fetch_all(&self.db.pool)
		.await?;

		Ok(rows.into_iter().map(to_record).collect())
	}

	pub async fn upload_resume(
		&self,
		user_id: &str,
		meta: UploadResume,
		content_type: &str,
		bytes: &[u8],
	) -> Result<ResumeRecord> {
		meta.validate()?;
		validate_resume_file(content_type, bytes.len())?;

		let storage_path = self.blobs.put(user_id, bytes).await?;
		let inserted: std::result::Result<ResumeRow, sqlx::Error> = sqlx::query_as(
			"\
INSERT INTO resumes (user_id, label, role_type, storage_path)
VALUES ($1, $2, $3, $4)
RETURNING resume_id, user_id, label, role_type, storage_path, created_at",
		)
		.bind(user_id)
		.bind(&meta.label)
		.bind(&meta.role_type)
		.bind(&storage_path)
		.fetch_one(&self.db.pool)
		.await;

		match inserted {
			Ok(row) => Ok(to_record(row)),
			Err(err) => {
				// The row is the source of truth; an orphaned blob is garbage.
				if let Err(remove_err) = self.blobs.remove(&storage_path).await {
					tracing::warn!(
						error = %remove_err,
						%storage_path,
						"Failed to remove blob after insert failure.",
					);
				}

				Err(err.into())
			},
		}
	}

	pub async fn delete_resume(&self, user_id: &str, resume_id: Uuid) -> Result<()> {
		let row = self.fetch_owned(user_id, resume_id).await?;

		if let Err(err) = self.blobs.remove(&row.storage_path).await
			&& !matches!(err, stash_storage::Error::NotFound(_))
		{
			return Err(err.into());
		}

		sqlx::query("DELETE FROM resumes WHERE resume_id = $1 AND user_id = $2")
			.bind(resume_id)
			.bind(user_id)
			.execute(&self.db.pool)
			.await?;

		Ok(())
	}

	/// Mint a fresh signed URL for one resume. Issued URLs expire; every
	/// retrieval must come back through here.
	pub async fn resume_url(&self, user_id: &str, resume_id: Uuid) -> Result<ResumeUrl> {
		let row = self.fetch_owned(user_id, resume_id).await?;
		let signed = self.blobs.signed_url(&row.storage_path, OffsetDateTime::now_utc())?;

		Ok(ResumeUrl { url: signed.url, expires_at: signed.expires_at })
	}

	async fn fetch_owned(&self, user_id: &str, resume_id: Uuid) -> Result<ResumeRow> {
		let row: Option<ResumeRow> = sqlx::query_as(
			"\
SELECT resume_id, user_id, label, role_type, storage_path, created_at
FROM resumes
WHERE resume_id = $1 AND user_id = $2",
		)
		.bind(resume_id)
		.bind(user_id)
		.fetch_optional(&self.db.pool)
		.await?;

		row.ok_or_else(|| Error::NotFound { message: "Resume not found.".to_string() })
	}
}

fn to_record(row: ResumeRow) -> ResumeRecord {
	ResumeRecord { id: row.resume_id, label: row.label, role_type: row.role_type }
}
