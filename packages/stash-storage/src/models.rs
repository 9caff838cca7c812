use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
pub struct LinkRow {
	pub link_id: Uuid,
	pub user_id: String,
	pub label: String,
	pub url: String,
	pub category: String,
	pub icon: Option<String>,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub struct SnippetRow {
	pub snippet_id: Uuid,
	pub user_id: String,
	pub title: String,
	pub body: String,
	pub tags: Vec<String>,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub struct ResumeRow {
	pub resume_id: Uuid,
	pub user_id: String,
	pub label: String,
	pub role_type: Option<String>,
	pub storage_path: String,
	pub created_at: OffsetDateTime,
}
