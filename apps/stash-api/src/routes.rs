use axum::{
	Json, Router,
	extract::{DefaultBodyLimit, Multipart, Path, Query, State},
	http::{HeaderMap, StatusCode, header},
	response::{IntoResponse, Response},
	routing::{delete, get, put},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stash_domain::{CreateLink, CreateSnippet, UpdateLink, UpdateSnippet, UploadResume};
use stash_providers::identity::AuthUser;
use stash_service::Error as ServiceError;

use crate::state::AppState;

// Room for multipart framing and metadata fields on top of the file cap.
const UPLOAD_BODY_LIMIT_BYTES: usize = stash_domain::MAX_RESUME_BYTES + 1024 * 1024;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/links", get(list_links).post(create_link))
		.route("/links/{id}", put(update_link).delete(delete_link))
		.route("/snippets", get(list_snippets).post(create_snippet))
		.route("/snippets/{id}", put(update_snippet).delete(delete_snippet))
		.route(
			"/resumes",
			get(list_resumes)
				.post(upload_resume)
				.layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT_BYTES)),
		)
		.route("/resumes/{id}", delete(delete_resume))
		.route("/resumes/{id}/url", get(resume_url))
		.route("/blobs/{user_id}/{file}", get(serve_blob))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

/// `{ "data": ... }`, the envelope every collection response wears.
#[derive(Debug, Serialize)]
struct Data<T> {
	data: T,
}

#[derive(Debug, Serialize)]
struct Deleted {
	success: bool,
}

async fn require_user(state: &AppState, headers: &HeaderMap) -> Result<AuthUser, ApiError> {
	let token = headers
		.get(header::AUTHORIZATION)
		.and_then(|value| value.to_str().ok())
		.and_then(|value| value.strip_prefix("Bearer "));
	let Some(token) = token else {
		return Err(ApiError::unauthorized());
	};

	Ok(state.service.authenticate(token).await?)
}

async fn list_links(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Response, ApiError> {
	let user = require_user(&state, &headers).await?;
	let links = state.service.list_links(&user.id).await?;

	Ok(Json(Data { data: links }).into_response())
}

async fn create_link(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(payload): Json<CreateLink>,
) -> Result<Response, ApiError> {
	let user = require_user(&state, &headers).await?;
	let link = state.service.create_link(&user.id, payload).await?;

	Ok((StatusCode::CREATED, Json(Data { data: link })).into_response())
}

async fn update_link(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
	headers: HeaderMap,
	Json(payload): Json<UpdateLink>,
) -> Result<Response, ApiError> {
	let user = require_user(&state, &headers).await?;
	let link = state.service.update_link(&user.id, id, payload).await?;

	Ok(Json(Data { data: link }).into_response())
}

async fn delete_link(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
	headers: HeaderMap,
) -> Result<Response, ApiError> {
	let user = require_user(&state, &headers).await?;

	state.service.delete_link(&user.id, id).await?;

	Ok(Json(Deleted { success: true }).into_response())
}

#[derive(Debug, Deserialize)]
struct SnippetSearch {
	search: Option<String>,
}

async fn list_snippets(
	State(state): State<AppState>,
	Query(query): Query<SnippetSearch>,
	headers: HeaderMap,
) -> Result<Response, ApiError> {
	let user = require_user(&state, &headers).await?;
	let snippets = state.service.list_snippets(&user.id, query.search.as_deref()).await?;

	Ok(Json(Data { data: snippets }).into_response())
}

async fn create_snippet(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(payload): Json<CreateSnippet>,
) -> Result<Response, ApiError> {
	let user = require_user(&state, &headers).await?;
	let snippet = state.service.create_snippet(&user.id, payload).await?;

	Ok((StatusCode::CREATED, Json(Data { data: snippet })).into_response())
}

async fn update_snippet(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
	headers: HeaderMap,
	Json(payload): Json<UpdateSnippet>,
) -> Result<Response, ApiError> {
	let user = require_user(&state, &headers).await?;
	let snippet = state.service.update_snippet(&user.id, id, payload).await?;

	Ok(Json(Data { data: snippet }).into_response())
}

async fn delete_snippet(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
	headers: HeaderMap,
) -> Result<Response, ApiError> {
	let user = require_user(&state, &headers).await?;

	state.service.delete_snippet(&user.id, id).await?;

	Ok(Json(Deleted { success: true }).into_response())
}

async fn list_resumes(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Response, ApiError> {
	let user = require_user(&state, &headers).await?;
	let resumes = state.service.list_resumes(&user.id).await?;

	Ok(Json(Data { data: resumes }).into_response())
}

async fn upload_resume(
	State(state): State<AppState>,
	headers: HeaderMap,
	mut multipart: Multipart,
) -> Result<Response, ApiError> {
	let user = require_user(&state, &headers).await?;
	let mut label = None;
	let mut role_type = None;
	let mut file: Option<(String, Vec<u8>)> = None;

	while let Some(field) = multipart.next_field().await.map_err(|_| ApiError::bad_multipart())? {
		match field.name() {
			Some("label") =>
				label = Some(field.text().await.map_err(|_| ApiError::bad_multipart())?),
			Some("role_type") => {
				let value = field.text().await.map_err(|_| ApiError::bad_multipart())?;

				role_type = (!value.trim().is_empty()).then_some(value);
			},
			Some("file") => {
				let content_type = field.content_type().unwrap_or_default().to_string();
				let bytes = field.bytes().await.map_err(|_| ApiError::bad_multipart())?;

				file = Some((content_type, bytes.to_vec()));
			},
			_ => {},
		}
	}

	let meta = UploadResume { label: label.unwrap_or_default(), role_type };
	let Some((content_type, bytes)) = file else {
		return Err(ApiError::validation("File is required."));
	};
	let resume = state.service.upload_resume(&user.id, meta, &content_type, &bytes).await?;

	Ok((StatusCode::CREATED, Json(Data { data: resume })).into_response())
}

async fn delete_resume(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
	headers: HeaderMap,
) -> Result<Response, ApiError> {
	let user = require_user(&state, &headers).await?;

	state.service.delete_resume(&user.id, id).await?;

	Ok(Json(Deleted { success: true }).into_response())
}

async fn resume_url(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
	headers: HeaderMap,
) -> Result<Response, ApiError> {
	let user = require_user(&state, &headers).await?;
	let url = state.service.resume_url(&user.id, id).await?;

	Ok(Json(url).into_response())
}

#[derive(Debug, Deserialize)]
struct BlobCapability {
	expires: i64,
	sig: String,
}

/// The signed-URL target: serves a blob to whoever presents a valid,
/// unexpired capability. No bearer auth here; the MAC is the authorization.
async fn serve_blob(
	State(state): State<AppState>,
	Path((user_id, file)): Path<(String, String)>,
	Query(capability): Query<BlobCapability>,
) -> Result<Response, ApiError> {
	let storage_path = format!("{user_id}/{file}");
	let blobs = &state.service.blobs;

	if !blobs.verify(
		&storage_path,
		capability.expires,
		&capability.sig,
		time::OffsetDateTime::now_utc(),
	) {
		return Err(ApiError::forbidden());
	}

	let bytes = blobs.read(&storage_path).await.map_err(ServiceError::from)?;

	Ok((
		StatusCode::OK,
		[(header::CONTENT_TYPE, stash_domain::ALLOWED_RESUME_CONTENT_TYPE)],
		bytes,
	)
		.into_response())
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error: String,
	code: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error: String,
	code: String,
}

impl ApiError {
	fn new(status: StatusCode, code: &str, error: impl Into<String>) -> Self {
		Self { status, error: error.into(), code: code.to_string() }
	}

	fn unauthorized() -> Self {
		Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Unauthorized")
	}

	fn forbidden() -> Self {
		Self::new(StatusCode::FORBIDDEN, "FORBIDDEN", "Invalid or expired link")
	}

	fn validation(message: impl Into<String>) -> Self {
		Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
	}

	fn bad_multipart() -> Self {
		Self::validation("Malformed multipart payload")
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::Unauthorized => Self::unauthorized(),
			ServiceError::Validation { message } => Self::validation(message),
			ServiceError::NotFound { .. } =>
				Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Not found"),
			ServiceError::Storage { message } => {
				tracing::error!(%message, "Database error.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "DB_ERROR", message)
			},
			ServiceError::Blob { message } => {
				tracing::error!(%message, "Blob store error.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", message)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error: self.error, code: self.code };

		(self.status, Json(body)).into_response()
	}
}
