use std::sync::Arc;

use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode},
};
use serde_json::{Map, Value, json};
use tempfile::TempDir;
use tower::util::ServiceExt;

use stash_api::{routes, state::AppState};
use stash_config::{AuthVerifier, Blobs, Config, Palette, Postgres, Service, Storage};
use stash_providers::identity::AuthUser;
use stash_service::{BoxFuture, IdentityProvider, StashService};
use stash_storage::{blobs::BlobStore, db::Db};
use stash_testkit::TestDatabase;

const ALICE_TOKEN: &str = "alice-token";
const BOB_TOKEN: &str = "bob-token";
const SIGNING_KEY: &str = "9f8e7d6c5b4a39281706f5e4d3c2b1a09f8e7d6c5b4a39281706f5e4d3c2b1a0";

/// Vouches for two fixed tokens without a live verifier.
struct StaticIdentity;

impl IdentityProvider for StaticIdentity {
	fn verify<'a>(
		&'a self,
		_cfg: &'a AuthVerifier,
		token: &'a str,
	) -> BoxFuture<'a, stash_providers::Result<Option<AuthUser>>> {
		let user = match token {
			ALICE_TOKEN => Some(AuthUser { id: "alice".to_string() }),
			BOB_TOKEN => Some(AuthUser { id: "bob".to_string() }),
			_ => None,
		};

		Box::pin(async move { Ok(user) })
	}
}

fn test_config(dsn: String, blob_root: String) -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			public_base: "http://gateway.test".to_string(),
			log_level: "info".to_string(),
		},
		storage: Storage {
			postgres: Postgres { dsn, pool_max_conns: 1 },
			blobs: Blobs {
				root: blob_root,
				signing_key: SIGNING_KEY.to_string(),
				signed_url_ttl_secs: 3_600,
			},
		},
		auth: AuthVerifier {
			api_base: "http://127.0.0.1:1".to_string(),
			path: "/auth/v1/user".to_string(),
			api_key: "test-key".to_string(),
			timeout_ms: 1_000,
			default_headers: Map::new(),
		},
		palette: Palette {
			gateway_base: "http://127.0.0.1:1".to_string(),
			debounce_ms: 300,
			group_limit: 5,
			request_timeout_ms: 1_000,
		},
	}
}

async fn test_env() -> Option<(TestDatabase, TempDir, Router)> {
	let base_dsn = match stash_testkit::env_dsn() {
		Some(value) => value,
		None => {
			eprintln!("Skipping HTTP tests; set STASH_PG_DSN to run this test.");

			return None;
		},
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let blob_root = TempDir::new().expect("Failed to create blob root.");
	let config =
		test_config(test_db.dsn().to_string(), blob_root.path().display().to_string());
	let db = Db::connect(&config.storage.postgres).await.expect("Failed to connect.");

	db.ensure_schema().await.expect("Failed to apply schema.");

	let blobs = BlobStore::new(&config.storage.blobs, &config.service.public_base)
		.expect("Failed to open blob store.");
	let service = StashService::with_identity(config, db, blobs, Arc::new(StaticIdentity));
	let app = routes::router(AppState::with_service(Arc::new(service)));

	Some((test_db, blob_root, app))
}

fn authed(method: &str, uri: &str, token: &str) -> axum::http::request::Builder {
	Request::builder()
		.method(method)
		.uri(uri)
		.header("authorization", format!("Bearer {token}"))
}

fn json_request(method: &str, uri: &str, token: &str, payload: &Value) -> Request<Body> {
	authed(method, uri, token)
		.header("content-type", "application/json")
		.body(Body::from(payload.to_string()))
		.expect("Failed to build request.")
}

async fn read_json(response: axum::response::Response) -> Value {
	let bytes = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");

	serde_json::from_slice(&bytes).expect("Failed to parse response.")
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set STASH_PG_DSN to run."]
async fn health_ok() {
	let Some((test_db, _blob_root, app)) = test_env().await else {
		return;
	};
	let response = app
		.oneshot(
			Request::builder()
				.uri("/health")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call /health.");

	assert_eq!(response.status(), StatusCode::OK);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set STASH_PG_DSN to run."]
async fn rejects_requests_without_a_bearer_token() {
	let Some((test_db, _blob_root, app)) = test_env().await else {
		return;
	};
	let response = app
		.oneshot(
			Request::builder()
				.uri("/links")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call /links.");

	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

	let body = read_json(response).await;

	assert_eq!(body["code"], "UNAUTHORIZED");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set STASH_PG_DSN to run."]
async fn rejects_unknown_tokens() {
	let Some((test_db, _blob_root, app)) = test_env().await else {
		return;
	};
	let response = app
		.oneshot(
			authed("GET", "/links", "stale-token")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call /links.");

	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set STASH_PG_DSN to run."]
async fn link_crud_round_trip() {
	let Some((test_db, _blob_root, app)) = test_env().await else {
		return;
	};
	let payload = json!({ "label": "GitHub", "url": "https://github.com", "icon": "🐙" });
	let response = app
		.clone()
		.oneshot(json_request("POST", "/links", ALICE_TOKEN, &payload))
		.await
		.expect("Failed to create link.");

	assert_eq!(response.status(), StatusCode::CREATED);

	let created = read_json(response).await;

	assert_eq!(created["data"]["label"], "GitHub");
	assert_eq!(created["data"]["category"], "general");

	let id = created["data"]["id"].as_str().expect("Missing link id.").to_string();
	let listed = read_json(
		app.clone()
			.oneshot(
				authed("GET", "/links", ALICE_TOKEN)
					.body(Body::empty())
					.expect("Failed to build request."),
			)
			.await
			.expect("Failed to list links."),
	)
	.await;

	assert_eq!(listed["data"].as_array().expect("Expected an array.").len(), 1);

	let update = json!({ "label": "GitHub profile" });
	let updated = read_json(
		app.clone()
			.oneshot(json_request("PUT", &format!("/links/{id}"), ALICE_TOKEN, &update))
			.await
			.expect("Failed to update link."),
	)
	.await;

	assert_eq!(updated["data"]["label"], "GitHub profile");
	assert_eq!(updated["data"]["url"], "https://github.com");

	let deleted = read_json(
		app.clone()
			.oneshot(
				authed("DELETE", &format!("/links/{id}"), ALICE_TOKEN)
					.body(Body::empty())
					.expect("Failed to build request."),
			)
			.await
			.expect("Failed to delete link."),
	)
	.await;

	assert_eq!(deleted["success"], true);

	let listed = read_json(
		app.oneshot(
			authed("GET", "/links", ALICE_TOKEN)
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to list links."),
	)
	.await;

	assert!(listed["data"].as_array().expect("Expected an array.").is_empty());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set STASH_PG_DSN to run."]
async fn rejects_a_link_with_an_invalid_url() {
	let Some((test_db, _blob_root, app)) = test_env().await else {
		return;
	};
	let payload = json!({ "label": "Broken", "url": "notaurl" });
	let response = app
		.oneshot(json_request("POST", "/links", ALICE_TOKEN, &payload))
		.await
		.expect("Failed to call create link.");

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let body = read_json(response).await;

	assert_eq!(body["code"], "VALIDATION_ERROR");
	assert_eq!(body["error"], "Must be a valid URL.");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set STASH_PG_DSN to run."]
async fn snippet_search_matches_title_or_body() {
	let Some((test_db, _blob_root, app)) = test_env().await else {
		return;
	};

	for (title, body) in [
		("Cover letter opener", "Dear hiring manager, ..."),
		("Thank-you note", "Thanks for taking the time to chat about the role."),
	] {
		let payload = json!({ "title": title, "body": body });
		let response = app
			.clone()
			.oneshot(json_request("POST", "/snippets", ALICE_TOKEN, &payload))
			.await
			.expect("Failed to create snippet.");

		assert_eq!(response.status(), StatusCode::CREATED);
	}

	let by_title = read_json(
		app.clone()
			.oneshot(
				authed("GET", "/snippets?search=cover", ALICE_TOKEN)
					.body(Body::empty())
					.expect("Failed to build request."),
			)
			.await
			.expect("Failed to search snippets."),
	)
	.await;

	assert_eq!(by_title["data"].as_array().expect("Expected an array.").len(), 1);
	assert_eq!(by_title["data"][0]["title"], "Cover letter opener");

	let by_body = read_json(
		app.oneshot(
			authed("GET", "/snippets?search=hiring", ALICE_TOKEN)
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to search snippets."),
	)
	.await;

	assert_eq!(by_body["data"].as_array().expect("Expected an array.").len(), 1);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set STASH_PG_DSN to run."]
async fn ownership_is_enforced_across_users() {
	let Some((test_db, _blob_root, app)) = test_env().await else {
		return;
	};
	let payload = json!({ "label": "Portfolio", "url": "https://example.com" });
	let created = read_json(
		app.clone()
			.oneshot(json_request("POST", "/links", ALICE_TOKEN, &payload))
			.await
			.expect("Failed to create link."),
	)
	.await;
	let id = created["data"]["id"].as_str().expect("Missing link id.").to_string();

	// Bob sees nothing and cannot touch Alice's rows.
	let listed = read_json(
		app.clone()
			.oneshot(
				authed("GET", "/links", BOB_TOKEN)
					.body(Body::empty())
					.expect("Failed to build request."),
			)
			.await
			.expect("Failed to list links."),
	)
	.await;

	assert!(listed["data"].as_array().expect("Expected an array.").is_empty());

	let update = json!({ "label": "Mine now" });
	let response = app
		.oneshot(json_request("PUT", &format!("/links/{id}"), BOB_TOKEN, &update))
		.await
		.expect("Failed to call update link.");

	assert_eq!(response.status(), StatusCode::NOT_FOUND);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

fn multipart_upload(label: &str, pdf: &[u8]) -> Request<Body> {
	let boundary = "stash-http-test-boundary";
	let mut body = Vec::new();

	body.extend_from_slice(
		format!(
			"--{boundary}\r\nContent-Disposition: form-data; name=\"label\"\r\n\r\n{label}\r\n"
		)
		.as_bytes(),
	);
	body.extend_from_slice(
		format!(
			"--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
			 filename=\"resume.pdf\"\r\nContent-Type: application/pdf\r\n\r\n"
		)
		.as_bytes(),
	);
	body.extend_from_slice(pdf);
	body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

	authed("POST", "/resumes", ALICE_TOKEN)
		.header("content-type", format!("multipart/form-data; boundary={boundary}"))
		.body(Body::from(body))
		.expect("Failed to build request.")
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set STASH_PG_DSN to run."]
async fn resume_upload_and_signed_url_round_trip() {
	let Some((test_db, _blob_root, app)) = test_env().await else {
		return;
	};
	let pdf = b"%PDF-1.4 test resume".to_vec();
	let response = app
		.clone()
		.oneshot(multipart_upload("Backend resume", &pdf))
		.await
		.expect("Failed to upload resume.");

	assert_eq!(response.status(), StatusCode::CREATED);

	let created = read_json(response).await;
	let id = created["data"]["id"].as_str().expect("Missing resume id.").to_string();
	let minted = read_json(
		app.clone()
			.oneshot(
				authed("GET", &format!("/resumes/{id}/url"), ALICE_TOKEN)
					.body(Body::empty())
					.expect("Failed to build request."),
			)
			.await
			.expect("Failed to mint signed URL."),
	)
	.await;
	let url = minted["url"].as_str().expect("Missing signed URL.");

	assert!(minted["expiresAt"].is_string());
	assert!(url.starts_with("http://gateway.test/blobs/alice/"));

	// The capability alone fetches the bytes; no bearer token on this request.
	let path_and_query = url.strip_prefix("http://gateway.test").expect("Unexpected URL base.");
	let served = app
		.clone()
		.oneshot(
			Request::builder()
				.uri(path_and_query)
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to fetch blob.");

	assert_eq!(served.status(), StatusCode::OK);
	assert_eq!(
		served.headers()["content-type"].to_str().expect("Missing content type."),
		"application/pdf"
	);

	let bytes = body::to_bytes(served.into_body(), usize::MAX)
		.await
		.expect("Failed to read blob body.");

	assert_eq!(bytes.as_ref(), pdf.as_slice());

	let deleted = read_json(
		app.clone()
			.oneshot(
				authed("DELETE", &format!("/resumes/{id}"), ALICE_TOKEN)
					.body(Body::empty())
					.expect("Failed to build request."),
			)
			.await
			.expect("Failed to delete resume."),
	)
	.await;

	assert_eq!(deleted["success"], true);

	let response = app
		.oneshot(
			authed("GET", &format!("/resumes/{id}/url"), ALICE_TOKEN)
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call signed URL route.");

	assert_eq!(response.status(), StatusCode::NOT_FOUND);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set STASH_PG_DSN to run."]
async fn resume_uploads_accept_the_full_size_limit() {
	let Some((test_db, _blob_root, app)) = test_env().await else {
		return;
	};

	// Well past the 2 MiB default request-body cap, still under the 5 MiB
	// file cap.
	let mut pdf = b"%PDF-1.4 ".to_vec();

	pdf.resize(3 * 1024 * 1024, b' ');

	let response = app
		.clone()
		.oneshot(multipart_upload("Big resume", &pdf))
		.await
		.expect("Failed to upload resume.");

	assert_eq!(response.status(), StatusCode::CREATED);

	let mut oversize = b"%PDF-1.4 ".to_vec();

	oversize.resize(5 * 1024 * 1024 + 1, b' ');

	let response = app
		.oneshot(multipart_upload("Too big", &oversize))
		.await
		.expect("Failed to call upload.");

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let body = read_json(response).await;

	assert_eq!(body["code"], "VALIDATION_ERROR");
	assert_eq!(body["error"], "File must be under 5MB.");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set STASH_PG_DSN to run."]
async fn rejects_a_resume_that_is_not_a_pdf() {
	let Some((test_db, _blob_root, app)) = test_env().await else {
		return;
	};
	let boundary = "stash-http-test-boundary";
	let body = format!(
		"--{boundary}\r\nContent-Disposition: form-data; name=\"label\"\r\n\r\nPlain \
		 text\r\n--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
		 filename=\"resume.txt\"\r\nContent-Type: text/plain\r\n\r\nnot a \
		 pdf\r\n--{boundary}--\r\n"
	);
	let response = app
		.oneshot(
			authed("POST", "/resumes", ALICE_TOKEN)
				.header("content-type", format!("multipart/form-data; boundary={boundary}"))
				.body(Body::from(body))
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call upload.");

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let body = read_json(response).await;

	assert_eq!(body["code"], "VALIDATION_ERROR");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set STASH_PG_DSN to run."]
async fn blob_route_rejects_a_forged_signature() {
	let Some((test_db, _blob_root, app)) = test_env().await else {
		return;
	};
	let pdf = b"%PDF-1.4 test resume".to_vec();
	let response = app
		.clone()
		.oneshot(multipart_upload("Backend resume", &pdf))
		.await
		.expect("Failed to upload resume.");

	assert_eq!(response.status(), StatusCode::CREATED);

	let created = read_json(response).await;
	let id = created["data"]["id"].as_str().expect("Missing resume id.").to_string();
	let minted = read_json(
		app.clone()
			.oneshot(
				authed("GET", &format!("/resumes/{id}/url"), ALICE_TOKEN)
					.body(Body::empty())
					.expect("Failed to build request."),
			)
			.await
			.expect("Failed to mint signed URL."),
	)
	.await;
	let url = minted["url"].as_str().expect("Missing signed URL.");
	let path_and_query = url.strip_prefix("http://gateway.test").expect("Unexpected URL base.");
	let (path, _query) = path_and_query.split_once('?').expect("Missing capability query.");
	let forged = format!("{path}?expires=9999999999&sig={}", "ab".repeat(32));
	let response = app
		.oneshot(
			Request::builder()
				.uri(forged)
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to fetch blob.");

	assert_eq!(response.status(), StatusCode::FORBIDDEN);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
