//! HTTP client for the Stash resource gateway, and the palette's production
//! [`SearchBackend`].

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use stash_domain::{LinkRecord, ResumeRecord, SnippetRecord};
use stash_palette::{BackendError, BoxFuture, SearchBackend};

/// Response envelope the gateway wraps every collection in.
#[derive(Debug, serde::Deserialize)]
struct DataEnvelope<T> {
	data: Vec<T>,
}

#[derive(Debug, serde::Deserialize)]
struct UrlEnvelope {
	url: String,
}

pub struct GatewayClient {
	base: String,
	token: Option<String>,
	client: Client,
}

impl GatewayClient {
	pub fn new(
		base: &str,
		token: Option<String>,
		timeout_ms: u64,
	) -> Result<Self, BackendError> {
		let client = Client::builder()
			.timeout(Duration::from_millis(timeout_ms))
			.build()
			.map_err(|err| BackendError::Transport { message: err.to_string() })?;

		Ok(Self {
			base: base.trim_end_matches('/').to_string(),
			token: token.filter(|token| !token.trim().is_empty()),
			client,
		})
	}

	async fn get_json<T>(&self, path_and_query: &str) -> Result<T, BackendError>
	where
		T: DeserializeOwned,
	{
		let Some(token) = self.token.as_deref() else {
			return Err(BackendError::Unauthorized);
		};
		let res = self
			.client
			.get(format!("{}{path_and_query}", self.base))
			.bearer_auth(token)
			.send()
			.await
			.map_err(|err| BackendError::Transport { message: err.to_string() })?;

		match res.status() {
			status if status.is_success() => res
				.json::<T>()
				.await
				.map_err(|err| BackendError::Transport { message: err.to_string() }),
			StatusCode::UNAUTHORIZED => Err(BackendError::Unauthorized),
			status => Err(BackendError::Status { status: status.as_u16() }),
		}
	}

	pub async fn links(&self) -> Result<Vec<LinkRecord>, BackendError> {
		Ok(self.get_json::<DataEnvelope<LinkRecord>>("/links").await?.data)
	}

	pub async fn snippets(&self, search: &str) -> Result<Vec<SnippetRecord>, BackendError> {
		let query = urlencoding::encode(search);

		Ok(self.get_json::<DataEnvelope<SnippetRecord>>(&format!("/snippets?search={query}")).await?.data)
	}

	pub async fn resumes(&self) -> Result<Vec<ResumeRecord>, BackendError> {
		Ok(self.get_json::<DataEnvelope<ResumeRecord>>("/resumes").await?.data)
	}

	pub async fn resume_url(&self, id: Uuid) -> Result<String, BackendError> {
		Ok(self.get_json::<UrlEnvelope>(&format!("/resumes/{id}/url")).await?.url)
	}
}

impl SearchBackend for GatewayClient {
	fn has_credential(&self) -> bool {
		self.token.is_some()
	}

	fn fetch_links(&self) -> BoxFuture<'_, Result<Vec<LinkRecord>, BackendError>> {
		Box::pin(self.links())
	}

	fn search_snippets<'a>(
		&'a self,
		query: &'a str,
	) -> BoxFuture<'a, Result<Vec<SnippetRecord>, BackendError>> {
		Box::pin(self.snippets(query))
	}

	fn fetch_resumes(&self) -> BoxFuture<'_, Result<Vec<ResumeRecord>, BackendError>> {
		Box::pin(self.resumes())
	}

	fn resume_url(&self, id: Uuid) -> BoxFuture<'_, Result<String, BackendError>> {
		Box::pin(GatewayClient::resume_url(self, id))
	}
}
