use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::{Error, Result};

/// A user identity the verifier vouched for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
	pub id: String,
}

/// Exchange a bearer credential for a stable user id.
///
/// `Ok(None)` means the verifier rejected the credential; transport failures
/// and malformed responses are errors so callers can distinguish "not you"
/// from "verifier is down".
pub async fn verify(
	cfg: &stash_config::AuthVerifier,
	token: &str,
) -> Result<Option<AuthUser>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let mut headers = crate::auth_headers(token, &cfg.default_headers)?;

	headers.insert("apikey", cfg.api_key.parse()?);

	let res = client.get(url).headers(headers).send().await?;

	if matches!(res.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
		return Ok(None);
	}

	let json: Value = res.error_for_status()?.json().await?;

	parse_identity_response(json).map(Some)
}

fn parse_identity_response(json: Value) -> Result<AuthUser> {
	let id = json
		.get("id")
		.and_then(|v| v.as_str())
		.filter(|id| !id.trim().is_empty())
		.ok_or_else(|| Error::InvalidResponse {
			message: "Identity response is missing a user id.".to_string(),
		})?;

	Ok(AuthUser { id: id.to_string() })
}
