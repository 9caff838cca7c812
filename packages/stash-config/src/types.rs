use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub auth: AuthVerifier,
	pub palette: Palette,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	/// Externally reachable base URL baked into signed URLs,
	/// e.g. "http://127.0.0.1:8315".
	pub public_base: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	pub blobs: Blobs,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Blobs {
	/// Directory resume files are stored under, one subdirectory per user.
	pub root: String,
	/// 32-byte hex key for the keyed blake3 MAC on signed URLs.
	pub signing_key: String,
	#[serde(default = "default_signed_url_ttl_secs")]
	pub signed_url_ttl_secs: i64,
}

/// The identity verifier endpoint a bearer credential is exchanged against.
#[derive(Debug, Deserialize)]
pub struct AuthVerifier {
	pub api_base: String,
	pub path: String,
	pub api_key: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Palette {
	pub gateway_base: String,
	#[serde(default = "default_debounce_ms")]
	pub debounce_ms: u64,
	#[serde(default = "default_group_limit")]
	pub group_limit: usize,
	#[serde(default = "default_request_timeout_ms")]
	pub request_timeout_ms: u64,
}

fn default_signed_url_ttl_secs() -> i64 {
	3_600
}

fn default_debounce_ms() -> u64 {
	300
}

fn default_group_limit() -> usize {
	5
}

fn default_request_timeout_ms() -> u64 {
	10_000
}
