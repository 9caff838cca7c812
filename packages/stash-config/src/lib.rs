mod error;
mod types;

pub use error::{Error, Result};
pub use types::{AuthVerifier, Blobs, Config, Palette, Postgres, Service, Storage};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.public_base.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.public_base must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.storage.blobs.root.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.blobs.root must be non-empty.".to_string(),
		});
	}

	match hex::decode(&cfg.storage.blobs.signing_key) {
		Ok(key) if key.len() == 32 => {},
		_ => {
			return Err(Error::Validation {
				message: "storage.blobs.signing_key must be 32 bytes of hex.".to_string(),
			});
		},
	}

	if cfg.storage.blobs.signed_url_ttl_secs <= 0 {
		return Err(Error::Validation {
			message: "storage.blobs.signed_url_ttl_secs must be greater than zero.".to_string(),
		});
	}
	if cfg.auth.api_base.trim().is_empty() {
		return Err(Error::Validation {
			message: "auth.api_base must be non-empty.".to_string(),
		});
	}
	if cfg.auth.api_key.trim().is_empty() {
		return Err(Error::Validation { message: "auth.api_key must be non-empty.".to_string() });
	}
	if cfg.auth.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "auth.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.palette.gateway_base.trim().is_empty() {
		return Err(Error::Validation {
			message: "palette.gateway_base must be non-empty.".to_string(),
		});
	}
	if cfg.palette.debounce_ms == 0 {
		return Err(Error::Validation {
			message: "palette.debounce_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.palette.group_limit == 0 {
		return Err(Error::Validation {
			message: "palette.group_limit must be greater than zero.".to_string(),
		});
	}
	if cfg.palette.request_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "palette.request_timeout_ms must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	trim_trailing_slash(&mut cfg.service.public_base);
	trim_trailing_slash(&mut cfg.auth.api_base);
	trim_trailing_slash(&mut cfg.palette.gateway_base);
}

fn trim_trailing_slash(value: &mut String) {
	while value.ends_with('/') {
		value.pop();
	}
}
