use toml::Value;

use stash_config::{Config, Error};

const SAMPLE_CONFIG_TOML: &str = include_str!("fixtures/sample_config.toml");

fn sample_config() -> Config {
	toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.")
}

fn sample_with<F>(mutate: F) -> Config
where
	F: FnOnce(&mut toml::map::Map<String, Value>),
{
	let mut value: Value =
		toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.");
	let root = value.as_table_mut().expect("Sample config must be a table.");

	mutate(root);

	let raw = toml::to_string(&value).expect("Failed to render sample config.");

	toml::from_str(&raw).expect("Failed to parse mutated config.")
}

fn blobs_table(root: &mut toml::map::Map<String, Value>) -> &mut toml::map::Map<String, Value> {
	root.get_mut("storage")
		.and_then(Value::as_table_mut)
		.expect("Sample config must include [storage].")
		.get_mut("blobs")
		.and_then(Value::as_table_mut)
		.expect("Sample config must include [storage.blobs].")
}

fn palette_table(root: &mut toml::map::Map<String, Value>) -> &mut toml::map::Map<String, Value> {
	root.get_mut("palette")
		.and_then(Value::as_table_mut)
		.expect("Sample config must include [palette].")
}

#[test]
fn sample_config_is_valid() {
	assert!(stash_config::validate(&sample_config()).is_ok());
}

#[test]
fn rejects_non_hex_signing_key() {
	let cfg = sample_with(|root| {
		blobs_table(root)
			.insert("signing_key".to_string(), Value::String("not-hex".to_string()));
	});

	assert!(matches!(stash_config::validate(&cfg), Err(Error::Validation { .. })));
}

#[test]
fn rejects_short_signing_key() {
	let cfg = sample_with(|root| {
		blobs_table(root).insert("signing_key".to_string(), Value::String("deadbeef".to_string()));
	});

	assert!(stash_config::validate(&cfg).is_err());
}

#[test]
fn rejects_non_positive_signed_url_ttl() {
	let cfg = sample_with(|root| {
		blobs_table(root).insert("signed_url_ttl_secs".to_string(), Value::Integer(0));
	});

	assert!(stash_config::validate(&cfg).is_err());
}

#[test]
fn rejects_zero_debounce() {
	let cfg = sample_with(|root| {
		palette_table(root).insert("debounce_ms".to_string(), Value::Integer(0));
	});

	assert!(stash_config::validate(&cfg).is_err());
}

#[test]
fn rejects_zero_group_limit() {
	let cfg = sample_with(|root| {
		palette_table(root).insert("group_limit".to_string(), Value::Integer(0));
	});

	assert!(stash_config::validate(&cfg).is_err());
}

#[test]
fn rejects_empty_dsn() {
	let cfg = sample_with(|root| {
		root.get_mut("storage")
			.and_then(Value::as_table_mut)
			.expect("Sample config must include [storage].")
			.get_mut("postgres")
			.and_then(Value::as_table_mut)
			.expect("Sample config must include [storage.postgres].")
			.insert("dsn".to_string(), Value::String("  ".to_string()));
	});

	assert!(stash_config::validate(&cfg).is_err());
}

#[test]
fn palette_defaults_apply() {
	let cfg = sample_with(|root| {
		let palette = palette_table(root);

		palette.remove("debounce_ms");
		palette.remove("group_limit");
		palette.remove("request_timeout_ms");
	});

	assert_eq!(cfg.palette.debounce_ms, 300);
	assert_eq!(cfg.palette.group_limit, 5);
	assert_eq!(cfg.palette.request_timeout_ms, 10_000);
}
