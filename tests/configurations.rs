// std
use std::{
	fs,
	path::PathBuf,
	sync::atomic::{AtomicUsize, Ordering},
};
// self
use goalify_oauth::{
	auth::{LoginStyle, TokenSecret},
	error::ConfigError,
	provider::{
		FileConfigurations, SealedSecret, SecretKey, SecretOpener, ServiceConfigurations,
	},
};

static NEXT_FILE: AtomicUsize = AtomicUsize::new(0);

fn temp_path(label: &str) -> PathBuf {
	let id = NEXT_FILE.fetch_add(1, Ordering::Relaxed);

	std::env::temp_dir()
		.join(format!("goalify-oauth-{label}-{}-{id}.json", std::process::id()))
}

#[test]
fn file_configurations_load_and_reload_documents() {
	let path = temp_path("load");

	fs::write(
		&path,
		r#"[{"service":"goalify","clientId":"abc","secret":"s3cret","apiHost":"https://api.dev.goalify.plus","loginStyle":"redirect"}]"#,
	)
	.expect("Fixture file should be written.");

	let configurations = FileConfigurations::open(&path).expect("Configurations should load.");
	let config = configurations.find("goalify").expect("Goalify should be configured.");

	assert_eq!(config.client_id, "abc");
	assert_eq!(config.login_style, Some(LoginStyle::Redirect));
	assert_eq!(config.endpoints.token.as_str(), "https://api.dev.goalify.plus/oauth/token");
	assert!(configurations.find("github").is_none());

	fs::write(&path, "[]").expect("Fixture file should be rewritten.");

	assert_eq!(configurations.reload().expect("Reload should succeed."), 0);
	assert!(configurations.find("goalify").is_none());

	let _ = fs::remove_file(&path);
}

#[test]
fn missing_or_empty_files_yield_no_configurations() {
	let missing = temp_path("missing");
	let configurations =
		FileConfigurations::open(&missing).expect("Missing files should load as empty.");

	assert!(configurations.find("goalify").is_none());
	assert_eq!(configurations.path(), missing.as_path());

	let empty = temp_path("empty");

	fs::write(&empty, "  \n").expect("Fixture file should be written.");

	assert!(FileConfigurations::open(&empty).is_ok());

	let _ = fs::remove_file(&empty);
}

#[test]
fn invalid_documents_are_rejected_on_load() {
	let garbage = temp_path("garbage");

	fs::write(&garbage, "{not json").expect("Fixture file should be written.");

	let err = FileConfigurations::open(&garbage).expect_err("Unparsable files should fail.");

	assert!(matches!(err, ConfigError::Load { .. }));

	let insecure = temp_path("insecure");

	fs::write(
		&insecure,
		r#"[{"service":"goalify","clientId":"abc","secret":"s3cret","apiHost":"http://api.example"}]"#,
	)
	.expect("Fixture file should be written.");

	let err = FileConfigurations::open(&insecure).expect_err("Insecure hosts should fail.");

	assert!(matches!(err, ConfigError::InvalidProvider(_)));

	let _ = fs::remove_file(&garbage);
	let _ = fs::remove_file(&insecure);
}

#[test]
fn encrypted_secrets_survive_the_configuration_file() {
	let key = SecretKey::from_base64("AAECAwQFBgcICQoLDA0ODw==").expect("Key should be valid.");
	let sealed = key.seal(&TokenSecret::new("s3cret")).expect("Sealing should succeed.");
	let document = serde_json::json!([{
		"service": "goalify",
		"clientId": "abc",
		"secret": sealed,
	}]);
	let path = temp_path("sealed");

	fs::write(&path, document.to_string()).expect("Fixture file should be written.");

	let configurations = FileConfigurations::open(&path).expect("Configurations should load.");
	let config = configurations.find("goalify").expect("Goalify should be configured.");

	assert!(matches!(config.secret, SealedSecret::Encrypted(_)));
	assert_eq!(key.open(&config.secret).expect("Secret should open.").expose(), "s3cret");

	let _ = fs::remove_file(&path);
}
