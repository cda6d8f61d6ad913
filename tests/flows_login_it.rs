#![cfg(feature = "reqwest")]

// self
use goalify_oauth::{
	_preludet::*,
	auth::{LoginStyle, StateParam},
	error::ConfigError,
	flows::{CredentialCompletion, LoginLaunch, LoginLauncher, LoginOptions, PopupOptions},
	provider::{ProviderConfig, SealedSecret},
};

#[derive(Debug)]
enum LauncherBehavior {
	Succeed,
	Fail(&'static str),
	Drop,
	Hold,
}

#[derive(Debug)]
struct RecordingLauncher {
	behavior: LauncherBehavior,
	launches: Mutex<Vec<LoginLaunch>>,
	held: Mutex<Vec<CredentialCompletion>>,
}
impl RecordingLauncher {
	fn new(behavior: LauncherBehavior) -> Self {
		Self { behavior, launches: Mutex::new(Vec::new()), held: Mutex::new(Vec::new()) }
	}

	fn launches(&self) -> Vec<LoginLaunch> {
		self.launches.lock().clone()
	}
}
impl LoginLauncher for RecordingLauncher {
	fn launch(&self, launch: LoginLaunch, completion: CredentialCompletion) {
		self.launches.lock().push(launch);

		match self.behavior {
			LauncherBehavior::Succeed => completion.succeed(),
			LauncherBehavior::Fail(reason) => completion.fail(reason),
			LauncherBehavior::Drop => drop(completion),
			LauncherBehavior::Hold => self.held.lock().push(completion),
		}
	}
}

fn config(login_style: Option<LoginStyle>) -> ProviderConfig {
	let mut builder = ProviderConfig::builder("abc", SealedSecret::plain("s3cret"))
		.site_url(Url::parse("https://app.example/").expect("Site URL should parse."));

	if let Some(style) = login_style {
		builder = builder.login_style(style);
	}

	builder.build().expect("Provider configuration should build.")
}

#[tokio::test]
async fn begin_login_launches_authorization_url_and_resolves_token() {
	let (goalify, _) = build_reqwest_test_goalify(config(None));
	let launcher = RecordingLauncher::new(LauncherBehavior::Succeed);
	let pending = goalify
		.begin_login(LoginOptions::default(), &launcher)
		.expect("Login should start.");
	let expected_token = pending.credential_token().clone();
	let token = pending.await.expect("Launcher success should resolve the credential.");

	assert_eq!(token, expected_token);

	let launches = launcher.launches();

	assert_eq!(launches.len(), 1);

	let launch = &launches[0];
	let pairs: HashMap<_, _> = launch.login_url.query_pairs().into_owned().collect();

	assert_eq!(launch.login_service.as_ref(), "goalify");
	assert_eq!(launch.login_style, LoginStyle::Popup);
	assert_eq!(launch.popup, PopupOptions { width: None, height: 600 });
	assert_eq!(launch.credential_token, token);
	assert_eq!(launch.login_url.path(), "/oauth/request/authorize");
	assert_eq!(pairs.get("response_type").map(String::as_str), Some("code"));
	assert_eq!(pairs.get("client_id").map(String::as_str), Some("abc"));
	assert_eq!(pairs.get("scope").map(String::as_str), Some("profile"));
	assert_eq!(
		pairs.get("redirect_uri").map(String::as_str),
		Some("https://app.example/_oauth/goalify")
	);

	let state = StateParam::decode(pairs.get("state").expect("State should be present."))
		.expect("State should decode.");

	assert!(state.validate(&token).is_ok());
	assert_eq!(state.login_style, LoginStyle::Popup);
}

#[tokio::test]
async fn explicit_style_wins_over_configured_style() {
	let (goalify, _) = build_reqwest_test_goalify(config(Some(LoginStyle::Redirect)));
	let launcher = RecordingLauncher::new(LauncherBehavior::Succeed);

	goalify
		.begin_login(LoginOptions::default(), &launcher)
		.expect("Login should start.")
		.await
		.expect("Login should resolve.");
	goalify
		.begin_login(
			LoginOptions::default()
				.with_login_style(LoginStyle::Popup)
				.with_popup(PopupOptions { width: Some(480), height: 720 })
				.with_redirect_url("https://app.example/after"),
			&launcher,
		)
		.expect("Login should start.")
		.await
		.expect("Login should resolve.");

	let launches = launcher.launches();

	assert_eq!(launches[0].login_style, LoginStyle::Redirect);
	assert_eq!(launches[1].login_style, LoginStyle::Popup);
	assert_eq!(launches[1].popup.height, 720);
	assert_eq!(launches[1].redirect_url.as_deref(), Some("https://app.example/after"));
}

#[tokio::test]
async fn every_login_draws_a_fresh_credential_token() {
	let (goalify, _) = build_reqwest_test_goalify(config(None));
	let launcher = RecordingLauncher::new(LauncherBehavior::Hold);
	let first = goalify.begin_login(LoginOptions::default(), &launcher).expect("Login should start.");
	let second =
		goalify.begin_login(LoginOptions::default(), &launcher).expect("Login should start.");

	assert_ne!(first.credential_token(), second.credential_token());
	assert_ne!(launcher.launches()[0].login_url, launcher.launches()[1].login_url);
}

#[test]
fn missing_configuration_fails_before_launch() {
	let (goalify, registry) = build_reqwest_test_goalify(config(None));
	let launcher = RecordingLauncher::new(LauncherBehavior::Succeed);

	registry.remove("goalify");

	let err = goalify
		.begin_login(LoginOptions::default(), &launcher)
		.expect_err("Unconfigured services should fail synchronously.");

	assert!(matches!(
		err,
		Error::Config(ConfigError::Missing { ref service }) if service == "goalify"
	));
	assert!(launcher.launches().is_empty());
}

#[tokio::test]
async fn launcher_failure_and_abandonment_surface_as_errors() {
	let (goalify, _) = build_reqwest_test_goalify(config(None));
	let failing = RecordingLauncher::new(LauncherBehavior::Fail("popup blocked"));
	let err = goalify
		.begin_login(LoginOptions::default(), &failing)
		.expect("Login should start.")
		.await
		.expect_err("Launcher failure should resolve with an error.");

	assert!(matches!(err, Error::Launch { .. }));
	assert!(err.to_string().contains("popup blocked"));

	let dropping = RecordingLauncher::new(LauncherBehavior::Drop);
	let err = goalify
		.begin_login(LoginOptions::default(), &dropping)
		.expect("Login should start.")
		.await
		.expect_err("Dropped completions should resolve with an error.");

	assert!(matches!(err, Error::LoginAborted));
}
