//! Client-side login initiation: build the authorization URL and hand it to the launcher.

pub mod launch;

pub use launch::*;

// self
use crate::{
	_prelude::*,
	auth::{CredentialToken, LoginStyle, StateParam},
	error::ConfigError,
	flows::Goalify,
	http::ProviderHttpClient,
	oauth::TransportErrorMapper,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::ProviderConfig,
};

/// Scope requested from the provider for every login.
pub const LOGIN_SCOPE: &str = "profile";

/// Caller options for [`Goalify::begin_login`]. `LoginOptions::default()` uses the configured
/// style and the default popup size.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginOptions {
	/// Style override; wins over the configured style.
	pub login_style: Option<LoginStyle>,
	/// Popup dimensions override.
	pub popup: Option<PopupOptions>,
	/// Page to return to after a redirect-style login.
	pub redirect_url: Option<String>,
}
impl LoginOptions {
	/// Requests a specific login style.
	pub fn with_login_style(mut self, style: LoginStyle) -> Self {
		self.login_style = Some(style);

		self
	}

	/// Overrides the popup dimensions.
	pub fn with_popup(mut self, popup: PopupOptions) -> Self {
		self.popup = Some(popup);

		self
	}

	/// Sets the page to return to after a redirect-style login.
	pub fn with_redirect_url(mut self, redirect_url: impl Into<String>) -> Self {
		self.redirect_url = Some(redirect_url.into());

		self
	}
}

impl<C, M> Goalify<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Starts a login: builds the authorization URL and asks `launcher` to present it.
	///
	/// A missing configuration fails here, before the launcher is called. The returned
	/// [`PendingCredential`] resolves once the launcher reports through its completion handle.
	pub fn begin_login(
		&self,
		options: LoginOptions,
		launcher: &dyn LoginLauncher,
	) -> Result<PendingCredential> {
		const KIND: FlowKind = FlowKind::BeginLogin;

		let _span = FlowSpan::new(KIND, "authorize_url", &self.service).entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = self.prepare_launch(options);

		match result {
			Ok(launch) => {
				let (completion, pending) = credential_channel(launch.credential_token.clone());

				launcher.launch(launch, completion);
				obs::record_flow_outcome(KIND, FlowOutcome::Success);

				Ok(pending)
			},
			Err(e) => {
				obs::record_flow_failure(KIND, &e);

				Err(e)
			},
		}
	}

	fn prepare_launch(&self, options: LoginOptions) -> Result<LoginLaunch> {
		let config = self.configuration()?;
		let credential_token = CredentialToken::generate();
		let login_style = LoginStyle::resolve(options.login_style, config.login_style);
		let mut state = StateParam::new(login_style, credential_token.clone());

		if let Some(redirect_url) = &options.redirect_url {
			state = state.with_redirect_url(redirect_url.clone());
		}

		let login_url = authorization_url(&config, &state)?;

		Ok(LoginLaunch {
			login_service: self.service.clone(),
			login_url,
			login_style,
			credential_token,
			popup: options.popup.unwrap_or_default(),
			redirect_url: options.redirect_url,
		})
	}
}

/// Builds the authorization URL for `state`:
/// `response_type=code&client_id=..&scope=profile&redirect_uri=..&state=..`.
pub fn authorization_url(config: &ProviderConfig, state: &StateParam) -> Result<Url> {
	let encoded_state = state.encode().map_err(ConfigError::from)?;
	let mut url = config.endpoints.authorization.clone();
	let mut pairs = url.query_pairs_mut();

	pairs.append_pair("response_type", "code");
	pairs.append_pair("client_id", &config.client_id);
	pairs.append_pair("scope", LOGIN_SCOPE);
	pairs.append_pair("redirect_uri", config.redirect_uri.as_str());
	pairs.append_pair("state", &encoded_state);

	drop(pairs);

	Ok(url)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::provider::SealedSecret;

	#[test]
	fn authorization_url_lists_parameters_in_order() {
		let config = ProviderConfig::builder("abc", SealedSecret::plain("s3cret"))
			.redirect_uri(Url::parse("https://app.example/_oauth/goalify").expect("URL should parse."))
			.build()
			.expect("Configuration should build.");
		let state = StateParam::new(LoginStyle::Popup, CredentialToken::from_raw("tok"));
		let url = authorization_url(&config, &state).expect("Authorization URL should build.");
		let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
		let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();

		assert!(url.as_str().starts_with("https://api.goalify.plus/oauth/request/authorize?"));
		assert_eq!(keys, ["response_type", "client_id", "scope", "redirect_uri", "state"]);
		assert_eq!(pairs[0].1, "code");
		assert_eq!(pairs[1].1, "abc");
		assert_eq!(pairs[2].1, "profile");
		assert_eq!(pairs[3].1, "https://app.example/_oauth/goalify");
		assert!(url.as_str().contains("redirect_uri=https%3A%2F%2Fapp.example%2F_oauth%2Fgoalify"));
		assert_eq!(
			StateParam::decode(&pairs[4].1).expect("State should decode."),
			state
		);
	}
}
