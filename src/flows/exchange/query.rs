//! Query parameters delivered to the OAuth callback endpoint.

// self
use crate::{
	_prelude::*,
	auth::{StateParam, StateParamError},
	error::FlowStage,
	oauth,
};

/// Parameters the provider appends to the redirect URI.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackQuery {
	/// Authorization code to exchange.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub code: Option<String>,
	/// Encoded [`StateParam`].
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub state: Option<String>,
	/// Provider error code when the user denied access or the request was invalid.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
	/// Human-readable companion to `error`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error_description: Option<String>,
}
impl CallbackQuery {
	/// Creates a query carrying only an authorization code.
	pub fn new(code: impl Into<String>) -> Self {
		Self { code: Some(code.into()), ..Default::default() }
	}

	/// Attaches the raw `state` value.
	pub fn with_state(mut self, state: impl Into<String>) -> Self {
		self.state = Some(state.into());

		self
	}

	/// Parses a raw query string (with or without the leading `?`). Unknown keys are ignored and
	/// the first occurrence of a repeated key wins.
	pub fn parse(raw: &str) -> Self {
		let mut query = Self::default();

		for (key, value) in url::form_urlencoded::parse(raw.trim_start_matches('?').as_bytes()) {
			let slot = match key.as_ref() {
				"code" => &mut query.code,
				"state" => &mut query.state,
				"error" => &mut query.error,
				"error_description" => &mut query.error_description,
				_ => continue,
			};

			if slot.is_none() {
				*slot = Some(value.into_owned());
			}
		}

		query
	}

	/// Extracts the query from a full callback URL.
	pub fn from_url(url: &Url) -> Self {
		Self::parse(url.query().unwrap_or_default())
	}

	/// Decodes the `state` parameter, if one was sent.
	pub fn state_param(&self) -> Result<Option<StateParam>, StateParamError> {
		self.state.as_deref().map(StateParam::decode).transpose()
	}

	/// Returns the authorization code, rejecting callbacks that carry a provider error.
	pub fn authorization_code(&self) -> Result<&str> {
		const STAGE: FlowStage = FlowStage::Handshake;

		if let Some(error) = self.error.as_deref() {
			return Err(Error::ProviderRejected {
				stage: STAGE,
				reason: oauth::provider_error_reason(error, self.error_description.as_deref()),
			});
		}

		self.code
			.as_deref()
			.filter(|code| !code.is_empty())
			.ok_or_else(|| Error::malformed(STAGE, "callback is missing the authorization code"))
	}
}
