//! Login style, credential tokens, and the `state` parameter that round-trips through the
//! provider's authorization redirect.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use rand::Rng;
// self
use crate::_prelude::*;

const CREDENTIAL_TOKEN_LEN: usize = 43;
const CREDENTIAL_TOKEN_ALPHABET: &[u8] =
	b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// How the authorization page is presented to the end user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginStyle {
	/// Authorization page opens in a popup window.
	#[default]
	Popup,
	/// The whole page redirects to the authorization page and back.
	Redirect,
}
impl LoginStyle {
	/// Resolves the effective style: an explicit request wins, then the configured style, then
	/// [`LoginStyle::Popup`].
	pub fn resolve(requested: Option<Self>, configured: Option<Self>) -> Self {
		requested.or(configured).unwrap_or_default()
	}

	/// Returns the wire label for the style.
	pub const fn as_str(self) -> &'static str {
		match self {
			LoginStyle::Popup => "popup",
			LoginStyle::Redirect => "redirect",
		}
	}
}
impl Display for LoginStyle {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Single-use nonce correlating one authorization launch with one callback.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialToken(String);
impl CredentialToken {
	/// Draws a fresh token from the thread-local CSPRNG.
	pub fn generate() -> Self {
		let mut rng = rand::rng();
		let alphabet = CREDENTIAL_TOKEN_ALPHABET;
		let token = (0..CREDENTIAL_TOKEN_LEN)
			.map(|_| char::from(alphabet[rng.random_range(0..alphabet.len())]))
			.collect();

		Self(token)
	}

	/// Wraps a token received from elsewhere (e.g. a decoded `state`).
	pub fn from_raw(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the token text.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for CredentialToken {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Display for CredentialToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Errors raised while encoding, decoding, or validating a `state` value.
#[derive(Debug, ThisError)]
pub enum StateParamError {
	/// The value is not valid base64.
	#[error("State parameter is not valid base64.")]
	Encoding(#[from] base64::DecodeError),
	/// The decoded value is not the expected JSON document.
	#[error("State parameter does not contain a valid login state.")]
	Json(#[from] serde_json::Error),
	/// The state belongs to another login attempt.
	#[error("State parameter does not match the pending credential request.")]
	Mismatch,
}

/// Decoded contents of the `state` query parameter.
///
/// Encoded as standard base64 over a camelCase JSON object so the callback page can recover the
/// login style and credential token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateParam {
	/// Style the login was launched with.
	pub login_style: LoginStyle,
	/// Correlation token for the pending credential request.
	pub credential_token: CredentialToken,
	/// Whether the login was launched from a native shell.
	#[serde(default)]
	pub is_cordova: bool,
	/// Page to return to after a redirect-style login.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub redirect_url: Option<String>,
}
impl StateParam {
	/// Creates a state for a fresh login attempt.
	pub fn new(login_style: LoginStyle, credential_token: CredentialToken) -> Self {
		Self { login_style, credential_token, is_cordova: false, redirect_url: None }
	}

	/// Sets the page to return to after a redirect-style login.
	pub fn with_redirect_url(mut self, redirect_url: impl Into<String>) -> Self {
		self.redirect_url = Some(redirect_url.into());

		self
	}

	/// Encodes the state for the `state` query parameter.
	pub fn encode(&self) -> Result<String, StateParamError> {
		Ok(STANDARD.encode(serde_json::to_vec(self)?))
	}

	/// Decodes a `state` query parameter.
	pub fn decode(value: &str) -> Result<Self, StateParamError> {
		let bytes = STANDARD.decode(value.trim())?;

		Ok(serde_json::from_slice(&bytes)?)
	}

	/// Confirms the state belongs to the credential request identified by `expected`.
	pub fn validate(&self, expected: &CredentialToken) -> Result<(), StateParamError> {
		if &self.credential_token == expected { Ok(()) } else { Err(StateParamError::Mismatch) }
	}
}
