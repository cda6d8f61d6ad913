//! Goalify provider configuration, its builder, and the stored document shape.

// self
use crate::{
	_prelude::*,
	auth::{IdentifierError, LoginStyle, ServiceName},
	provider::SealedSecret,
};

/// Public API host used when the configuration does not name one.
pub const DEFAULT_API_HOST: &str = "https://api.goalify.plus";
/// Redirect URI used when neither a redirect URI nor a site URL is configured.
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:3000/_oauth/goalify";

const AUTHORIZE_PATH: &str = "/oauth/request/authorize";
const TOKEN_PATH: &str = "/oauth/token";
const USERINFO_PATH: &str = "/api/userinfo";
const CALLBACK_PATH: &str = "/_oauth/goalify";

/// Editable field of the host's service configuration form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfigField {
	/// Stored property name.
	pub property: &'static str,
	/// Label shown next to the input.
	pub label: &'static str,
}

/// Errors raised while constructing or validating a provider configuration.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ProviderConfigError {
	/// Client identifier is required.
	#[error("Missing client id.")]
	MissingClientId,
	/// Service name is invalid.
	#[error(transparent)]
	InvalidService(#[from] IdentifierError),
	/// A configured URL could not be parsed.
	#[error("The {field} URL is invalid: {source}.")]
	InvalidUrl {
		/// Which URL failed to parse.
		field: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Provider endpoints must use HTTPS (loopback hosts excepted).
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
}

/// Fully resolved provider endpoints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderEndpoints {
	/// Browser-facing authorization endpoint.
	pub authorization: Url,
	/// Code exchange endpoint.
	pub token: Url,
	/// Account data endpoint.
	pub userinfo: Url,
}

/// Immutable provider configuration consumed by the login flows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderConfig {
	/// Service name the configuration is registered under.
	pub service: ServiceName,
	/// OAuth client identifier.
	pub client_id: String,
	/// Stored client secret; opened right before the code exchange.
	pub secret: SealedSecret,
	/// API host the authorization page lives on.
	pub api_host: Url,
	/// Resolved provider endpoints.
	pub endpoints: ProviderEndpoints,
	/// Redirect URI registered with the provider.
	pub redirect_uri: Url,
	/// Preferred login style, if the deployment pins one.
	pub login_style: Option<LoginStyle>,
}
impl ProviderConfig {
	/// Fields editable through the host's configuration form.
	pub const FIELDS: [ConfigField; 2] = [
		ConfigField { property: "clientId", label: "Client Id" },
		ConfigField { property: "secret", label: "Client Secret" },
	];

	/// Creates a builder for the provided client credentials.
	pub fn builder(client_id: impl Into<String>, secret: SealedSecret) -> ProviderConfigBuilder {
		ProviderConfigBuilder::new(client_id, secret)
	}

	/// Derives the callback URI for a deployment served from `site_url`.
	pub fn redirect_uri_for(site_url: &Url) -> Result<Url, ProviderConfigError> {
		join_path("redirect", site_url, CALLBACK_PATH)
	}
}

/// Builder for [`ProviderConfig`] values.
#[derive(Debug)]
pub struct ProviderConfigBuilder {
	service: ServiceName,
	client_id: String,
	secret: SealedSecret,
	api_host: Option<Url>,
	token_host: Option<Url>,
	userinfo_host: Option<Url>,
	redirect_uri: Option<Url>,
	site_url: Option<Url>,
	login_style: Option<LoginStyle>,
}
impl ProviderConfigBuilder {
	/// Creates a new builder for the Goalify service.
	pub fn new(client_id: impl Into<String>, secret: SealedSecret) -> Self {
		Self {
			service: ServiceName::goalify(),
			client_id: client_id.into(),
			secret,
			api_host: None,
			token_host: None,
			userinfo_host: None,
			redirect_uri: None,
			site_url: None,
			login_style: None,
		}
	}

	/// Registers the configuration under another service name.
	pub fn service(mut self, service: ServiceName) -> Self {
		self.service = service;

		self
	}

	/// Overrides the API host (defaults to [`DEFAULT_API_HOST`]).
	pub fn api_host(mut self, url: Url) -> Self {
		self.api_host = Some(url);

		self
	}

	/// Overrides the host serving the token endpoint (defaults to the API host).
	pub fn token_host(mut self, url: Url) -> Self {
		self.token_host = Some(url);

		self
	}

	/// Overrides the host serving the userinfo endpoint (defaults to the API host).
	pub fn userinfo_host(mut self, url: Url) -> Self {
		self.userinfo_host = Some(url);

		self
	}

	/// Sets the redirect URI explicitly.
	pub fn redirect_uri(mut self, url: Url) -> Self {
		self.redirect_uri = Some(url);

		self
	}

	/// Derives the redirect URI from the deployment's base URL unless one is set explicitly.
	pub fn site_url(mut self, url: Url) -> Self {
		self.site_url = Some(url);

		self
	}

	/// Pins the login style for this deployment.
	pub fn login_style(mut self, style: LoginStyle) -> Self {
		self.login_style = Some(style);

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ProviderConfig, ProviderConfigError> {
		if self.client_id.trim().is_empty() {
			return Err(ProviderConfigError::MissingClientId);
		}

		let api_host = match self.api_host {
			Some(url) => url,
			None => parse_url("api host", DEFAULT_API_HOST)?,
		};
		let token_host = self.token_host.unwrap_or_else(|| api_host.clone());
		let userinfo_host = self.userinfo_host.unwrap_or_else(|| api_host.clone());
		let endpoints = ProviderEndpoints {
			authorization: join_path("authorization", &api_host, AUTHORIZE_PATH)?,
			token: join_path("token", &token_host, TOKEN_PATH)?,
			userinfo: join_path("userinfo", &userinfo_host, USERINFO_PATH)?,
		};
		let redirect_uri = match (self.redirect_uri, self.site_url) {
			(Some(url), _) => url,
			(None, Some(site)) => ProviderConfig::redirect_uri_for(&site)?,
			(None, None) => parse_url("redirect", DEFAULT_REDIRECT_URI)?,
		};

		validate_endpoint("authorization", &endpoints.authorization)?;
		validate_endpoint("token", &endpoints.token)?;
		validate_endpoint("userinfo", &endpoints.userinfo)?;

		Ok(ProviderConfig {
			service: self.service,
			client_id: self.client_id,
			secret: self.secret,
			api_host,
			endpoints,
			redirect_uri,
			login_style: self.login_style,
		})
	}
}

/// Service configuration document as stored by the host's settings form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfigDocument {
	/// Service name the document belongs to.
	pub service: String,
	/// OAuth client identifier.
	pub client_id: String,
	/// Stored client secret.
	pub secret: SealedSecret,
	/// API host override.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub api_host: Option<String>,
	/// Token host override.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub token_host: Option<String>,
	/// Userinfo host override.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub userinfo_host: Option<String>,
	/// Redirect URI override.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub redirect_uri: Option<String>,
	/// Pinned login style.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub login_style: Option<LoginStyle>,
}
impl TryFrom<ProviderConfigDocument> for ProviderConfig {
	type Error = ProviderConfigError;

	fn try_from(doc: ProviderConfigDocument) -> Result<Self, Self::Error> {
		let mut builder =
			ProviderConfig::builder(doc.client_id, doc.secret).service(ServiceName::new(doc.service)?);

		if let Some(value) = doc.api_host {
			builder = builder.api_host(parse_url("api host", &value)?);
		}
		if let Some(value) = doc.token_host {
			builder = builder.token_host(parse_url("token host", &value)?);
		}
		if let Some(value) = doc.userinfo_host {
			builder = builder.userinfo_host(parse_url("userinfo host", &value)?);
		}
		if let Some(value) = doc.redirect_uri {
			builder = builder.redirect_uri(parse_url("redirect", &value)?);
		}
		if let Some(style) = doc.login_style {
			builder = builder.login_style(style);
		}

		builder.build()
	}
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, ProviderConfigError> {
	Url::parse(value).map_err(|source| ProviderConfigError::InvalidUrl { field, source })
}

// Appends `path` to the host verbatim so hosts mounted under a path prefix keep it.
fn join_path(field: &'static str, host: &Url, path: &str) -> Result<Url, ProviderConfigError> {
	let base = host.as_str().trim_end_matches('/');

	parse_url(field, &format!("{base}{path}"))
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ProviderConfigError> {
	let loopback = matches!(url.host_str(), Some("localhost" | "127.0.0.1" | "[::1]"));

	if url.scheme() == "https" || (url.scheme() == "http" && loopback) {
		Ok(())
	} else {
		Err(ProviderConfigError::InsecureEndpoint { endpoint: name, url: url.to_string() })
	}
}
