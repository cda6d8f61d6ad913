//! Login-level error types shared across flows, configuration, and transports.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Step of the login exchange that produced a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowStage {
	/// Authorization code to access token exchange.
	Handshake,
	/// Account data lookup with the fresh access token.
	AccountFetch,
}
impl FlowStage {
	/// Human-readable prefix identifying the failed step.
	pub const fn prefix(self) -> &'static str {
		match self {
			FlowStage::Handshake => "Failed to complete OAuth handshake with Goalify.",
			FlowStage::AccountFetch => "Failed to fetch account data from Goalify.",
		}
	}

	/// Stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowStage::Handshake => "code_exchange",
			FlowStage::AccountFetch => "identity_fetch",
		}
	}
}
impl Display for FlowStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.prefix())
	}
}

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem; the flow never starts.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Network-level failure reaching the provider.
	#[error("{stage} {source}")]
	Transport {
		/// Step that was running when the transport failed.
		stage: FlowStage,
		/// Underlying transport failure.
		#[source]
		source: TransportError,
	},
	/// Provider answered with a structured error or a failure status.
	#[error("{stage} {reason}")]
	ProviderRejected {
		/// Step that the provider rejected.
		stage: FlowStage,
		/// Provider-supplied error string (or the HTTP status when none was supplied).
		reason: String,
	},
	/// Provider answered successfully but the payload did not have the expected shape.
	#[error("{stage} Unexpected response: {reason}")]
	MalformedResponse {
		/// Step whose response was malformed.
		stage: FlowStage,
		/// Description of the missing or invalid data.
		reason: String,
	},
	/// Login launcher reported a failure before the provider callback arrived.
	#[error("Login launcher failed: {reason}.")]
	Launch {
		/// Launcher-supplied reason string.
		reason: String,
	},
	/// Login launcher dropped the completion handle without reporting a result.
	#[error("Login was abandoned before the credential request completed.")]
	LoginAborted,
}
impl Error {
	/// Returns the exchange step that failed, when the error came from a provider call.
	pub fn stage(&self) -> Option<FlowStage> {
		match self {
			Error::Transport { stage, .. }
			| Error::ProviderRejected { stage, .. }
			| Error::MalformedResponse { stage, .. } => Some(*stage),
			_ => None,
		}
	}

	pub(crate) fn transport(stage: FlowStage, source: impl Into<TransportError>) -> Self {
		Self::Transport { stage, source: source.into() }
	}

	pub(crate) fn malformed(stage: FlowStage, reason: impl Into<String>) -> Self {
		Self::MalformedResponse { stage, reason: reason.into() }
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// No provider configuration is registered for the service.
	#[error("Service `{service}` is not configured.")]
	Missing {
		/// Service name that was looked up.
		service: String,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Provider configuration is invalid.
	#[error(transparent)]
	InvalidProvider(#[from] crate::provider::ProviderConfigError),
	/// Stored client secret could not be opened.
	#[error(transparent)]
	Secret(#[from] crate::provider::SecretError),
	/// Login state could not be encoded.
	#[error(transparent)]
	State(#[from] crate::auth::StateParamError),
	/// Configuration documents could not be loaded.
	#[error("Failed to load service configurations from {path}: {message}.")]
	Load {
		/// Source path of the configuration documents.
		path: String,
		/// Human-readable error payload.
		message: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider: {source}.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
		/// HTTP status code, when one was received before the failure.
		status: Option<u16>,
	},
	/// Request did not complete before the client timeout elapsed.
	#[error("Request timed out while calling the provider.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider: {0}.")]
	Io(#[from] std::io::Error),
	/// Transport failed without a structured error.
	#[error("HTTP client error occurred while calling the provider: {message}.")]
	Other {
		/// Transport-supplied message.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src), status: None }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn stage_prefixes_lead_error_messages() {
		let rejected =
			Error::ProviderRejected { stage: FlowStage::Handshake, reason: "invalid_grant".into() };

		assert_eq!(
			rejected.to_string(),
			"Failed to complete OAuth handshake with Goalify. invalid_grant"
		);

		let transport = Error::transport(
			FlowStage::AccountFetch,
			TransportError::Other { message: "connection reset".into() },
		);

		assert!(transport.to_string().starts_with("Failed to fetch account data from Goalify."));
		assert!(transport.to_string().contains("connection reset"));
		assert_eq!(transport.stage(), Some(FlowStage::AccountFetch));
	}

	#[test]
	fn transport_errors_keep_their_source() {
		let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "peer hung up");
		let err = Error::transport(FlowStage::Handshake, io);
		let source = StdError::source(&err).expect("Transport error should expose its source.");

		assert!(source.to_string().contains("peer hung up"));
	}

	#[test]
	fn config_missing_has_no_stage() {
		let err: Error = ConfigError::Missing { service: "goalify".into() }.into();

		assert_eq!(err.stage(), None);
		assert_eq!(err.to_string(), "Service `goalify` is not configured.");
	}
}
