//! Login flow orchestrators powered by the [`Goalify`] service facade.

pub mod exchange;
pub mod login;

pub use exchange::*;
pub use login::*;

// self
use crate::{
	_prelude::*,
	auth::ServiceName,
	error::ConfigError,
	http::ProviderHttpClient,
	oauth::TransportErrorMapper,
	provider::{ProviderConfig, SecretOpener, ServiceConfigurations},
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

#[cfg(feature = "reqwest")]
/// Service specialized for the crate's default reqwest transport stack.
pub type ReqwestGoalify = Goalify<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Goalify login service registered with the host account framework.
///
/// The service owns every host capability it depends on: the HTTP transport, the transport
/// error mapper, the service configuration lookup, and the secret opener. Nothing is global, so
/// tests and multi-tenant hosts can run several instances side by side. Configuration is looked
/// up on every call, which lets the host edit the settings form without restarting.
pub struct Goalify<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Host lookup for the provider configuration.
	pub configurations: Arc<dyn ServiceConfigurations>,
	/// Opener applied to the stored client secret before each code exchange.
	pub secret_opener: Arc<dyn SecretOpener>,
	/// Service name the configuration is registered under.
	pub service: ServiceName,
}
impl<C, M> Goalify<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a service that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		configurations: Arc<dyn ServiceConfigurations>,
		secret_opener: Arc<dyn SecretOpener>,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			configurations,
			secret_opener,
			service: ServiceName::goalify(),
		}
	}

	/// Registers the service under another name (defaults to `goalify`).
	pub fn with_service(mut self, service: ServiceName) -> Self {
		self.service = service;

		self
	}

	/// Returns the current provider configuration or [`ConfigError::Missing`].
	pub fn configuration(&self) -> Result<ProviderConfig> {
		self.configurations
			.find(&self.service)
			.ok_or_else(|| ConfigError::Missing { service: self.service.to_string() }.into())
	}
}
#[cfg(feature = "reqwest")]
impl Goalify<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a service backed by its own reqwest transport.
	pub fn new(
		configurations: Arc<dyn ServiceConfigurations>,
		secret_opener: Arc<dyn SecretOpener>,
	) -> Self {
		Self::with_http_client(
			configurations,
			secret_opener,
			ReqwestHttpClient::default(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}
}
impl<C, M> Clone for Goalify<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			transport_mapper: self.transport_mapper.clone(),
			configurations: self.configurations.clone(),
			secret_opener: self.secret_opener.clone(),
			service: self.service.clone(),
		}
	}
}
impl<C, M> Debug for Goalify<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Goalify")
			.field("service", &self.service)
			.field("configured", &self.configurations.find(&self.service).is_some())
			.finish()
	}
}
