//! Server-side login completion: exchange the authorization code, fetch the account, normalize.

pub mod query;

pub use query::*;

// self
use crate::{
	_prelude::*,
	auth::{self, Identity, LoginResult, TokenGrant},
	error::{ConfigError, FlowStage},
	flows::Goalify,
	http::ProviderHttpClient,
	oauth::{self, CodeExchangeForm, TransportErrorMapper},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::ProviderConfig,
};

const KIND: FlowKind = FlowKind::CompleteLogin;

impl<C, M> Goalify<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Callback entry point registered with the host: looks up the configuration and completes
	/// the login.
	///
	/// A missing configuration fails before any network call.
	pub async fn handle_oauth_request(&self, query: &CallbackQuery) -> Result<LoginResult> {
		let config = match self.configuration() {
			Ok(config) => config,
			Err(e) => {
				obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
				obs::record_flow_failure(KIND, &e);

				return Err(e);
			},
		};

		self.complete_login(&config, query).await
	}

	/// Exchanges the callback's authorization code and fetches the account it belongs to.
	///
	/// Makes at most two provider calls, in order, and never retries. Authorization codes are
	/// single use, so calling this twice with the same query fails on the second call.
	pub async fn complete_login(
		&self,
		config: &ProviderConfig,
		query: &CallbackQuery,
	) -> Result<LoginResult> {
		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = self.exchange_and_fetch(config, query).await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(e) => obs::record_flow_failure(KIND, e),
		}

		result
	}

	async fn exchange_and_fetch(
		&self,
		config: &ProviderConfig,
		query: &CallbackQuery,
	) -> Result<LoginResult> {
		let code = query.authorization_code()?;
		let grant = self.exchange_code(config, code).await?;
		let issued_at = OffsetDateTime::now_utc();

		obs::note_fixed_token_lifetime(grant.reported_expires_in);

		let identity = self.fetch_identity(config, &grant).await?;

		Ok(auth::normalize(grant, identity, issued_at))
	}

	async fn exchange_code(&self, config: &ProviderConfig, code: &str) -> Result<TokenGrant> {
		const STAGE: FlowStage = FlowStage::Handshake;

		let client_secret = self.secret_opener.open(&config.secret).map_err(ConfigError::from)?;
		let request = oauth::code_exchange_request(
			&config.endpoints.token,
			&CodeExchangeForm {
				code,
				client_id: &config.client_id,
				client_secret: &client_secret,
				redirect_uri: &config.redirect_uri,
			},
		)?;
		let span = FlowSpan::new(KIND, STAGE.as_str(), &config.service);

		span.instrument(async move {
			let response = oauth::dispatch(
				self.http_client.as_ref(),
				self.transport_mapper.as_ref(),
				STAGE,
				request,
			)
			.await?;

			oauth::parse_token_response(&response)
		})
		.await
	}

	async fn fetch_identity(&self, config: &ProviderConfig, grant: &TokenGrant) -> Result<Identity> {
		const STAGE: FlowStage = FlowStage::AccountFetch;

		let request = oauth::userinfo_request(&config.endpoints.userinfo, &grant.access_token)?;
		let span = FlowSpan::new(KIND, STAGE.as_str(), &config.service);

		span.instrument(async move {
			let response = oauth::dispatch(
				self.http_client.as_ref(),
				self.transport_mapper.as_ref(),
				STAGE,
				request,
			)
			.await?;

			oauth::parse_userinfo_response(&response)
		})
		.await
	}
}
