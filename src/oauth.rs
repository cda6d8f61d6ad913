//! Wire-level requests and response classification for the Goalify token and userinfo endpoints.
//!
//! Responses are classified body first: a structured `error` field wins regardless of the HTTP
//! status, a failure status without one is a rejection, and a successful status whose payload
//! lacks the expected fields is malformed.
//!
//! Only a present, non-empty `error` counts as a rejection. `null`, `false`, `0`, and `""` are
//! treated as absent. A non-string `error` value still rejects the exchange, with its JSON text
//! as the reason.

pub use oauth2;

// crates.io
use oauth2::{
	AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
	http::{
		Method, Request, StatusCode,
		header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
	},
};
use url::form_urlencoded::Serializer;
// self
use crate::{
	_prelude::*,
	auth::{Identity, TokenGrant, TokenSecret},
	error::{ConfigError, FlowStage, TransportError},
	http::{ProviderHttpClient, ResponseMetadata, ResponseMetadataSlot},
};

const MIME_JSON: &str = "application/json";
const MIME_FORM: &str = "application/x-www-form-urlencoded";

/// Maps HTTP transport failures into crate [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a crate error.
	fn map_transport_error(
		&self,
		stage: FlowStage,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		stage: FlowStage,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(stage, meta, *inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => Error::transport(stage, inner),
			HttpClientError::Other(message) =>
				Error::transport(stage, TransportError::Other { message }),
			_ => Error::transport(stage, TransportError::Other {
				message: "unrecognized HTTP client failure".into(),
			}),
		}
	}
}

/// Form parameters sent to the token endpoint for an authorization code exchange.
pub(crate) struct CodeExchangeForm<'a> {
	pub(crate) code: &'a str,
	pub(crate) client_id: &'a str,
	pub(crate) client_secret: &'a TokenSecret,
	pub(crate) redirect_uri: &'a Url,
}

#[derive(Deserialize)]
struct TokenEndpointBody {
	#[serde(default)]
	access_token: Option<String>,
	#[serde(default)]
	refresh_token: Option<String>,
	#[serde(default)]
	expires_in: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct ProviderErrorBody {
	#[serde(default)]
	error: Option<serde_json::Value>,
	#[serde(default)]
	error_description: Option<serde_json::Value>,
}
impl ProviderErrorBody {
	fn reason(&self) -> Option<String> {
		let error = match self.error.as_ref()? {
			serde_json::Value::Null | serde_json::Value::Bool(false) => return None,
			serde_json::Value::String(code) if code.is_empty() => return None,
			serde_json::Value::Number(number) if number.as_f64() == Some(0.0) => return None,
			serde_json::Value::String(code) => code.clone(),
			other => other.to_string(),
		};
		let description = self.error_description.as_ref().and_then(serde_json::Value::as_str);

		Some(provider_error_reason(&error, description))
	}
}

/// Builds the `POST {token}/oauth/token` request.
pub(crate) fn code_exchange_request(
	endpoint: &Url,
	form: &CodeExchangeForm,
) -> Result<HttpRequest> {
	let body = Serializer::new(String::new())
		.append_pair("code", form.code)
		.append_pair("client_id", form.client_id)
		.append_pair("client_secret", form.client_secret.expose())
		.append_pair("grant_type", "authorization_code")
		.append_pair("redirect_uri", form.redirect_uri.as_str())
		.finish();

	Request::builder()
		.method(Method::POST)
		.uri(endpoint.as_str())
		.header(CONTENT_TYPE, MIME_FORM)
		.header(ACCEPT, MIME_JSON)
		.body(body.into_bytes())
		.map_err(|e| ConfigError::from(e).into())
}

/// Builds the `GET {api}/api/userinfo` request authorized with the fresh access token.
pub(crate) fn userinfo_request(endpoint: &Url, access_token: &TokenSecret) -> Result<HttpRequest> {
	Request::builder()
		.method(Method::GET)
		.uri(endpoint.as_str())
		.header(AUTHORIZATION, format!("JWT {}", access_token.expose()))
		.header(ACCEPT, MIME_JSON)
		.body(Vec::new())
		.map_err(|e| ConfigError::from(e).into())
}

/// Dispatches a single request, translating transport failures for the given stage.
pub(crate) async fn dispatch<C, M>(
	http_client: &C,
	mapper: &M,
	stage: FlowStage,
	request: HttpRequest,
) -> Result<HttpResponse>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	let slot = ResponseMetadataSlot::default();
	let handle = http_client.with_metadata(slot.clone());

	handle
		.call(request)
		.await
		.map_err(|err| mapper.map_transport_error(stage, slot.take().as_ref(), err))
}

/// Interprets the token endpoint response.
pub(crate) fn parse_token_response(response: &HttpResponse) -> Result<TokenGrant> {
	const STAGE: FlowStage = FlowStage::Handshake;

	if let Some(reason) =
		parse_json::<ProviderErrorBody>(response.body()).ok().and_then(|body| body.reason())
	{
		return Err(Error::ProviderRejected { stage: STAGE, reason });
	}

	ensure_success(STAGE, "Token", response.status())?;

	let body = parse_json::<TokenEndpointBody>(response.body())
		.map_err(|e| Error::malformed(STAGE, e.to_string()))?;
	let access_token = body
		.access_token
		.filter(|token| !token.is_empty())
		.ok_or_else(|| Error::malformed(STAGE, "token response is missing access_token"))?;

	Ok(TokenGrant {
		access_token: TokenSecret::new(access_token),
		refresh_token: body.refresh_token.filter(|token| !token.is_empty()).map(TokenSecret::new),
		reported_expires_in: body.expires_in.as_ref().and_then(expires_in_seconds),
	})
}

/// Interprets the userinfo endpoint response.
pub(crate) fn parse_userinfo_response(response: &HttpResponse) -> Result<Identity> {
	const STAGE: FlowStage = FlowStage::AccountFetch;

	ensure_success(STAGE, "Userinfo", response.status())?;

	parse_json::<Identity>(response.body()).map_err(|e| Error::malformed(STAGE, e.to_string()))
}

/// Formats a provider `error` code, appending its description when one was sent.
pub(crate) fn provider_error_reason(error: &str, description: Option<&str>) -> String {
	match description.filter(|value| !value.is_empty()) {
		Some(description) => format!("{error}: {description}"),
		None => error.to_owned(),
	}
}

fn parse_json<T>(bytes: &[u8]) -> Result<T, serde_path_to_error::Error<serde_json::Error>>
where
	T: for<'de> Deserialize<'de>,
{
	let mut deserializer = serde_json::Deserializer::from_slice(bytes);

	serde_path_to_error::deserialize(&mut deserializer)
}

fn ensure_success(stage: FlowStage, endpoint: &str, status: StatusCode) -> Result<()> {
	if status.is_success() {
		Ok(())
	} else {
		Err(Error::ProviderRejected {
			stage,
			reason: format!("{endpoint} endpoint responded with HTTP {status}."),
		})
	}
}

fn expires_in_seconds(value: &serde_json::Value) -> Option<i64> {
	match value {
		serde_json::Value::Number(number) => number.as_i64(),
		serde_json::Value::String(text) => text.trim().parse().ok(),
		_ => None,
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(
	stage: FlowStage,
	meta: Option<&ResponseMetadata>,
	err: ReqwestError,
) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return Error::transport(stage, TransportError::timeout(err));
	}

	let status = meta.and_then(|value| value.status).or_else(|| err.status().map(|s| s.as_u16()));

	Error::transport(stage, TransportError::Network { source: Box::new(err), status })
}
