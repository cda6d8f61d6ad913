//! Goalify OAuth 2.0 login service: launch the authorization request, exchange the returned code,
//! and hand a normalized account record back to the host account framework.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod flows;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod provider;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		flows::Goalify,
		http::ReqwestHttpClient,
		oauth::ReqwestTransportErrorMapper,
		provider::{
			MemoryConfigurations, PlaintextOpener, ProviderConfig, SecretOpener,
			ServiceConfigurations,
		},
	};

	/// Goalify service alias used by reqwest-backed integration tests.
	pub type ReqwestTestGoalify = Goalify<ReqwestHttpClient, ReqwestTransportErrorMapper>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`Goalify`] service backed by an in-memory configuration registry holding
	/// `config`, a plaintext secret opener, and the reqwest transport used across integration
	/// tests.
	pub fn build_reqwest_test_goalify(
		config: ProviderConfig,
	) -> (ReqwestTestGoalify, Arc<MemoryConfigurations>) {
		let registry = Arc::new(MemoryConfigurations::default());

		registry.upsert(config);

		let configurations: Arc<dyn ServiceConfigurations> = registry.clone();
		let opener: Arc<dyn SecretOpener> = Arc::new(PlaintextOpener);
		let goalify = Goalify::with_http_client(
			configurations,
			opener,
			test_reqwest_http_client(),
			Arc::new(ReqwestTransportErrorMapper),
		);

		(goalify, registry)
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
