//! Token endpoint result and the fixed lifetime policy applied to it.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Lifetime assigned to every access token, whatever `expires_in` the provider reports.
pub const FIXED_TOKEN_LIFETIME: Duration = Duration::seconds(600);

/// Tokens returned by a successful authorization code exchange.
///
/// The grant is ephemeral; it only lives until it is normalized into a
/// [`ServiceAccountRecord`](crate::auth::ServiceAccountRecord).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenGrant {
	/// Access token used for the userinfo call.
	pub access_token: TokenSecret,
	/// Refresh token, if the provider issued one.
	pub refresh_token: Option<TokenSecret>,
	/// `expires_in` as reported by the provider. Kept for diagnostics only.
	pub reported_expires_in: Option<i64>,
}
impl TokenGrant {
	/// Creates a grant carrying only an access token.
	pub fn new(access_token: impl Into<String>) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			refresh_token: None,
			reported_expires_in: None,
		}
	}

	/// Attaches a refresh token.
	pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
		self.refresh_token = Some(TokenSecret::new(refresh_token));

		self
	}

	/// Expiry instant for a grant normalized at `issued_at`.
	pub fn expires_at(&self, issued_at: OffsetDateTime) -> OffsetDateTime {
		issued_at + FIXED_TOKEN_LIFETIME
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn expiry_ignores_reported_lifetime() {
		let issued_at = time::macros::datetime!(2026-01-01 00:00 UTC);
		let mut grant = TokenGrant::new("tok");

		grant.reported_expires_in = Some(86_400);

		assert_eq!(grant.expires_at(issued_at) - issued_at, Duration::seconds(600));
	}
}
