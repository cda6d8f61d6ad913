//! Normalized service account record handed to the host account framework.

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	auth::{Identity, TokenGrant, TokenSecret},
};

/// Account data stored by the host under the user's `services.goalify` entry.
///
/// Serialized in camelCase with `expiresAt` as epoch milliseconds; absent optional fields are
/// omitted. The record only ever carries the token fields plus allow-listed identity fields, whose
/// values are kept exactly as the provider sent them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccountRecord {
	/// Access token for the provider API.
	pub access_token: TokenSecret,
	/// Absolute expiry of the access token.
	#[serde(with = "epoch_millis")]
	pub expires_at: OffsetDateTime,
	/// Refresh token, if the provider issued one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub refresh_token: Option<TokenSecret>,
	/// Stable account id (the username).
	pub id: String,
	/// Account username.
	pub username: String,
	/// Primary email address.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<Value>,
	/// Full display name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fullname: Option<Value>,
	/// Given name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub first_name: Option<Value>,
	/// Family name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_name: Option<Value>,
	/// Avatar URL.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub avatar: Option<Value>,
	/// Self-reported gender.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub gender: Option<Value>,
}
impl ServiceAccountRecord {
	/// Expiry as epoch milliseconds.
	pub fn expires_at_millis(&self) -> i64 {
		epoch_millis::to_millis(self.expires_at)
	}
}

/// Initial profile copied into the user document on first login.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
	/// Display name; the account username.
	pub name: String,
}

/// Options returned next to the service data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginProfileOptions {
	/// Initial user profile.
	pub profile: Profile,
}

/// Result of a successful login exchange: `{ serviceData, options: { profile: { name } } }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
	/// Normalized account record.
	pub service_data: ServiceAccountRecord,
	/// Profile options for the host.
	pub options: LoginProfileOptions,
}

/// Merges a token grant and an identity into the login result, as of `issued_at`.
pub fn normalize(grant: TokenGrant, identity: Identity, issued_at: OffsetDateTime) -> LoginResult {
	let expires_at = grant.expires_at(issued_at);
	let Identity { username, email, fullname, first_name, last_name, avatar, gender } = identity;
	let profile = Profile { name: username.clone() };
	let service_data = ServiceAccountRecord {
		access_token: grant.access_token,
		expires_at,
		refresh_token: grant.refresh_token,
		id: username.clone(),
		username,
		email,
		fullname,
		first_name,
		last_name,
		avatar,
		gender,
	};

	LoginResult { service_data, options: LoginProfileOptions { profile } }
}

mod epoch_millis {
	// crates.io
	use serde::{Deserializer, Serializer, de::Error as _};
	// self
	use crate::_prelude::*;

	pub(super) fn to_millis(instant: OffsetDateTime) -> i64 {
		i64::try_from(instant.unix_timestamp_nanos() / 1_000_000).unwrap_or(i64::MAX)
	}

	pub(super) fn serialize<S>(instant: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_i64(to_millis(*instant))
	}

	pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
	where
		D: Deserializer<'de>,
	{
		let millis = i64::deserialize(deserializer)?;

		OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
			.map_err(D::Error::custom)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn identity(payload: &str) -> Identity {
		serde_json::from_str(payload).expect("Identity fixture should parse.")
	}

	#[test]
	fn normalize_builds_the_documented_record() {
		let issued_at = time::macros::datetime!(2026-03-01 12:00 UTC);
		let result = normalize(
			TokenGrant::new("tok123"),
			identity(r#"{"username":"alice","email":"a@x.com","extra":"drop-me"}"#),
			issued_at,
		);
		let value = serde_json::to_value(&result).expect("Login result should serialize.");
		let expected_expiry = issued_at.unix_timestamp() * 1_000 + 600_000;

		assert_eq!(
			value,
			serde_json::json!({
				"serviceData": {
					"accessToken": "tok123",
					"expiresAt": expected_expiry,
					"id": "alice",
					"username": "alice",
					"email": "a@x.com",
				},
				"options": { "profile": { "name": "alice" } },
			})
		);
		assert_eq!(result.service_data.expires_at_millis(), expected_expiry);
	}

	#[test]
	fn refresh_token_is_carried_when_present() {
		let issued_at = OffsetDateTime::now_utc();
		let result = normalize(
			TokenGrant::new("tok").with_refresh_token("ref"),
			identity(r#"{"username":"dave","gender":"male"}"#),
			issued_at,
		);

		assert_eq!(result.service_data.refresh_token.as_ref().map(TokenSecret::expose), Some("ref"));
		assert_eq!(result.service_data.gender, Some(Value::from("male")));
		assert_eq!(result.service_data.id, result.service_data.username);
		assert_eq!(result.options.profile.name, "dave");
	}

	#[test]
	fn record_round_trips_through_json() {
		let result = normalize(
			TokenGrant::new("tok"),
			identity(r#"{"username":"erin","firstName":"Erin"}"#),
			time::macros::datetime!(2026-03-01 12:00:00.250 UTC),
		);
		let json = serde_json::to_string(&result.service_data).expect("Record should serialize.");
		let parsed: ServiceAccountRecord =
			serde_json::from_str(&json).expect("Record should deserialize.");

		assert_eq!(parsed, result.service_data);
		assert!(json.contains("\"firstName\":\"Erin\""));
	}
}
