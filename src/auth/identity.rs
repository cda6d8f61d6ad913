//! Allow-listed view of the provider's userinfo payload.

// crates.io
use serde::{Deserializer, de::Error as _};
use serde_json::Value;
// self
use crate::_prelude::*;

/// Identity fields that may reach a [`ServiceAccountRecord`](crate::auth::ServiceAccountRecord).
pub const IDENTITY_FIELDS: [&str; 8] =
	["id", "email", "username", "fullname", "firstName", "lastName", "avatar", "gender"];

/// Account identity returned by `GET /api/userinfo`.
///
/// Only the fields listed in [`IDENTITY_FIELDS`] are deserialized; anything else the provider
/// sends is dropped while parsing. The allow-list filters by name only: optional fields keep
/// whatever JSON value the provider sent. The provider does not send a stable id of its own, so
/// [`Identity::id`] is the username, taken verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
	/// Account username; mandatory and non-empty.
	#[serde(deserialize_with = "non_empty_username")]
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
impl Identity {
	/// Creates an identity carrying only the mandatory username.
	pub fn new(username: impl Into<String>) -> Self {
		Self {
			username: username.into(),
			email: None,
			fullname: None,
			first_name: None,
			last_name: None,
			avatar: None,
			gender: None,
		}
	}

	/// Stable account id; always the username.
	pub fn id(&self) -> &str {
		&self.username
	}
}

fn non_empty_username<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	let username = String::deserialize(deserializer)?;

	if username.is_empty() {
		return Err(D::Error::custom("username cannot be empty"));
	}

	Ok(username)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn unknown_fields_are_dropped_while_parsing() {
		let identity: Identity = serde_json::from_str(
			r#"{"username":"alice","email":"a@x.com","extra":"drop-me","birthday":"2000-01-01","id":"other"}"#,
		)
		.expect("Identity payload should parse.");

		assert_eq!(identity.id(), "alice");
		assert_eq!(identity.email, Some(Value::from("a@x.com")));

		let round_trip = serde_json::to_value(&identity).expect("Identity should serialize.");
		let mut keys: Vec<_> = round_trip
			.as_object()
			.expect("Identity should serialize to an object.")
			.keys()
			.cloned()
			.collect();

		keys.sort();

		assert_eq!(keys, vec!["email".to_owned(), "username".to_owned()]);
	}

	#[test]
	fn camel_case_names_and_nulls_are_accepted() {
		let identity: Identity = serde_json::from_str(
			r#"{"username":"bob","firstName":"Bob","lastName":"Builder","avatar":null}"#,
		)
		.expect("Identity payload should parse.");

		assert_eq!(identity.first_name, Some(Value::from("Bob")));
		assert_eq!(identity.last_name, Some(Value::from("Builder")));
		assert_eq!(identity.avatar, None);
	}

	#[test]
	fn usernames_are_taken_verbatim() {
		let spaced: Identity = serde_json::from_str(r#"{"username":"Alice Smith"}"#)
			.expect("Usernames with spaces should parse.");
		let long_name = "a".repeat(200);
		let long: Identity =
			serde_json::from_str(&serde_json::json!({ "username": long_name }).to_string())
				.expect("Long usernames should parse.");

		assert_eq!(spaced.id(), "Alice Smith");
		assert_eq!(long.id(), long_name);
	}

	#[test]
	fn non_string_values_pass_through_under_allowed_names() {
		let identity: Identity = serde_json::from_str(
			r#"{"username":"alice","gender":1,"avatar":{"url":"https://cdn.example/a.png"},"extra":[1]}"#,
		)
		.expect("Non-string identity values should parse.");

		assert_eq!(identity.gender, Some(Value::from(1)));
		assert_eq!(
			identity.avatar,
			Some(serde_json::json!({ "url": "https://cdn.example/a.png" }))
		);
	}

	#[test]
	fn username_is_mandatory() {
		assert!(serde_json::from_str::<Identity>(r#"{"email":"a@x.com"}"#).is_err());
		assert!(serde_json::from_str::<Identity>(r#"{"username":""}"#).is_err());
	}

	#[test]
	fn field_list_names_serialized_keys() {
		let mut identity = Identity::new("carol");

		identity.email = Some("c@x.com".into());
		identity.fullname = Some("Carol C".into());
		identity.first_name = Some("Carol".into());
		identity.last_name = Some("C".into());
		identity.avatar = Some("https://cdn.example/carol.png".into());
		identity.gender = Some("female".into());

		let value = serde_json::to_value(&identity).expect("Identity should serialize.");
		let object = value.as_object().expect("Identity should serialize to an object.");

		for key in object.keys() {
			assert!(IDENTITY_FIELDS.contains(&key.as_str()), "`{key}` is not allow-listed.");
		}
		assert_eq!(object.len(), IDENTITY_FIELDS.len() - 1, "Only `id` is derived.");
	}
}
