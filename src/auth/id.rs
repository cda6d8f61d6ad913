//! Name under which the login service is registered with the host.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

/// Error returned when a service name is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The name was empty.
	#[error("Service name cannot be empty.")]
	Empty,
	/// The name contains whitespace characters.
	#[error("Service name `{name}` contains whitespace.")]
	ContainsWhitespace {
		/// Rejected name.
		name: String,
	},
}

/// Service registration name; the key of the host's configuration lookup.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceName(String);
impl ServiceName {
	/// Registration name of the Goalify login service.
	pub const GOALIFY: &'static str = "goalify";

	/// Validates and wraps a service name.
	pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
		let value = value.into();

		if value.is_empty() {
			return Err(IdentifierError::Empty);
		}
		if value.chars().any(char::is_whitespace) {
			return Err(IdentifierError::ContainsWhitespace { name: value });
		}

		Ok(Self(value))
	}

	/// Returns the Goalify service name.
	pub fn goalify() -> Self {
		Self(Self::GOALIFY.to_owned())
	}
}
impl Default for ServiceName {
	fn default() -> Self {
		Self::goalify()
	}
}
impl Deref for ServiceName {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for ServiceName {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for ServiceName {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl TryFrom<String> for ServiceName {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl From<ServiceName> for String {
	fn from(value: ServiceName) -> Self {
		value.0
	}
}
impl Debug for ServiceName {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Service({})", self.0)
	}
}
impl Display for ServiceName {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
