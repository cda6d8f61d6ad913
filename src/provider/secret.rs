//! Client secrets as stored by the host: plaintext or an AES-128-GCM envelope.

// crates.io
use aes_gcm::{
	Aes128Gcm,
	aead::{Aead, KeyInit},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use rand::Rng;
// self
use crate::{_prelude::*, auth::TokenSecret};

/// Envelope algorithm label accepted by [`SecretKey`].
pub const SEALED_SECRET_ALGORITHM: &str = "aes-128-gcm";

const IV_LEN: usize = 12;
const TAG_LEN: usize = 16;
const KEY_LEN: usize = 16;

/// Errors raised while opening or sealing a client secret.
#[derive(Debug, ThisError)]
pub enum SecretError {
	/// The secret is encrypted but the opener holds no key.
	#[error("Client secret is encrypted but no secret key is configured.")]
	KeyRequired,
	/// The envelope names an algorithm other than AES-128-GCM.
	#[error("Unsupported secret algorithm `{algorithm}`.")]
	UnsupportedAlgorithm {
		/// Algorithm named by the envelope.
		algorithm: String,
	},
	/// A base64 field could not be decoded.
	#[error("Secret envelope field `{field}` is not valid base64.")]
	Encoding {
		/// Offending field.
		field: &'static str,
		/// Underlying decode failure.
		#[source]
		source: base64::DecodeError,
	},
	/// The key is not 16 bytes long.
	#[error("Secret key must be 16 bytes.")]
	InvalidKey,
	/// The IV or authentication tag has the wrong length.
	#[error("Secret envelope field `{field}` has the wrong length.")]
	InvalidLength {
		/// Offending field.
		field: &'static str,
	},
	/// Encryption failed.
	#[error("Failed to encrypt the client secret.")]
	Encrypt,
	/// Authentication failed; wrong key or tampered envelope.
	#[error("Failed to decrypt the client secret.")]
	Decrypt,
	/// Decrypted bytes are not a JSON string.
	#[error("Decrypted client secret is not a JSON string.")]
	Payload(#[from] serde_json::Error),
}

/// Encrypted secret envelope; every binary field is standard base64.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedSecret {
	/// Initialization vector (12 bytes).
	pub iv: String,
	/// Ciphertext without the tag.
	pub ciphertext: String,
	/// Algorithm label; must be [`SEALED_SECRET_ALGORITHM`].
	pub algorithm: String,
	/// GCM authentication tag (16 bytes).
	pub auth_tag: String,
}
impl Debug for EncryptedSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("EncryptedSecret")
			.field("algorithm", &self.algorithm)
			.finish_non_exhaustive()
	}
}

/// Client secret as stored in the service configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SealedSecret {
	/// Plaintext secret.
	Plain(TokenSecret),
	/// Encrypted envelope.
	Encrypted(EncryptedSecret),
}
impl SealedSecret {
	/// Wraps a plaintext secret.
	pub fn plain(secret: impl Into<String>) -> Self {
		Self::Plain(TokenSecret::new(secret))
	}
}

/// Opens stored client secrets right before they are sent to the token endpoint.
pub trait SecretOpener
where
	Self: Send + Sync,
{
	/// Returns the plaintext secret.
	fn open(&self, sealed: &SealedSecret) -> Result<TokenSecret, SecretError>;
}

/// Opener for deployments that store secrets in plaintext; rejects encrypted envelopes.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlaintextOpener;
impl SecretOpener for PlaintextOpener {
	fn open(&self, sealed: &SealedSecret) -> Result<TokenSecret, SecretError> {
		match sealed {
			SealedSecret::Plain(secret) => Ok(secret.clone()),
			SealedSecret::Encrypted(_) => Err(SecretError::KeyRequired),
		}
	}
}

/// AES-128-GCM key that opens (and seals) secret envelopes. Plaintext secrets pass through.
#[derive(Clone)]
pub struct SecretKey {
	cipher: Aes128Gcm,
}
impl SecretKey {
	/// Builds a key from raw bytes.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self, SecretError> {
		if bytes.len() != KEY_LEN {
			return Err(SecretError::InvalidKey);
		}

		let cipher = Aes128Gcm::new_from_slice(bytes).map_err(|_| SecretError::InvalidKey)?;

		Ok(Self { cipher })
	}

	/// Builds a key from its standard base64 encoding.
	pub fn from_base64(encoded: &str) -> Result<Self, SecretError> {
		let bytes = decode_field("key", encoded)?;

		Self::from_bytes(&bytes)
	}

	/// Encrypts `secret` into a fresh envelope with a random IV.
	pub fn seal(&self, secret: &TokenSecret) -> Result<SealedSecret, SecretError> {
		let mut iv = [0_u8; IV_LEN];

		rand::rng().fill(&mut iv);

		let plaintext = serde_json::to_vec(secret.expose())?;
		let mut sealed = self
			.cipher
			.encrypt(&iv.into(), plaintext.as_slice())
			.map_err(|_| SecretError::Encrypt)?;
		let tag = sealed.split_off(sealed.len() - TAG_LEN);

		Ok(SealedSecret::Encrypted(EncryptedSecret {
			iv: STANDARD.encode(iv),
			ciphertext: STANDARD.encode(&sealed),
			algorithm: SEALED_SECRET_ALGORITHM.into(),
			auth_tag: STANDARD.encode(tag),
		}))
	}
}
impl Debug for SecretKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("SecretKey(<redacted>)")
	}
}
impl SecretOpener for SecretKey {
	fn open(&self, sealed: &SealedSecret) -> Result<TokenSecret, SecretError> {
		let envelope = match sealed {
			SealedSecret::Plain(secret) => return Ok(secret.clone()),
			SealedSecret::Encrypted(envelope) => envelope,
		};

		if envelope.algorithm != SEALED_SECRET_ALGORITHM {
			return Err(SecretError::UnsupportedAlgorithm { algorithm: envelope.algorithm.clone() });
		}

		let iv: [u8; IV_LEN] = decode_field("iv", &envelope.iv)?
			.try_into()
			.map_err(|_| SecretError::InvalidLength { field: "iv" })?;
		let tag = decode_field("authTag", &envelope.auth_tag)?;

		if tag.len() != TAG_LEN {
			return Err(SecretError::InvalidLength { field: "authTag" });
		}

		let mut payload = decode_field("ciphertext", &envelope.ciphertext)?;

		payload.extend_from_slice(&tag);

		let plaintext =
			self.cipher.decrypt(&iv.into(), payload.as_slice()).map_err(|_| SecretError::Decrypt)?;
		let secret: String = serde_json::from_slice(&plaintext)?;

		Ok(TokenSecret::new(secret))
	}
}

fn decode_field(field: &'static str, value: &str) -> Result<Vec<u8>, SecretError> {
	STANDARD.decode(value).map_err(|source| SecretError::Encoding { field, source })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const KEY: &str = "AAECAwQFBgcICQoLDA0ODw==";

	fn key() -> SecretKey {
		SecretKey::from_base64(KEY).expect("Fixture key should be valid.")
	}

	#[test]
	fn sealed_secrets_open_with_the_same_key() {
		let key = key();
		let sealed = key.seal(&TokenSecret::new("s3cret")).expect("Sealing should succeed.");

		assert!(matches!(sealed, SealedSecret::Encrypted(_)));
		assert_eq!(key.open(&sealed).expect("Opening should succeed.").expose(), "s3cret");
		assert!(matches!(PlaintextOpener.open(&sealed), Err(SecretError::KeyRequired)));
	}

	#[test]
	fn wrong_key_or_tampered_envelope_fails() {
		let sealed = key().seal(&TokenSecret::new("s3cret")).expect("Sealing should succeed.");
		let other = SecretKey::from_bytes(&[7_u8; KEY_LEN]).expect("Fixture key should be valid.");

		assert!(matches!(other.open(&sealed), Err(SecretError::Decrypt)));

		let SealedSecret::Encrypted(mut envelope) = sealed else {
			panic!("Sealing should produce an envelope.");
		};

		envelope.algorithm = "aes-256-cbc".into();

		assert!(matches!(
			key().open(&SealedSecret::Encrypted(envelope)),
			Err(SecretError::UnsupportedAlgorithm { .. })
		));
	}

	#[test]
	fn stored_shapes_deserialize() {
		let plain: SealedSecret =
			serde_json::from_str("\"s3cret\"").expect("Plain secret should parse.");
		let encrypted: SealedSecret = serde_json::from_str(
			r#"{"iv":"AAAAAAAAAAAAAAAA","ciphertext":"","algorithm":"aes-128-gcm","authTag":"AAAAAAAAAAAAAAAAAAAAAA=="}"#,
		)
		.expect("Envelope should parse.");

		assert_eq!(plain, SealedSecret::plain("s3cret"));
		assert!(matches!(encrypted, SealedSecret::Encrypted(_)));
		assert_eq!(key().open(&plain).expect("Plain secrets pass through.").expose(), "s3cret");
	}

	#[test]
	fn keys_must_be_sixteen_bytes() {
		assert!(matches!(SecretKey::from_bytes(&[0_u8; 32]), Err(SecretError::InvalidKey)));
		assert!(matches!(SecretKey::from_base64("***"), Err(SecretError::Encoding { .. })));
		assert_eq!(format!("{:?}", key()), "SecretKey(<redacted>)");
	}
}
