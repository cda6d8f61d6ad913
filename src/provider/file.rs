//! Service configurations loaded from the JSON document the host's settings form stores.

// std
use std::{
	fs,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	error::ConfigError,
	provider::{ProviderConfig, ProviderConfigDocument, ServiceConfigurations},
};

/// Reads a JSON array of service configuration documents from disk.
///
/// A missing or empty file yields an empty registry. Every document is validated on load, so a
/// bad entry fails [`FileConfigurations::open`] instead of a later login.
#[derive(Clone, Debug)]
pub struct FileConfigurations {
	path: PathBuf,
	inner: Arc<RwLock<HashMap<String, ProviderConfig>>>,
}
impl FileConfigurations {
	/// Opens the document at `path`, eagerly loading existing entries.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
		let path = path.into();
		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	/// Re-reads the document, replacing the loaded entries only when the whole file is valid.
	pub fn reload(&self) -> Result<usize, ConfigError> {
		let snapshot = Self::load_snapshot(&self.path)?;
		let count = snapshot.len();

		*self.inner.write() = snapshot;

		Ok(count)
	}

	/// Path the configurations are loaded from.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_snapshot(path: &Path) -> Result<HashMap<String, ProviderConfig>, ConfigError> {
		if !path.exists() {
			return Ok(HashMap::new());
		}

		let bytes = fs::read(path).map_err(|e| Self::load_error(path, format!("read failed: {e}")))?;

		if bytes.iter().all(u8::is_ascii_whitespace) {
			return Ok(HashMap::new());
		}

		let documents: Vec<ProviderConfigDocument> = serde_json::from_slice(&bytes)
			.map_err(|e| Self::load_error(path, format!("parse failed: {e}")))?;

		documents
			.into_iter()
			.map(|doc| -> Result<_, ConfigError> {
				let config = ProviderConfig::try_from(doc)?;

				Ok((config.service.to_string(), config))
			})
			.collect()
	}

	fn load_error(path: &Path, message: String) -> ConfigError {
		ConfigError::Load { path: path.display().to_string(), message }
	}
}
impl ServiceConfigurations for FileConfigurations {
	fn find(&self, service: &str) -> Option<ProviderConfig> {
		self.inner.read().get(service).cloned()
	}
}
