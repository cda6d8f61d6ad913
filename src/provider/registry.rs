//! Service configuration lookup and the in-memory registry.

// self
use crate::{_prelude::*, provider::ProviderConfig};

/// Host-provided lookup of provider configurations by service name.
///
/// Lookups are synchronous so a missing configuration is reported before any login work starts.
pub trait ServiceConfigurations
where
	Self: Send + Sync,
{
	/// Returns the configuration registered for `service`, if any.
	fn find(&self, service: &str) -> Option<ProviderConfig>;
}

type ConfigMap = Arc<RwLock<HashMap<String, ProviderConfig>>>;

/// Thread-safe in-process registry for tests and single-node deployments.
#[derive(Clone, Debug, Default)]
pub struct MemoryConfigurations(ConfigMap);
impl MemoryConfigurations {
	/// Inserts or replaces the configuration for `config.service`.
	pub fn upsert(&self, config: ProviderConfig) -> Option<ProviderConfig> {
		self.0.write().insert(config.service.to_string(), config)
	}

	/// Removes the configuration for `service`, returning it when present.
	pub fn remove(&self, service: &str) -> Option<ProviderConfig> {
		self.0.write().remove(service)
	}

	/// Number of registered services.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Whether no service is registered.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}
}
impl ServiceConfigurations for MemoryConfigurations {
	fn find(&self, service: &str) -> Option<ProviderConfig> {
		self.0.read().get(service).cloned()
	}
}
