//! Provider configuration (data), its registries, and client secret handling.
//!
//! `config` validates the Goalify endpoints and redirect URI. `registry` and `file` expose the
//! host's service configuration lookup. `secret` opens stored client secrets right before the
//! code exchange.

pub mod config;
pub mod file;
pub mod registry;
pub mod secret;

pub use config::*;
pub use file::*;
pub use registry::*;
pub use secret::*;
