//! Token material issued by the provider.

pub mod grant;
pub mod secret;
