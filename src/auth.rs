//! Auth-domain identifiers, login state, token grants, identities, and account records.

pub mod account;
pub mod id;
pub mod identity;
pub mod state;
pub mod token;

pub use account::*;
pub use id::*;
pub use identity::*;
pub use state::*;
pub use token::{grant::*, secret::*};
