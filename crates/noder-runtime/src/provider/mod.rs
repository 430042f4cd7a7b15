//! Provider identification, credentials, and model routing.

mod credentials;
mod router;

pub use credentials::{CredentialsStore, Provider};
pub use router::{ChatVendor, ProviderRoute};
