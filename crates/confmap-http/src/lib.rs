pub mod config;
mod fetch;
pub mod http_provider;
pub mod https_provider;
pub mod trust;

pub use config::{CA_FILE_ENV, HttpProviderConfig, HttpsProviderConfig};
pub use http_provider::{HTTP_SCHEME, HttpProvider};
pub use https_provider::{HTTPS_SCHEME, HttpsProvider};
pub use trust::{TrustError, TrustRoots};
