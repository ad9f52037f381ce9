pub mod aws;
pub mod config;
pub mod fetcher;
pub mod locator;
pub mod provider;

pub use aws::AwsObjectFetcher;
pub use config::{CredentialSource, S3ProviderConfig};
pub use fetcher::{FetchError, ObjectFetcher};
pub use locator::{LocatorError, ObjectLocator};
pub use provider::{S3_SCHEME, S3Provider};
