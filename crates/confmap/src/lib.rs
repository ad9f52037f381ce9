pub mod error;
pub mod lifecycle;
pub mod provider;
pub mod registry;
pub mod retrieved;
pub mod scheme;
pub mod watcher;

pub use error::{ErrorKind, ProviderError};
pub use lifecycle::Lifecycle;
pub use provider::{Provider, decode, run_cancellable};
pub use registry::{ProviderRegistry, RegistryError};
pub use retrieved::{DecodeError, Retrieved};
pub use scheme::{SchemeForm, SchemeMatcher, scheme_of};
pub use watcher::{ChangeEvent, WatcherFn};

pub use tokio_util::sync::CancellationToken;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
