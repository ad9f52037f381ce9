use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::ProviderError;
use crate::provider::Provider;
use crate::retrieved::Retrieved;
use crate::scheme::scheme_of;
use crate::watcher::WatcherFn;

/// Errors raised while assembling a registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("a provider for scheme {0:?} is already registered")]
    DuplicateScheme(String),
}

/// Maps scheme tokens to providers and routes URIs to the matching one.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn Provider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: Arc<dyn Provider>) -> Result<(), RegistryError> {
        if self.get(provider.scheme()).is_some() {
            return Err(RegistryError::DuplicateScheme(provider.scheme().to_owned()));
        }
        self.providers.push(provider);
        Ok(())
    }

    /// Builder-style `register`.
    pub fn with(mut self, provider: Arc<dyn Provider>) -> Result<Self, RegistryError> {
        self.register(provider)?;
        Ok(self)
    }

    pub fn get(&self, scheme: &str) -> Option<&Arc<dyn Provider>> {
        self.providers.iter().find(|p| p.scheme() == scheme)
    }

    pub fn schemes(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.scheme()).collect()
    }

    /// Find the provider whose scheme matches the URI's scheme token.
    pub fn resolve(&self, uri: &str) -> Result<&Arc<dyn Provider>, ProviderError> {
        let scheme = scheme_of(uri).unwrap_or_default();
        self.get(scheme)
            .ok_or_else(|| ProviderError::UnsupportedScheme {
                uri: uri.to_owned(),
                scheme: scheme.to_owned(),
            })
    }

    pub async fn retrieve(
        &self,
        cancel: &CancellationToken,
        uri: &str,
        watcher: Option<WatcherFn>,
    ) -> Result<Retrieved, ProviderError> {
        self.resolve(uri)?.retrieve(cancel, uri, watcher).await
    }

    /// Shut down every provider, returning the first error after trying all.
    pub async fn shutdown(&self) -> Result<(), ProviderError> {
        let mut first_error = None;
        for provider in &self.providers {
            if let Err(e) = provider.shutdown().await {
                tracing::warn!(scheme = provider.scheme(), error = %e, "provider shutdown failed");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
