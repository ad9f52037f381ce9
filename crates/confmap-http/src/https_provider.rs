use confmap::{
    CancellationToken, Lifecycle, Provider, ProviderError, Retrieved, SchemeForm, SchemeMatcher,
    WatcherFn, decode, run_cancellable,
};

use crate::config::HttpsProviderConfig;
use crate::fetch::get_bytes;
use crate::trust::{TrustError, TrustRoots};

pub const HTTPS_SCHEME: &str = "https";

/// Retrieves configuration over HTTPS with certificate verification.
///
/// Handles URIs of the form `https://host[:port]/path`. The client trusts
/// the platform roots plus the CA file from [`HttpsProviderConfig`], and is
/// built once here so concurrent retrievals never touch the filesystem.
pub struct HttpsProvider {
    matcher: SchemeMatcher,
    trust: TrustRoots,
    client: Lifecycle<reqwest::Client>,
}

impl HttpsProvider {
    pub fn new(config: HttpsProviderConfig) -> Result<Self, TrustError> {
        let trust = TrustRoots::load(&config)?;
        let client = trust
            .apply(config.http.client_builder())
            .build()
            .map_err(TrustError::Client)?;

        Ok(Self {
            matcher: SchemeMatcher::new(HTTPS_SCHEME, SchemeForm::Hierarchical),
            trust,
            client: Lifecycle::new(HTTPS_SCHEME, client),
        })
    }

    /// Shorthand for `HttpsProvider::new(HttpsProviderConfig::from_env())`.
    pub fn from_env() -> Result<Self, TrustError> {
        Self::new(HttpsProviderConfig::from_env())
    }

    pub fn trust_roots(&self) -> &TrustRoots {
        &self.trust
    }
}

#[async_trait::async_trait]
impl Provider for HttpsProvider {
    async fn retrieve(
        &self,
        cancel: &CancellationToken,
        uri: &str,
        _watcher: Option<WatcherFn>,
    ) -> Result<Retrieved, ProviderError> {
        self.matcher.check(uri)?;
        let client = self.client.acquire(uri)?;

        tracing::debug!(uri, scheme = HTTPS_SCHEME, "retrieving configuration");
        let body = run_cancellable(cancel, uri, get_bytes(&client, uri))
            .await
            .inspect_err(|e| tracing::warn!(uri, kind = %e.kind(), error = %e, "https retrieval failed"))?;

        decode(uri, &body)
    }

    fn scheme(&self) -> &str {
        HTTPS_SCHEME
    }

    async fn shutdown(&self) -> Result<(), ProviderError> {
        if self.client.release().is_some() {
            tracing::debug!(scheme = HTTPS_SCHEME, "provider shut down");
        }
        Ok(())
    }
}
