use confmap::{
    CancellationToken, Lifecycle, Provider, ProviderError, Retrieved, SchemeForm, SchemeMatcher,
    WatcherFn, decode, run_cancellable,
};

use crate::config::HttpProviderConfig;
use crate::fetch::get_bytes;

pub const HTTP_SCHEME: &str = "http";

/// Retrieves configuration over plain HTTP.
///
/// Handles URIs of the form `http://host[:port]/path`, for example
/// `http://localhost:3333/getConfig`.
pub struct HttpProvider {
    matcher: SchemeMatcher,
    client: Lifecycle<reqwest::Client>,
}

impl HttpProvider {
    pub fn new(config: HttpProviderConfig) -> Result<Self, reqwest::Error> {
        let client = config.client_builder().build()?;
        Ok(Self::with_client(client))
    }

    /// Use a pre-built client, e.g. one shared with the rest of an application.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            matcher: SchemeMatcher::new(HTTP_SCHEME, SchemeForm::Hierarchical),
            client: Lifecycle::new(HTTP_SCHEME, client),
        }
    }
}

#[async_trait::async_trait]
impl Provider for HttpProvider {
    async fn retrieve(
        &self,
        cancel: &CancellationToken,
        uri: &str,
        _watcher: Option<WatcherFn>,
    ) -> Result<Retrieved, ProviderError> {
        self.matcher.check(uri)?;
        let client = self.client.acquire(uri)?;

        tracing::debug!(uri, scheme = HTTP_SCHEME, "retrieving configuration");
        let body = run_cancellable(cancel, uri, get_bytes(&client, uri))
            .await
            .inspect_err(|e| tracing::warn!(uri, kind = %e.kind(), error = %e, "http retrieval failed"))?;

        decode(uri, &body)
    }

    fn scheme(&self) -> &str {
        HTTP_SCHEME
    }

    async fn shutdown(&self) -> Result<(), ProviderError> {
        if self.client.release().is_some() {
            tracing::debug!(scheme = HTTP_SCHEME, "provider shut down");
        }
        Ok(())
    }
}
