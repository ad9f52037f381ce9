use std::sync::Arc;

use confmap::{
    CancellationToken, Lifecycle, Provider, ProviderError, Retrieved, SchemeForm, SchemeMatcher,
    WatcherFn, decode, run_cancellable,
};

use crate::aws::AwsObjectFetcher;
use crate::config::S3ProviderConfig;
use crate::fetcher::ObjectFetcher;
use crate::locator::ObjectLocator;

pub const S3_SCHEME: &str = "s3";

/// Retrieves configuration objects from S3.
///
/// Handles URIs of the form `s3://{bucket}.s3.{region}.amazonaws.com/{key}`,
/// for example `s3://DOC-EXAMPLE-BUCKET.s3.us-west-2.amazonaws.com/conf/app.yaml`.
pub struct S3Provider<F = AwsObjectFetcher> {
    matcher: SchemeMatcher,
    fetcher: Lifecycle<Arc<F>>,
}

impl<F: ObjectFetcher> S3Provider<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            matcher: SchemeMatcher::new(S3_SCHEME, SchemeForm::Opaque),
            fetcher: Lifecycle::new(S3_SCHEME, Arc::new(fetcher)),
        }
    }
}

impl S3Provider<AwsObjectFetcher> {
    pub async fn from_config(config: S3ProviderConfig) -> Self {
        Self::new(AwsObjectFetcher::new(config).await)
    }

    pub async fn from_env() -> Self {
        Self::from_config(S3ProviderConfig::from_env()).await
    }
}

#[async_trait::async_trait]
impl<F: ObjectFetcher + 'static> Provider for S3Provider<F> {
    async fn retrieve(
        &self,
        cancel: &CancellationToken,
        uri: &str,
        _watcher: Option<WatcherFn>,
    ) -> Result<Retrieved, ProviderError> {
        self.matcher.check(uri)?;

        let locator = ObjectLocator::parse(uri).map_err(|e| ProviderError::MalformedUri {
            uri: uri.to_owned(),
            reason: e.to_string(),
        })?;
        let fetcher = self.fetcher.acquire(uri)?;

        tracing::debug!(
            uri,
            bucket = %locator.bucket,
            region = %locator.region,
            key = %locator.key,
            "retrieving configuration"
        );

        let body = run_cancellable(cancel, uri, async {
            fetcher
                .fetch(&locator)
                .await
                .map_err(|e| e.into_provider_error(uri, &locator))
        })
        .await
        .inspect_err(|e| tracing::warn!(uri, kind = %e.kind(), error = %e, "s3 retrieval failed"))?;

        decode(uri, &body)
    }

    fn scheme(&self) -> &str {
        S3_SCHEME
    }

    async fn shutdown(&self) -> Result<(), ProviderError> {
        if let Some(fetcher) = self.fetcher.release() {
            fetcher.shutdown().await;
            tracing::debug!(scheme = S3_SCHEME, "provider shut down");
        }
        Ok(())
    }
}
