use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::ProviderError;
use crate::retrieved::Retrieved;
use crate::watcher::WatcherFn;

/// A scheme-bound handler that retrieves configuration from one transport.
///
/// Providers are created once, shared behind `Arc`, and shut down once.
/// `retrieve` may run concurrently from many callers.
#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    /// Fetch and decode the configuration at `uri`.
    ///
    /// Cancelling `cancel` aborts in-flight I/O and yields
    /// [`ProviderError::Cancelled`]. The watcher is accepted so callers can
    /// pass one uniformly; static providers never invoke it.
    async fn retrieve(
        &self,
        cancel: &CancellationToken,
        uri: &str,
        watcher: Option<WatcherFn>,
    ) -> Result<Retrieved, ProviderError>;

    /// The scheme token this provider handles, e.g. `"https"`.
    fn scheme(&self) -> &str;

    /// Release transport resources. Calling it more than once is not an error.
    async fn shutdown(&self) -> Result<(), ProviderError>;
}

#[async_trait::async_trait]
impl<T: Provider + ?Sized> Provider for Arc<T> {
    async fn retrieve(
        &self,
        cancel: &CancellationToken,
        uri: &str,
        watcher: Option<WatcherFn>,
    ) -> Result<Retrieved, ProviderError> {
        (**self).retrieve(cancel, uri, watcher).await
    }

    fn scheme(&self) -> &str {
        (**self).scheme()
    }

    async fn shutdown(&self) -> Result<(), ProviderError> {
        (**self).shutdown().await
    }
}

/// Drive `fut` to completion unless `cancel` fires first.
///
/// On cancellation the future is dropped, which tears down any in-flight
/// request it owns.
pub async fn run_cancellable<T, F>(
    cancel: &CancellationToken,
    uri: &str,
    fut: F,
) -> Result<T, ProviderError>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    let cancelled = || ProviderError::Cancelled {
        uri: uri.to_owned(),
    };

    if cancel.is_cancelled() {
        return Err(cancelled());
    }

    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(cancelled()),
        result = fut => result,
    }
}

/// Hand fetched bytes to the YAML decoder, tagging failures with the URI.
pub fn decode(uri: &str, bytes: &[u8]) -> Result<Retrieved, ProviderError> {
    Retrieved::from_yaml(bytes).map_err(|source| ProviderError::Decode {
        uri: uri.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use crate::ErrorKind;

    use super::*;

    #[tokio::test]
    async fn completes_when_not_cancelled() {
        let cancel = CancellationToken::new();
        let value = run_cancellable(&cancel, "http://a", async { Ok(5) })
            .await
            .unwrap();
        assert_eq!(value, 5);
    }

    #[tokio::test]
    async fn already_cancelled_never_polls() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let polled = AtomicBool::new(false);
        let result = run_cancellable(&cancel, "http://a", async {
            polled.store(true, Ordering::SeqCst);
            Ok(())
        })
        .await;
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Cancelled);
        assert!(!polled.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn cancellation_interrupts_pending_work() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let result: Result<(), _> = run_cancellable(&cancel, "s3:x", async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        })
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert_eq!(err.uri(), "s3:x");
    }

    #[test]
    fn decode_tags_uri() {
        let err = decode("http://a/bad", b"wrong : [").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(err.uri(), "http://a/bad");

        let ok = decode("http://a/good", b"key: value").unwrap();
        assert!(!ok.is_empty());
    }
}
