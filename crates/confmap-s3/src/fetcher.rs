use confmap::ProviderError;

use crate::locator::ObjectLocator;

/// Failures from an [`ObjectFetcher`], before they are tagged with the URI.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("credentials unavailable: {0}")]
    Auth(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("object not found: {0}")]
    NotFound(String),

    #[error("service error: {reason}")]
    Service { status: Option<u16>, reason: String },

    #[error("body read error: {0}")]
    Read(String),
}

impl FetchError {
    /// Attach the URI and locator to produce the provider-level error.
    pub fn into_provider_error(self, uri: &str, locator: &ObjectLocator) -> ProviderError {
        let uri = uri.to_owned();
        let at = |reason: String| {
            format!(
                "{reason} (bucket {:?}, region {:?}, key {:?})",
                locator.bucket, locator.region, locator.key
            )
        };
        match self {
            Self::Auth(reason) => ProviderError::AuthConfigurationMissing { uri, reason },
            Self::Transport(reason) => ProviderError::Transport {
                uri,
                reason: at(reason),
            },
            Self::NotFound(reason) => ProviderError::RemoteNotFound {
                uri,
                reason: at(reason),
            },
            Self::Service { status, reason } => ProviderError::Remote {
                uri,
                status,
                reason: at(reason),
            },
            Self::Read(reason) => ProviderError::Read {
                uri,
                reason: at(reason),
            },
        }
    }
}

/// Downloads whole objects from an object store.
///
/// The provider owns URI handling; implementations only see decomposed
/// locators. Implementations must be safe to call concurrently.
#[async_trait::async_trait]
pub trait ObjectFetcher: Send + Sync {
    async fn fetch(&self, locator: &ObjectLocator) -> Result<Vec<u8>, FetchError>;

    /// Release pooled connections or cached credentials.
    async fn shutdown(&self) {}
}

#[cfg(test)]
mod tests {
    use confmap::ErrorKind;

    use super::*;

    fn locator() -> ObjectLocator {
        ObjectLocator {
            bucket: "bucket".into(),
            region: "us-east-1".into(),
            key: "conf/app.yaml".into(),
        }
    }

    #[test]
    fn maps_each_variant_to_a_kind() {
        let uri = "s3://bucket.s3.us-east-1.amazonaws.com/conf/app.yaml";
        let cases = [
            (FetchError::Auth("no keys".into()), ErrorKind::AuthConfigurationMissing),
            (FetchError::Transport("dns".into()), ErrorKind::Transport),
            (FetchError::NotFound("NoSuchKey".into()), ErrorKind::RemoteNotFound),
            (
                FetchError::Service {
                    status: Some(301),
                    reason: "PermanentRedirect".into(),
                },
                ErrorKind::Remote,
            ),
            (FetchError::Read("eof".into()), ErrorKind::Read),
        ];

        for (fetch_err, kind) in cases {
            let err = fetch_err.into_provider_error(uri, &locator());
            assert_eq!(err.kind(), kind);
            assert_eq!(err.uri(), uri);
        }
    }

    #[test]
    fn service_error_displays_reason() {
        let err = FetchError::Service {
            status: Some(403),
            reason: "AccessDenied".into(),
        };
        assert_eq!(err.to_string(), "service error: AccessDenied");
    }

    #[test]
    fn diagnostics_name_the_locator() {
        let err = FetchError::NotFound("NoSuchKey".into())
            .into_provider_error("s3://x", &locator());
        let message = err.to_string();
        assert!(message.contains("conf/app.yaml"));
        assert!(message.contains("us-east-1"));
    }
}
