use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;
use tokio::sync::OnceCell;

use crate::config::{CredentialSource, S3ProviderConfig};
use crate::fetcher::{FetchError, ObjectFetcher};
use crate::locator::ObjectLocator;

/// Region used only while loading the base SDK config. Each request
/// overrides it with the locator's region.
const BOOTSTRAP_REGION: &str = "us-east-1";

/// Cap on the buffer reserved up front from `Content-Length`.
const MAX_PREALLOCATE: usize = 16 * 1024 * 1024;

/// [`ObjectFetcher`] backed by the AWS SDK.
///
/// The base SDK config, including the credential chain, is loaded once at
/// construction. Each fetch derives a client bound to the locator's region.
#[derive(Debug)]
pub struct AwsObjectFetcher {
    sdk_config: aws_config::SdkConfig,
    force_path_style: bool,
    credentials_verified: OnceCell<()>,
}

impl AwsObjectFetcher {
    pub async fn new(config: S3ProviderConfig) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(BOOTSTRAP_REGION));

        if let CredentialSource::Static {
            access_key_id,
            secret_access_key,
            session_token,
        } = config.credentials
        {
            loader = loader.credentials_provider(Credentials::new(
                access_key_id,
                secret_access_key,
                session_token,
                None,
                "confmap-static",
            ));
        }

        if let Some(endpoint) = config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        Self {
            sdk_config: loader.load().await,
            force_path_style: config.force_path_style,
            credentials_verified: OnceCell::new(),
        }
    }

    /// Resolve credentials once; a failure is retried on the next fetch.
    async fn verify_credentials(&self) -> Result<(), FetchError> {
        self.credentials_verified
            .get_or_try_init(|| async {
                let provider = self
                    .sdk_config
                    .credentials_provider()
                    .ok_or_else(|| FetchError::Auth("no credentials provider configured".into()))?;

                let credentials = provider
                    .provide_credentials()
                    .await
                    .map_err(|e| FetchError::Auth(DisplayErrorContext(&e).to_string()))?;

                if credentials.access_key_id().is_empty()
                    || credentials.secret_access_key().is_empty()
                {
                    return Err(FetchError::Auth("access key or secret key is empty".into()));
                }
                Ok(())
            })
            .await
            .map(|_| ())
    }

    fn client_for(&self, region: &str) -> aws_sdk_s3::Client {
        let config = aws_sdk_s3::config::Builder::from(&self.sdk_config)
            .region(Region::new(region.to_owned()))
            .force_path_style(self.force_path_style)
            .build();
        aws_sdk_s3::Client::from_conf(config)
    }
}

#[async_trait::async_trait]
impl ObjectFetcher for AwsObjectFetcher {
    async fn fetch(&self, locator: &ObjectLocator) -> Result<Vec<u8>, FetchError> {
        self.verify_credentials().await?;

        let output = self
            .client_for(&locator.region)
            .get_object()
            .bucket(&locator.bucket)
            .key(&locator.key)
            .send()
            .await
            .map_err(classify)?;

        let capacity = output
            .content_length()
            .and_then(|len| usize::try_from(len).ok())
            .unwrap_or_default()
            .min(MAX_PREALLOCATE);

        let mut buffer = Vec::with_capacity(capacity);
        let mut body = output.body;
        while let Some(chunk) = body
            .try_next()
            .await
            .map_err(|e| FetchError::Read(DisplayErrorContext(&e).to_string()))?
        {
            buffer.extend_from_slice(&chunk);
        }

        Ok(buffer)
    }
}

fn classify(err: SdkError<GetObjectError>) -> FetchError {
    let reason = DisplayErrorContext(&err).to_string();
    match &err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => FetchError::Transport(reason),
        SdkError::ServiceError(service) => {
            let status = service.raw().status().as_u16();
            if service.err().is_no_such_key() || status == 404 {
                FetchError::NotFound(reason)
            } else {
                FetchError::Service {
                    status: Some(status),
                    reason,
                }
            }
        }
        _ => FetchError::Service {
            status: None,
            reason,
        },
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_s3::config::http::HttpResponse;
    use aws_sdk_s3::primitives::SdkBody;

    use super::*;

    #[test]
    fn timeouts_are_transport_failures() {
        let err = classify(SdkError::timeout_error("operation timed out"));
        assert!(matches!(err, FetchError::Transport(_)));
    }

    #[test]
    fn unparseable_responses_are_service_failures() {
        let raw = HttpResponse::new(200.try_into().unwrap(), SdkBody::from("<not xml"));
        let err = classify(SdkError::response_error("failed to parse response", raw));
        assert!(matches!(err, FetchError::Service { status: None, .. }));
    }
}
