/// Where the S3 fetcher gets its credentials.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum CredentialSource {
    /// The SDK's default chain: environment, profile, web identity, IMDS.
    #[default]
    DefaultChain,
    /// Fixed keys, typically read from the environment.
    Static {
        access_key_id: String,
        secret_access_key: String,
        session_token: Option<String>,
    },
}

impl std::fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DefaultChain => f.write_str("DefaultChain"),
            Self::Static { access_key_id, .. } => f
                .debug_struct("Static")
                .field("access_key_id", access_key_id)
                .finish_non_exhaustive(),
        }
    }
}

/// Configuration for [`AwsObjectFetcher`](crate::AwsObjectFetcher).
#[derive(Debug, Clone, Default)]
pub struct S3ProviderConfig {
    pub credentials: CredentialSource,
    /// Override the service endpoint, e.g. for MinIO or tests.
    pub endpoint_url: Option<String>,
    /// Address objects as `endpoint/bucket/key` instead of `bucket.endpoint/key`.
    pub force_path_style: bool,
}

impl S3ProviderConfig {
    /// Read static keys from `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`
    /// (and `AWS_SESSION_TOKEN`), falling back to the default chain when
    /// they are not both set. `AWS_ENDPOINT_URL_S3` overrides the endpoint.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        let credentials = match (var("AWS_ACCESS_KEY_ID"), var("AWS_SECRET_ACCESS_KEY")) {
            (Some(access_key_id), Some(secret_access_key)) => CredentialSource::Static {
                access_key_id,
                secret_access_key,
                session_token: var("AWS_SESSION_TOKEN"),
            },
            _ => CredentialSource::DefaultChain,
        };

        Self {
            credentials,
            endpoint_url: var("AWS_ENDPOINT_URL_S3"),
            force_path_style: false,
        }
    }
}
