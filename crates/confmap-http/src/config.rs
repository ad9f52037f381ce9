use std::path::PathBuf;
use std::time::Duration;

/// Environment variable naming the extra CA certificate for HTTPS.
pub const CA_FILE_ENV: &str = "SSL_CERT_FILE";

const DEFAULT_USER_AGENT: &str = concat!("confmap/", env!("CARGO_PKG_VERSION"));

/// Configuration for the plain HTTP provider.
#[derive(Debug, Clone)]
pub struct HttpProviderConfig {
    /// Total request timeout, covering connect, send and body read.
    pub timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for HttpProviderConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpProviderConfig {
    pub(crate) fn client_builder(&self) -> reqwest::ClientBuilder {
        let mut builder = reqwest::Client::builder().user_agent(self.user_agent.clone());
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        builder
    }
}

/// Configuration for the HTTPS provider.
#[derive(Debug, Clone)]
pub struct HttpsProviderConfig {
    pub http: HttpProviderConfig,
    /// PEM file with one or more CA certificates trusted in addition to the
    /// platform roots.
    pub ca_file: Option<PathBuf>,
    /// Fail construction when `ca_file` is unset. Defaults to true.
    pub require_ca_file: bool,
}

impl Default for HttpsProviderConfig {
    fn default() -> Self {
        Self {
            http: HttpProviderConfig::default(),
            ca_file: None,
            require_ca_file: true,
        }
    }
}

impl HttpsProviderConfig {
    pub fn with_ca_file(ca_file: impl Into<PathBuf>) -> Self {
        Self {
            ca_file: Some(ca_file.into()),
            ..Self::default()
        }
    }

    /// Read the CA path from `SSL_CERT_FILE`. An empty value counts as unset.
    pub fn from_env() -> Self {
        let ca_file = std::env::var_os(CA_FILE_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self {
            ca_file,
            ..Self::default()
        }
    }
}
