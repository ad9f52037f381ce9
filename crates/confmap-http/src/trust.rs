use std::path::{Path, PathBuf};

use crate::config::HttpsProviderConfig;

/// Errors building the HTTPS trust configuration.
///
/// All of these happen at construction, before any request is made.
#[derive(Debug, thiserror::Error)]
pub enum TrustError {
    #[error("no CA certificate file configured (set SSL_CERT_FILE or pass a path)")]
    MissingCaFile,

    #[error("unable to read CA certificate file {}: {source}", path.display())]
    ReadCaFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse CA certificate file {}: {reason}", path.display())]
    InvalidCaFile { path: PathBuf, reason: String },

    #[error("CA certificate file {} contains no certificates", path.display())]
    NoCertificates { path: PathBuf },

    #[error("unable to build HTTPS client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Platform roots plus the certificates loaded from the configured CA file.
#[derive(Debug, Clone)]
pub struct TrustRoots {
    ca_file: Option<PathBuf>,
    extra: Vec<reqwest::Certificate>,
}

impl TrustRoots {
    /// Load the extra CA file named by `config`.
    ///
    /// An unset path is an error unless `require_ca_file` is false, in which
    /// case only the platform roots are trusted. Nothing here ever disables
    /// certificate verification.
    pub fn load(config: &HttpsProviderConfig) -> Result<Self, TrustError> {
        let Some(path) = config.ca_file.as_deref().filter(|p| !p.as_os_str().is_empty()) else {
            if config.require_ca_file {
                return Err(TrustError::MissingCaFile);
            }
            tracing::warn!("no CA certificate file configured; trusting platform roots only");
            return Ok(Self {
                ca_file: None,
                extra: Vec::new(),
            });
        };

        let extra = read_certificates(path)?;
        tracing::debug!(path = %path.display(), count = extra.len(), "loaded CA certificates");

        Ok(Self {
            ca_file: Some(path.to_owned()),
            extra,
        })
    }

    pub fn ca_file(&self) -> Option<&Path> {
        self.ca_file.as_deref()
    }

    /// Number of certificates trusted on top of the platform roots.
    pub fn extra_count(&self) -> usize {
        self.extra.len()
    }

    /// Add the extra roots to a client builder. Platform roots stay enabled.
    pub(crate) fn apply(&self, mut builder: reqwest::ClientBuilder) -> reqwest::ClientBuilder {
        for cert in &self.extra {
            builder = builder.add_root_certificate(cert.clone());
        }
        builder.https_only(true)
    }
}

fn read_certificates(path: &Path) -> Result<Vec<reqwest::Certificate>, TrustError> {
    let pem = std::fs::read(path).map_err(|source| TrustError::ReadCaFile {
        path: path.to_owned(),
        source,
    })?;

    let certs = reqwest::Certificate::from_pem_bundle(&pem).map_err(|e| TrustError::InvalidCaFile {
        path: path.to_owned(),
        reason: e.to_string(),
    })?;

    if certs.is_empty() {
        return Err(TrustError::NoCertificates {
            path: path.to_owned(),
        });
    }

    Ok(certs)
}
