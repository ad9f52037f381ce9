use std::fmt;
use std::str::FromStr;

const PREFIX: &str = "s3://";
const SERVICE_MARKER: &str = ".amazonaws.com/";
const SERVICE_LABEL: &str = "s3";

/// Why a URI could not be decomposed into an [`ObjectLocator`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocatorError {
    #[error("expected the uri to start with \"s3://\"")]
    MissingPrefix,

    #[error("expected \"{{bucket}}.s3.{{region}}.amazonaws.com/{{key}}\"")]
    MissingServiceDomain,

    #[error("expected host \"{{bucket}}.s3.{{region}}\", found {0:?}")]
    MalformedHost(String),

    #[error("bucket is empty")]
    EmptyBucket,

    #[error("region is empty")]
    EmptyRegion,

    #[error("key is empty")]
    EmptyKey,
}

/// The `(bucket, region, key)` triple addressing one stored object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectLocator {
    pub bucket: String,
    pub region: String,
    pub key: String,
}

impl ObjectLocator {
    /// Split a virtual-hosted-style URI,
    /// `s3://{bucket}.s3.{region}.amazonaws.com/{key}`.
    ///
    /// The key is everything after the first `.amazonaws.com/` and may hold
    /// further `/` or `.` characters.
    pub fn parse(uri: &str) -> Result<Self, LocatorError> {
        let rest = uri.strip_prefix(PREFIX).ok_or(LocatorError::MissingPrefix)?;
        let (host, key) = rest
            .split_once(SERVICE_MARKER)
            .ok_or(LocatorError::MissingServiceDomain)?;

        let segments: Vec<&str> = host.split('.').collect();
        let [bucket, service, region] = segments.as_slice() else {
            return Err(LocatorError::MalformedHost(host.to_owned()));
        };
        if *service != SERVICE_LABEL {
            return Err(LocatorError::MalformedHost(host.to_owned()));
        }

        if bucket.is_empty() {
            return Err(LocatorError::EmptyBucket);
        }
        if region.is_empty() {
            return Err(LocatorError::EmptyRegion);
        }
        if key.is_empty() {
            return Err(LocatorError::EmptyKey);
        }

        Ok(Self {
            bucket: (*bucket).to_owned(),
            region: (*region).to_owned(),
            key: key.to_owned(),
        })
    }
}

impl FromStr for ObjectLocator {
    type Err = LocatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ObjectLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{PREFIX}{}.{SERVICE_LABEL}.{}{SERVICE_MARKER}{}",
            self.bucket, self.region, self.key
        )
    }
}
