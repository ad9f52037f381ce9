use std::fmt;

use crate::retrieved::DecodeError;

/// Coarse classification of a [`ProviderError`], convenient for matching
/// without destructuring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnsupportedScheme,
    MalformedUri,
    AuthConfigurationMissing,
    Transport,
    RemoteNotFound,
    Remote,
    Read,
    Decode,
    Cancelled,
    ShutDown,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UnsupportedScheme => "unsupported scheme",
            Self::MalformedUri => "malformed uri",
            Self::AuthConfigurationMissing => "auth configuration missing",
            Self::Transport => "transport failure",
            Self::RemoteNotFound => "remote not found",
            Self::Remote => "remote error",
            Self::Read => "read failure",
            Self::Decode => "decode failure",
            Self::Cancelled => "cancelled",
            Self::ShutDown => "provider shut down",
        };
        f.write_str(name)
    }
}

/// Errors returned from a single `retrieve` call.
///
/// Every variant carries the offending URI. None of them are retried by the
/// provider; retry policy belongs to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{uri:?} uri is not supported by {scheme:?} provider")]
    UnsupportedScheme { uri: String, scheme: String },

    #[error("{uri:?} is not a valid uri: {reason}")]
    MalformedUri { uri: String, reason: String },

    #[error("missing auth configuration for {uri:?}: {reason}")]
    AuthConfigurationMissing { uri: String, reason: String },

    #[error("unable to download {uri:?}: {reason}")]
    Transport { uri: String, reason: String },

    #[error("{uri:?} not found: {reason}")]
    RemoteNotFound { uri: String, reason: String },

    #[error("remote error for {uri:?}: {reason}")]
    Remote {
        uri: String,
        status: Option<u16>,
        reason: String,
    },

    #[error("failed to read the response body from {uri:?}: {reason}")]
    Read { uri: String, reason: String },

    #[error("failed to decode configuration from {uri:?}: {source}")]
    Decode {
        uri: String,
        #[source]
        source: DecodeError,
    },

    #[error("retrieval of {uri:?} was cancelled")]
    Cancelled { uri: String },

    #[error("{scheme:?} provider has been shut down, cannot retrieve {uri:?}")]
    ShutDown { uri: String, scheme: String },
}

impl ProviderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedScheme { .. } => ErrorKind::UnsupportedScheme,
            Self::MalformedUri { .. } => ErrorKind::MalformedUri,
            Self::AuthConfigurationMissing { .. } => ErrorKind::AuthConfigurationMissing,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::RemoteNotFound { .. } => ErrorKind::RemoteNotFound,
            Self::Remote { .. } => ErrorKind::Remote,
            Self::Read { .. } => ErrorKind::Read,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::Cancelled { .. } => ErrorKind::Cancelled,
            Self::ShutDown { .. } => ErrorKind::ShutDown,
        }
    }

    /// The URI whose retrieval failed.
    pub fn uri(&self) -> &str {
        match self {
            Self::UnsupportedScheme { uri, .. }
            | Self::MalformedUri { uri, .. }
            | Self::AuthConfigurationMissing { uri, .. }
            | Self::Transport { uri, .. }
            | Self::RemoteNotFound { uri, .. }
            | Self::Remote { uri, .. }
            | Self::Read { uri, .. }
            | Self::Decode { uri, .. }
            | Self::Cancelled { uri }
            | Self::ShutDown { uri, .. } => uri,
        }
    }
}
