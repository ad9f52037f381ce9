use crate::error::ProviderError;

/// How a scheme is separated from the rest of the URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeForm {
    /// `scheme://...`, as used by `http` and `https`.
    Hierarchical,
    /// `scheme:...`, as used by `s3`.
    Opaque,
}

/// Prefix test deciding whether a URI belongs to a provider.
///
/// Matching is a pure string check, so it always runs before any I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemeMatcher {
    scheme: &'static str,
    prefix: String,
}

impl SchemeMatcher {
    pub fn new(scheme: &'static str, form: SchemeForm) -> Self {
        let prefix = match form {
            SchemeForm::Hierarchical => format!("{scheme}://"),
            SchemeForm::Opaque => format!("{scheme}:"),
        };
        Self { scheme, prefix }
    }

    pub fn scheme(&self) -> &'static str {
        self.scheme
    }

    pub fn matches(&self, uri: &str) -> bool {
        uri.starts_with(&self.prefix)
    }

    /// Reject a URI that does not carry this scheme.
    pub fn check(&self, uri: &str) -> Result<(), ProviderError> {
        if self.matches(uri) {
            Ok(())
        } else {
            Err(ProviderError::UnsupportedScheme {
                uri: uri.to_owned(),
                scheme: self.scheme.to_owned(),
            })
        }
    }
}

/// Extract the scheme token from a URI: everything before the first `:`.
///
/// Returns `None` when there is no `:` or the token is empty.
pub fn scheme_of(uri: &str) -> Option<&str> {
    let (scheme, _) = uri.split_once(':')?;
    (!scheme.is_empty()).then_some(scheme)
}
