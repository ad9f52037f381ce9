use std::sync::{PoisonError, RwLock};

use crate::error::ProviderError;

/// Holds a provider's transport resource between construction and shutdown.
///
/// `acquire` hands out a clone for one call, so in-flight retrievals keep
/// working while `release` drops the provider's own handle. Once released,
/// every later `acquire` fails with [`ProviderError::ShutDown`].
#[derive(Debug)]
pub struct Lifecycle<T> {
    scheme: &'static str,
    slot: RwLock<Option<T>>,
}

impl<T: Clone> Lifecycle<T> {
    pub fn new(scheme: &'static str, resource: T) -> Self {
        Self {
            scheme,
            slot: RwLock::new(Some(resource)),
        }
    }

    pub fn acquire(&self, uri: &str) -> Result<T, ProviderError> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| ProviderError::ShutDown {
                uri: uri.to_owned(),
                scheme: self.scheme.to_owned(),
            })
    }

    /// Take the resource out. Returns it on the first call and `None` after.
    pub fn release(&self) -> Option<T> {
        self.slot
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::ErrorKind;

    use super::*;

    #[test]
    fn acquire_until_released() {
        let lifecycle = Lifecycle::new("http", Arc::new(7));
        assert_eq!(*lifecycle.acquire("http://a").unwrap(), 7);

        assert!(lifecycle.release().is_some());

        let err = lifecycle.acquire("http://a").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ShutDown);
        assert_eq!(err.uri(), "http://a");
    }

    #[test]
    fn release_is_idempotent() {
        let lifecycle = Lifecycle::new("s3", ());
        assert!(lifecycle.release().is_some());
        assert!(lifecycle.release().is_none());
        assert!(lifecycle.release().is_none());
    }

    #[test]
    fn held_clone_survives_release() {
        let lifecycle = Lifecycle::new("https", Arc::new(String::from("client")));
        let held = lifecycle.acquire("https://a").unwrap();
        lifecycle.release();
        assert_eq!(held.as_str(), "client");
        assert_eq!(Arc::strong_count(&held), 1);
    }
}
