use std::fmt;
use std::sync::Arc;

/// Notification that a previously retrieved configuration may have changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub uri: String,
    /// Set when watching itself failed; the retrieved value is then stale.
    pub error: Option<String>,
}

impl ChangeEvent {
    pub fn changed(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            error: None,
        }
    }

    pub fn failed(uri: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            Some(err) => write!(f, "watch failed for {}: {err}", self.uri),
            None => write!(f, "{} changed", self.uri),
        }
    }
}

/// Caller-supplied change callback passed to `retrieve`.
///
/// The bundled providers are static and never invoke it.
pub type WatcherFn = Arc<dyn Fn(ChangeEvent) + Send + Sync>;

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn constructors() {
        let ok = ChangeEvent::changed("http://a/b");
        assert!(!ok.is_error());
        assert_eq!(ok.to_string(), "http://a/b changed");

        let failed = ChangeEvent::failed("http://a/b", "boom");
        assert!(failed.is_error());
        assert_eq!(failed.to_string(), "watch failed for http://a/b: boom");
    }

    #[test]
    fn watcher_fn_is_callable_through_arc() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let watcher: WatcherFn = Arc::new(move |event| sink.lock().unwrap().push(event));

        watcher(ChangeEvent::changed("s3:x"));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }
}
