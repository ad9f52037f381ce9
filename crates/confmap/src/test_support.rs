use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio_util::sync::CancellationToken;

use crate::lifecycle::Lifecycle;
use crate::provider::{decode, run_cancellable};
use crate::scheme::{SchemeForm, SchemeMatcher};
use crate::{Provider, ProviderError, Retrieved, WatcherFn};

/// In-memory provider for testing. Serves fixed YAML documents keyed by URI.
pub struct StaticProvider {
    matcher: SchemeMatcher,
    documents: HashMap<String, String>,
    lifecycle: Lifecycle<()>,
    fetches: AtomicUsize,
}

impl StaticProvider {
    /// A provider for a `scheme://` style scheme.
    pub fn new(scheme: &'static str) -> Self {
        Self::with_form(scheme, SchemeForm::Hierarchical)
    }

    /// A provider for a `scheme:` style scheme.
    pub fn opaque(scheme: &'static str) -> Self {
        Self::with_form(scheme, SchemeForm::Opaque)
    }

    fn with_form(scheme: &'static str, form: SchemeForm) -> Self {
        Self {
            matcher: SchemeMatcher::new(scheme, form),
            documents: HashMap::new(),
            lifecycle: Lifecycle::new(scheme, ()),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn add(&mut self, uri: impl Into<String>, yaml: impl Into<String>) {
        self.documents.insert(uri.into(), yaml.into());
    }

    /// Number of retrievals that got past the scheme check.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Provider for StaticProvider {
    async fn retrieve(
        &self,
        cancel: &CancellationToken,
        uri: &str,
        _watcher: Option<WatcherFn>,
    ) -> Result<Retrieved, ProviderError> {
        self.matcher.check(uri)?;
        self.lifecycle.acquire(uri)?;
        self.fetches.fetch_add(1, Ordering::SeqCst);

        run_cancellable(cancel, uri, async {
            let doc = self
                .documents
                .get(uri)
                .ok_or_else(|| ProviderError::RemoteNotFound {
                    uri: uri.to_owned(),
                    reason: "no such document".into(),
                })?;
            decode(uri, doc.as_bytes())
        })
        .await
    }

    fn scheme(&self) -> &str {
        self.matcher.scheme()
    }

    async fn shutdown(&self) -> Result<(), ProviderError> {
        self.lifecycle.release();
        Ok(())
    }
}
