use anyhow::{Context, Result};
use confmap::{CancellationToken, ProviderRegistry, Retrieved};

use super::format::{self, Format};

/// Retrieve every URI concurrently, keeping the order given.
///
/// The first failure aborts the whole run and drops the retrievals still in
/// flight; partial output is never printed.
pub async fn fetch_all(
    registry: &ProviderRegistry,
    uris: &[String],
    cancel: &CancellationToken,
) -> Result<Vec<Retrieved>> {
    futures::future::try_join_all(uris.iter().map(|uri| async move {
        registry
            .retrieve(cancel, uri, None)
            .await
            .with_context(|| format!("failed to retrieve {uri}"))
    }))
    .await
}

pub async fn run(
    registry: &ProviderRegistry,
    uris: &[String],
    output: Format,
    cancel: &CancellationToken,
) -> Result<()> {
    let retrieved = fetch_all(registry, uris, cancel).await?;
    let documents: Vec<(&str, Retrieved)> = uris.iter().map(String::as_str).zip(retrieved).collect();

    print!("{}", format::render(&documents, output)?);
    Ok(())
}
