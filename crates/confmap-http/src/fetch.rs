use std::error::Error as StdError;

use confmap::ProviderError;
use reqwest::StatusCode;

/// Longest slice of an error response body kept for diagnostics.
const ERROR_BODY_LIMIT: usize = 256;

/// GET `uri` and read the whole body.
///
/// Statuses 200..=399 are success. 404 and 410 are `RemoteNotFound`, every
/// other 4xx/5xx is `Remote`. Send failures are `Transport` and body read
/// failures are `Read`.
pub(crate) async fn get_bytes(client: &reqwest::Client, uri: &str) -> Result<Vec<u8>, ProviderError> {
    let response = client
        .get(uri)
        .send()
        .await
        .map_err(|e| ProviderError::Transport {
            uri: uri.to_owned(),
            reason: error_chain(&e),
        })?;

    let status = response.status();
    if status.as_u16() >= 400 {
        let body = error_snippet(response).await;
        return Err(status_error(uri, status, &body));
    }

    let body = response.bytes().await.map_err(|e| ProviderError::Read {
        uri: uri.to_owned(),
        reason: error_chain(&e),
    })?;

    Ok(body.to_vec())
}

/// Read just enough of an error body to fill the diagnostic snippet.
async fn error_snippet(mut response: reqwest::Response) -> String {
    // A char is at most four bytes.
    let byte_limit = ERROR_BODY_LIMIT * 4;
    let mut collected = Vec::new();
    while collected.len() < byte_limit {
        match response.chunk().await {
            Ok(Some(chunk)) => collected.extend_from_slice(&chunk),
            Ok(None) | Err(_) => break,
        }
    }
    collected.truncate(byte_limit);
    String::from_utf8_lossy(&collected).into_owned()
}

fn status_error(uri: &str, status: StatusCode, body: &str) -> ProviderError {
    let mut reason = format!("HTTP {status}");
    let body = body.trim();
    if !body.is_empty() {
        let snippet: String = body.chars().take(ERROR_BODY_LIMIT).collect();
        reason.push_str(": ");
        reason.push_str(&snippet);
    }

    match status {
        StatusCode::NOT_FOUND | StatusCode::GONE => ProviderError::RemoteNotFound {
            uri: uri.to_owned(),
            reason,
        },
        _ => ProviderError::Remote {
            uri: uri.to_owned(),
            status: Some(status.as_u16()),
            reason,
        },
    }
}

/// Render an error together with its `source()` chain.
///
/// reqwest's `Display` stops at the top level, which hides the connect or
/// TLS cause.
pub(crate) fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut rendered = err.to_string();
    let mut current = err.source();
    while let Some(cause) = current {
        let text = cause.to_string();
        if !rendered.contains(&text) {
            rendered.push_str(": ");
            rendered.push_str(&text);
        }
        current = cause.source();
    }
    rendered
}
