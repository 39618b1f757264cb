pub mod error;
pub mod extract;
pub mod types;

pub use error::{BrightdataError, Result};
pub use extract::extract;
pub use types::{ExtractedContent, Platform, SnapshotOutcome};

use std::time::Duration;

use serde_json::Value;

const BASE_URL: &str = "https://api.brightdata.com/datasets/v3";

/// Result downloads can lag well behind job submission; a loose timeout
/// keeps a slow-but-healthy provider from being misread as a transport
/// failure.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub struct SnapshotClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl SnapshotClient {
    pub fn new(token: String) -> Self {
        Self::with_base_url(token, BASE_URL)
    }

    pub fn with_base_url(token: String, base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Download the result set for one snapshot handle.
    ///
    /// One GET per call, no local retry: transport failures surface as
    /// errors and are retried at polling-cycle granularity by the caller.
    pub async fn fetch_snapshot(&self, handle: &str) -> Result<SnapshotOutcome> {
        let url = format!("{}/snapshot/{}?format=json", self.base_url, handle);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = resp.status();
        if status.as_u16() == 202 {
            tracing::debug!(handle, "Snapshot still processing");
            return Ok(SnapshotOutcome::Pending);
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(BrightdataError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = resp.json().await?;
        Ok(classify_body(body))
    }
}

/// Map a 200 body onto the provider-reported outcome.
///
/// Single-URL jobs return a one-element array; when more elements come
/// back only the first is used (provider contract assumption, logged so
/// the drop leaves a trail). An element carrying an `error` key marks the
/// whole download as a scrape failure.
pub fn classify_body(body: Value) -> SnapshotOutcome {
    let items = match body {
        Value::Array(items) => items,
        other => return SnapshotOutcome::Ready(other),
    };

    for item in &items {
        if let Some(error) = item.get("error") {
            return SnapshotOutcome::ProviderError {
                message: rendered(error),
                code: item.get("error_code").map(rendered),
            };
        }
    }

    if items.len() > 1 {
        tracing::debug!(
            dropped = items.len() - 1,
            "Multi-element snapshot result, using first element only"
        );
    }

    match items.into_iter().next() {
        Some(first) => SnapshotOutcome::Ready(first),
        // A completed job with zero records will never produce more by
        // retrying; report it as a scrape failure so the handle resolves.
        None => SnapshotOutcome::ProviderError {
            message: "empty result set".to_string(),
            code: None,
        },
    }
}

/// Strings come through unquoted; any other JSON value is rendered as-is.
fn rendered(value: &Value) -> String {
    match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn clean_array_yields_first_element() {
        let body = json!([{ "text": "one" }, { "text": "two" }]);
        assert_eq!(
            classify_body(body),
            SnapshotOutcome::Ready(json!({ "text": "one" }))
        );
    }

    #[test]
    fn error_element_yields_provider_error_with_code() {
        let body = json!([{ "error": "blocked", "error_code": "E1" }]);
        assert_eq!(
            classify_body(body),
            SnapshotOutcome::ProviderError {
                message: "blocked".to_string(),
                code: Some("E1".to_string()),
            }
        );
    }

    #[test]
    fn error_code_is_optional() {
        let body = json!([{ "text": "fine" }, { "error": "timed out" }]);
        assert_eq!(
            classify_body(body),
            SnapshotOutcome::ProviderError {
                message: "timed out".to_string(),
                code: None,
            }
        );
    }

    #[test]
    fn non_array_body_passes_through() {
        let body = json!({ "text": "single record" });
        assert_eq!(
            classify_body(body.clone()),
            SnapshotOutcome::Ready(body)
        );
    }

    #[test]
    fn empty_array_is_terminal() {
        assert_eq!(
            classify_body(json!([])),
            SnapshotOutcome::ProviderError {
                message: "empty result set".to_string(),
                code: None,
            }
        );
    }
}
