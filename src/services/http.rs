use crate::{MapError, Result};
use once_cell::sync::Lazy;
use serde::{de::DeserializeOwned, Deserialize};
use std::time::Duration;

/// Shared async HTTP client. Building the client once avoids TLS and
/// connection pool setup for every request.
pub(crate) static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .user_agent(concat!("mapjitsu/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .unwrap_or_else(|e| {
            log::warn!("falling back to default HTTP client: {}", e);
            reqwest::Client::new()
        })
});

/// Error body returned by the MapJitsu proxies: `{ "error": ..., "details": ... }`
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

/// Parses a response body, turning non-success statuses into typed errors.
///
/// A 400 becomes [`MapError::Validation`] carrying the proxy's issue list;
/// any other failure status becomes [`MapError::Service`].
pub(crate) async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        return Ok(serde_json::from_str(&body)?);
    }

    Err(error_from_body(status.as_u16(), &body))
}

pub(crate) fn error_from_body(status: u16, body: &str) -> MapError {
    let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();

    if status == 400 {
        let details = parsed
            .as_ref()
            .and_then(|b| b.details.as_ref())
            .map(detail_messages)
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| {
                vec![parsed
                    .as_ref()
                    .map(|b| b.error.clone())
                    .unwrap_or_else(|| "Invalid request".to_string())]
            });
        return MapError::Validation { details };
    }

    let message = match parsed {
        Some(ErrorBody { error, .. }) => error,
        None if body.trim().is_empty() => format!("HTTP {status}"),
        None => body.trim().to_string(),
    };
    MapError::Service { status, message }
}

/// Flattens a proxy `details` value (a list of issues or a string) into messages
fn detail_messages(details: &serde_json::Value) -> Vec<String> {
    match details {
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| {
                let message = item
                    .get("message")
                    .and_then(|m| m.as_str())
                    .unwrap_or("invalid value");
                match item.get("path").and_then(|p| p.as_array()) {
                    Some(path) if !path.is_empty() => {
                        let path: Vec<String> = path
                            .iter()
                            .map(|seg| match seg {
                                serde_json::Value::String(s) => s.clone(),
                                other => other.to_string(),
                            })
                            .collect();
                        format!("{}: {}", path.join("."), message)
                    }
                    _ => message.to_string(),
                }
            })
            .collect(),
        serde_json::Value::String(s) => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// Joins a base URL and an absolute path without doubling slashes
pub(crate) fn endpoint(base: &str, path: &str) -> Result<reqwest::Url> {
    let joined = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    reqwest::Url::parse(&joined).map_err(|e| MapError::Config(format!("invalid URL {joined}: {e}")))
}
