//! Shared HTTP plumbing for the provider clients.

use std::time::Duration;

use reqwest::{Client, Response};

use crate::{Error, Result};

/// Default request timeout for provider clients.
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the HTTP client shared by a provider.
pub(crate) fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {e}")))
}

/// Pass successful responses through; map failures to [`Error`].
///
/// 401/403 → `AuthenticationFailed`, 429 → `QuotaExceeded` when the body
/// mentions a quota and `RateLimited` otherwise, anything else → `Api`.
pub(crate) async fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs);
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| status.to_string());

    match status.as_u16() {
        401 | 403 => Err(Error::AuthenticationFailed),
        429 if message.to_lowercase().contains("quota") => Err(Error::QuotaExceeded(message)),
        429 => Err(Error::RateLimited { retry_after }),
        code => Err(Error::Api {
            status: code,
            message,
        }),
    }
}

/// Extract a human-readable message from an error body.
///
/// Understands `{"error": "msg"}` and `{"error": {"message": "msg"}}`.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let error = value.get("error")?;
    error
        .as_str()
        .or_else(|| error.get("message").and_then(|m| m.as_str()))
        .map(str::to_string)
}
