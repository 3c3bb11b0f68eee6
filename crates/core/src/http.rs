//! Shared HTTP client plumbing.
//!
//! One `reqwest::Client` is built per process and cloned into every adapter;
//! clones share the same connection pool.

use std::time::Duration;

use reqwest::{Client, Response};

use crate::source::SourceError;

/// Timeout applied to every outbound request.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Build the shared HTTP client.
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("marquee/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Map a reqwest failure onto the source error taxonomy.
pub(crate) fn classify_error(e: reqwest::Error) -> SourceError {
    if e.is_timeout() {
        SourceError::Timeout
    } else if e.is_decode() {
        SourceError::Decode(e.to_string())
    } else if e.is_connect() {
        SourceError::ConnectionFailed(e.to_string())
    } else if let Some(status) = e.status() {
        SourceError::HttpStatus {
            status: status.as_u16(),
            message: e.to_string(),
        }
    } else {
        SourceError::ConnectionFailed(e.to_string())
    }
}

/// Turn a non-2xx response into `SourceError::HttpStatus`.
pub(crate) async fn ensure_success(response: Response) -> Result<Response, SourceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(SourceError::HttpStatus {
        status: status.as_u16(),
        message: body.chars().take(200).collect(),
    })
}

/// Decode a JSON body, reporting failures as `SourceError::Decode`.
pub(crate) async fn decode_json<T>(response: Response) -> Result<T, SourceError>
where
    T: serde::de::DeserializeOwned,
{
    let body = response.bytes().await.map_err(classify_error)?;
    serde_json::from_slice(&body).map_err(|e| SourceError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_client() {
        assert!(build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS)).is_ok());
    }
}
