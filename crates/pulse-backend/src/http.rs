use crate::error::{BackendError, BackendResult};
use reqwest::header::HeaderMap;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

pub(crate) async fn send_with_retry<F>(path: &str, mut build: F) -> BackendResult<Response>
where
    F: FnMut() -> RequestBuilder,
{
    let mut attempt = 1;
    loop {
        let response = build()
            .send()
            .await
            .map_err(|source| BackendError::Transport {
                path: path.to_string(),
                source,
            })?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if is_retryable(status) && attempt < MAX_ATTEMPTS {
            let delay = retry_delay(response.headers());
            debug!(
                path,
                status = %status,
                attempt,
                delay_ms = delay.as_millis() as u64,
                "Retrying backend request"
            );
            let _ = response.bytes().await;
            tokio::time::sleep(delay).await;
            attempt += 1;
            continue;
        }
        let body = response.text().await.unwrap_or_default();
        return Err(BackendError::Status {
            path: path.to_string(),
            status,
            body,
        });
    }
}

pub(crate) async fn decode<T>(path: &str, response: Response) -> BackendResult<T>
where
    T: DeserializeOwned,
{
    let bytes = response
        .bytes()
        .await
        .map_err(|source| BackendError::Transport {
            path: path.to_string(),
            source,
        })?;
    serde_json::from_slice(&bytes).map_err(|source| BackendError::Decode {
        path: path.to_string(),
        source,
    })
}

fn is_retryable(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE
    )
}

fn retry_delay(headers: &HeaderMap) -> Duration {
    retry_after_seconds(headers)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_RETRY_DELAY)
        .min(MAX_RETRY_DELAY)
}

fn retry_after_seconds(headers: &HeaderMap) -> Option<u64> {
    headers
        .get("retry-after")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
}
