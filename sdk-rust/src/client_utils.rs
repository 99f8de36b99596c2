use crate::LanguageModelError;
use reqwest::{header::HeaderMap, Client};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

/// Create a JSON request, parse the response.
/// Any non-success status becomes [`LanguageModelError::StatusCode`].
pub async fn send_json<T: Serialize, R: DeserializeOwned>(
    client: &Client,
    url: &str,
    data: &T,
    headers: HeaderMap,
    timeout: Option<Duration>,
) -> Result<R, LanguageModelError> {
    let mut request = client.post(url).headers(headers).json(data);
    if let Some(timeout) = timeout {
        request = request.timeout(timeout);
    }

    let response = request.send().await?;
    let status = response.status();
    if status.is_success() {
        Ok(response.json::<R>().await?)
    } else {
        Err(LanguageModelError::StatusCode(
            status,
            response.text().await.unwrap_or_default(),
        ))
    }
}
