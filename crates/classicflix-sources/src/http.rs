use crate::error::{Result, SourceError};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("ClassicFlix/", env!("CARGO_PKG_VERSION"));

/// Shared client settings for every upstream service
pub fn create_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Turn a non-2xx response into [`SourceError::Status`] carrying the body text
pub async fn check_status(service: &'static str, response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    Err(SourceError::Status {
        service,
        status,
        message,
    })
}

/// Read a successful response body as JSON
pub async fn read_json<T: DeserializeOwned>(service: &'static str, response: Response) -> Result<T> {
    let response = check_status(service, response).await?;
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| SourceError::parse(service, e))
}
