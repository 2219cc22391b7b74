//! API clients for the xq-fitness read and write services
//!
//! Each resource group is a capability trait (see [`read`] and [`write`])
//! with a `reqwest` implementation. Workflow tests only see the traits, so
//! any other client (a generated one, an in-memory fake) can stand in.

pub mod models;
pub mod read;
pub mod write;

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Result type for API calls
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Failure of a single API call
#[derive(Error, Debug)]
pub enum ApiError {
    /// The service answered with a non-2xx status
    #[error("API Error: {status}: {body}")]
    Response { status: u16, body: String },

    /// The request never produced a response
    #[error("API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A 2xx response whose body does not match the expected model
    #[error("Failed to decode response with status {status}: {message}")]
    Decode { status: u16, message: String },
}

/// Response envelope: HTTP status plus decoded payload
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub data: T,
}

/// Connection settings shared by the clients of one service
///
/// Building a configuration performs no network I/O.
#[derive(Debug, Clone)]
pub struct Configuration {
    /// Service root, e.g. `http://localhost:8080/xq-fitness-read-service/api/v1`
    pub base_path: String,
    http: reqwest::Client,
}

impl Configuration {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self::with_client(base_path, reqwest::Client::new())
    }

    /// Use a preconfigured `reqwest` client (timeouts, proxies, ...)
    pub fn with_client(base_path: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            base_path: base_path.into(),
            http,
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_path, path)
    }

    pub(crate) fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.get(self.url(path))
    }

    pub(crate) fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.post(self.url(path))
    }

    pub(crate) fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.put(self.url(path))
    }

    pub(crate) fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.delete(self.url(path))
    }
}

/// Send a request and decode a JSON body
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> ApiResult<ApiResponse<T>> {
    let (status, body) = send(request).await?;
    let data = serde_json::from_str(&body).map_err(|e| ApiError::Decode {
        status,
        message: e.to_string(),
    })?;
    Ok(ApiResponse { status, data })
}

/// Send a request whose response body is ignored
pub(crate) async fn send_empty(request: reqwest::RequestBuilder) -> ApiResult<ApiResponse<()>> {
    let (status, _) = send(request).await?;
    Ok(ApiResponse { status, data: () })
}

async fn send(request: reqwest::RequestBuilder) -> ApiResult<(u16, String)> {
    let response = request
        .header("Accept", "application/json")
        .send()
        .await?;
    let status = response.status().as_u16();
    let body = response.text().await?;

    tracing::debug!(status, "API response");

    if !(200..300).contains(&status) {
        return Err(ApiError::Response { status, body });
    }
    Ok((status, body))
}
