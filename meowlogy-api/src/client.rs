use std::env;
use std::time::Duration;

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Handle to the cat-facts collaborator. Cheap to clone; every call is an
/// independent request/response round trip.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Option<Duration>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("meowlogy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self {
            http,
            base_url: normalize_base_url(&base_url.into()),
            timeout: None,
        })
    }

    /// Bound the request/response calls. The ask-ai stream is never bounded.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_env() -> Result<Self, ApiError> {
        let base_url = env::var("MEOWLOGY_API_URL")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let timeout = env::var("MEOWLOGY_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Ok(Self::new(base_url)?.with_timeout(timeout))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Apply the optional timeout and send.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let request = match self.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        };

        request.send().await.map_err(ApiError::Network)
    }
}

/// Read a 2xx JSON body, or turn a non-2xx answer into [`ApiError::Server`].
pub(crate) async fn read_json<T>(response: Response, fallback: &str) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    if !status.is_success() {
        return Err(server_error(response, fallback).await);
    }

    let body = response.bytes().await.map_err(ApiError::Network)?;
    serde_json::from_slice(&body).map_err(|e| ApiError::Format(e.to_string()))
}

/// Build a server error from a non-2xx response, preferring the collaborator's
/// own `detail` or `message` over the caller's fallback text.
pub(crate) async fn server_error(response: Response, fallback: &str) -> ApiError {
    let status = response.status().as_u16();
    let body = match response.bytes().await {
        Ok(body) => body,
        Err(e) => return ApiError::Network(e),
    };

    let detail = serde_json::from_slice::<Value>(&body)
        .ok()
        .and_then(|value| extract_detail(&value))
        .unwrap_or_else(|| fallback.to_owned());

    debug!(status, %detail, "collaborator returned an error status");
    ApiError::Server { status, detail }
}

pub(crate) fn extract_detail(value: &Value) -> Option<String> {
    let detail = match value.get("detail") {
        Some(Value::String(text)) => Some(text.clone()),
        // Request validation failures arrive as a list of {loc, msg, type}.
        Some(Value::Array(items)) => items
            .iter()
            .find_map(|item| item.get("msg").and_then(Value::as_str))
            .map(str::to_owned),
        _ => None,
    };

    detail
        .or_else(|| {
            value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .filter(|text| !text.trim().is_empty())
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}
