use bytes::Bytes;
use futures::{StreamExt, stream::BoxStream};
use reqwest::StatusCode;
use tracing::debug;

use crate::{
    client::{ApiClient, server_error},
    error::ApiError,
    model::AskRequest,
};

/// Raw body chunks of a streaming answer, in arrival order.
pub type ChunkStream = BoxStream<'static, Result<Bytes, ApiError>>;

impl ApiClient {
    /// `POST /api/ask-ai` and hand back the open body stream. The answer is
    /// plain incremental text with no framing; callers decode it themselves.
    pub async fn ask_ai(&self, question: &str) -> Result<ChunkStream, ApiError> {
        let response = self
            .http()
            .post(self.url("/api/ask-ai"))
            .json(&AskRequest { question })
            .send()
            .await
            .map_err(ApiError::Network)?;

        let status = response.status();
        if !status.is_success() {
            let fallback = format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Status")
            );
            return Err(server_error(response, &fallback).await);
        }

        if status == StatusCode::NO_CONTENT || response.content_length() == Some(0) {
            return Err(ApiError::NoBody);
        }

        debug!(status = status.as_u16(), "ask-ai stream opened");
        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(ApiError::Network))
            .boxed())
    }
}
