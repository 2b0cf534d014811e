//! LLM Gateway port
//!
//! Defines the interface for communicating with LLM providers.
//! Implementations (adapters) are provider-specific and live outside this
//! crate; the engine only sees this boundary.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use trinity_domain::{FinishReason, Message, Provider, TokenUsage};

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limited by provider")]
    RateLimited,

    #[error("Transport closed")]
    TransportClosed,

    #[error("Other error: {0}")]
    Other(String),
}

/// One fully-specified provider call.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub messages: Vec<Message>,
    pub model: String,
    pub provider: Provider,
    pub api_key: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// A completed provider response.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub usage: TokenUsage,
    pub finish_reason: FinishReason,
}

/// One chunk of a streaming provider response.
#[derive(Debug, Clone)]
pub struct ChunkEvent {
    /// The new text in this chunk.
    pub delta: String,
    /// Accumulated text so far, including this chunk.
    pub content: String,
    /// True on the final chunk.
    pub is_complete: bool,
    /// Usage, reported on the final chunk when the provider supplies it.
    pub usage: Option<TokenUsage>,
    /// Finish reason, reported on the final chunk.
    pub finish_reason: Option<FinishReason>,
}

/// Handle for receiving streaming chunks from a provider call.
///
/// Wraps an `mpsc::Receiver<ChunkEvent>` and provides convenience methods
/// for consuming the stream.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<ChunkEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<ChunkEvent>) -> Self {
        Self { receiver }
    }

    /// Consume the stream and assemble the final response.
    ///
    /// Useful when streaming at the transport level but only the final
    /// text is needed.
    pub async fn collect_response(mut self) -> Result<LlmResponse, GatewayError> {
        let mut content = String::new();
        let mut usage = None;
        let mut finish_reason = None;
        while let Some(chunk) = self.receiver.recv().await {
            content = chunk.content;
            if chunk.usage.is_some() {
                usage = chunk.usage;
            }
            if chunk.finish_reason.is_some() {
                finish_reason = chunk.finish_reason;
            }
            if chunk.is_complete {
                return Ok(LlmResponse {
                    content,
                    usage: usage.unwrap_or_default(),
                    finish_reason: finish_reason.unwrap_or(FinishReason::Stop),
                });
            }
        }
        // Channel closed without a final chunk
        Err(GatewayError::TransportClosed)
    }
}

/// Gateway for LLM communication
///
/// One implementation per provider (or one multiplexing implementation
/// routing on [`LlmRequest::provider`]).
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send a request and wait for the complete response.
    async fn invoke(&self, request: LlmRequest) -> Result<LlmResponse, GatewayError>;

    /// Send a request and receive the response incrementally.
    ///
    /// Default implementation calls `invoke()` and wraps the result in a
    /// single terminal chunk, so non-streaming adapters work unchanged.
    async fn invoke_streaming(&self, request: LlmRequest) -> Result<StreamHandle, GatewayError> {
        let response = self.invoke(request).await?;
        let (tx, rx) = mpsc::channel(1);
        // If the receiver is dropped immediately, that's fine
        let _ = tx
            .send(ChunkEvent {
                delta: response.content.clone(),
                content: response.content,
                is_complete: true,
                usage: Some(response.usage),
                finish_reason: Some(response.finish_reason),
            })
            .await;
        Ok(StreamHandle::new(rx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoGateway;

    #[async_trait]
    impl LlmGateway for EchoGateway {
        async fn invoke(&self, request: LlmRequest) -> Result<LlmResponse, GatewayError> {
            Ok(LlmResponse {
                content: format!("echo: {}", request.messages.last().unwrap().content),
                usage: TokenUsage::new(5, 7),
                finish_reason: FinishReason::Stop,
            })
        }
    }

    fn request(text: &str) -> LlmRequest {
        LlmRequest {
            messages: vec![Message::user(text)],
            model: "m".to_string(),
            provider: Provider::OpenAi,
            api_key: "k".to_string(),
            temperature: 0.5,
            max_tokens: 100,
        }
    }

    #[tokio::test]
    async fn test_default_streaming_wraps_invoke() {
        let handle = EchoGateway.invoke_streaming(request("hi")).await.unwrap();
        let response = handle.collect_response().await.unwrap();
        assert_eq!(response.content, "echo: hi");
        assert_eq!(response.usage.total, 12);
        assert_eq!(response.finish_reason, FinishReason::Stop);
    }

    #[tokio::test]
    async fn test_collect_response_assembles_chunks() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(ChunkEvent {
            delta: "hel".to_string(),
            content: "hel".to_string(),
            is_complete: false,
            usage: None,
            finish_reason: None,
        })
        .await
        .unwrap();
        tx.send(ChunkEvent {
            delta: "lo".to_string(),
            content: "hello".to_string(),
            is_complete: true,
            usage: Some(TokenUsage::new(1, 2)),
            finish_reason: Some(FinishReason::Length),
        })
        .await
        .unwrap();
        drop(tx);

        let response = StreamHandle::new(rx).collect_response().await.unwrap();
        assert_eq!(response.content, "hello");
        assert_eq!(response.finish_reason, FinishReason::Length);
    }

    #[tokio::test]
    async fn test_collect_response_on_dropped_channel() {
        let (tx, rx) = mpsc::channel::<ChunkEvent>(1);
        drop(tx);
        let result = StreamHandle::new(rx).collect_response().await;
        assert!(matches!(result, Err(GatewayError::TransportClosed)));
    }
}
