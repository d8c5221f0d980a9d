use async_trait::async_trait;

use super::{
    error::LlmError,
    types::{ChatCompletionRequest, ChatCompletionResponse, EmbeddingRequest, EmbeddingResponse},
};

/// One network round trip to a chat/embedding provider.
///
/// Implementations make exactly one attempt per call; recovery lives in
/// [`ChatClient`](crate::ChatClient).
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn chat(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, LlmError>;

    async fn embed(&self, request: &EmbeddingRequest) -> Result<EmbeddingResponse, LlmError>;
}
