//! Chat client with per-model request adaptation and failure recovery.

use tracing::{debug, error, info, warn};

use crate::core::{
    ChatCompletionRequest, ChatTransport, EmbeddingRequest, FinishReason, HttpClientConfig,
    KeyStore, LlmError, Message, RetryConfig, retry::RetryState, strict_format,
};
use crate::provider::{HttpTransport, ProviderProfile, constants};

pub const DEFAULT_STOP_SEQUENCE: &str = "***";

/// Returned by [`ChatClient::send_request`] once the retry budget is spent.
pub const TOO_MANY_RETRIES: &str = "Error: Too many retry attempts.";

/// Returned by [`ChatClient::send_request`] for failures that are not retried.
pub const REQUEST_FAILED: &str = "My brain disconnected, try again.";

#[derive(Debug, Clone)]
pub struct ChatClientConfig {
    pub model: String,
    /// Ignored for Grok models, which have a fixed endpoint
    pub base_url: Option<String>,
    pub embedding_model: String,
    pub http_config: HttpClientConfig,
    pub retry_config: RetryConfig,
}

impl ChatClientConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            base_url: None,
            embedding_model: constants::openai::DEFAULT_EMBEDDING_MODEL.to_string(),
            http_config: HttpClientConfig::default(),
            retry_config: RetryConfig::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    pub fn with_http_config(mut self, config: HttpClientConfig) -> Self {
        self.http_config = config;
        self
    }

    pub fn with_retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    pub fn profile(&self) -> ProviderProfile {
        ProviderProfile::resolve(&self.model, self.base_url.as_deref())
    }
}

/// How to resubmit after a recoverable failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Recovery {
    /// Drop the oldest turn and resubmit.
    Truncate,
    /// Wait, then resubmit unchanged.
    BackOff,
}

impl Recovery {
    /// `None` means the error is not worth retrying.
    fn for_error(err: &LlmError) -> Option<Self> {
        if err.is_context_overflow() {
            Some(Recovery::Truncate)
        } else if err.is_transient() {
            Some(Recovery::BackOff)
        } else {
            None
        }
    }
}

/// Chat-completion client bound to one model.
///
/// Holds no per-request state, so one instance can serve concurrent calls.
pub struct ChatClient<T = HttpTransport> {
    profile: ProviderProfile,
    embedding_model: String,
    retry_config: RetryConfig,
    transport: T,
}

impl ChatClient<HttpTransport> {
    /// Builds a client for `model`, reading credentials from `keys`.
    ///
    /// No network I/O happens here; the only failures are missing credentials
    /// and HTTP client construction.
    pub fn new(model: &str, base_url: Option<&str>, keys: &dyn KeyStore) -> Result<Self, LlmError> {
        let mut config = ChatClientConfig::new(model);
        config.base_url = base_url.map(str::to_string);
        Self::from_config(config, keys)
    }

    pub fn from_config(config: ChatClientConfig, keys: &dyn KeyStore) -> Result<Self, LlmError> {
        let profile = config.profile();
        let transport = HttpTransport::from_profile(&profile, keys, &config.http_config)?;
        debug!(
            provider = %profile.provider,
            model = %profile.model,
            base_url = %profile.base_url,
            "Chat client configured"
        );
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: ChatTransport> ChatClient<T> {
    pub fn with_transport(config: ChatClientConfig, transport: T) -> Self {
        Self {
            profile: config.profile(),
            embedding_model: config.embedding_model,
            retry_config: config.retry_config,
            transport,
        }
    }

    pub fn profile(&self) -> &ProviderProfile {
        &self.profile
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends `turns` with the default stop sequence. Never fails: errors come back
    /// as [`TOO_MANY_RETRIES`] or [`REQUEST_FAILED`].
    pub async fn send_request(&self, turns: &[Message], system_message: &str) -> String {
        self.send_request_with_stop(turns, system_message, DEFAULT_STOP_SEQUENCE)
            .await
    }

    pub async fn send_request_with_stop(
        &self,
        turns: &[Message],
        system_message: &str,
        stop_sequence: &str,
    ) -> String {
        match self.complete(turns, system_message, stop_sequence).await {
            Ok(content) => content,
            Err(LlmError::RetryExhausted { .. }) => TOO_MANY_RETRIES.to_string(),
            Err(err) => {
                error!(
                    error = %err,
                    status = ?err.status_code(),
                    model = %self.profile.model,
                    "Chat request failed"
                );
                REQUEST_FAILED.to_string()
            }
        }
    }

    /// Runs the request/recovery loop and reports failures as errors.
    ///
    /// Truncation and backoff draw on one shared attempt budget of
    /// `1 + max_retries` calls.
    #[tracing::instrument(
        name = "chat_request",
        skip(self, turns, system_message, stop_sequence),
        fields(model = %self.profile.model, turns = turns.len())
    )]
    pub async fn complete(
        &self,
        turns: &[Message],
        system_message: &str,
        stop_sequence: &str,
    ) -> Result<String, LlmError> {
        let mut retry = RetryState::new(self.retry_config.max_retries);
        let mut turns = turns;

        loop {
            if retry.is_exhausted() {
                error!(attempts = retry.attempt(), "Maximum retry attempts reached");
                return Err(LlmError::RetryExhausted {
                    attempts: retry.attempt(),
                });
            }

            let request = self.build_request(turns, system_message, stop_sequence);
            info!(attempt = retry.attempt(), "Awaiting chat completion");

            let recovery = match self.transport.chat(&request).await {
                Ok(response) => {
                    let served_by = response.model;
                    let choice = response.choices.into_iter().next().ok_or_else(|| {
                        LlmError::Api {
                            message: "Response contained no choices".to_string(),
                            status_code: None,
                            code: None,
                        }
                    })?;

                    if choice.finish_reason != Some(FinishReason::Length) {
                        debug!(
                            attempt = retry.attempt(),
                            served_by = served_by.as_deref().unwrap_or("unknown"),
                            "Received chat completion"
                        );
                        return Ok(choice.message.content.unwrap_or_default());
                    }
                    Recovery::Truncate
                }
                Err(err) => match Recovery::for_error(&err) {
                    Some(recovery) => {
                        debug!(error = %err, "Recoverable provider error");
                        recovery
                    }
                    None => return Err(err),
                },
            };

            match recovery {
                Recovery::Truncate => {
                    warn!(
                        attempt = retry.attempt(),
                        turns = turns.len(),
                        "Context length exceeded, retrying with shorter context"
                    );
                    turns = drop_oldest_turn(turns);
                }
                // The final attempt does not wait.
                Recovery::BackOff if retry.has_retry_left() => {
                    let delay = self.retry_config.delay_for(retry.attempt());
                    warn!(
                        attempt = retry.attempt(),
                        delay_ms = %delay.as_millis(),
                        "Rate limited or server error, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                Recovery::BackOff => {
                    warn!(
                        attempt = retry.attempt(),
                        final_attempt = true,
                        "Rate limited or server error, no retries left"
                    );
                }
            }

            retry.advance();
        }
    }

    /// Builds the outgoing payload: system message first, then `turns`.
    ///
    /// Models without stop-sequence support get strict formatting and no `stop`.
    pub fn build_request(
        &self,
        turns: &[Message],
        system_message: &str,
        stop_sequence: &str,
    ) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(turns.len() + 1);
        messages.push(Message::system(system_message));
        messages.extend_from_slice(turns);

        if self.profile.strict_format {
            messages = strict_format(messages);
        }

        ChatCompletionRequest {
            model: self.profile.model.clone(),
            messages,
            stop: self
                .profile
                .supports_stop
                .then(|| stop_sequence.to_string()),
        }
    }

    /// Embeds `text` in a single attempt.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        if !self.profile.supports_embeddings {
            warn!(provider = %self.profile.provider, "Embeddings requested from unsupported provider");
            return Err(LlmError::EmbeddingsUnsupported {
                provider: self.profile.provider,
            });
        }

        let request = EmbeddingRequest {
            model: self.embedding_model.clone(),
            input: text.to_string(),
        };

        let result = self.transport.embed(&request).await.and_then(|response| {
            response
                .data
                .into_iter()
                .next()
                .map(|data| data.embedding)
                .ok_or_else(|| LlmError::Api {
                    message: "Embedding response contained no data".to_string(),
                    status_code: None,
                    code: None,
                })
        });

        result.map_err(|err| {
            error!(
                error = %err,
                status = ?err.status_code(),
                model = %self.embedding_model,
                "Error creating embedding"
            );
            LlmError::EmbeddingFailed {
                source: Box::new(err),
            }
        })
    }
}

/// The most recent turn is never dropped.
fn drop_oldest_turn(turns: &[Message]) -> &[Message] {
    match turns {
        [_, rest @ ..] if !rest.is_empty() => rest,
        _ => turns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovery_classification() {
        let overflow = LlmError::Api {
            message: "maximum context".into(),
            status_code: Some(400),
            code: Some("context_length_exceeded".into()),
        };
        let throttled = LlmError::Api {
            message: "slow down".into(),
            status_code: Some(429),
            code: None,
        };
        let bad_request = LlmError::Api {
            message: "bad".into(),
            status_code: Some(400),
            code: None,
        };

        assert_eq!(Recovery::for_error(&overflow), Some(Recovery::Truncate));
        assert_eq!(Recovery::for_error(&throttled), Some(Recovery::BackOff));
        assert_eq!(Recovery::for_error(&bad_request), None);
        assert_eq!(
            Recovery::for_error(&LlmError::ProviderConfiguration("x".into())),
            None
        );
    }

    #[test]
    fn overflow_takes_precedence_over_server_status() {
        let err = LlmError::Api {
            message: "Context length exceeded".into(),
            status_code: Some(500),
            code: None,
        };
        assert_eq!(Recovery::for_error(&err), Some(Recovery::Truncate));
    }

    #[test]
    fn drop_oldest_turn_keeps_most_recent() {
        let turns = vec![Message::user("a"), Message::assistant("b"), Message::user("c")];

        let once = drop_oldest_turn(&turns);
        assert_eq!(once, &turns[1..]);
        let twice = drop_oldest_turn(once);
        assert_eq!(twice, &[Message::user("c")]);
        assert_eq!(drop_oldest_turn(twice), &[Message::user("c")]);
        assert!(drop_oldest_turn(&[]).is_empty());
    }
}
