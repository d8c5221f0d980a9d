use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One turn of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: ChatRole,
    pub content: String,
}

impl Message {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }
}

/// Outgoing chat-completion payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    /// The provider ran out of token budget.
    Length,
    ContentFilter,
    ToolCalls,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub finish_reason: Option<FinishReason>,
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    /// Null for refusals and tool-only replies
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddingRequest {
    pub model: String,
    pub input: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingResponse {
    pub data: Vec<EmbeddingData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingData {
    pub embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_serializes_with_lowercase_role() {
        let value = serde_json::to_value(Message::assistant("hi")).unwrap();
        assert_eq!(value, serde_json::json!({ "role": "assistant", "content": "hi" }));
    }

    #[test]
    fn request_omits_stop_when_absent() {
        let request = ChatCompletionRequest {
            model: "o1-mini".to_string(),
            messages: vec![Message::user("hi")],
            stop: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("stop").is_none());
    }

    #[test]
    fn unknown_finish_reason_is_tolerated() {
        let response: ChatCompletionResponse = serde_json::from_value(serde_json::json!({
            "choices": [{ "finish_reason": "something_new", "message": { "content": null } }]
        }))
        .unwrap();
        assert_eq!(response.choices[0].finish_reason, Some(FinishReason::Other));
        assert!(response.choices[0].message.content.is_none());
        assert!(response.model.is_none());
    }

    #[test]
    fn response_reports_serving_model() {
        let response: ChatCompletionResponse = serde_json::from_value(serde_json::json!({
            "model": "gpt-4o-mini-2024-07-18",
            "choices": [{ "finish_reason": "stop", "message": { "content": "hi" } }]
        }))
        .unwrap();
        assert_eq!(response.model.as_deref(), Some("gpt-4o-mini-2024-07-18"));
    }
}
