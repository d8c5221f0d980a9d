use thiserror::Error;

use crate::provider::Provider;

/// Error code providers attach to oversized requests.
pub const CONTEXT_LENGTH_EXCEEDED_CODE: &str = "context_length_exceeded";

const CONTEXT_LENGTH_EXCEEDED_TEXT: &str = "context length exceeded";

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Provider configuration error: {0}")]
    ProviderConfiguration(String),

    #[error("Missing API key: {name}")]
    MissingKey { name: String },

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("API error{}: {message}", status_suffix(.status_code))]
    Api {
        message: String,
        status_code: Option<u16>,
        code: Option<String>,
    },

    #[error("Embeddings are not supported by {provider}")]
    EmbeddingsUnsupported { provider: Provider },

    #[error("Embedding creation failed")]
    EmbeddingFailed {
        #[source]
        source: Box<LlmError>,
    },

    #[error("Too many retry attempts ({attempts} made)")]
    RetryExhausted { attempts: u32 },
}

fn status_suffix(status_code: &Option<u16>) -> String {
    status_code
        .map(|status| format!(" ({status})"))
        .unwrap_or_default()
}

impl LlmError {
    /// Whether the provider rejected the request because the input is too large.
    pub fn is_context_overflow(&self) -> bool {
        match self {
            LlmError::Api { message, code, .. } => {
                code.as_deref() == Some(CONTEXT_LENGTH_EXCEEDED_CODE)
                    || message
                        .to_ascii_lowercase()
                        .contains(CONTEXT_LENGTH_EXCEEDED_TEXT)
            }
            _ => false,
        }
    }

    /// Rate limiting (429) and server errors (5xx).
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            LlmError::Api { status_code: Some(status), .. } if *status == 429 || (500..600).contains(status)
        )
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            LlmError::Api { status_code, .. } => *status_code,
            _ => None,
        }
    }
}
