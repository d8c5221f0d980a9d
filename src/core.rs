pub mod error;
pub mod format;
pub mod http;
pub mod keys;
pub mod retry;
pub mod traits;
pub mod types;

pub use error::LlmError;
pub use format::strict_format;
pub use http::{HttpClient, HttpClientConfig};
pub use keys::{EnvKeyStore, FileKeyStore, KeyStore, StaticKeyStore};
pub use retry::RetryConfig;
pub use traits::ChatTransport;
pub use types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatRole, Choice, EmbeddingData,
    EmbeddingRequest, EmbeddingResponse, FinishReason, Message, ResponseMessage,
};
