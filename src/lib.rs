//! # resilient-chat
//!
//! Chat-completion client for OpenAI-compatible providers that shapes each
//! request for the target model family and recovers from provider failures:
//!
//! - context overflow: the oldest turn is dropped and the request resubmitted;
//! - rate limiting and server errors: exponential backoff, then resubmit unchanged;
//! - anything else: no retry.
//!
//! Both recoveries share one attempt budget (six calls by default).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use resilient_chat::{ChatClient, EnvKeyStore, Message};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ChatClient::new("gpt-4o-mini", None, &EnvKeyStore)?;
//!
//!     let reply = client
//!         .send_request(&[Message::user("Name a prime number.")], "Be terse.")
//!         .await;
//!     println!("{reply}");
//!
//!     let vector = client.embed("prime numbers").await?;
//!     println!("{} dimensions", vector.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod core;
pub mod provider;

pub use client::{
    ChatClient, ChatClientConfig, DEFAULT_STOP_SEQUENCE, REQUEST_FAILED, TOO_MANY_RETRIES,
};
pub use crate::core::{
    ChatCompletionRequest, ChatCompletionResponse, ChatRole, ChatTransport, EmbeddingRequest,
    EmbeddingResponse, EnvKeyStore, FileKeyStore, FinishReason, HttpClientConfig, KeyStore,
    LlmError, Message, RetryConfig, StaticKeyStore, strict_format,
};
pub use provider::{HttpTransport, Provider, ProviderProfile};
