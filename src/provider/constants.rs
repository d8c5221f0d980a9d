pub mod openai {
    pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
    pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";
    pub const API_BASE: &str = "https://api.openai.com/v1";
    pub const API_KEY_NAME: &str = "OPENAI_API_KEY";
    pub const ORGANIZATION_KEY_NAME: &str = "OPENAI_ORG_ID";
    pub const ORGANIZATION_HEADER: &str = "OpenAI-Organization";
    /// Model identifiers containing this marker are o1-class reasoning models.
    pub const REASONING_MODEL_MARKER: &str = "o1";
}

pub mod grok {
    pub const MODEL_PREFIX: &str = "grok";
    pub const API_BASE: &str = "https://api.x.ai/v1";
    pub const API_KEY_NAME: &str = "XAI_API_KEY";
}

pub const CHAT_COMPLETIONS_ENDPOINT: &str = "/chat/completions";
pub const EMBEDDINGS_ENDPOINT: &str = "/embeddings";
