//! Transport for OpenAI-compatible chat and embedding endpoints.
//!
//! Both OpenAI and Grok speak this wire format; they differ only in base URL
//! and credential, which come from the resolved [`ProviderProfile`].

use async_trait::async_trait;

use crate::core::{
    ChatCompletionRequest, ChatCompletionResponse, ChatTransport, EmbeddingRequest,
    EmbeddingResponse, HttpClient, HttpClientConfig, KeyStore, LlmError,
};
use crate::provider::{ProviderProfile, constants};

pub struct HttpTransport {
    http: HttpClient,
    base_url: String,
    api_key: String,
    organization: Option<String>,
}

impl HttpTransport {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        http_config: &HttpClientConfig,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            http: HttpClient::new(http_config)?,
            base_url: base_url.into(),
            api_key: api_key.into(),
            organization: None,
        })
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Looks up the profile's credentials and binds a transport to its endpoint.
    ///
    /// The organization id is optional: it is attached only when the key store has it.
    pub fn from_profile(
        profile: &ProviderProfile,
        keys: &dyn KeyStore,
        http_config: &HttpClientConfig,
    ) -> Result<Self, LlmError> {
        let api_key = keys.get_key(profile.api_key_name)?;
        let transport = Self::new(profile.base_url.clone(), api_key, http_config)?;

        match profile.organization_key_name {
            Some(name) if keys.has_key(name) => {
                Ok(transport.with_organization(keys.get_key(name)?))
            }
            _ => Ok(transport),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![(
            "Authorization".to_string(),
            format!("Bearer {}", self.api_key),
        )];
        if let Some(org) = &self.organization {
            headers.push((
                constants::openai::ORGANIZATION_HEADER.to_string(),
                org.clone(),
            ));
        }
        headers
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("organization", &self.organization.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    #[tracing::instrument(
        name = "chat_completion",
        skip(self, request),
        fields(base_url = %self.base_url, model = %request.model),
        err
    )]
    async fn chat(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, LlmError> {
        let url = format!("{}{}", self.base_url, constants::CHAT_COMPLETIONS_ENDPOINT);
        self.http.post_json(&url, &self.headers(), request).await
    }

    #[tracing::instrument(
        name = "embedding",
        skip(self, request),
        fields(base_url = %self.base_url, model = %request.model),
        err
    )]
    async fn embed(&self, request: &EmbeddingRequest) -> Result<EmbeddingResponse, LlmError> {
        let url = format!("{}{}", self.base_url, constants::EMBEDDINGS_ENDPOINT);
        self.http.post_json(&url, &self.headers(), request).await
    }
}
