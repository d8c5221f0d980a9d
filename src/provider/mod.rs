pub(crate) mod constants;
pub mod openai;

pub use openai::HttpTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAI,
    Grok,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::OpenAI => write!(f, "OpenAI"),
            Provider::Grok => write!(f, "Grok"),
        }
    }
}

impl Provider {
    /// Picks the provider family from a model identifier.
    pub fn for_model(model: &str) -> Self {
        if model.starts_with(constants::grok::MODEL_PREFIX) {
            Provider::Grok
        } else {
            Provider::OpenAI
        }
    }

    /// Name of the key holding this provider's API credential
    pub fn api_key_name(&self) -> &'static str {
        match self {
            Provider::OpenAI => constants::openai::API_KEY_NAME,
            Provider::Grok => constants::grok::API_KEY_NAME,
        }
    }
}

/// Endpoint, credential and capability parameters resolved from a model identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    pub provider: Provider,
    pub model: String,
    pub base_url: String,
    pub api_key_name: &'static str,
    /// Optional organization credential; attached only when the key store has it.
    pub organization_key_name: Option<&'static str>,
    pub supports_stop: bool,
    /// Messages must pass through [`strict_format`](crate::strict_format).
    pub strict_format: bool,
    pub supports_embeddings: bool,
}

impl ProviderProfile {
    /// Resolves the profile for `model`. An empty model selects the default model.
    ///
    /// Grok models always use their fixed endpoint; `base_url_override` only
    /// applies to the OpenAI-compatible profile.
    pub fn resolve(model: &str, base_url_override: Option<&str>) -> Self {
        let model = if model.is_empty() {
            constants::openai::DEFAULT_MODEL
        } else {
            model
        };
        let provider = Provider::for_model(model);
        let reasoning = model.contains(constants::openai::REASONING_MODEL_MARKER);

        let (base_url, organization_key_name, supports_embeddings) = match provider {
            Provider::Grok => (constants::grok::API_BASE.to_string(), None, false),
            Provider::OpenAI => (
                base_url_override
                    .unwrap_or(constants::openai::API_BASE)
                    .trim_end_matches('/')
                    .to_string(),
                Some(constants::openai::ORGANIZATION_KEY_NAME),
                true,
            ),
        };

        Self {
            provider,
            model: model.to_string(),
            base_url,
            api_key_name: provider.api_key_name(),
            organization_key_name,
            supports_stop: !reasoning,
            strict_format: reasoning,
            supports_embeddings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grok_prefix_selects_fixed_endpoint_and_key() {
        let profile = ProviderProfile::resolve("grok-beta", Some("http://localhost:1234/v1"));

        assert_eq!(profile.provider, Provider::Grok);
        assert_eq!(profile.base_url, "https://api.x.ai/v1");
        assert_eq!(profile.api_key_name, "XAI_API_KEY");
        assert_eq!(profile.organization_key_name, None);
        assert!(!profile.supports_embeddings);
        assert!(profile.supports_stop);
    }

    #[test]
    fn openai_uses_override_when_given() {
        let profile = ProviderProfile::resolve("gpt-4o-mini", Some("http://localhost:1234/v1/"));

        assert_eq!(profile.provider, Provider::OpenAI);
        assert_eq!(profile.base_url, "http://localhost:1234/v1");
        assert_eq!(profile.api_key_name, "OPENAI_API_KEY");
        assert_eq!(profile.organization_key_name, Some("OPENAI_ORG_ID"));
        assert!(profile.supports_embeddings);

        let default = ProviderProfile::resolve("gpt-4o-mini", None);
        assert_eq!(default.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn empty_model_falls_back_to_default() {
        let profile = ProviderProfile::resolve("", None);
        assert_eq!(profile.model, "gpt-3.5-turbo");
        assert_eq!(profile.provider, Provider::OpenAI);
    }

    #[test]
    fn o1_models_disable_stop_and_require_strict_format() {
        let profile = ProviderProfile::resolve("o1-preview", None);
        assert!(!profile.supports_stop);
        assert!(profile.strict_format);

        let regular = ProviderProfile::resolve("gpt-4o", None);
        assert!(regular.supports_stop);
        assert!(!regular.strict_format);
    }
}
