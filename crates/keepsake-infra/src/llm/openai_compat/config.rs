//! Configuration for OpenAI-compatible providers.

use secrecy::SecretString;

/// OpenAI's public API endpoint.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for an OpenAI-compatible LLM provider.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`]. Does not derive
/// Debug; the API key stays wrapped in [`SecretString`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "openai").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    pub api_key: SecretString,
    /// Model used when a request leaves `model` empty.
    pub model: String,
}

/// Configuration for a self-hosted or third-party endpoint.
///
/// The provider name is `openai` for the public endpoint and `openai_compat`
/// for anything else.
pub fn custom(base_url: &str, api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    let base_url = base_url.trim_end_matches('/');
    let provider_name = if base_url == OPENAI_BASE_URL {
        "openai"
    } else {
        "openai_compat"
    };
    OpenAiCompatConfig {
        provider_name: provider_name.into(),
        base_url: base_url.into(),
        api_key,
        model: model.into(),
    }
}
