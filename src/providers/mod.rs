mod anthropic;
mod factory;
mod fallback;
mod google;
mod open_ai;

#[cfg(test)]
pub(crate) mod scripted;

pub use anthropic::AnthropicProvider;
pub use factory::ProviderFactory;
pub use fallback::FallbackProvider;
pub use google::GoogleProvider;
pub use open_ai::OpenAIProvider;

use crate::error::ProviderError;
use crate::model::GeneratedImage;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;

/// Unified trait for all generative-model providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "google", "openai")
    fn provider_name(&self) -> &str;

    /// Send a text prompt and return the model's text answer
    async fn generate_text(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Ask a question about an image and return the model's text answer
    async fn describe_image(
        &self,
        prompt: &str,
        image: &GeneratedImage,
    ) -> Result<String, ProviderError>;

    /// Generate one image from a text prompt
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, ProviderError>;

    /// Whether `generate_image` can succeed at all for this provider
    fn supports_image_generation(&self) -> bool {
        true
    }
}

/// HTTP client with the configured request timeout
pub(crate) fn http_client(timeout: Duration) -> Result<Client, ProviderError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Decode a JSON body, turning non-success statuses into `ProviderError::Api`
pub(crate) async fn read_json(response: Response) -> Result<Value, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ProviderError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response.json().await?)
}

/// Look up an API key in the config first, then in the environment
pub(crate) fn resolve_api_key(
    configured: Option<&String>,
    env_var: &str,
) -> Result<String, ProviderError> {
    configured
        .cloned()
        .or_else(|| std::env::var(env_var).ok())
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            ProviderError::NotConfigured(format!("{} not found in config or environment", env_var))
        })
}
