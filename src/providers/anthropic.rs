use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::model::GeneratedImage;
use crate::providers::{http_client, read_json, resolve_api_key, LlmProvider};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    vision_model: String,
    temperature: f32,
    max_tokens: u32,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider from configuration
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, ProviderError> {
        // Try config first, then fall back to environment variable
        let api_key = resolve_api_key(config.api_key.as_ref(), "ANTHROPIC_API_KEY")?;

        Ok(AnthropicProvider {
            client: http_client(timeout)?,
            api_key,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: config.model.clone(),
            vision_model: config
                .vision_model
                .clone()
                .unwrap_or_else(|| config.model.clone()),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    async fn messages(&self, model: &str, content: Value) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&json!({
                "model": model,
                "max_tokens": self.max_tokens,
                "temperature": self.temperature,
                "messages": [
                    {
                        "role": "user",
                        "content": content
                    }
                ]
            }))
            .send()
            .await?;

        let response_body = read_json(response).await?;
        debug!("{:?}", response_body);

        response_body["content"][0]["text"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| {
                ProviderError::MissingContent("no text in Anthropic response".to_string())
            })
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn provider_name(&self) -> &str {
        "anthropic"
    }

    fn supports_image_generation(&self) -> bool {
        false
    }

    async fn generate_text(&self, prompt: &str) -> Result<String, ProviderError> {
        self.messages(&self.model, json!(prompt)).await
    }

    async fn describe_image(
        &self,
        prompt: &str,
        image: &GeneratedImage,
    ) -> Result<String, ProviderError> {
        let content = json!([
            {
                "type": "image",
                "source": {
                    "type": "base64",
                    "media_type": image.mime_type,
                    "data": image.to_base64()
                }
            },
            {"type": "text", "text": prompt}
        ]);

        self.messages(&self.vision_model, content).await
    }

    async fn generate_image(&self, _prompt: &str) -> Result<GeneratedImage, ProviderError> {
        Err(ProviderError::Unsupported {
            provider: self.provider_name().to_string(),
            capability: "image generation",
        })
    }
}
