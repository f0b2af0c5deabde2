use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::model::GeneratedImage;
use crate::providers::{http_client, read_json, resolve_api_key, LlmProvider};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";

pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    vision_model: String,
    image_model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider from configuration
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, ProviderError> {
        // Try config first, then fall back to environment variable
        let api_key = resolve_api_key(config.api_key.as_ref(), "OPENAI_API_KEY")?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(OpenAIProvider {
            client: http_client(timeout)?,
            api_key,
            base_url,
            model: config.model.clone(),
            vision_model: config
                .vision_model
                .clone()
                .unwrap_or_else(|| config.model.clone()),
            image_model: config
                .image_model
                .clone()
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    async fn chat(&self, model: &str, content: Value) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&json!({
                "model": model,
                "messages": [
                    {"role": "user", "content": content}
                ],
                "temperature": self.temperature,
                "max_tokens": self.max_tokens
            }))
            .send()
            .await?;

        let response_body = read_json(response).await?;
        debug!("{:?}", response_body);

        response_body["choices"][0]["message"]["content"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| ProviderError::MissingContent("no content in OpenAI response".to_string()))
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn generate_text(&self, prompt: &str) -> Result<String, ProviderError> {
        self.chat(&self.model, json!(prompt)).await
    }

    async fn describe_image(
        &self,
        prompt: &str,
        image: &GeneratedImage,
    ) -> Result<String, ProviderError> {
        let content = json!([
            {"type": "text", "text": prompt},
            {
                "type": "image_url",
                "image_url": {
                    "url": format!("data:{};base64,{}", image.mime_type, image.to_base64())
                }
            }
        ]);

        self.chat(&self.vision_model, content).await
    }

    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, ProviderError> {
        let response = self
            .client
            .post(format!("{}/v1/images/generations", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&json!({
                "model": self.image_model,
                "prompt": prompt,
                "n": 1,
                "size": "1024x1024",
                "response_format": "b64_json"
            }))
            .send()
            .await?;

        let response_body = read_json(response).await?;

        let data = response_body["data"][0]["b64_json"]
            .as_str()
            .ok_or_else(|| ProviderError::MissingContent("no image in OpenAI response".to_string()))?;

        GeneratedImage::from_base64("image/png", data)
            .map_err(|e| ProviderError::Image(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn test_provider(base_url: String) -> OpenAIProvider {
        let mut config = ProviderConfig::new("gpt-4o-mini");
        config.api_key = Some("fake_api_key".to_string());
        config.base_url = Some(base_url);
        OpenAIProvider::new(&config, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_generate_text() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer fake_api_key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "choices": [{
                        "message": {
                            "content": "{\"protein\": 10, \"fat\": 5, \"carbohydrates\": 30, \"calories\": 200}"
                        }
                    }]
                }"#,
            )
            .create_async()
            .await;

        let provider = test_provider(server.url());
        let result = provider.generate_text("Estimate nutrition").await.unwrap();

        assert!(result.contains("\"calories\": 200"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_text_api_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "Invalid request"}"#)
            .create_async()
            .await;

        let provider = test_provider(server.url());
        let err = provider.generate_text("anything").await.unwrap_err();

        assert!(matches!(err, ProviderError::Api { status: 400, .. }));
        assert!(!err.is_retriable());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_describe_image_uses_data_url() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_body(Matcher::Regex(
                r"data:image/png;base64,aGVsbG8=".to_string(),
            ))
            .with_status(200)
            .with_body(r#"{"choices": [{"message": {"content": "eggs\nmilk"}}]}"#)
            .create_async()
            .await;

        let provider = test_provider(server.url());
        let image = GeneratedImage::new("image/png", b"hello".to_vec());
        let text = provider.describe_image("What is this?", &image).await.unwrap();

        assert_eq!(text, "eggs\nmilk");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_image() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/images/generations")
            .match_body(Matcher::PartialJson(json!({
                "model": "dall-e-3",
                "prompt": "Generate an image of: Whisk the eggs",
                "response_format": "b64_json"
            })))
            .with_status(200)
            .with_body(r#"{"data": [{"b64_json": "aGVsbG8="}]}"#)
            .create_async()
            .await;

        let provider = test_provider(server.url());
        let image = provider
            .generate_image("Generate an image of: Whisk the eggs")
            .await
            .unwrap();

        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, b"hello");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_provider_name() {
        let provider = test_provider(DEFAULT_BASE_URL.to_string());
        assert_eq!(provider.provider_name(), "openai");
    }
}
