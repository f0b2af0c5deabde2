use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::model::GeneratedImage;
use crate::providers::{http_client, read_json, resolve_api_key, LlmProvider};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_IMAGE_MODEL: &str = "gemini-2.0-flash-preview-image-generation";

pub struct GoogleProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    vision_model: String,
    image_model: String,
    temperature: f32,
    max_tokens: u32,
}

impl GoogleProvider {
    /// Create a new Google Gemini provider from configuration
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, ProviderError> {
        // Try config first, then fall back to environment variable
        let api_key = resolve_api_key(config.api_key.as_ref(), "GOOGLE_API_KEY")?;

        Ok(GoogleProvider {
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
            image_model: config
                .image_model
                .clone()
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    async fn generate_content(&self, model: &str, body: Value) -> Result<Value, ProviderError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let response_body = read_json(response).await?;
        debug!("{:?}", response_body);
        Ok(response_body)
    }

    fn generation_config(&self) -> Value {
        json!({
            "temperature": self.temperature,
            "maxOutputTokens": self.max_tokens
        })
    }
}

fn first_text(response_body: &Value) -> Result<String, ProviderError> {
    response_body["candidates"][0]["content"]["parts"]
        .as_array()
        .and_then(|parts| parts.iter().find_map(|part| part["text"].as_str()))
        .map(String::from)
        .ok_or_else(|| {
            ProviderError::MissingContent("no text in Google Gemini response".to_string())
        })
}

#[async_trait]
impl LlmProvider for GoogleProvider {
    fn provider_name(&self) -> &str {
        "google"
    }

    async fn generate_text(&self, prompt: &str) -> Result<String, ProviderError> {
        let body = json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": self.generation_config()
        });

        let response_body = self.generate_content(&self.model, body).await?;
        first_text(&response_body)
    }

    async fn describe_image(
        &self,
        prompt: &str,
        image: &GeneratedImage,
    ) -> Result<String, ProviderError> {
        let body = json!({
            "contents": [{
                "parts": [
                    { "text": prompt },
                    {
                        "inlineData": {
                            "mimeType": image.mime_type,
                            "data": image.to_base64()
                        }
                    }
                ]
            }],
            "generationConfig": self.generation_config()
        });

        let response_body = self.generate_content(&self.vision_model, body).await?;
        first_text(&response_body)
    }

    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, ProviderError> {
        let body = json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "responseModalities": ["TEXT", "IMAGE"]
            }
        });

        let response_body = self.generate_content(&self.image_model, body).await?;

        let inline_data = response_body["candidates"][0]["content"]["parts"]
            .as_array()
            .and_then(|parts| parts.iter().find(|part| part["inlineData"].is_object()))
            .map(|part| &part["inlineData"])
            .ok_or_else(|| {
                ProviderError::MissingContent("no image in Google Gemini response".to_string())
            })?;

        let mime_type = inline_data["mimeType"].as_str().unwrap_or("image/png");
        let data = inline_data["data"].as_str().ok_or_else(|| {
            ProviderError::MissingContent("image part without data".to_string())
        })?;

        GeneratedImage::from_base64(mime_type, data)
            .map_err(|e| ProviderError::Image(e.to_string()))
    }
}
