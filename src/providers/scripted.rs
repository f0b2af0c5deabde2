//! Scripted provider for unit tests.
//!
//! Each capability pops its next answer from a queue, so a test states the
//! exact sequence of model replies (or failures) it expects.

use crate::error::ProviderError;
use crate::model::GeneratedImage;
use crate::providers::LlmProvider;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

type Reply<T> = Result<T, ProviderError>;

#[derive(Default)]
pub(crate) struct ScriptedProvider {
    name: String,
    texts: Mutex<VecDeque<Reply<String>>>,
    images: Mutex<VecDeque<Reply<GeneratedImage>>>,
    prompts: Mutex<Vec<String>>,
    text_only: bool,
}

impl ScriptedProvider {
    pub fn named(name: &str) -> Self {
        ScriptedProvider {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Report that this provider cannot generate images
    pub fn without_image_generation(mut self) -> Self {
        self.text_only = true;
        self
    }

    pub fn text(self, reply: &str) -> Self {
        self.texts.lock().unwrap().push_back(Ok(reply.to_string()));
        self
    }

    pub fn text_error(self, err: ProviderError) -> Self {
        self.texts.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn image(self, data: &[u8]) -> Self {
        self.images
            .lock()
            .unwrap()
            .push_back(Ok(GeneratedImage::new("image/png", data.to_vec())));
        self
    }

    pub fn image_error(self, err: ProviderError) -> Self {
        self.images.lock().unwrap().push_back(Err(err));
        self
    }

    /// Every prompt received so far, in order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn next_text(&self, prompt: &str) -> Reply<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.texts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::MissingContent("script exhausted".to_string())))
    }
}

pub(crate) fn rate_limited() -> ProviderError {
    ProviderError::Api {
        status: 429,
        message: "rate limited".to_string(),
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn provider_name(&self) -> &str {
        &self.name
    }

    async fn generate_text(&self, prompt: &str) -> Result<String, ProviderError> {
        self.next_text(prompt)
    }

    async fn describe_image(
        &self,
        prompt: &str,
        _image: &GeneratedImage,
    ) -> Result<String, ProviderError> {
        self.next_text(prompt)
    }

    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, ProviderError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.images
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::MissingContent("script exhausted".to_string())))
    }

    fn supports_image_generation(&self) -> bool {
        !self.text_only
    }
}
