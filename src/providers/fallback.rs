use crate::config::AiConfig;
use crate::error::ProviderError;
use crate::model::GeneratedImage;
use crate::providers::{LlmProvider, ProviderFactory};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Chain of providers tried in order, each retried on rate limiting (429)
/// and unavailability (503).
pub struct FallbackProvider {
    providers: Vec<Box<dyn LlmProvider>>,
    retry_attempts: u32,
    retry_delay_ms: u64,
}

impl FallbackProvider {
    /// Create a new fallback provider from configuration
    pub fn new(config: &AiConfig) -> Result<Self, ProviderError> {
        if !config.fallback.enabled {
            // Only the default provider, still behind the retry policy
            let default_provider = ProviderFactory::get_default_provider(config)?;
            return Ok(Self::from_providers(
                vec![default_provider],
                config.fallback.retry_attempts,
                config.fallback.retry_delay_ms,
            ));
        }

        let timeout = Duration::from_secs(config.timeout);
        let mut providers = Vec::new();

        // Create providers in fallback order
        for provider_name in &config.fallback.order {
            if let Some(provider_config) = config.providers.get(provider_name) {
                if provider_config.enabled {
                    match ProviderFactory::create(provider_name, provider_config, timeout) {
                        Ok(provider) => {
                            info!("Added '{}' to fallback chain", provider_name);
                            providers.push(provider);
                        }
                        Err(e) => {
                            warn!("Failed to initialize provider '{}': {}", provider_name, e);
                        }
                    }
                }
            } else {
                warn!(
                    "Provider '{}' in fallback order not found in configuration",
                    provider_name
                );
            }
        }

        if providers.is_empty() {
            return Err(ProviderError::NotConfigured(
                "No providers available in fallback configuration".to_string(),
            ));
        }

        Ok(Self::from_providers(
            providers,
            config.fallback.retry_attempts,
            config.fallback.retry_delay_ms,
        ))
    }

    /// Wrap already constructed providers
    pub fn from_providers(
        providers: Vec<Box<dyn LlmProvider>>,
        retry_attempts: u32,
        retry_delay_ms: u64,
    ) -> Self {
        FallbackProvider {
            providers,
            retry_attempts: retry_attempts.max(1),
            retry_delay_ms,
        }
    }

    /// Run `call` against one provider, retrying while the error is retriable
    async fn call_with_retry<'a, T, F, Fut>(
        &self,
        provider: &'a dyn LlmProvider,
        call: &F,
    ) -> Result<T, ProviderError>
    where
        F: Fn(&'a dyn LlmProvider) -> Fut + Sync,
        Fut: Future<Output = Result<T, ProviderError>> + Send,
    {
        let mut attempt = 1;

        loop {
            debug!(
                "Calling {} (attempt {}/{})",
                provider.provider_name(),
                attempt,
                self.retry_attempts
            );

            let error = match call(provider).await {
                Ok(result) => return Ok(result),
                Err(e) => e,
            };

            warn!(
                "Provider {} failed (attempt {}/{}): {}",
                provider.provider_name(),
                attempt,
                self.retry_attempts,
                error
            );

            if !error.is_retriable() || attempt >= self.retry_attempts {
                return Err(error);
            }

            // Backoff grows with each attempt
            let delay = Duration::from_millis(self.retry_delay_ms * attempt as u64);
            debug!("Waiting {:?} before retry", delay);
            sleep(delay).await;
            attempt += 1;
        }
    }

    /// Try each provider in order; the last provider's error is returned if all fail
    async fn call_chain<'a, T, F, Fut>(&'a self, call: F) -> Result<T, ProviderError>
    where
        F: Fn(&'a dyn LlmProvider) -> Fut + Sync,
        Fut: Future<Output = Result<T, ProviderError>> + Send,
    {
        let mut last_error = None;

        for provider in &self.providers {
            match self.call_with_retry(provider.as_ref(), &call).await {
                Ok(result) => {
                    debug!("Request served by {}", provider.provider_name());
                    return Ok(result);
                }
                Err(e) => last_error = Some(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ProviderError::NotConfigured("No providers in fallback chain".to_string())
        }))
    }
}

#[async_trait]
impl LlmProvider for FallbackProvider {
    fn provider_name(&self) -> &str {
        "fallback"
    }

    async fn generate_text(&self, prompt: &str) -> Result<String, ProviderError> {
        self.call_chain(|provider| provider.generate_text(prompt))
            .await
    }

    async fn describe_image(
        &self,
        prompt: &str,
        image: &GeneratedImage,
    ) -> Result<String, ProviderError> {
        self.call_chain(|provider| provider.describe_image(prompt, image))
            .await
    }

    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, ProviderError> {
        self.call_chain(|provider| provider.generate_image(prompt))
            .await
    }

    fn supports_image_generation(&self) -> bool {
        self.providers
            .iter()
            .any(|provider| provider.supports_image_generation())
    }
}
