use std::path::PathBuf;
use std::sync::Arc;

use log::{info, warn};

use crate::config::{load_config, AiConfig};
use crate::detect::detect_ingredients;
use crate::ingredients::normalize_ingredients;
use crate::providers::{FallbackProvider, LlmProvider};
use crate::workflow::Workflow;
use crate::{ChefError, RecipeState};

/// Represents where the ingredients come from
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Ingredient names typed by the user
    Ingredients(Vec<String>),
    /// Photo of a pantry; ingredients are detected by a vision model
    PantryPhoto(PathBuf),
}

/// Generative-model provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Google,
    OpenAI,
    Anthropic,
}

impl ProviderKind {
    /// Convert to provider name string used by the factory
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Google => "google",
            ProviderKind::OpenAI => "openai",
            ProviderKind::Anthropic => "anthropic",
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = ChefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "google" | "gemini" => Ok(ProviderKind::Google),
            "openai" => Ok(ProviderKind::OpenAI),
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            other => Err(ChefError::BuilderError(format!("Unknown provider: {}", other))),
        }
    }
}

/// Builder for configuring and running the recipe workflow
#[derive(Debug, Default)]
pub struct PantryChefBuilder {
    source: Option<InputSource>,
    provider: Option<ProviderKind>,
    api_key: Option<String>,
    model: Option<String>,
    images: Option<bool>,
    config: Option<AiConfig>,
}

impl PantryChefBuilder {
    /// Use a list of ingredient names as input
    ///
    /// # Example
    /// ```
    /// use pantry_chef::PantryChef;
    ///
    /// let builder = PantryChef::builder()
    ///     .ingredients(["tomato", "onion", "bell pepper", "garlic"]);
    /// ```
    pub fn ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source = Some(InputSource::Ingredients(
            ingredients.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Use a pantry photo as input
    ///
    /// The ingredients are detected by the provider's vision model before
    /// the recipe is generated.
    ///
    /// # Example
    /// ```
    /// use pantry_chef::PantryChef;
    ///
    /// let builder = PantryChef::builder()
    ///     .pantry_photo("data/pantry_sample.jpg");
    /// ```
    pub fn pantry_photo(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(InputSource::PantryPhoto(path.into()));
        self
    }

    /// Select the provider
    pub fn provider(mut self, provider: ProviderKind) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the API key for the provider
    ///
    /// This allows passing the API key directly instead of relying on
    /// environment variables or config files.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the text model for the provider
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Skip the per-step image generation
    pub fn without_images(mut self) -> Self {
        self.images = Some(false);
        self
    }

    /// Use an already loaded configuration instead of reading `config.toml`
    /// and the environment again
    pub fn config(mut self, config: AiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Resolve the configuration the builder should run with
    fn resolve_config(&self) -> Result<AiConfig, ChefError> {
        let base = match &self.config {
            Some(config) => config.clone(),
            None => load_config()?,
        };

        if self.api_key.is_some() || self.model.is_some() {
            let name = self
                .provider
                .map(|provider| provider.as_str())
                .unwrap_or(base.default_provider.as_str());
            let mut config =
                AiConfig::with_single_provider(name, self.api_key.clone(), self.model.clone());
            config.images = base.images;
            config.timeout = base.timeout;
            return Ok(config);
        }

        let mut config = base;
        if let Some(provider) = self.provider {
            config.default_provider = provider.as_str().to_string();
            config.fallback.enabled = false;
        }
        let default_provider = config.default_provider.clone();
        config.ensure_provider(&default_provider);
        Ok(config)
    }

    /// Build the provider and run the workflow
    ///
    /// # Errors
    /// Returns `ChefError` if:
    /// - No input source was specified
    /// - The provider cannot be configured
    /// - Ingredient detection or any workflow stage fails
    ///
    /// # Example
    /// ```no_run
    /// # use pantry_chef::PantryChef;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let state = PantryChef::builder()
    ///     .ingredients(["tomato", "onion"])
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(self) -> Result<RecipeState, ChefError> {
        if self.source.is_none() {
            return Err(ChefError::BuilderError(
                "No input source specified. Use .ingredients() or .pantry_photo()".to_string(),
            ));
        }

        let config = self.resolve_config()?;
        let provider: Arc<dyn LlmProvider> = Arc::new(FallbackProvider::new(&config)?);
        let include_images = self.images.unwrap_or(config.images.enabled);

        self.run_with(provider, include_images).await
    }

    /// Run the workflow against an already constructed provider
    pub async fn build_with_provider(
        self,
        provider: Arc<dyn LlmProvider>,
    ) -> Result<RecipeState, ChefError> {
        let include_images = self.images.unwrap_or(true);
        self.run_with(provider, include_images).await
    }

    async fn run_with(
        self,
        provider: Arc<dyn LlmProvider>,
        include_images: bool,
    ) -> Result<RecipeState, ChefError> {
        let source = self.source.ok_or_else(|| {
            ChefError::BuilderError(
                "No input source specified. Use .ingredients() or .pantry_photo()".to_string(),
            )
        })?;

        let raw = match source {
            InputSource::Ingredients(ingredients) => ingredients,
            InputSource::PantryPhoto(path) => detect_ingredients(provider.as_ref(), &path).await?,
        };

        let ingredients = normalize_ingredients(&raw);
        info!("Cooking with {} ingredients", ingredients.len());

        let include_images = if include_images && !provider.supports_image_generation() {
            warn!(
                "Provider '{}' cannot generate images, skipping step images",
                provider.provider_name()
            );
            false
        } else {
            include_images
        };

        Workflow::standard(provider, include_images)
            .invoke(ingredients)
            .await
    }
}

/// Main entry point for the builder API
pub struct PantryChef;

impl PantryChef {
    /// Creates a new builder
    ///
    /// # Example
    /// ```
    /// use pantry_chef::PantryChef;
    ///
    /// let builder = PantryChef::builder();
    /// ```
    pub fn builder() -> PantryChefBuilder {
        PantryChefBuilder::default()
    }
}
