use thiserror::Error;

/// Errors that can occur while cooking up a recipe
#[derive(Error, Debug)]
pub enum ChefError {
    /// A call to the generative model failed
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The model answered with text that is not the expected JSON record
    #[error("Invalid model output: {0}")]
    InvalidModelOutput(String),

    /// Nothing usable was left after normalizing the ingredient list
    #[error("No ingredients to cook with")]
    NoIngredients,

    /// A workflow stage ran before the stage producing its input
    #[error("Stage '{stage}' needs a {input} in the recipe state")]
    MissingStageInput {
        stage: &'static str,
        input: &'static str,
    },

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Reading a photo or writing output files failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

/// Errors returned by a single generative-model provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Transport-level failure (connect, timeout, body decode)
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("API returned error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The response did not contain the expected field
    #[error("Missing content in response: {0}")]
    MissingContent(String),

    /// The provider cannot be constructed from the given configuration
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// The provider has no API for the requested capability
    #[error("Provider '{provider}' does not support {capability}")]
    Unsupported {
        provider: String,
        capability: &'static str,
    },

    /// Image payload could not be decoded
    #[error("Image error: {0}")]
    Image(String),
}

impl ProviderError {
    /// Whether the request is worth repeating: the API is rate limiting (429)
    /// or temporarily unavailable (503).
    pub fn is_retriable(&self) -> bool {
        matches!(self, ProviderError::Api { status: 429 | 503, .. })
    }
}
