use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;

/// Main AI configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct AiConfig {
    /// Default provider to use when not specified
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Map of provider name to provider configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Fallback configuration for automatic provider switching
    #[serde(default)]
    pub fallback: FallbackConfig,
    /// Step image generation settings
    #[serde(default)]
    pub images: ImageConfig,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// Configuration for a specific AI provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Whether this provider is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Text model identifier (e.g., "gemini-2.0-flash", "gpt-4o-mini")
    #[serde(default = "default_model")]
    pub model: String,
    /// Model used for pantry photos; the text model when unset
    pub vision_model: Option<String>,
    /// Model used for step images; a provider-specific default when unset
    pub image_model: Option<String>,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// API key for authentication (can also be set via environment variable)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
}

impl ProviderConfig {
    /// Minimal enabled configuration for `model`
    pub fn new(model: impl Into<String>) -> Self {
        ProviderConfig {
            enabled: true,
            model: model.into(),
            vision_model: None,
            image_model: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            api_key: None,
            base_url: None,
        }
    }
}

/// Configuration for provider fallback and retry behavior
#[derive(Debug, Deserialize, Clone)]
pub struct FallbackConfig {
    /// Whether fallback is enabled
    #[serde(default)]
    pub enabled: bool,
    /// Order of providers to try (first to last)
    #[serde(default)]
    pub order: Vec<String>,
    /// Number of attempts per provider on rate limiting or unavailability
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Initial delay between retries in milliseconds (grows with each attempt)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            order: Vec::new(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Configuration for per-step image generation
#[derive(Debug, Deserialize, Clone)]
pub struct ImageConfig {
    /// Whether to generate one image per instruction
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Directory the CLI writes step images to
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            output_dir: default_output_dir(),
        }
    }
}

// Default value functions
fn default_provider() -> String {
    "google".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_output_dir() -> String {
    "step_images".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl AiConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with PANTRY_CHEF__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: PANTRY_CHEF__PROVIDERS__GOOGLE__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// In-memory configuration with a single provider and no fallback chain.
    ///
    /// Used when the caller passes an API key or model directly instead of
    /// relying on a config file.
    pub fn with_single_provider(
        provider_name: &str,
        api_key: Option<String>,
        model: Option<String>,
    ) -> Self {
        let mut provider = ProviderConfig::new(
            model.unwrap_or_else(|| default_model_for(provider_name).to_string()),
        );
        provider.api_key = api_key;

        let mut providers = HashMap::new();
        providers.insert(provider_name.to_string(), provider);

        AiConfig {
            default_provider: provider_name.to_string(),
            providers,
            fallback: FallbackConfig::default(),
            images: ImageConfig::default(),
            timeout: default_timeout(),
        }
    }

    /// Add an entry for `provider_name` when the configuration has none.
    ///
    /// The entry uses the provider's default model and no API key, so the
    /// key is picked up from the provider's environment variable.
    pub fn ensure_provider(&mut self, provider_name: &str) {
        self.providers
            .entry(provider_name.to_string())
            .or_insert_with(|| ProviderConfig::new(default_model_for(provider_name)));
    }
}

/// Text model used when the configuration names a provider but no model
pub fn default_model_for(provider_name: &str) -> &'static str {
    match provider_name {
        "openai" => "gpt-4o-mini",
        "anthropic" => "claude-3-5-sonnet-20241022",
        _ => "gemini-2.0-flash",
    }
}

/// Load configuration from file and environment variables
///
/// See [`AiConfig::load`] for the precedence rules.
pub fn load_config() -> Result<AiConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: PANTRY_CHEF__PROVIDERS__GOOGLE__API_KEY
        .add_source(
            Environment::with_prefix("PANTRY_CHEF")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    from_settings(settings)
}

fn from_settings(settings: Config) -> Result<AiConfig, ConfigError> {
    let mut config: AiConfig = settings.try_deserialize()?;
    let default_provider = config.default_provider.clone();
    config.ensure_provider(&default_provider);
    Ok(config)
}
