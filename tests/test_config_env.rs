use pantry_chef::config::load_config;
use pantry_chef::providers::{FallbackProvider, LlmProvider};
use pantry_chef::ProviderError;
use std::env;
use std::sync::{Mutex, MutexGuard};

// Tests in this file share the process environment
static ENV_LOCK: Mutex<()> = Mutex::new(());

const VARS: &[&str] = &[
    "PANTRY_CHEF__DEFAULT_PROVIDER",
    "PANTRY_CHEF__TIMEOUT",
    "PANTRY_CHEF__PROVIDERS__OPENAI__MODEL",
    "GOOGLE_API_KEY",
    "OPENAI_API_KEY",
];

fn clean_env() -> MutexGuard<'static, ()> {
    let guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    for var in VARS {
        env::remove_var(var);
    }
    guard
}

#[test]
fn test_env_key_alone_gives_working_default_provider() {
    let _guard = clean_env();
    env::set_var("GOOGLE_API_KEY", "env-only-key");

    let config = load_config().unwrap();
    assert_eq!(config.default_provider, "google");
    assert_eq!(config.providers["google"].model, "gemini-2.0-flash");

    let provider = FallbackProvider::new(&config).unwrap();
    assert!(provider.supports_image_generation());

    env::remove_var("GOOGLE_API_KEY");
}

#[test]
fn test_missing_env_key_is_reported_as_missing_key() {
    let _guard = clean_env();

    let config = load_config().unwrap();
    let err = FallbackProvider::new(&config).err().unwrap();

    assert!(matches!(err, ProviderError::NotConfigured(_)));
    assert!(err.to_string().contains("GOOGLE_API_KEY"));
}

#[test]
fn test_prefixed_env_overrides() {
    let _guard = clean_env();
    env::set_var("PANTRY_CHEF__DEFAULT_PROVIDER", "openai");
    env::set_var("PANTRY_CHEF__TIMEOUT", "10");
    env::set_var("PANTRY_CHEF__PROVIDERS__OPENAI__MODEL", "gpt-4o");
    env::set_var("OPENAI_API_KEY", "env-only-key");

    let config = load_config().unwrap();
    assert_eq!(config.default_provider, "openai");
    assert_eq!(config.timeout, 10);
    let openai = &config.providers["openai"];
    assert!(openai.enabled);
    assert_eq!(openai.model, "gpt-4o");
    assert_eq!(openai.max_tokens, 2000);

    assert!(FallbackProvider::new(&config).is_ok());

    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
fn test_prefixed_default_provider_without_entry() {
    let _guard = clean_env();
    env::set_var("PANTRY_CHEF__DEFAULT_PROVIDER", "openai");
    env::set_var("OPENAI_API_KEY", "env-only-key");

    let config = load_config().unwrap();
    assert_eq!(config.providers.len(), 1);
    assert_eq!(config.providers["openai"].model, "gpt-4o-mini");
    assert!(FallbackProvider::new(&config).is_ok());

    for var in VARS {
        env::remove_var(var);
    }
}
