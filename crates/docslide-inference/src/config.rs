//! Inference configuration.
//!
//! Everything is read from environment variables; there is no config file.
//!
//! ```rust,no_run
//! use docslide_inference::config::InferenceConfig;
//!
//! let config = InferenceConfig::from_env();
//! ```

use std::env;
use std::time::Duration;

use tracing::{debug, warn};

use docslide_core::defaults::{
    CACHE_TTL_SECS, DEFAULT_PROVIDER, ENV_AI_PROVIDER, RETRY_BASE_DELAY_MS, RETRY_MAX,
};
use docslide_core::{Error, Result};

use crate::provider::{normalize_name, ProviderKind};
use crate::providers::{GeminiConfig, OpenAIConfig};
use crate::retry::RetryPolicy;
use crate::validator::OutputValidator;

/// Main inference configuration.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Provider used when a request names none.
    pub default_provider: String,
    pub gemini: GeminiConfig,
    pub openai: OpenAIConfig,
    /// Lifetime of cached successful envelopes. Zero disables expiry.
    pub cache_ttl: Duration,
    pub retry: RetryPolicy,
    /// Reject model output that is not strictly valid JSON.
    pub strict_json: bool,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            default_provider: DEFAULT_PROVIDER.to_string(),
            gemini: GeminiConfig::default(),
            openai: OpenAIConfig::default(),
            cache_ttl: Duration::from_secs(CACHE_TTL_SECS),
            retry: RetryPolicy::default(),
            strict_json: false,
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.trim().parse().ok())
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

impl InferenceConfig {
    /// Load configuration from environment variables.
    ///
    /// - `AI_PROVIDER`: default provider (default: gemini)
    /// - `AI_CACHE_TTL_SECS`: cache lifetime (default: 300)
    /// - `AI_RETRY_MAX`: retries after the first failure (default: 3)
    /// - `AI_RETRY_BASE_DELAY_MS`: first backoff delay (default: 500)
    /// - `AI_STRICT_JSON`: disable output repair (default: false)
    ///
    /// Provider settings come from [`GeminiConfig::from_env`] and
    /// [`OpenAIConfig::from_env`].
    pub fn from_env() -> Self {
        let default_provider = env::var(ENV_AI_PROVIDER)
            .ok()
            .map(|p| normalize_name(&p))
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_PROVIDER.to_string());

        let config = Self {
            default_provider,
            gemini: GeminiConfig::from_env(),
            openai: OpenAIConfig::from_env(),
            cache_ttl: Duration::from_secs(
                env_parse("AI_CACHE_TTL_SECS").unwrap_or(CACHE_TTL_SECS),
            ),
            retry: RetryPolicy::new(
                env_parse("AI_RETRY_MAX").unwrap_or(RETRY_MAX),
                Duration::from_millis(
                    env_parse("AI_RETRY_BASE_DELAY_MS").unwrap_or(RETRY_BASE_DELAY_MS),
                ),
            ),
            strict_json: env_flag("AI_STRICT_JSON"),
        };

        debug!(
            provider = %config.default_provider,
            cache_ttl_secs = config.cache_ttl.as_secs(),
            retries = config.retry.retries,
            strict_json = config.strict_json,
            "Loaded inference config from environment"
        );
        config
    }

    /// Output validator matching `strict_json`.
    pub fn validator(&self) -> OutputValidator {
        if self.strict_json {
            OutputValidator::strict()
        } else {
            OutputValidator::lenient()
        }
    }

    /// Check the configuration for mistakes that would fail every request.
    ///
    /// An unknown default provider is reported here; requests still go
    /// through and get an "Unknown AI provider" envelope.
    pub fn validate(&self) -> Result<()> {
        if self.default_provider.parse::<ProviderKind>().is_err() {
            return Err(Error::Config(format!(
                "{} names unknown provider \"{}\"",
                ENV_AI_PROVIDER, self.default_provider
            )));
        }
        if self.default_provider == ProviderKind::Gemini.as_str() && self.gemini.api_key.is_none() {
            warn!("AI_KEY is not set; Gemini requests will fail until it is configured");
        }
        Ok(())
    }
}
