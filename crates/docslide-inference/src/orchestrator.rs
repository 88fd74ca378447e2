//! Request orchestration: provider resolution, caching and retries.
//!
//! ```text
//! execute(op, payload, override)
//!   → resolve provider
//!   → key = "{provider}:{op}:{sha256(stable_stringify(redacted payload))}"
//!   → cache hit? return it
//!   → with_retry(provider.run(op, payload))
//!   → success envelope? write through to cache
//!   → envelope
//! ```
//!
//! Every failure ends up as an error envelope; `execute` has no error path.

use std::sync::Arc;
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};
use tracing::{debug, error, info};

use docslide_core::{stable_stringify, Envelope, Operation, Payload, Result};

use crate::cache::ResponseCache;
use crate::config::InferenceConfig;
use crate::provider::ProviderRegistry;
use crate::retry::{with_retry, RetryPolicy};

/// Cache key for `payload` sent to `provider` as `operation`.
///
/// File bytes are replaced by their metadata before hashing, so two uploads
/// with the same name, type and size share a key.
pub fn cache_key(provider: &str, operation: Operation, payload: &Payload) -> String {
    let canonical = stable_stringify(&payload.redacted());
    let digest = Sha256::digest(canonical.as_bytes());
    format!("{}:{}:{}", provider, operation, hex::encode(digest))
}

/// Composes the registry, response cache and retry policy.
pub struct Orchestrator {
    registry: ProviderRegistry,
    cache: Arc<ResponseCache>,
    retry: RetryPolicy,
    cache_ttl: Duration,
}

impl Orchestrator {
    /// Orchestrator with a fresh cache and default retry/TTL settings.
    pub fn new(registry: ProviderRegistry) -> Self {
        Self {
            registry,
            cache: Arc::new(ResponseCache::new()),
            retry: RetryPolicy::default(),
            cache_ttl: Duration::from_secs(docslide_core::defaults::CACHE_TTL_SECS),
        }
    }

    /// Build the built-in providers and settings from `config`.
    pub fn from_config(config: &InferenceConfig) -> Result<Self> {
        let registry = ProviderRegistry::from_config(config)?;
        Ok(Self::new(registry)
            .with_retry_policy(config.retry)
            .with_cache_ttl(config.cache_ttl))
    }

    /// Share an existing cache instead of the private one.
    pub fn with_cache(mut self, cache: Arc<ResponseCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Lifetime of cached envelopes; zero stores them without expiry.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    /// Run `operation` on the resolved provider.
    pub async fn execute(
        &self,
        operation: Operation,
        payload: &Payload,
        provider_override: Option<&str>,
    ) -> Envelope {
        let provider_name = self.registry.resolve_name(provider_override);
        let provider = match self.registry.get_provider(Some(provider_name.as_str())) {
            Ok(provider) => provider,
            Err(err) => return Envelope::error(provider_name, &err),
        };

        let key = cache_key(&provider_name, operation, payload);
        if let Some(cached) = self.cache.get(&key) {
            debug!(
                component = "orchestrator",
                provider = %provider_name,
                op = %operation,
                cache_key = %key,
                "Cache HIT"
            );
            return cached;
        }

        let started = Instant::now();
        let result = with_retry(&self.retry, || provider.run(operation, payload)).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(envelope) if envelope.success => {
                info!(
                    provider = %provider_name,
                    op = %operation,
                    duration_ms,
                    tokens_used = ?envelope.tokens_used,
                    "Operation succeeded"
                );
                let ttl = (!self.cache_ttl.is_zero()).then_some(self.cache_ttl);
                self.cache.set(key, envelope.clone(), ttl);
                envelope
            }
            Ok(envelope) => {
                error!(
                    provider = %provider_name,
                    op = %operation,
                    duration_ms,
                    error = envelope.error_message().unwrap_or_default(),
                    "Provider returned failure envelope"
                );
                envelope
            }
            Err(err) => {
                error!(
                    provider = %provider_name,
                    op = %operation,
                    duration_ms,
                    error = %err,
                    "Operation failed"
                );
                Envelope::error(provider_name, &err)
            }
        }
    }

    pub async fn analyze_pdf(&self, payload: &Payload, provider: Option<&str>) -> Envelope {
        self.execute(Operation::AnalyzePdf, payload, provider).await
    }

    pub async fn summarize(&self, payload: &Payload, provider: Option<&str>) -> Envelope {
        self.execute(Operation::Summarize, payload, provider).await
    }

    pub async fn extract_sections(&self, payload: &Payload, provider: Option<&str>) -> Envelope {
        self.execute(Operation::ExtractSections, payload, provider).await
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("registry", &self.registry)
            .field("retry", &self.retry)
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}
