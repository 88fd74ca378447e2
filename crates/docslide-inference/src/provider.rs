//! Document provider capability trait and registry.
//!
//! Every provider exposes the same three operations. Providers that cannot
//! serve an operation still answer it, with a failed [`Envelope`], so callers
//! never need to probe for support:
//!
//! ```text
//! "gemini"  → GeminiProvider (remote model)
//! "openai"  → OpenAIProvider when OPENAI_API_KEY is set, else stub
//! "claude"  → stub
//! ```
//!
//! `Err` from an operation means the call itself failed (configuration,
//! transport, unusable output); the orchestrator decides whether to retry
//! and converts it into an envelope.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use docslide_core::defaults::DEFAULT_PROVIDER;
use docslide_core::{Envelope, Error, Operation, Payload, Result};

use crate::config::InferenceConfig;
use crate::providers::{GeminiProvider, OpenAIProvider, UnconfiguredProvider};

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// A backend able to run the document operations.
#[async_trait]
pub trait DocumentProvider: Send + Sync {
    /// Canonical provider identifier (lower-case).
    fn name(&self) -> &str;

    /// Slides + summary for the payload's document.
    async fn analyze_pdf(&self, payload: &Payload) -> Result<Envelope>;

    /// Summary, optionally answering the payload's question.
    async fn summarize(&self, payload: &Payload) -> Result<Envelope>;

    /// Section outline of the payload's document.
    async fn extract_sections(&self, payload: &Payload) -> Result<Envelope>;

    /// Dispatch `operation` to the matching method.
    async fn run(&self, operation: Operation, payload: &Payload) -> Result<Envelope> {
        match operation {
            Operation::AnalyzePdf => self.analyze_pdf(payload).await,
            Operation::Summarize => self.summarize(payload).await,
            Operation::ExtractSections => self.extract_sections(payload).await,
        }
    }
}

// ---------------------------------------------------------------------------
// Built-in provider kinds
// ---------------------------------------------------------------------------

/// Providers known to the registry out of the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Gemini,
    OpenAI,
    Claude,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [Self::Gemini, Self::OpenAI, Self::Claude];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAI => "openai",
            Self::Claude => "claude",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_name(s).as_str() {
            "gemini" => Ok(Self::Gemini),
            "openai" => Ok(Self::OpenAI),
            "claude" => Ok(Self::Claude),
            other => Err(Error::UnknownProvider(other.to_string())),
        }
    }
}

/// Provider names are matched case-insensitively, ignoring surrounding space.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

// ---------------------------------------------------------------------------
// Provider registry
// ---------------------------------------------------------------------------

/// Maps provider identifiers to implementations.
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn DocumentProvider>>,
    default_provider: String,
}

impl ProviderRegistry {
    /// Create an empty registry with the given default provider name.
    pub fn new(default_provider: impl AsRef<str>) -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: normalize_name(default_provider.as_ref()),
        }
    }

    /// Registry holding the built-in providers configured from `config`.
    pub fn from_config(config: &InferenceConfig) -> Result<Self> {
        let mut registry = Self::new(&config.default_provider);
        for kind in ProviderKind::ALL {
            let provider: Arc<dyn DocumentProvider> = match kind {
                ProviderKind::Gemini => Arc::new(GeminiProvider::new(
                    config.gemini.clone(),
                    config.validator(),
                )?),
                ProviderKind::OpenAI => match config.openai.api_key {
                    Some(_) => Arc::new(OpenAIProvider::new(
                        config.openai.clone(),
                        config.validator(),
                    )?),
                    None => Arc::new(UnconfiguredProvider::new(kind.as_str())),
                },
                ProviderKind::Claude => Arc::new(UnconfiguredProvider::new(kind.as_str())),
            };
            registry.register(provider);
        }
        Ok(registry)
    }

    /// Register a provider under its own name, replacing any previous one.
    pub fn register(&mut self, provider: Arc<dyn DocumentProvider>) {
        let name = normalize_name(provider.name());
        info!(provider = %name, "Registering document provider");
        self.providers.insert(name, provider);
    }

    /// Name used when no override is given.
    pub fn default_provider(&self) -> &str {
        &self.default_provider
    }

    /// Registered provider names, sorted.
    pub fn provider_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.providers.keys().map(|s| s.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    pub fn has_provider(&self, name: &str) -> bool {
        self.providers.contains_key(&normalize_name(name))
    }

    /// Name that `get_provider(name)` would look up.
    pub fn resolve_name(&self, name: Option<&str>) -> String {
        let requested = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(self.default_provider.as_str());
        let normalized = normalize_name(requested);
        if normalized.is_empty() {
            DEFAULT_PROVIDER.to_string()
        } else {
            normalized
        }
    }

    /// Resolve `name` (or the default) to a provider.
    pub fn get_provider(&self, name: Option<&str>) -> Result<Arc<dyn DocumentProvider>> {
        let resolved = self.resolve_name(name);
        match self.providers.get(&resolved) {
            Some(provider) => Ok(Arc::clone(provider)),
            None => {
                let err = Error::UnknownProvider(resolved);
                error!(error = %err, "Provider lookup failed");
                Err(err)
            }
        }
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.provider_ids())
            .field("default_provider", &self.default_provider)
            .finish()
    }
}
