//! # docslide-inference
//!
//! Provider abstraction and request orchestration for docslide.
//!
//! This crate provides:
//! - The [`DocumentProvider`] capability trait and [`ProviderRegistry`]
//! - Gemini and OpenAI-compatible providers, plus stubs for unconfigured ones
//! - A TTL response cache keyed by canonical payload hashes
//! - Bounded exponential-backoff retries
//! - Tolerant JSON parsing and schema checks for model output
//! - The [`Orchestrator`] tying all of the above together
//!
//! # Feature Flags
//!
//! - `mock`: expose [`mock::MockProvider`] outside this crate's unit tests
//!
//! # Example
//!
//! ```rust,no_run
//! use docslide_inference::{InferenceConfig, Orchestrator};
//! use docslide_core::{Operation, Payload};
//!
//! #[tokio::main]
//! async fn main() {
//!     let orchestrator = Orchestrator::from_config(&InferenceConfig::from_env()).unwrap();
//!     let envelope = orchestrator
//!         .execute(Operation::Summarize, &Payload::from_prompt("..."), None)
//!         .await;
//!     println!("{}", envelope.success);
//! }
//! ```

pub mod cache;
pub mod config;
pub mod orchestrator;
pub mod provider;
pub mod providers;
pub mod retry;
pub mod validator;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use cache::{CacheStats, ResponseCache, TtlCache};
pub use config::InferenceConfig;
pub use orchestrator::{cache_key, Orchestrator};
pub use provider::{normalize_name, DocumentProvider, ProviderKind, ProviderRegistry};
pub use providers::{
    GeminiConfig, GeminiProvider, OpenAIConfig, OpenAIProvider, UnconfiguredProvider,
};
pub use retry::{is_retryable, with_retry, RetryPolicy};
pub use validator::{validate_output, OutputValidator, ValidatedResult};
