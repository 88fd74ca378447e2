//! Centralized default constants for docslide.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic
//! numbers. Organized by domain area.

// =============================================================================
// PROVIDERS
// =============================================================================

/// Provider used when neither an override nor `AI_PROVIDER` is given.
pub const DEFAULT_PROVIDER: &str = "gemini";

/// Environment variable selecting the process-wide default provider.
pub const ENV_AI_PROVIDER: &str = "AI_PROVIDER";

/// Environment variable holding the Gemini API key.
pub const ENV_AI_KEY: &str = "AI_KEY";

/// Environment variable for the Gemini model name.
pub const ENV_AI_MODEL: &str = "AI_MODEL";

/// Default Gemini model.
pub const GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Default Gemini REST endpoint.
pub const GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default OpenAI-compatible endpoint.
pub const OPENAI_URL: &str = "https://api.openai.com/v1";

/// Default OpenAI generation model.
pub const OPENAI_GEN_MODEL: &str = "gpt-4o-mini";

/// Timeout for provider generation requests in seconds.
pub const GEN_TIMEOUT_SECS: u64 = 120;

// =============================================================================
// CACHE
// =============================================================================

/// Lifetime of a cached successful envelope in seconds (5 minutes).
pub const CACHE_TTL_SECS: u64 = 300;

// =============================================================================
// RETRY
// =============================================================================

/// Additional attempts after the first failure.
pub const RETRY_MAX: u32 = 3;

/// Delay before the second attempt; doubles for each later attempt.
pub const RETRY_BASE_DELAY_MS: u64 = 500;

/// Lower-cased message fragments that mark an error as retryable.
pub const RETRYABLE_KEYWORDS: [&str; 3] = ["network", "rate limit", "timeout"];

// =============================================================================
// INGESTION
// =============================================================================

/// Maximum characters per text chunk sent to a model.
pub const CHUNK_SIZE: usize = 2000;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 4000;

/// Maximum request body size in bytes (20 MB uploads).
pub const MAX_BODY_SIZE_BYTES: usize = 20 * 1024 * 1024;

/// Provider name used for envelopes produced by the HTTP adapter itself.
pub const ROUTER_PROVIDER: &str = "router";
