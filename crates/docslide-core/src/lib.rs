//! # docslide-core
//!
//! Core types and abstractions for docslide.
//!
//! This crate provides the data model shared by the orchestration layer and
//! the HTTP adapter: the error type, the response [`Envelope`], operations,
//! schema types and request payloads, plus the canonical JSON serializer
//! used for cache keys.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Provider failures surfaced to a caller |
//! | WARN  | Retry scheduled, best-effort repair applied |
//! | INFO  | Lifecycle events (startup, provider registration) |
//! | DEBUG | Cache hits/misses, provider dispatch |
//! | TRACE | Raw model output |
//!
//! Structured fields use `component`, `op`, `provider`, `cache_key`,
//! `duration_ms`, `attempt`, `delay_ms`, `prompt_len`, `response_len`,
//! `tokens_used`, `success` and `error`.

pub mod canonical;
pub mod defaults;
pub mod envelope;
pub mod error;
pub mod models;

// Re-export commonly used types at crate root
pub use canonical::stable_stringify;
pub use envelope::{Envelope, ErrorMessage, FALLBACK_ERROR_MESSAGE};
pub use error::{Error, Result};
pub use models::{FieldKind, FilePart, Operation, Payload, SchemaType};
