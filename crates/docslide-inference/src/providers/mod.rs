//! Concrete document providers.
//!
//! - [`GeminiProvider`]: Google Gemini `generateContent` REST API
//! - [`OpenAIProvider`]: OpenAI-compatible chat completions
//! - [`UnconfiguredProvider`]: answers every operation with a
//!   "not configured yet" envelope

mod error;
pub mod gemini;
pub mod openai;
mod unconfigured;

pub use error::status_error;
pub use gemini::{GeminiConfig, GeminiProvider};
pub use openai::{OpenAIConfig, OpenAIProvider};
pub use unconfigured::UnconfiguredProvider;
