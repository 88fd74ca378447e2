//! Google Gemini provider.
//!
//! Sends the uploaded document inline (base64) together with the rendered
//! prompt and asks for a JSON response, which is validated against the
//! operation's schema before it is wrapped in an envelope.

mod backend;
mod types;

pub use backend::{GeminiConfig, GeminiProvider};
pub use types::*;
