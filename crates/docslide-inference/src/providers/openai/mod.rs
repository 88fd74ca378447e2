//! OpenAI-compatible chat completions provider.

mod backend;
mod types;

pub use backend::{OpenAIConfig, OpenAIProvider};
pub use types::*;
