//! Uniform success/error response record.
//!
//! Every call into the orchestration layer ends in an [`Envelope`]. Success
//! and failure share one shape; only `success` and the contents of `data`
//! differ. On failure `data` is `{"error": "<message>"}`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::Error;

/// Message used when an error carries no usable text.
pub const FALLBACK_ERROR_MESSAGE: &str = "Unknown provider error";

/// Response record returned to every caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub success: bool,
    pub data: Option<Value>,
    #[serde(default)]
    pub tokens_used: Option<u64>,
    pub provider: String,
}

/// Normalized error text for [`Envelope::error`].
///
/// Strings are used verbatim and errors contribute their display message.
/// An empty message collapses to [`FALLBACK_ERROR_MESSAGE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMessage(String);

impl ErrorMessage {
    fn new(message: String) -> Self {
        if message.is_empty() {
            Self(FALLBACK_ERROR_MESSAGE.to_string())
        } else {
            Self(message)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ErrorMessage {
    fn from(message: &str) -> Self {
        Self::new(message.to_string())
    }
}

impl From<String> for ErrorMessage {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&Error> for ErrorMessage {
    fn from(err: &Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<Error> for ErrorMessage {
    fn from(err: Error) -> Self {
        Self::from(&err)
    }
}

impl<T: Into<ErrorMessage>> From<Option<T>> for ErrorMessage {
    fn from(message: Option<T>) -> Self {
        match message {
            Some(m) => m.into(),
            None => Self(FALLBACK_ERROR_MESSAGE.to_string()),
        }
    }
}

impl Envelope {
    /// Build a successful envelope.
    pub fn success(provider: impl Into<String>, data: Value, tokens_used: Option<u64>) -> Self {
        Self {
            success: true,
            data: Some(data),
            tokens_used,
            provider: provider.into(),
        }
    }

    /// Build a failed envelope with `data = {"error": message}`.
    pub fn error(provider: impl Into<String>, error: impl Into<ErrorMessage>) -> Self {
        let message: ErrorMessage = error.into();
        Self {
            success: false,
            data: Some(json!({ "error": message.0 })),
            tokens_used: None,
            provider: provider.into(),
        }
    }

    /// Error text of a failed envelope.
    pub fn error_message(&self) -> Option<&str> {
        if self.success {
            return None;
        }
        self.data
            .as_ref()
            .and_then(|d| d.get("error"))
            .and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let env = Envelope::success("gemini", json!({"summary": "ok"}), Some(42));
        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(
            value,
            json!({
                "success": true,
                "data": {"summary": "ok"},
                "tokensUsed": 42,
                "provider": "gemini",
            })
        );
    }

    #[test]
    fn test_error_envelope_from_string_is_verbatim() {
        let env = Envelope::error("openai", "[openai] summarize is not configured yet.");
        assert!(!env.success);
        assert_eq!(env.tokens_used, None);
        assert_eq!(
            env.error_message(),
            Some("[openai] summarize is not configured yet.")
        );
    }

    #[test]
    fn test_error_envelope_from_error_uses_display() {
        let err = Error::Config("AI_KEY is not configured.".to_string());
        let env = Envelope::error("gemini", &err);
        assert_eq!(
            env.error_message(),
            Some("Configuration error: AI_KEY is not configured.")
        );
    }

    #[test]
    fn test_error_envelope_fallback_message() {
        let env = Envelope::error("router", "");
        assert_eq!(env.error_message(), Some(FALLBACK_ERROR_MESSAGE));

        let env = Envelope::error("router", None::<String>);
        assert_eq!(env.error_message(), Some(FALLBACK_ERROR_MESSAGE));
    }

    #[test]
    fn test_error_envelope_has_null_tokens() {
        let env = Envelope::error("claude", "boom");
        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(
            value,
            json!({
                "success": false,
                "data": {"error": "boom"},
                "tokensUsed": null,
                "provider": "claude",
            })
        );

        let env = Envelope::success("gemini", json!({}), None);
        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(value["tokensUsed"], Value::Null);
        assert_eq!(value.as_object().unwrap().len(), 4);
    }

    #[test]
    fn test_whitespace_message_is_verbatim() {
        let env = Envelope::error("router", "  ");
        assert_eq!(env.error_message(), Some("  "));
    }

    #[test]
    fn test_error_message_absent_on_success() {
        let env = Envelope::success("gemini", json!({"error": "not really"}), None);
        assert!(env.error_message().is_none());
    }
}
