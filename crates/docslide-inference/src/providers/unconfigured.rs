//! Placeholder for providers that are known but not wired to a backend.

use async_trait::async_trait;
use tracing::error;

use docslide_core::{Envelope, Operation, Payload, Result};

use crate::provider::DocumentProvider;

/// Provider that answers every operation with a failed envelope.
#[derive(Debug, Clone)]
pub struct UnconfiguredProvider {
    name: String,
}

impl UnconfiguredProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn not_configured(&self, operation: Operation) -> Envelope {
        let message = format!("[{}] {} is not configured yet.", self.name, operation);
        error!(provider = %self.name, op = %operation, "{}", message);
        Envelope::error(&self.name, message)
    }
}

#[async_trait]
impl DocumentProvider for UnconfiguredProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn analyze_pdf(&self, _payload: &Payload) -> Result<Envelope> {
        Ok(self.not_configured(Operation::AnalyzePdf))
    }

    async fn summarize(&self, _payload: &Payload) -> Result<Envelope> {
        Ok(self.not_configured(Operation::Summarize))
    }

    async fn extract_sections(&self, _payload: &Payload) -> Result<Envelope> {
        Ok(self.not_configured(Operation::ExtractSections))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_extract_sections_not_configured() {
        let provider = UnconfiguredProvider::new("openai");
        let env = provider.extract_sections(&Payload::default()).await.unwrap();
        assert!(!env.success);
        assert_eq!(env.provider, "openai");
        assert_eq!(
            env.error_message(),
            Some("[openai] extractSections is not configured yet.")
        );
    }

    #[tokio::test]
    async fn test_analyze_pdf_uses_wire_name() {
        let provider = UnconfiguredProvider::new("claude");
        let env = provider.analyze_pdf(&Payload::default()).await.unwrap();
        assert_eq!(
            env.error_message(),
            Some("[claude] analyzePDF is not configured yet.")
        );
    }
}
