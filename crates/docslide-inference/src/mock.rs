//! Scriptable mock provider for deterministic testing.
//!
//! ```rust
//! use docslide_inference::mock::MockProvider;
//! use serde_json::json;
//!
//! let provider = MockProvider::new("gemini")
//!     .then_transient("network timeout")
//!     .with_response(json!({"summary": "ok"}));
//! ```
//!
//! Scripted steps are consumed one per call, in order; once the script is
//! empty every call gets the default response.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use docslide_core::{Envelope, Error, Operation, Payload, Result};

use crate::provider::DocumentProvider;

/// Outcome of a single mock call.
#[derive(Debug, Clone)]
pub enum MockStep {
    /// Successful envelope carrying this data.
    Data(Value),
    /// Failed envelope returned as a normal result.
    Envelope(Envelope),
    /// The call fails with this error.
    Fail(Error),
}

/// One recorded call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub operation: Operation,
    pub prompt: String,
    pub timestamp: std::time::Instant,
}

#[derive(Debug)]
struct MockState {
    script: VecDeque<MockStep>,
    calls: Vec<MockCall>,
}

/// Mock document provider.
#[derive(Clone)]
pub struct MockProvider {
    name: String,
    default_step: MockStep,
    tokens_used: Option<u64>,
    latency: Duration,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Mock registered under `name`, answering every call with a
    /// schema-valid payload for the requested operation.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_step: MockStep::Data(Value::Null),
            tokens_used: Some(42),
            latency: Duration::ZERO,
            state: Arc::new(Mutex::new(MockState {
                script: VecDeque::new(),
                calls: Vec::new(),
            })),
        }
    }

    /// Answer calls with `data` once the script is exhausted.
    pub fn with_response(mut self, data: Value) -> Self {
        self.default_step = MockStep::Data(data);
        self
    }

    /// Fail every unscripted call with `err`.
    pub fn with_error(mut self, err: Error) -> Self {
        self.default_step = MockStep::Fail(err);
        self
    }

    /// Report this token count on successful envelopes.
    pub fn with_tokens(mut self, tokens: Option<u64>) -> Self {
        self.tokens_used = tokens;
        self
    }

    /// Sleep before answering (uses tokio time, so paused clocks apply).
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Queue an arbitrary step.
    pub fn then(self, step: MockStep) -> Self {
        self.lock().script.push_back(step);
        self
    }

    /// Queue a transient failure.
    pub fn then_transient(self, message: impl Into<String>) -> Self {
        self.then(MockStep::Fail(Error::Transient(message.into())))
    }

    /// Queue a failed envelope.
    pub fn then_envelope_error(self, message: impl Into<String>) -> Self {
        let message: String = message.into();
        let envelope = Envelope::error(self.name.clone(), message);
        self.then(MockStep::Envelope(envelope))
    }

    /// All recorded calls.
    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    /// Number of calls for one operation.
    pub fn call_count_for(&self, operation: Operation) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn sample_data(operation: Operation) -> Value {
        match operation {
            Operation::AnalyzePdf => json!({
                "slides": [{"title": "Overview", "content": "Mock slide"}],
                "summary": "Mock summary"
            }),
            Operation::Summarize => json!({"summary": "Mock summary"}),
            Operation::ExtractSections => json!({
                "sections": [{"title": "Introduction", "description": "Mock section"}]
            }),
        }
    }

    async fn answer(&self, operation: Operation, payload: &Payload) -> Result<Envelope> {
        let step = {
            let mut state = self.lock();
            state.calls.push(MockCall {
                operation,
                prompt: payload.prompt.clone(),
                timestamp: std::time::Instant::now(),
            });
            state
                .script
                .pop_front()
                .unwrap_or_else(|| self.default_step.clone())
        };

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        match step {
            MockStep::Data(Value::Null) => Ok(Envelope::success(
                self.name.clone(),
                Self::sample_data(operation),
                self.tokens_used,
            )),
            MockStep::Data(data) => Ok(Envelope::success(self.name.clone(), data, self.tokens_used)),
            MockStep::Envelope(envelope) => Ok(envelope),
            MockStep::Fail(err) => Err(err),
        }
    }
}

impl std::fmt::Debug for MockProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockProvider")
            .field("name", &self.name)
            .field("calls", &self.call_count())
            .finish()
    }
}

#[async_trait]
impl DocumentProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn analyze_pdf(&self, payload: &Payload) -> Result<Envelope> {
        self.answer(Operation::AnalyzePdf, payload).await
    }

    async fn summarize(&self, payload: &Payload) -> Result<Envelope> {
        self.answer(Operation::Summarize, payload).await
    }

    async fn extract_sections(&self, payload: &Payload) -> Result<Envelope> {
        self.answer(Operation::ExtractSections, payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_answers_match_operation_schema() {
        let provider = MockProvider::new("mock");
        for op in Operation::ALL {
            let env = provider.run(op, &Payload::default()).await.unwrap();
            assert!(env.success);
            let data = env.data.unwrap();
            for (field, kind) in op.schema().required_fields() {
                assert!(kind.matches(&data[*field]), "{} missing {}", op, field);
            }
        }
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_script_runs_in_order() {
        let provider = MockProvider::new("mock")
            .then_transient("network")
            .then_envelope_error("quota exhausted")
            .with_response(json!({"summary": "s"}));
        let payload = Payload::from_prompt("p");

        assert!(provider.summarize(&payload).await.is_err());
        let failed = provider.summarize(&payload).await.unwrap();
        assert_eq!(failed.error_message(), Some("quota exhausted"));
        let ok = provider.summarize(&payload).await.unwrap();
        assert_eq!(ok.data, Some(json!({"summary": "s"})));

        let calls = provider.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|c| c.prompt == "p"));
    }

    #[tokio::test]
    async fn test_clones_share_call_log() {
        let provider = MockProvider::new("mock");
        let clone = provider.clone();
        clone.extract_sections(&Payload::default()).await.unwrap();
        assert_eq!(provider.call_count_for(Operation::ExtractSections), 1);
        provider.clear_calls();
        assert_eq!(clone.call_count(), 0);
    }
}
