//! End-to-end orchestration tests using the mock provider.

use std::sync::Arc;
use std::time::Duration;

use docslide_core::{Error, Operation, Payload};
use docslide_inference::mock::MockProvider;
use docslide_inference::{InferenceConfig, Orchestrator, ProviderRegistry, ResponseCache};
use serde_json::json;

fn orchestrator(mocks: &[&MockProvider]) -> Orchestrator {
    let mut registry = ProviderRegistry::new("gemini");
    for mock in mocks {
        registry.register(Arc::new((*mock).clone()));
    }
    Orchestrator::new(registry)
}

#[tokio::test]
async fn test_payload_key_order_does_not_split_cache() {
    let mock = MockProvider::new("gemini");
    let orchestrator = orchestrator(&[&mock]);

    let mut a = Payload::from_prompt("p");
    a.extras.insert("b".into(), json!(1));
    a.extras.insert("a".into(), json!({"y": 2, "x": 1}));
    let mut b = Payload::from_prompt("p");
    b.extras.insert("a".into(), json!({"x": 1, "y": 2}));
    b.extras.insert("b".into(), json!(1));

    orchestrator.execute(Operation::Summarize, &a, None).await;
    orchestrator.execute(Operation::Summarize, &b, None).await;

    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_providers_do_not_share_entries() {
    let gemini = MockProvider::new("gemini");
    let openai = MockProvider::new("openai");
    let orchestrator = orchestrator(&[&gemini, &openai]);
    let payload = Payload::from_prompt("p");

    let a = orchestrator.execute(Operation::Summarize, &payload, None).await;
    let b = orchestrator
        .execute(Operation::Summarize, &payload, Some("openai"))
        .await;

    assert_eq!(a.provider, "gemini");
    assert_eq!(b.provider, "openai");
    assert_eq!(gemini.call_count(), 1);
    assert_eq!(openai.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_retries_return_last_error() {
    let mock = MockProvider::new("gemini").with_error(Error::Transient("network down".into()));
    let orchestrator = orchestrator(&[&mock]);

    let env = orchestrator
        .execute(Operation::ExtractSections, &Payload::from_prompt("p"), None)
        .await;

    assert!(!env.success);
    assert!(env.error_message().unwrap().contains("network down"));
    assert_eq!(mock.call_count(), 4);
    assert!(orchestrator.cache().is_empty());
}

#[tokio::test]
async fn test_shared_cache_between_orchestrators() {
    let cache = Arc::new(ResponseCache::new());
    let mock = MockProvider::new("gemini");
    let first = orchestrator(&[&mock]).with_cache(Arc::clone(&cache));
    let second = orchestrator(&[&mock]).with_cache(Arc::clone(&cache));
    let payload = Payload::from_prompt("p");

    first.execute(Operation::AnalyzePdf, &payload, None).await;
    second.execute(Operation::AnalyzePdf, &payload, None).await;

    assert_eq!(mock.call_count(), 1);
    assert_eq!(cache.stats().hits, 1);
}

#[tokio::test]
async fn test_concurrent_identical_requests_are_not_deduplicated() {
    let mock = MockProvider::new("gemini").with_latency(Duration::from_millis(20));
    let orchestrator = orchestrator(&[&mock]);
    let payload = Payload::from_prompt("p");

    let (a, b) = tokio::join!(
        orchestrator.execute(Operation::Summarize, &payload, None),
        orchestrator.execute(Operation::Summarize, &payload, None)
    );

    assert!(a.success && b.success);
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test]
async fn test_builtin_stub_providers() {
    let orchestrator = Orchestrator::from_config(&InferenceConfig::default()).unwrap();

    let env = orchestrator
        .execute(Operation::AnalyzePdf, &Payload::from_prompt("p"), Some("claude"))
        .await;
    assert_eq!(env.provider, "claude");
    assert_eq!(
        env.error_message(),
        Some("[claude] analyzePDF is not configured yet.")
    );
}
