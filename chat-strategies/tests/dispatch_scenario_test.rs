//! End-to-end dispatch scenarios: engine + registry + echo default + chat-completion override.

mod common;

use std::sync::Arc;

use chat_strategies::{ChatCompletionStrategy, EchoStrategy};
use common::{
    audio_event, text_event, FailingStore, MockCompletion, MockPlatform, MockTranscription,
};
use dispatch_core::{MessageKind, Reply};
use dispatch_engine::{DispatchEngine, StatusCode};
use memory_core::{MemoryStore, Turn};
use memory_inmemory::InMemoryStore;
use strategy_registry::StrategyRegistry;

struct Harness {
    engine: DispatchEngine,
    platform: Arc<MockPlatform>,
    memory: Arc<InMemoryStore>,
}

fn harness(completion: MockCompletion, events: Vec<dispatch_core::Event>) -> Harness {
    let platform = Arc::new(MockPlatform {
        events,
        ..MockPlatform::default()
    });
    let memory = Arc::new(InMemoryStore::new());
    let chat = ChatCompletionStrategy::new(
        Arc::new(completion),
        Arc::new(MockTranscription::returning("turn on the lights")),
        platform.clone(),
    )
    .with_memory(memory.clone());

    let registry = StrategyRegistry::new()
        .with_default(Arc::new(EchoStrategy::new()))
        .with_override(MessageKind::Audio, Arc::new(chat));
    let engine = DispatchEngine::new(Arc::new(registry), platform.clone());
    Harness {
        engine,
        platform,
        memory,
    }
}

/// **Test: Text falls through to echo while audio goes to the chat override.**
#[tokio::test]
async fn test_text_echoed_audio_answered() {
    let h = harness(
        MockCompletion::answering("Done."),
        vec![text_event("U1", "hello"), audio_event("U1", "m9")],
    );

    assert_eq!(h.engine.handle_delivery("valid", b"{}").await, StatusCode::OK);

    let mut delivered = h.platform.delivered();
    delivered.sort_by(|a, b| a.0.cmp(&b.0));
    assert_eq!(
        delivered,
        vec![
            (
                "reply-audio".to_string(),
                Reply::text("🎤: turn on the lights\nDone.")
            ),
            ("reply-hello".to_string(), Reply::text("hello")),
        ]
    );
    assert_eq!(
        h.memory.recall("U1", 10).await.unwrap(),
        vec![Turn::user("turn on the lights"), Turn::assistant("Done.")]
    );
}

/// **Test: A failed completion sends nothing for that event, keeps the orphan turn, and still acks.**
#[tokio::test]
async fn test_completion_failure_sends_nothing() {
    let h = harness(MockCompletion::failing(), vec![audio_event("U1", "m9")]);

    let outcome = h.engine.submit(vec![audio_event("U1", "m9")]).await;
    assert_eq!(outcome.failed, 1);
    assert!(h.platform.delivered().is_empty());
    assert_eq!(h.memory.size("U1").await.unwrap(), 1);

    assert_eq!(h.engine.handle_delivery("valid", b"{}").await, StatusCode::OK);
    assert!(h.platform.delivered().is_empty());
}

/// **Test: A forged signature is rejected before any strategy runs.**
#[tokio::test]
async fn test_forged_signature_rejected() {
    let h = harness(
        MockCompletion::answering("unused"),
        vec![text_event("U1", "hello")],
    );

    assert_eq!(
        h.engine.handle_delivery("forged", b"{}").await,
        StatusCode::BAD_REQUEST
    );
    assert!(h.platform.delivered().is_empty());
    assert_eq!(h.memory.user_count().await, 0);
}

/// **Test: A storage fault for one user fails only that event; the siblings are still answered.**
///
/// **Setup:** chat strategy as the default, history store broken for "U-broken".
/// **Expected:** outcome failed = 1, replied = 2; both healthy users get their answer.
#[tokio::test]
async fn test_storage_fault_isolated_to_one_event() {
    let platform = Arc::new(MockPlatform::default());
    let chat = ChatCompletionStrategy::new(
        Arc::new(MockCompletion::answering("Sure.")),
        Arc::new(MockTranscription::returning("")),
        platform.clone(),
    )
    .with_memory(Arc::new(FailingStore::for_user("U-broken")));
    let registry = StrategyRegistry::new().with_default(Arc::new(chat));
    let engine = DispatchEngine::new(Arc::new(registry), platform.clone());

    let outcome = engine
        .submit(vec![
            text_event("U1", "one"),
            text_event("U-broken", "two"),
            text_event("U2", "three"),
        ])
        .await;

    assert_eq!(outcome.failed, 1);
    assert_eq!(outcome.replied, 2);
    let mut delivered = platform.delivered();
    delivered.sort_by(|a, b| a.0.cmp(&b.0));
    assert_eq!(
        delivered,
        vec![
            ("reply-one".to_string(), Reply::text("Sure.")),
            ("reply-three".to_string(), Reply::text("Sure.")),
        ]
    );
}
