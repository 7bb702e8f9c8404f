//! Integration tests for the provider bridge
//!
//! A scripted transport stands in for the network so the fallback chain
//! and retry policy are exercised deterministically.

use critique::ai::{AiError, AiResult, Bridge, Transport};
use critique::config::{Backoff, BridgeConfig, ProviderConfig};
use critique::models::{Role, Turn};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Transport whose behavior is fixed per provider name
struct ScriptedTransport {
    failing: Vec<String>,
    calls: Arc<AtomicU32>,
}

impl ScriptedTransport {
    fn new(failing: &[&str]) -> Self {
        Self {
            failing: failing.iter().map(|s| s.to_string()).collect(),
            calls: Arc::new(AtomicU32::new(0)),
        }
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, provider: &ProviderConfig, _turns: &[Turn], _system: &str) -> AiResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&provider.name) {
            Err(AiError::Transport("connection refused".to_string()))
        } else {
            Ok(format!("reply from {}", provider.name))
        }
    }
}

fn two_provider_config() -> BridgeConfig {
    let mut a = ProviderConfig::ollama("llama3.2:3b");
    a.name = "provider-a".to_string();
    a.max_retries = 1;
    let mut b = ProviderConfig::openai("gpt-4o-mini");
    b.name = "provider-b".to_string();
    b.max_retries = 1;
    BridgeConfig {
        providers: vec![a, b],
        backoff: Backoff::Linear { base_ms: 1 },
    }
}

#[test]
fn failing_first_provider_falls_through_to_second() {
    let bridge = Bridge::with_transport(
        two_provider_config(),
        Box::new(ScriptedTransport::new(&["provider-a"])),
    );

    let history = vec![Turn::user("what does this do?")];
    let reply = bridge.respond(&history);

    assert_eq!(reply.role, Role::Assistant);
    assert_eq!(reply.content, "reply from provider-b");
}

#[test]
fn appending_the_reply_extends_history_by_exactly_one() {
    let bridge = Bridge::with_transport(
        two_provider_config(),
        Box::new(ScriptedTransport::new(&[])),
    );

    let mut history = vec![
        Turn::user("first question"),
        Turn::assistant("first answer"),
        Turn::user("second question"),
    ];
    let before = history.len();
    let reply = bridge.respond(&history);
    history.push(reply);

    assert_eq!(history.len(), before + 1);
    assert_eq!(history[0].content, "first question");
    assert_eq!(history[2].content, "second question");
    assert_eq!(history[3].role, Role::Assistant);
}

#[test]
fn all_providers_failing_returns_notice_not_error() {
    let transport = ScriptedTransport::new(&["provider-a", "provider-b"]);
    let calls = Arc::clone(&transport.calls);
    let bridge = Bridge::with_transport(two_provider_config(), Box::new(transport));

    let reply = bridge.respond(&[Turn::user("hello")]);

    assert_eq!(reply.role, Role::Assistant);
    assert!(reply.content.contains("unavailable"));
    // Bounded: (1 + max_retries) attempts per provider, in order
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[test]
fn bridge_is_stateless_across_calls() {
    let bridge = Bridge::with_transport(
        two_provider_config(),
        Box::new(ScriptedTransport::new(&["provider-a"])),
    );

    let first = bridge.respond(&[Turn::user("one")]);
    let second = bridge.respond(&[Turn::user("two")]);

    // Same routing decision both times; no memory carried between calls
    assert_eq!(first.content, second.content);
}
