//! Provider selection with fallback and bounded retry
//!
//! One request walks an explicit state machine:
//!
//! ```text
//! SelectProvider → Send → (Success | Retry | Fallback) → Done
//! ```
//!
//! Providers are tried strictly in configured priority order; attempts are
//! never raced, keeping cost and rate-limit usage predictable. The bridge
//! holds no conversation memory: the caller supplies the full history and
//! receives exactly one assistant turn back.

use crate::ai::{AiResult, HttpTransport};
use crate::config::{BridgeConfig, ProviderConfig};
use crate::models::Turn;
use tracing::{debug, info, warn};

/// System prompt sent with every chat request
pub const SYSTEM_PROMPT: &str =
    "You are a helpful coding assistant reviewing Python snippets. Keep answers short.";

/// Seam between the bridge's routing policy and the network
pub trait Transport: Send + Sync {
    fn send(&self, provider: &ProviderConfig, turns: &[Turn], system: &str) -> AiResult<String>;
}

/// Routes chat requests through the provider fallback chain.
///
/// Stateless across calls except for the immutable configuration.
pub struct Bridge {
    config: BridgeConfig,
    transport: Box<dyn Transport>,
}

/// One step of the per-request state machine
enum Step {
    Select { provider: usize },
    Send { provider: usize, attempt: u32 },
    Done(Turn),
}

impl Bridge {
    pub fn new(config: BridgeConfig) -> Self {
        Self::with_transport(config, Box::new(HttpTransport))
    }

    /// Bridge with an injected transport (used by tests)
    pub fn with_transport(config: BridgeConfig, transport: Box<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Produce the single assistant turn for this conversation.
    ///
    /// Never fails: exhausting every provider yields a synthetic turn with
    /// an explicit unavailability notice.
    pub fn respond(&self, conversation: &[Turn]) -> Turn {
        let mut step = Step::Select { provider: 0 };

        loop {
            step = match step {
                Step::Select { provider } => match self.config.providers.get(provider) {
                    Some(candidate) => {
                        debug!("Selecting provider {} ({})", provider, candidate.name);
                        Step::Send { provider, attempt: 0 }
                    }
                    None => Step::Done(Turn::assistant(self.unavailable_notice())),
                },
                Step::Send { provider, attempt } => {
                    let candidate = &self.config.providers[provider];
                    match self.transport.send(candidate, conversation, SYSTEM_PROMPT) {
                        Ok(reply) if !reply.trim().is_empty() => {
                            info!("Reply from {} on attempt {}", candidate.name, attempt + 1);
                            Step::Done(Turn::assistant(reply))
                        }
                        Ok(_) => {
                            warn!("{} returned an empty reply", candidate.name);
                            Step::Select { provider: provider + 1 }
                        }
                        Err(e) if e.is_retryable() && attempt < candidate.max_retries => {
                            let delay = self.config.backoff.delay(attempt + 1);
                            warn!(
                                "{} attempt {} failed ({e}), retrying in {:?}",
                                candidate.name,
                                attempt + 1,
                                delay
                            );
                            std::thread::sleep(delay);
                            Step::Send { provider, attempt: attempt + 1 }
                        }
                        Err(e) => {
                            warn!("{} exhausted ({e}), falling through", candidate.name);
                            Step::Select { provider: provider + 1 }
                        }
                    }
                }
                Step::Done(turn) => return turn,
            };
        }
    }

    fn unavailable_notice(&self) -> String {
        let tried: Vec<&str> = self
            .config
            .providers
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        if tried.is_empty() {
            "AI chat is currently unavailable: no providers are configured.".to_string()
        } else {
            format!(
                "AI chat is currently unavailable: all providers failed (tried {}). \
                 Please try again later.",
                tried.join(", ")
            )
        }
    }
}
