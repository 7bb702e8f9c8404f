//! AI provider chain configuration
//!
//! The bridge tries providers in the order they appear here. Retry and
//! backoff policy are fixed at configuration time, not per call.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Whether a provider is a local model runtime or a remote API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Local,
    Remote,
}

/// Request/response wire format a provider speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    /// OpenAI-style /chat/completions (also what Ollama serves)
    #[default]
    OpenAi,
    /// Anthropic /v1/messages
    Anthropic,
}

/// One candidate provider in the fallback chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub name: String,
    #[serde(default)]
    pub kind: ProviderKind,
    #[serde(default)]
    pub wire: WireFormat,
    pub endpoint: String,
    pub model: String,
    /// Environment variable holding the API key; None for keyless providers
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    2
}

impl ProviderConfig {
    /// Local Ollama through its OpenAI-compatible endpoint
    pub fn ollama(model: impl Into<String>) -> Self {
        Self {
            name: "ollama".to_string(),
            kind: ProviderKind::Local,
            wire: WireFormat::OpenAi,
            endpoint: "http://localhost:11434/v1/chat/completions".to_string(),
            model: model.into(),
            api_key_env: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }

    /// Remote OpenAI chat completions
    pub fn openai(model: impl Into<String>) -> Self {
        Self {
            name: "openai".to_string(),
            kind: ProviderKind::Remote,
            wire: WireFormat::OpenAi,
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: model.into(),
            api_key_env: Some("OPENAI_API_KEY".to_string()),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }

    /// Remote Anthropic messages API
    pub fn anthropic(model: impl Into<String>) -> Self {
        Self {
            name: "anthropic".to_string(),
            kind: ProviderKind::Remote,
            wire: WireFormat::Anthropic,
            endpoint: "https://api.anthropic.com/v1/messages".to_string(),
            model: model.into(),
            api_key_env: Some("ANTHROPIC_API_KEY".to_string()),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

/// Backoff policy between retry attempts for one provider
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "policy", rename_all = "lowercase")]
pub enum Backoff {
    Linear { base_ms: u64 },
    Exponential { base_ms: u64 },
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff::Linear { base_ms: 500 }
    }
}

impl Backoff {
    /// Delay before retry attempt `attempt` (1-indexed)
    pub fn delay(&self, attempt: u32) -> Duration {
        let ms = match self {
            Backoff::Linear { base_ms } => base_ms.saturating_mul(attempt as u64),
            Backoff::Exponential { base_ms } => {
                base_ms.saturating_mul(1u64 << attempt.min(10).saturating_sub(1))
            }
        };
        Duration::from_millis(ms)
    }
}

/// Priority-ordered provider chain plus the shared backoff policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
    #[serde(default)]
    pub backoff: Backoff,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            providers: vec![
                ProviderConfig::ollama("llama3.2:3b"),
                ProviderConfig::openai("gpt-4o-mini"),
            ],
            backoff: Backoff::default(),
        }
    }
}
