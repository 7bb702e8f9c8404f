//! AI provider bridge
//!
//! Routes a chat request to a priority-ordered chain of AI backends
//! (local model runtime or remote API) with bounded retry and deterministic
//! fallback. BYOK model: API keys come from environment variables named in
//! the provider config.
//!
//! # Example
//!
//! ```rust,ignore
//! use critique::ai::Bridge;
//! use critique::config::BridgeConfig;
//! use critique::models::Turn;
//!
//! let bridge = Bridge::new(BridgeConfig::default());
//! let reply = bridge.respond(&[Turn::user("What does this function do?")]);
//! ```

mod bridge;
mod client;

pub use bridge::{Bridge, Transport, SYSTEM_PROMPT};
pub use client::HttpTransport;

use thiserror::Error;

/// Errors that can occur while talking to a provider
#[derive(Error, Debug)]
pub enum AiError {
    #[error("Missing API key: {env_var} not set")]
    MissingApiKey { env_var: String },

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Failed to parse API response: {0}")]
    ParseError(String),
}

impl AiError {
    /// Whether retrying the same provider can help.
    ///
    /// Timeouts and transport failures retry with backoff; definitive API
    /// rejections and missing keys fall through to the next candidate.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AiError::Transport(_))
    }
}

pub type AiResult<T> = Result<T, AiError>;
