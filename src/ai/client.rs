//! HTTP transport for AI providers
//!
//! Speaks both wire formats from one place: OpenAI-style /chat/completions
//! (which Ollama also serves locally) and the Anthropic messages API.
//! Sync HTTP via ureq; no async runtime needed.

use crate::ai::{AiError, AiResult};
use crate::config::{ProviderConfig, WireFormat};
use crate::models::{Role, Turn};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use super::Transport;

/// Real transport used outside tests
#[derive(Debug, Default)]
pub struct HttpTransport;

impl Transport for HttpTransport {
    fn send(&self, provider: &ProviderConfig, turns: &[Turn], system: &str) -> AiResult<String> {
        let api_key = resolve_api_key(provider)?;
        let agent = make_agent(provider.timeout_secs);

        match provider.wire {
            WireFormat::OpenAi => send_openai(&agent, provider, api_key.as_deref(), turns, system),
            WireFormat::Anthropic => {
                let key = api_key.ok_or_else(|| AiError::MissingApiKey {
                    env_var: provider.api_key_env.clone().unwrap_or_default(),
                })?;
                send_anthropic(&agent, provider, &key, turns, system)
            }
        }
    }
}

fn resolve_api_key(provider: &ProviderConfig) -> AiResult<Option<String>> {
    match &provider.api_key_env {
        None => Ok(None),
        Some(env_var) => env::var(env_var).map(Some).map_err(|_| AiError::MissingApiKey {
            env_var: env_var.clone(),
        }),
    }
}

fn make_agent(timeout_secs: u64) -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false) // We handle status codes ourselves
        .timeout_global(Some(Duration::from_secs(timeout_secs)))
        .build()
        .new_agent()
}

const MAX_TOKENS: u32 = 4096;
const TEMPERATURE: f32 = 0.2;

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

fn role_str(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

/// Conversation as wire messages; an empty history becomes a single greeting
fn wire_messages(turns: &[Turn]) -> Vec<ChatMessage> {
    if turns.is_empty() {
        return vec![ChatMessage {
            role: "user",
            content: "Hello".to_string(),
        }];
    }
    turns
        .iter()
        .map(|t| ChatMessage {
            role: role_str(t.role),
            content: t.content.clone(),
        })
        .collect()
}

// OpenAI API types
#[derive(Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: String,
}

fn send_openai(
    agent: &ureq::Agent,
    provider: &ProviderConfig,
    api_key: Option<&str>,
    turns: &[Turn],
    system: &str,
) -> AiResult<String> {
    let mut messages = vec![ChatMessage {
        role: "system",
        content: system.to_string(),
    }];
    messages.extend(wire_messages(turns));

    let body = OpenAiRequest {
        model: provider.model.clone(),
        messages,
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
    };

    let mut req = agent
        .post(&provider.endpoint)
        .header("Content-Type", "application/json");

    if let Some(key) = api_key {
        req = req.header("Authorization", &format!("Bearer {key}"));
    }

    let response = req
        .send_json(&body)
        .map_err(|e| AiError::Transport(e.to_string()))?;

    let status = response.status().as_u16();
    if status >= 400 {
        let message = response.into_body().read_to_string().unwrap_or_default();
        return Err(AiError::ApiError { status, message });
    }

    let resp: OpenAiResponse = response
        .into_body()
        .read_json()
        .map_err(|e| AiError::ParseError(e.to_string()))?;

    resp.choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or_else(|| AiError::ParseError("No response choices".to_string()))
}

// Anthropic API types
#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
    system: String,
    temperature: f32,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
}

#[derive(Deserialize)]
struct AnthropicContent {
    #[serde(rename = "type")]
    content_type: String,
    text: String,
}

fn send_anthropic(
    agent: &ureq::Agent,
    provider: &ProviderConfig,
    api_key: &str,
    turns: &[Turn],
    system: &str,
) -> AiResult<String> {
    let body = AnthropicRequest {
        model: provider.model.clone(),
        max_tokens: MAX_TOKENS,
        messages: wire_messages(turns),
        system: system.to_string(),
        temperature: TEMPERATURE,
    };

    let response = agent
        .post(&provider.endpoint)
        .header("Content-Type", "application/json")
        .header("x-api-key", api_key)
        .header("anthropic-version", "2023-06-01")
        .send_json(&body)
        .map_err(|e| AiError::Transport(e.to_string()))?;

    let status = response.status().as_u16();
    if status >= 400 {
        let message = response.into_body().read_to_string().unwrap_or_default();
        return Err(AiError::ApiError { status, message });
    }

    let resp: AnthropicResponse = response
        .into_body()
        .read_json()
        .map_err(|e| AiError::ParseError(e.to_string()))?;

    resp.content
        .into_iter()
        .find(|c| c.content_type == "text")
        .map(|c| c.text)
        .ok_or_else(|| AiError::ParseError("No text content in response".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_messages_roles() {
        let turns = vec![Turn::user("hi"), Turn::assistant("hello"), Turn::user("explain")];
        let messages = wire_messages(&turns);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, "user");
        assert_eq!(messages[1].role, "assistant");
        assert_eq!(messages[2].content, "explain");
    }

    #[test]
    fn test_empty_history_becomes_greeting() {
        let messages = wire_messages(&[]);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "user");
        assert_eq!(messages[0].content, "Hello");
    }

    #[test]
    fn test_missing_key_is_error() {
        let mut provider = ProviderConfig::openai("gpt-4o-mini");
        provider.api_key_env = Some("CRITIQUE_TEST_KEY_THAT_IS_NOT_SET".to_string());
        match resolve_api_key(&provider) {
            Err(AiError::MissingApiKey { env_var }) => {
                assert_eq!(env_var, "CRITIQUE_TEST_KEY_THAT_IS_NOT_SET");
            }
            other => panic!("expected MissingApiKey, got {other:?}"),
        }
    }

    #[test]
    fn test_keyless_provider_resolves_none() {
        let provider = ProviderConfig::ollama("llama3.2:3b");
        assert!(matches!(resolve_api_key(&provider), Ok(None)));
    }
}
