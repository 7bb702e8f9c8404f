//! Application configuration
//!
//! Loads `critique.toml` from the working directory, then the user config
//! under the platform config dir, with environment variables taking the
//! highest priority. Built-in defaults cover everything else.
//!
//! # Configuration Format
//!
//! ```toml
//! # critique.toml
//!
//! [analysis]
//! tool_timeout_secs = 20
//! capture_output = false
//! cc_warn_threshold = 10
//!
//! [scoring]
//! security_error_penalty = 25
//!
//! [suggest]
//! max_suggestions = 10
//!
//! [[providers.providers]]
//! name = "ollama"
//! kind = "local"
//! endpoint = "http://localhost:11434/v1/chat/completions"
//! model = "llama3.2:3b"
//! ```

use crate::config::BridgeConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Sections a per-user config file may override
#[derive(Debug, Default, Deserialize)]
struct UserOverlay {
    providers: Option<BridgeConfig>,
}

/// Top-level configuration, constructed once and passed by reference
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub suggest: SuggestConfig,
    #[serde(default)]
    pub providers: BridgeConfig,
}

/// Limits and switches for the analysis pipeline
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Timeout for each external tool invocation
    #[serde(default = "default_tool_timeout")]
    pub tool_timeout_secs: u64,
    /// Timeout when executing the submitted snippet
    #[serde(default = "default_exec_timeout")]
    pub exec_timeout_secs: u64,
    /// Run the snippet and capture stdout/stderr into the review
    #[serde(default)]
    pub capture_output: bool,
    /// Maximum findings to keep in a review
    #[serde(default = "default_max_findings")]
    pub max_findings: usize,
    /// Cyclomatic complexity above which a function gets a finding
    #[serde(default = "default_cc_warn_threshold")]
    pub cc_warn_threshold: f64,
    /// Number of parallel analyzer workers (0 = one per adapter)
    #[serde(default)]
    pub workers: usize,
}

fn default_tool_timeout() -> u64 {
    20
}

fn default_exec_timeout() -> u64 {
    5
}

fn default_max_findings() -> usize {
    100
}

fn default_cc_warn_threshold() -> f64 {
    10.0
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            tool_timeout_secs: default_tool_timeout(),
            exec_timeout_secs: default_exec_timeout(),
            capture_output: false,
            max_findings: default_max_findings(),
            cc_warn_threshold: default_cc_warn_threshold(),
            workers: 0,
        }
    }
}

/// Fixed penalty constants for the scorer
///
/// Every deduction the scorer applies comes from here, so the scoring
/// behavior is inspectable and overridable in one place.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_lint_warning_penalty")]
    pub lint_warning_penalty: f64,
    #[serde(default = "default_lint_error_penalty")]
    pub lint_error_penalty: f64,
    /// Weight of the maintainability index in the readability blend
    #[serde(default = "default_mi_weight")]
    pub mi_weight: f64,
    /// Average complexity at or below which the complexity score is 100
    #[serde(default = "default_cc_baseline")]
    pub cc_baseline: f64,
    /// Points subtracted per complexity unit above the baseline
    #[serde(default = "default_cc_step_penalty")]
    pub cc_step_penalty: f64,
    /// Lowest the complexity curve can go before finding penalties
    #[serde(default = "default_complexity_floor")]
    pub complexity_floor: f64,
    /// Secondary penalty per complexity-category finding
    #[serde(default = "default_complexity_finding_penalty")]
    pub complexity_finding_penalty: f64,
    #[serde(default = "default_security_warning_penalty")]
    pub security_warning_penalty: f64,
    #[serde(default = "default_security_error_penalty")]
    pub security_error_penalty: f64,
    #[serde(default = "default_security_critical_penalty")]
    pub security_critical_penalty: f64,
    /// Testing heuristic score when test constructs are present
    #[serde(default = "default_testing_with_tests")]
    pub testing_with_tests: u8,
    /// Testing heuristic ceiling when no test constructs are found
    #[serde(default = "default_testing_without_tests")]
    pub testing_without_tests: u8,
}

fn default_lint_warning_penalty() -> f64 {
    2.0
}

fn default_lint_error_penalty() -> f64 {
    5.0
}

fn default_mi_weight() -> f64 {
    0.4
}

fn default_cc_baseline() -> f64 {
    5.0
}

fn default_cc_step_penalty() -> f64 {
    6.0
}

fn default_complexity_floor() -> f64 {
    10.0
}

fn default_complexity_finding_penalty() -> f64 {
    5.0
}

fn default_security_warning_penalty() -> f64 {
    10.0
}

fn default_security_error_penalty() -> f64 {
    25.0
}

fn default_security_critical_penalty() -> f64 {
    50.0
}

fn default_testing_with_tests() -> u8 {
    80
}

fn default_testing_without_tests() -> u8 {
    20
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            lint_warning_penalty: default_lint_warning_penalty(),
            lint_error_penalty: default_lint_error_penalty(),
            mi_weight: default_mi_weight(),
            cc_baseline: default_cc_baseline(),
            cc_step_penalty: default_cc_step_penalty(),
            complexity_floor: default_complexity_floor(),
            complexity_finding_penalty: default_complexity_finding_penalty(),
            security_warning_penalty: default_security_warning_penalty(),
            security_error_penalty: default_security_error_penalty(),
            security_critical_penalty: default_security_critical_penalty(),
            testing_with_tests: default_testing_with_tests(),
            testing_without_tests: default_testing_without_tests(),
        }
    }
}

/// Suggestion generator limits
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestConfig {
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
}

fn default_max_suggestions() -> usize {
    10
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            max_suggestions: default_max_suggestions(),
        }
    }
}

impl AppConfig {
    /// Load config with priority: env vars > user config > project config > defaults
    pub fn load(project_dir: &Path) -> Result<Self> {
        let mut config = AppConfig::default();

        if let Some(project) = Self::read_toml(&project_dir.join("critique.toml")) {
            config = project;
        }

        if let Some(user_path) = Self::user_config_path().filter(|p| p.exists()) {
            if let Some(overlay) = std::fs::read_to_string(&user_path)
                .ok()
                .and_then(|content| toml::from_str::<UserOverlay>(&content).ok())
            {
                if let Some(providers) = overlay.providers {
                    debug!("Using provider chain from {:?}", user_path);
                    config.providers = providers;
                }
            }
        }

        config.apply_env();
        Ok(config)
    }

    /// Parse a config file from a TOML string (used by tests and `load`)
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("invalid critique.toml")
    }

    /// Path of the per-user config file
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("critique").join("config.toml"))
    }

    fn read_toml(path: &Path) -> Option<AppConfig> {
        let content = std::fs::read_to_string(path).ok()?;
        match Self::from_toml(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!("Ignoring unreadable config {:?}: {e:#}", path);
                None
            }
        }
    }

    /// Environment variables override file config
    fn apply_env(&mut self) {
        if let Ok(model) = std::env::var("OLLAMA_MODEL") {
            for provider in &mut self.providers.providers {
                if provider.name == "ollama" {
                    provider.model = model.clone();
                }
            }
        }
    }
}
