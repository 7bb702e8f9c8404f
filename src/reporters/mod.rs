//! Output reporters for review results
//!
//! Supports two output formats:
//! - `text` - Terminal output with colors
//! - `json` - Machine-readable JSON

mod json;
mod text;

use crate::models::Review;
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("unknown output format: {s}")),
        }
    }
}

/// Render a review in the requested format
pub fn render(review: &Review, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(review),
        OutputFormat::Json => json::render(review),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{Finding, Review, ScoreSet, Severity, SourceTool};

    pub(crate) fn test_review() -> Review {
        Review {
            summary: "Maintainability Index: 72 | Complexity: avg 2.5 (low), max 4.0 | \
                      Findings: 0 critical, 1 error, 1 warning, 0 info"
                .to_string(),
            scores: ScoreSet {
                readability: 88,
                complexity: 95,
                security: 75,
                testing: 20,
            },
            findings: vec![
                Finding::new(SourceTool::Security, Severity::Error, Some(4), "B301", "pickle usage"),
                Finding::new(SourceTool::Lint, Severity::Warning, Some(1), "F401", "unused import"),
            ],
            suggestions: vec![
                "Avoid pickle for untrusted data; use JSON or safer serialization.".to_string(),
                "Remove unused imports (ruff F401).".to_string(),
            ],
            output: Some("(no output)".to_string()),
        }
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("text".parse::<OutputFormat>().expect("text"), OutputFormat::Text);
        assert_eq!("JSON".parse::<OutputFormat>().expect("json"), OutputFormat::Json);
        assert!("sarif".parse::<OutputFormat>().is_err());
    }
}
