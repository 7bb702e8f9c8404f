//! Base analyzer trait and types
//!
//! This module defines the core abstractions for snippet analysis:
//! - `Analyzer` trait that all tool adapters implement
//! - `AnalyzerOutput` for capturing one adapter's results

use crate::models::{Finding, SourceTool, StructuralMetrics};

/// Result from running a single analyzer over one snippet
#[derive(Debug, Clone, Default)]
pub struct AnalyzerOutput {
    /// Findings produced by the analyzer
    pub findings: Vec<Finding>,
    /// Structural metrics; only the complexity adapter fills this
    pub metrics: Option<StructuralMetrics>,
    /// Execution time in milliseconds
    pub duration_ms: u64,
}

impl AnalyzerOutput {
    pub fn findings(findings: Vec<Finding>) -> Self {
        Self {
            findings,
            ..Default::default()
        }
    }

    /// Output carrying only the synthetic "tool could not run" finding
    pub fn unavailable(tool: SourceTool, reason: impl std::fmt::Display) -> Self {
        Self::findings(vec![Finding::unavailable(tool, reason)])
    }
}

/// Trait for all analyzer adapters
///
/// `analyze` is infallible by contract: a tool crash, a missing binary, a
/// timeout, or unparseable output becomes a single synthetic warning
/// finding, never a fault propagated to the caller. Empty code yields an
/// empty output. Adapters own their subprocess spawning, timeout, and
/// output capture entirely.
pub trait Analyzer: Send + Sync {
    /// Unique identifier for this analyzer (e.g. "ruff")
    fn name(&self) -> &'static str;

    /// Which finding category this analyzer reports under
    fn tool(&self) -> SourceTool;

    /// Analyze the snippet and return normalized findings
    fn analyze(&self, code: &str, filename: &str) -> AnalyzerOutput;
}
