//! Analysis aggregation engine
//!
//! The engine orchestrates one review request:
//! - Runs every registered analyzer in parallel using rayon
//! - Joins the full adapter set (never first-completion)
//! - Merges, deduplicates, and orders the findings
//! - Hands the merged result to the scorer and suggestion generator
//!
//! The engine itself never fails a request: adapter faults arrive as
//! synthetic findings and unparseable code arrives as a critical syntax
//! finding. The only request-level error is a malformed inbound request.

use crate::analyzers::{
    run_snippet, Analyzer, AnalyzerOutput, BanditAnalyzer, RadonAnalyzer, RuffAnalyzer,
    SyntaxAnalyzer,
};
use crate::config::{AnalysisConfig, AppConfig, ScoringConfig, SuggestConfig};
use crate::models::{
    compare_findings, Finding, FindingsSummary, Review, ScoreSet, StructuralMetrics,
};
use crate::{scoring, suggest};
use anyhow::{bail, Result};
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Encouragement line for a review with nothing to suggest
const CLEAN_RUN_NOTE: &str =
    "Looks good. Consider adding docstrings and a few tests to lock behavior in.";

/// Orchestrates snippet analysis across all registered analyzers
pub struct Engine {
    analyzers: Vec<Arc<dyn Analyzer>>,
    analysis: AnalysisConfig,
    scoring: ScoringConfig,
    suggest: SuggestConfig,
}

impl Engine {
    /// Engine with the default adapter set: syntax, ruff, bandit, radon
    pub fn new(config: &AppConfig) -> Self {
        let timeout = config.analysis.tool_timeout_secs;
        let analyzers: Vec<Arc<dyn Analyzer>> = vec![
            Arc::new(SyntaxAnalyzer::new()),
            Arc::new(RuffAnalyzer::new(timeout).with_max_findings(config.analysis.max_findings)),
            Arc::new(BanditAnalyzer::new(timeout).with_max_findings(config.analysis.max_findings)),
            Arc::new(RadonAnalyzer::new(timeout, config.analysis.cc_warn_threshold)),
        ];
        Self::with_analyzers(config, analyzers)
    }

    /// Engine over a custom adapter set (used by tests and embedders)
    pub fn with_analyzers(config: &AppConfig, analyzers: Vec<Arc<dyn Analyzer>>) -> Self {
        Self {
            analyzers,
            analysis: config.analysis.clone(),
            scoring: config.scoring.clone(),
            suggest: config.suggest.clone(),
        }
    }

    /// Register an additional analyzer
    pub fn register(&mut self, analyzer: Arc<dyn Analyzer>) {
        debug!("Registering analyzer: {}", analyzer.name());
        self.analyzers.push(analyzer);
    }

    pub fn analyzer_count(&self) -> usize {
        self.analyzers.len()
    }

    /// Analyze one snippet and build the aggregated review.
    ///
    /// Fails only on a malformed request (empty code); every analysis
    /// fault is converted to data inside the review.
    pub fn review(&self, code: &str, filename: &str) -> Result<Review> {
        if code.trim().is_empty() {
            bail!("no code provided");
        }
        if filename.trim().is_empty() {
            bail!("no filename provided");
        }

        if !filename.to_lowercase().ends_with(".py") {
            return Ok(non_python_review());
        }

        let start = Instant::now();
        info!(
            "Starting review of {} with {} analyzers",
            filename,
            self.analyzers.len()
        );

        let workers = if self.analysis.workers == 0 {
            self.analyzers.len().max(1)
        } else {
            self.analysis.workers
        };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()?;

        // Join over the full adapter set; collect preserves registration
        // order, so the merge is independent of completion order.
        let outputs: Vec<AnalyzerOutput> = pool.install(|| {
            self.analyzers
                .par_iter()
                .map(|analyzer| {
                    let output = analyzer.analyze(code, filename);
                    debug!(
                        "{}: {} findings in {}ms",
                        analyzer.name(),
                        output.findings.len(),
                        output.duration_ms
                    );
                    output
                })
                .collect()
        });

        let metrics = outputs
            .iter()
            .find_map(|o| o.metrics)
            .unwrap_or_default();

        let mut findings = merge_findings(outputs);
        findings.sort_by(compare_findings);
        findings.truncate(self.analysis.max_findings);

        let scores = scoring::score(&findings, &metrics, code, &self.scoring);
        let mut suggestions = suggest::suggest(&findings, &self.suggest);
        if suggestions.is_empty() {
            suggestions.push(CLEAN_RUN_NOTE.to_string());
        }

        let summary = summary_digest(&FindingsSummary::from_findings(&findings), &metrics);

        let output = if self.analysis.capture_output && !scoring::is_syntax_failure(&findings) {
            Some(run_snippet(code, self.analysis.exec_timeout_secs))
        } else {
            None
        };

        info!(
            "Review complete: {} findings, scores {:?} in {}ms",
            findings.len(),
            scores.as_array(),
            start.elapsed().as_millis()
        );

        Ok(Review {
            summary,
            scores,
            findings,
            suggestions,
            output,
        })
    }
}

/// Concatenate adapter outputs and drop duplicate findings.
///
/// Two findings are duplicates iff they share `(tool, line, code)`; the
/// first-seen instance wins, with adapter registration order as the
/// tie-break.
fn merge_findings(outputs: Vec<AnalyzerOutput>) -> Vec<Finding> {
    let mut seen: HashSet<(crate::models::SourceTool, Option<u32>, String)> = HashSet::new();
    let mut merged = Vec::new();

    for output in outputs {
        for finding in output.findings {
            let key = (finding.tool, finding.line, finding.code.clone());
            if seen.insert(key) {
                merged.push(finding);
            } else {
                debug!("Dropping duplicate finding: {} at {:?}", finding.code, finding.line);
            }
        }
    }

    merged
}

/// Deterministic one-line digest of counts and structural metrics
fn summary_digest(summary: &FindingsSummary, metrics: &StructuralMetrics) -> String {
    let mi_txt = metrics
        .maintainability_index
        .map(|mi| format!("{mi:.0}"))
        .unwrap_or_else(|| "n/a".to_string());
    let avg_txt = metrics
        .avg_complexity
        .map(|cc| format!("{cc:.1}"))
        .unwrap_or_else(|| "n/a".to_string());
    let max_txt = metrics
        .max_complexity
        .map(|cc| format!("{cc:.1}"))
        .unwrap_or_else(|| "n/a".to_string());

    format!(
        "Maintainability Index: {} | Complexity: avg {} ({}), max {} | \
         Findings: {} critical, {} error, {} warning, {} info",
        mi_txt,
        avg_txt,
        metrics.complexity_label(),
        max_txt,
        summary.critical,
        summary.error,
        summary.warning,
        summary.info
    )
}

/// Review for a non-Python filename; the adapter set is Python-only
fn non_python_review() -> Review {
    Review {
        summary: "Non-Python file — analysis is only enabled for .py snippets.".to_string(),
        scores: ScoreSet::zeroed(),
        findings: Vec::new(),
        suggestions: vec!["Submit a .py file to get full analysis.".to_string()],
        output: None,
    }
}
