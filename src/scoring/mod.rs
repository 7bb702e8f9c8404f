//! Quality scoring
//!
//! Derives the four bounded scores from the merged findings plus the
//! structural metrics supplied by the complexity adapter. Every deduction
//! comes from `ScoringConfig`; the computation is deterministic and
//! side-effect-free.
//!
//! # Scoring Formula
//!
//! ```text
//! readability = 0.6 × (100 - lint penalties) + 0.4 × clamp(MI, 0, 100)
//!               lint penalties: warning -2, error -5
//! complexity  = piecewise from avg CC (≤5 → 100, -6/unit above, floor 10)
//!               minus 5 per complexity finding
//! security    = 100 - security penalties (warning -10, error -25, critical -50)
//!               exactly 100 when no security findings exist
//! testing     = heuristic proxy: test constructs present → 80, absent → 20
//! ```
//!
//! Unparseable input (a critical syntax finding) forces all four scores to
//! 0: no other metric is meaningful over code that did not parse.
//!
//! The testing axis has no dedicated analyzer. It is a documented
//! heuristic, not a tool-verified measurement.

use crate::config::ScoringConfig;
use crate::models::{Finding, ScoreSet, Severity, SourceTool, StructuralMetrics};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

fn test_import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bimport\s+(unittest|pytest)\b").expect("valid regex"))
}

fn test_def_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bdef\s+test_").expect("valid regex"))
}

/// True when the snippet contains test-indicative constructs
pub fn has_test_constructs(code: &str) -> bool {
    test_import_re().is_match(code) || test_def_re().is_match(code)
}

/// True when the findings carry the unparseable-input marker
pub fn is_syntax_failure(findings: &[Finding]) -> bool {
    findings
        .iter()
        .any(|f| f.severity == Severity::Critical && f.tool == SourceTool::Syntax)
}

/// Findings that count toward penalties.
///
/// Synthetic "analysis unavailable" findings are operational telemetry
/// about the toolchain, not defects in the submitted code, and must not
/// drag scores down.
fn penalizable<'a>(findings: &'a [Finding], tool: SourceTool) -> impl Iterator<Item = &'a Finding> {
    findings
        .iter()
        .filter(move |f| f.tool == tool && !f.is_unavailable())
}

fn clamp_score(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

/// Compute the four scores for one analysis run
pub fn score(
    findings: &[Finding],
    metrics: &StructuralMetrics,
    code: &str,
    config: &ScoringConfig,
) -> ScoreSet {
    if is_syntax_failure(findings) {
        debug!("Syntax failure: forcing all scores to 0");
        return ScoreSet::zeroed();
    }

    ScoreSet {
        readability: readability_score(findings, metrics, config),
        complexity: complexity_score(findings, metrics, config),
        security: security_score(findings, config),
        testing: testing_score(code, config),
    }
}

fn readability_score(
    findings: &[Finding],
    metrics: &StructuralMetrics,
    config: &ScoringConfig,
) -> u8 {
    let penalty: f64 = penalizable(findings, SourceTool::Lint)
        .map(|f| match f.severity {
            Severity::Warning => config.lint_warning_penalty,
            Severity::Error | Severity::Critical => config.lint_error_penalty,
            Severity::Info => 0.0,
        })
        .sum();
    let penalty_based = (100.0 - penalty).max(0.0);

    match metrics.maintainability_index {
        Some(mi) => {
            let blended = (1.0 - config.mi_weight) * penalty_based
                + config.mi_weight * mi.clamp(0.0, 100.0);
            clamp_score(blended)
        }
        None => clamp_score(penalty_based),
    }
}

fn complexity_score(
    findings: &[Finding],
    metrics: &StructuralMetrics,
    config: &ScoringConfig,
) -> u8 {
    let base = match metrics.avg_complexity {
        Some(cc) if cc > config.cc_baseline => {
            (100.0 - (cc - config.cc_baseline) * config.cc_step_penalty)
                .max(config.complexity_floor)
        }
        _ => 100.0,
    };

    let finding_penalty = penalizable(findings, SourceTool::Complexity).count() as f64
        * config.complexity_finding_penalty;

    clamp_score(base - finding_penalty)
}

fn security_score(findings: &[Finding], config: &ScoringConfig) -> u8 {
    let penalty: f64 = penalizable(findings, SourceTool::Security)
        .map(|f| match f.severity {
            Severity::Warning => config.security_warning_penalty,
            Severity::Error => config.security_error_penalty,
            Severity::Critical => config.security_critical_penalty,
            Severity::Info => 0.0,
        })
        .sum();

    clamp_score(100.0 - penalty)
}

fn testing_score(code: &str, config: &ScoringConfig) -> u8 {
    if has_test_constructs(code) {
        config.testing_with_tests
    } else {
        config.testing_without_tests
    }
}
