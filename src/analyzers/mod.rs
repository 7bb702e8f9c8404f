//! Analyzer adapters
//!
//! Each adapter wraps one analysis tool and translates its native
//! diagnostics into the unified `Finding` schema. Adding or removing a tool
//! never touches the aggregator or the scorer.

mod bandit;
mod base;
mod exec;
mod external_tool;
mod radon;
mod ruff;
mod syntax;

pub use bandit::BanditAnalyzer;
pub use base::{Analyzer, AnalyzerOutput};
pub use exec::run_snippet;
pub use external_tool::{
    is_python_tool_installed, is_tool_installed, run_external_tool, write_snippet,
    ExternalToolResult,
};
pub use radon::RadonAnalyzer;
pub use ruff::RuffAnalyzer;
pub use syntax::SyntaxAnalyzer;
