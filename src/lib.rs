//! Critique - aggregated code review for Python snippets
//!
//! Fans several static-analysis tools out over one snippet, normalizes
//! their diagnostics into a single finding schema, derives four bounded
//! quality scores, generates prioritized suggestions, and answers chat
//! about the code through a fallback chain of AI providers.
//!
//! The external surface is small: [`aggregator::Engine::review`] for
//! analysis and [`ai::Bridge::respond`] for chat. Everything an HTTP layer
//! or CLI needs goes through those two calls.

pub mod aggregator;
pub mod ai;
pub mod analyzers;
pub mod cli;
pub mod config;
pub mod models;
pub mod reporters;
pub mod scoring;
pub mod suggest;
