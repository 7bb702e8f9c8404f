//! Configuration support
//!
//! All configuration is loaded once at startup and passed by reference into
//! the engine and the provider bridge; nothing here mutates after load.

mod app;
mod providers;

pub use app::{AnalysisConfig, AppConfig, ScoringConfig, SuggestConfig};
pub use providers::{Backoff, BridgeConfig, ProviderConfig, ProviderKind, WireFormat};
