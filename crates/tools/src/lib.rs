//! Developer Tooling: session inspector and config file loading.

pub mod config;
pub mod inspector;

pub use config::SkateConfig;
pub use inspector::{SessionInspector, SessionSummary};
