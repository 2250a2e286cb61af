//! Engine configuration
//!
//! Serde models plus file/environment loading.

mod loader;
pub mod models;

pub use models::{EngineConfig, EnforcementConfig, FailurePolicy, RateLimitConfig, WarningConfig};
