//! Configuration data models

pub mod engine;
pub mod rate_limit;

pub use engine::{EngineConfig, EnforcementConfig, FailurePolicy, WarningConfig};
pub use rate_limit::{RateLimitConfig, RateOverride};
