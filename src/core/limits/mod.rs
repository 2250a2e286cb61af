//! Limit checking and feature gating
//!
//! Decides whether a metered action or a named feature is allowed for a
//! tenant's tier, and suggests an upgrade target on denial.

mod checker;
mod feature_gate;
mod types;

pub use checker::LimitChecker;
pub use feature_gate::FeatureGate;
pub use types::{FeatureDecision, LimitDecision};
