//! Subscription tier catalog
//!
//! Compiled-in definitions of the workshop subscription packages: resource
//! limits, feature flags, pricing, rate rules and concurrency ceilings.

mod catalog;

pub use catalog::{
    Metric, RateRule, SupportLevel, Tier, TierFeatures, TierLimits, UNLIMITED,
};
