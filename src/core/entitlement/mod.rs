//! Entitlement resolution
//!
//! Maps a tenant to its active tier and current-period usage. Read-only;
//! resolution never blocks the request path. Storage failures degrade to
//! `None` and missing subscriptions degrade to the Basic tier.

mod resolver;
#[cfg(test)]
mod tests;
mod types;

pub use resolver::EntitlementResolver;
pub use types::{
    BillingPeriod, DailyUsage, SubscriptionStatus, TenantSubscription, TierSnapshot, UsageTotals,
};
