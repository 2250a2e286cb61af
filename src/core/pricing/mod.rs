//! Upgrade pricing helpers
//!
//! Pure functions only; no storage access and no hidden state.

use crate::core::entitlement::BillingPeriod;
use crate::core::tiers::Tier;
use chrono::{DateTime, Utc};

/// Prorated charge (in minor units) for upgrading mid-period.
///
/// Charges the price difference for the fraction of the period that remains,
/// rounded up. Downgrades and individually priced targets yield zero; the
/// sales flow handles those outside the engine.
pub fn prorated_upgrade_charge(
    current_price: u32,
    target_price: u32,
    days_remaining: i64,
    period_days: i64,
) -> u32 {
    if target_price <= current_price || period_days <= 0 {
        return 0;
    }
    let days_remaining = days_remaining.clamp(0, period_days);
    let delta = u64::from(target_price - current_price);
    let charge = (delta * days_remaining as u64).div_ceil(period_days as u64);
    charge.min(u64::from(u32::MAX)) as u32
}

/// Prorated charge between two cataloged tiers, when both carry a price.
pub fn prorated_tier_upgrade(
    current: Tier,
    target: Tier,
    days_remaining: i64,
    period_days: i64,
) -> Option<u32> {
    let current_price = current.price_minor_units()?;
    let target_price = target.price_minor_units()?;
    Some(prorated_upgrade_charge(
        current_price,
        target_price,
        days_remaining,
        period_days,
    ))
}

/// Prorated charge for upgrading at `now` within a billing period.
pub fn prorated_period_upgrade(
    current: Tier,
    target: Tier,
    period: &BillingPeriod,
    now: DateTime<Utc>,
) -> Option<u32> {
    prorated_tier_upgrade(
        current,
        target,
        period.days_remaining(now),
        period.length_days(),
    )
}
