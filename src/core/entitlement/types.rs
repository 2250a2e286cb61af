//! Entitlement data structures

use crate::core::tiers::{Metric, SupportLevel, Tier, TierFeatures, TierLimits};
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Half-open billing interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BillingPeriod {
    /// The calendar month containing `now`, used when a tenant has no active
    /// subscription row.
    pub fn current_month(now: DateTime<Utc>) -> Self {
        let start = Utc
            .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
            .single()
            .unwrap_or(now);
        let (next_year, next_month) = if now.month() == 12 {
            (now.year() + 1, 1)
        } else {
            (now.year(), now.month() + 1)
        };
        let end = Utc
            .with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0)
            .single()
            .unwrap_or(now);
        Self { start, end }
    }

    /// Whether a daily counter date falls inside the period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start.date_naive() && date < self.end.date_naive()
    }

    /// Whole days from `now` until the period ends, floored at zero.
    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        (self.end - now).num_days().max(0)
    }

    /// Period length in whole days.
    pub fn length_days(&self) -> i64 {
        (self.end - self.start).num_days().max(1)
    }
}

/// Subscription lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Inactive,
    PastDue,
}

/// A tenant's subscription row as returned by the subscription store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantSubscription {
    /// Workshop identifier
    pub tenant_id: String,
    /// Subscribed tier
    pub tier: Tier,
    /// Lifecycle state; only `Active` grants the tier
    pub status: SubscriptionStatus,
    /// Current billing period
    pub period: BillingPeriod,
}

/// One daily usage counter row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyUsage {
    pub date: NaiveDate,
    pub quantity: i64,
}

/// Aggregated current-period usage per metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageTotals {
    pub leads: i64,
    pub api_calls: i64,
    pub storage_gb: i64,
    pub seats: i64,
    pub integrations: i64,
}

impl UsageTotals {
    /// Current-period total for a metric.
    pub fn get(&self, metric: Metric) -> i64 {
        match metric {
            Metric::Leads => self.leads,
            Metric::ApiCalls => self.api_calls,
            Metric::StorageGb => self.storage_gb,
            Metric::Seats => self.seats,
            Metric::Integrations => self.integrations,
        }
    }

    pub(crate) fn set(&mut self, metric: Metric, value: i64) {
        match metric {
            Metric::Leads => self.leads = value,
            Metric::ApiCalls => self.api_calls = value,
            Metric::StorageGb => self.storage_gb = value,
            Metric::Seats => self.seats = value,
            Metric::Integrations => self.integrations = value,
        }
    }
}

/// Resolved entitlement view for a tenant: tier data merged with
/// current-period usage.
#[derive(Debug, Clone, Serialize)]
pub struct TierSnapshot {
    pub tenant_id: String,
    pub tier: Tier,
    pub status: SubscriptionStatus,
    pub limits: TierLimits,
    pub features: TierFeatures,
    pub support_level: SupportLevel,
    pub price_minor_units: Option<u32>,
    pub usage: UsageTotals,
    pub period: BillingPeriod,
}
