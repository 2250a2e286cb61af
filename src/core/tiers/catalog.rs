//! Tier definitions and per-tier limit tables

use crate::core::rate_limiter::RateWindowKind;
use crate::utils::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Sentinel limit value meaning "unbounded".
pub const UNLIMITED: i64 = -1;

/// Subscription tier for a workshop tenant.
///
/// The derived `Ord` is the upgrade order: `Basic < Professional <
/// Enterprise`. Upgrade suggestions are computed from this ordering, never
/// from lookup keys.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Entry-level package
    Basic,
    /// Mid-level package
    Professional,
    /// Top package, individually priced
    Enterprise,
}

/// A countable resource type tracked per tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Captured customer leads per billing period
    Leads,
    /// Chat/API calls per billing period
    ApiCalls,
    /// Stored data in gigabytes
    StorageGb,
    /// Workshop staff seats
    Seats,
    /// Third-party integrations
    Integrations,
}

/// Support level bundled with a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportLevel {
    /// Email support only
    Email,
    /// Email plus phone support
    Phone,
    /// Dedicated contact person
    Personal,
}

/// Numeric resource ceilings for a tier. `-1` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierLimits {
    /// Leads per billing period
    pub monthly_leads: i64,
    /// Staff seats
    pub seats: i64,
    /// API calls per billing period
    pub api_calls: i64,
    /// Storage in GB
    pub storage_gb: i64,
    /// Third-party integrations
    pub integrations: i64,
}

impl TierLimits {
    /// Ceiling for a given metric.
    pub fn get(&self, metric: Metric) -> i64 {
        match metric {
            Metric::Leads => self.monthly_leads,
            Metric::ApiCalls => self.api_calls,
            Metric::StorageGb => self.storage_gb,
            Metric::Seats => self.seats,
            Metric::Integrations => self.integrations,
        }
    }
}

/// Boolean feature flags granted by a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierFeatures {
    pub email_support: bool,
    pub phone_support: bool,
    pub basic_dashboard: bool,
    pub advanced_analytics: bool,
    pub api_access: bool,
    pub custom_integrations: bool,
    pub personal_support: bool,
    pub white_label: bool,
}

impl TierFeatures {
    /// Look up a feature by its wire name.
    ///
    /// Returns `None` for names not in the catalog; the feature gate treats
    /// that as denied (unrecognized features are never silently granted).
    pub fn get(&self, name: &str) -> Option<bool> {
        match name {
            "email_support" => Some(self.email_support),
            "phone_support" => Some(self.phone_support),
            "basic_dashboard" => Some(self.basic_dashboard),
            "advanced_analytics" => Some(self.advanced_analytics),
            "api_access" => Some(self.api_access),
            "custom_integrations" => Some(self.custom_integrations),
            "personal_support" => Some(self.personal_support),
            "white_label" => Some(self.white_label),
            _ => None,
        }
    }
}

/// Request-rate rule for one window class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateRule {
    /// Maximum admitted requests per window, `-1` = unbounded
    pub limit: i64,
    /// Window duration
    pub window: Duration,
}

impl Metric {
    /// Wire name of the metric.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Leads => "leads",
            Metric::ApiCalls => "api_calls",
            Metric::StorageGb => "storage_gb",
            Metric::Seats => "seats",
            Metric::Integrations => "integrations",
        }
    }

    /// Parse a metered action name into its metric.
    ///
    /// Accepts both action aliases (`lead`, `api_call`, ...) and metric wire
    /// names. Unknown names are an error, never a silent allow.
    pub fn parse_action(action: &str) -> Result<Self> {
        match action {
            "lead" | "leads" => Ok(Metric::Leads),
            "api_call" | "api_calls" => Ok(Metric::ApiCalls),
            "storage" | "storage_gb" => Ok(Metric::StorageGb),
            "seat" | "seats" => Ok(Metric::Seats),
            "integration" | "integrations" => Ok(Metric::Integrations),
            other => Err(EngineError::UnknownMetric(other.to_string())),
        }
    }

    /// Rate-window class throttling this metric, if any.
    ///
    /// Storage, seats and integrations are not burst-prone and carry no
    /// window.
    pub fn window_kind(&self) -> Option<RateWindowKind> {
        match self {
            Metric::Leads => Some(RateWindowKind::LeadsPerHour),
            Metric::ApiCalls => Some(RateWindowKind::ApiCallsPerMinute),
            _ => None,
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Tier {
    /// Wire name of the tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Basic => "basic",
            Tier::Professional => "professional",
            Tier::Enterprise => "enterprise",
        }
    }

    /// Parse a tier wire name.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "basic" => Ok(Tier::Basic),
            "professional" => Ok(Tier::Professional),
            "enterprise" => Ok(Tier::Enterprise),
            other => Err(EngineError::Config(format!("unknown tier: {other}"))),
        }
    }

    /// The next tier up, if any. Derived from the tier ordering.
    pub fn next_up(&self) -> Option<Tier> {
        match self {
            Tier::Basic => Some(Tier::Professional),
            Tier::Professional => Some(Tier::Enterprise),
            Tier::Enterprise => None,
        }
    }

    /// Monthly price in euro cents. `None` = individually priced.
    pub fn price_minor_units(&self) -> Option<u32> {
        match self {
            Tier::Basic => Some(4_900),
            Tier::Professional => Some(14_900),
            Tier::Enterprise => None,
        }
    }

    /// Support level bundled with the tier.
    pub fn support_level(&self) -> SupportLevel {
        match self {
            Tier::Basic => SupportLevel::Email,
            Tier::Professional => SupportLevel::Phone,
            Tier::Enterprise => SupportLevel::Personal,
        }
    }

    /// Resource ceilings for the tier.
    pub fn limits(&self) -> TierLimits {
        match self {
            Tier::Basic => TierLimits {
                monthly_leads: 100,
                seats: 2,
                api_calls: 1_000,
                storage_gb: 1,
                integrations: 1,
            },
            Tier::Professional => TierLimits {
                monthly_leads: 500,
                seats: 10,
                api_calls: 10_000,
                storage_gb: 10,
                integrations: 5,
            },
            Tier::Enterprise => TierLimits {
                monthly_leads: UNLIMITED,
                seats: UNLIMITED,
                api_calls: UNLIMITED,
                storage_gb: UNLIMITED,
                integrations: UNLIMITED,
            },
        }
    }

    /// Feature flags granted by the tier.
    pub fn features(&self) -> TierFeatures {
        match self {
            Tier::Basic => TierFeatures {
                email_support: true,
                phone_support: false,
                basic_dashboard: true,
                advanced_analytics: false,
                api_access: false,
                custom_integrations: false,
                personal_support: false,
                white_label: false,
            },
            Tier::Professional => TierFeatures {
                email_support: true,
                phone_support: true,
                basic_dashboard: true,
                advanced_analytics: true,
                api_access: true,
                custom_integrations: false,
                personal_support: false,
                white_label: false,
            },
            Tier::Enterprise => TierFeatures {
                email_support: true,
                phone_support: true,
                basic_dashboard: true,
                advanced_analytics: true,
                api_access: true,
                custom_integrations: true,
                personal_support: true,
                white_label: true,
            },
        }
    }

    /// Simultaneous in-flight metered requests allowed for the tier.
    pub fn max_concurrent(&self) -> i64 {
        match self {
            Tier::Basic => 5,
            Tier::Professional => 20,
            Tier::Enterprise => 100,
        }
    }

    /// Built-in request-rate rule for a window class.
    pub fn rate_rule(&self, kind: RateWindowKind) -> RateRule {
        let limit = match (self, kind) {
            (Tier::Basic, RateWindowKind::ApiCallsPerMinute) => 60,
            (Tier::Basic, RateWindowKind::LeadsPerHour) => 10,
            (Tier::Professional, RateWindowKind::ApiCallsPerMinute) => 300,
            (Tier::Professional, RateWindowKind::LeadsPerHour) => 50,
            (Tier::Enterprise, RateWindowKind::ApiCallsPerMinute) => 1_000,
            (Tier::Enterprise, RateWindowKind::LeadsPerHour) => UNLIMITED,
        };
        RateRule {
            limit,
            window: kind.window(),
        }
    }

    /// The lowest tier (at or above this one) granting a feature, if any.
    pub fn upgrade_for_feature(&self, feature: &str) -> Option<Tier> {
        let mut candidate = self.next_up();
        while let Some(tier) = candidate {
            if tier.features().get(feature) == Some(true) {
                return Some(tier);
            }
            candidate = tier.next_up();
        }
        None
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for Tier {
    fn default() -> Self {
        Tier::Basic
    }
}
