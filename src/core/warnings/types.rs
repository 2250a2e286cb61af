//! Warning event types

use crate::core::tiers::Metric;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Append-only usage warning record.
///
/// Emitted when a tenant's usage crosses a warning threshold of its tier
/// limit. Idempotency is best-effort per threshold per billing period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarningEvent {
    /// Event identifier
    pub id: Uuid,
    /// Workshop identifier
    pub tenant_id: String,
    /// Metric whose usage crossed the threshold
    pub metric: Metric,
    /// Threshold crossed, as a fraction of the limit (0.8, 0.95)
    pub threshold: f64,
    /// Billing period the crossing belongs to
    pub period_start: DateTime<Utc>,
    /// Usage at trigger time
    pub quantity: i64,
    /// Limit at trigger time
    pub limit: i64,
    /// Emission timestamp
    pub timestamp: DateTime<Utc>,
    /// Human-readable summary for the notification UI
    pub message: String,
}
