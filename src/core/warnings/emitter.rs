//! Warning emitter implementation

use super::types::WarningEvent;
use crate::config::models::WarningConfig;
use crate::core::entitlement::EntitlementResolver;
use crate::core::tiers::Metric;
use crate::storage::WarningSink;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Highest threshold already warned for one tenant/metric pair.
#[derive(Debug, Clone, Copy)]
struct WarnState {
    period_start: DateTime<Utc>,
    highest: f64,
}

/// Emits usage warnings on threshold crossings.
pub struct WarningEmitter {
    resolver: EntitlementResolver,
    sink: Arc<dyn WarningSink>,
    /// Thresholds as limit fractions, sorted ascending
    thresholds: Vec<f64>,
    warned: DashMap<(String, Metric), WarnState>,
}

impl WarningEmitter {
    /// Create an emitter with the configured thresholds.
    pub fn new(
        resolver: EntitlementResolver,
        sink: Arc<dyn WarningSink>,
        config: &WarningConfig,
    ) -> Self {
        let mut thresholds = config.thresholds.clone();
        thresholds.sort_by(|a, b| a.total_cmp(b));
        Self {
            resolver,
            sink,
            thresholds,
            warned: DashMap::new(),
        }
    }

    /// Re-evaluate the usage ratio for `metric` and emit warnings for newly
    /// crossed thresholds.
    ///
    /// Never blocks or fails the calling request; resolution and sink errors
    /// are logged and swallowed.
    pub async fn evaluate(&self, tenant_id: &str, metric: Metric) {
        let Some(snapshot) = self.resolver.resolve(tenant_id).await else {
            return;
        };

        let limit = snapshot.limits.get(metric);
        if limit <= 0 {
            // Unlimited tiers never warn
            return;
        }
        let usage = snapshot.usage.get(metric);
        let ratio = usage as f64 / limit as f64;

        let key = (tenant_id.to_string(), metric);
        let previous = {
            let state = self.warned.get(&key);
            match state.map(|s| *s) {
                // A new billing period resets the crossing state
                Some(s) if s.period_start == snapshot.period.start => s.highest,
                _ => 0.0,
            }
        };

        let newly_crossed: Vec<f64> = self
            .thresholds
            .iter()
            .copied()
            .filter(|&t| ratio >= t && t > previous)
            .collect();
        if newly_crossed.is_empty() {
            return;
        }

        // Mark before appending: a sink failure drops the warning (best
        // effort) instead of re-emitting on every subsequent call
        let highest = newly_crossed.last().copied().unwrap_or(previous);
        self.warned.insert(
            key,
            WarnState {
                period_start: snapshot.period.start,
                highest,
            },
        );

        for threshold in newly_crossed {
            let event = WarningEvent {
                id: Uuid::new_v4(),
                tenant_id: tenant_id.to_string(),
                metric,
                threshold,
                period_start: snapshot.period.start,
                quantity: usage,
                limit,
                timestamp: Utc::now(),
                message: format!(
                    "Usage for {metric} reached {:.0}% of the {} plan limit ({usage}/{limit})",
                    threshold * 100.0,
                    snapshot.tier,
                ),
            };
            info!(
                tenant = tenant_id,
                %metric,
                threshold,
                usage,
                limit,
                "usage warning threshold crossed"
            );
            if let Err(e) = self.sink.append(event).await {
                warn!(tenant = tenant_id, %metric, error = %e, "warning sink append failed");
            }
        }
    }
}
