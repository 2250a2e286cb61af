//! Usage recorder implementation

use crate::core::tiers::Metric;
use crate::core::warnings::WarningEmitter;
use crate::storage::UsageStore;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error};

/// Records metered usage against the daily counter store.
#[derive(Clone)]
pub struct UsageRecorder {
    usage: Arc<dyn UsageStore>,
    warnings: Arc<WarningEmitter>,
}

impl UsageRecorder {
    /// Create a recorder writing through the given store.
    pub fn new(usage: Arc<dyn UsageStore>, warnings: Arc<WarningEmitter>) -> Self {
        Self { usage, warnings }
    }

    /// Add `quantity` to today's counter for `(tenant, metric)` and
    /// re-evaluate warning thresholds.
    ///
    /// Returns `false` on storage failure instead of erroring: metering
    /// failures must never block the user-facing action. Under-counting is
    /// the accepted tradeoff; the increment itself is atomic so concurrent
    /// records are never lost once the store accepts them.
    pub async fn record(&self, tenant_id: &str, metric: Metric, quantity: i64) -> bool {
        if quantity <= 0 {
            error!(
                tenant = tenant_id,
                %metric,
                quantity,
                "refusing to record non-positive quantity"
            );
            return false;
        }

        let today = Utc::now().date_naive();
        match self.usage.upsert_add(tenant_id, metric, today, quantity).await {
            Ok(new_quantity) => {
                debug!(
                    tenant = tenant_id,
                    %metric,
                    quantity,
                    new_quantity,
                    "usage recorded"
                );
                self.warnings.evaluate(tenant_id, metric).await;
                true
            }
            Err(e) => {
                error!(
                    tenant = tenant_id,
                    %metric,
                    quantity,
                    error = %e,
                    "usage write failed, proceeding without metering"
                );
                false
            }
        }
    }
}
