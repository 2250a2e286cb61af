//! Concurrency capper implementation

use crate::core::tiers::{Tier, UNLIMITED};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tracing::{debug, error};

/// Denial returned when a tenant is at its concurrency ceiling.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CapExceeded {
    /// The tier's ceiling
    pub limit: i64,
    /// In-flight requests at check time
    pub current: i64,
}

/// Per-tenant cap on simultaneous in-flight metered requests.
#[derive(Clone, Default)]
pub struct ConcurrencyCapper {
    slots: Arc<DashMap<String, Arc<AtomicI64>>>,
}

impl ConcurrencyCapper {
    /// Create an empty capper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically check-and-increment the tenant's in-flight count.
    ///
    /// The returned [`SlotGuard`] decrements exactly once when dropped. The
    /// compare loop runs on a single atomic per tenant, so acquire/release
    /// are linearizable per tenant.
    pub fn acquire(&self, tenant_id: &str, tier: Tier) -> Result<SlotGuard, CapExceeded> {
        let counter = self
            .slots
            .entry(tenant_id.to_string())
            .or_insert_with(|| Arc::new(AtomicI64::new(0)))
            .clone();

        let limit = tier.max_concurrent();
        let result = counter.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
            if limit != UNLIMITED && current >= limit {
                None
            } else {
                Some(current + 1)
            }
        });

        match result {
            Ok(previous) => {
                debug!(
                    tenant = tenant_id,
                    in_flight = previous + 1,
                    limit,
                    "concurrency slot acquired"
                );
                Ok(SlotGuard {
                    tenant_id: tenant_id.to_string(),
                    counter,
                })
            }
            Err(current) => {
                debug!(tenant = tenant_id, current, limit, "concurrency cap reached");
                Err(CapExceeded { limit, current })
            }
        }
    }

    /// Current in-flight count for a tenant.
    pub fn in_flight(&self, tenant_id: &str) -> i64 {
        self.slots
            .get(tenant_id)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }
}

/// RAII handle for one acquired concurrency slot.
///
/// Dropping the guard releases the slot; the release is floored at zero and
/// an underflow is logged as an invariant violation, never propagated.
#[derive(Debug)]
pub struct SlotGuard {
    tenant_id: String,
    counter: Arc<AtomicI64>,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        let result = self
            .counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                if current > 0 {
                    Some(current - 1)
                } else {
                    None
                }
            });
        if result.is_err() {
            error!(
                tenant = %self.tenant_id,
                "concurrency counter underflow on release, clamping at zero"
            );
        }
    }
}
