//! Feature gate

use super::types::FeatureDecision;
use crate::core::entitlement::{EntitlementResolver, TierSnapshot};
use tracing::debug;

/// Boolean feature lookup against the resolved tier.
#[derive(Clone)]
pub struct FeatureGate {
    resolver: EntitlementResolver,
}

impl FeatureGate {
    /// Create a gate over the given resolver.
    pub fn new(resolver: EntitlementResolver) -> Self {
        Self { resolver }
    }

    /// Whether the tenant's tier grants `feature`.
    ///
    /// Unknown feature names and unresolvable tenants are denied; an
    /// unrecognized feature must never be silently granted.
    pub async fn check_feature(&self, tenant_id: &str, feature: &str) -> FeatureDecision {
        let snapshot = self.resolver.resolve(tenant_id).await;
        Self::decide(snapshot.as_ref(), feature)
    }

    /// Decide against an already-resolved snapshot.
    pub fn decide(snapshot: Option<&TierSnapshot>, feature: &str) -> FeatureDecision {
        let Some(snapshot) = snapshot else {
            return FeatureDecision {
                allowed: false,
                upgrade_suggestion: None,
            };
        };

        match snapshot.features.get(feature) {
            Some(true) => FeatureDecision {
                allowed: true,
                upgrade_suggestion: None,
            },
            Some(false) => FeatureDecision {
                allowed: false,
                upgrade_suggestion: snapshot.tier.upgrade_for_feature(feature),
            },
            None => {
                debug!(
                    tenant = %snapshot.tenant_id,
                    feature,
                    "unknown feature requested, denying"
                );
                FeatureDecision {
                    allowed: false,
                    upgrade_suggestion: None,
                }
            }
        }
    }
}
