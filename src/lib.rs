//! # werkstatt-metering
//!
//! Package-entitlement and usage-metering engine for a multi-tenant workshop
//! chatbot platform.
//!
//! The engine maps each tenant (a single automotive workshop) to its
//! subscription tier, enforces the tier's resource ceilings atomically
//! against a shared counter store, throttles burst request rate per sliding
//! window, caps simultaneous in-flight requests, and emits upgrade warnings
//! as usage approaches a limit.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use werkstatt_metering::config::EngineConfig;
//! use werkstatt_metering::core::tiers::Metric;
//! use werkstatt_metering::core::MeteringEngine;
//! use werkstatt_metering::storage::StorageLayer;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (storage, _store) = StorageLayer::in_memory();
//!     let engine = MeteringEngine::new(EngineConfig::default(), storage);
//!
//!     match engine.admit_with_precheck("workshop-42", Metric::Leads, 1).await {
//!         Ok(admission) => {
//!             // ... run the protected action ...
//!             engine.complete(admission, 1).await;
//!         }
//!         Err(rejection) => {
//!             eprintln!("rejected with HTTP {}", rejection.http_status());
//!         }
//!     }
//! }
//! ```
//!
//! Rate-limit and concurrency state is process-local and advisory; monthly
//! ceilings are enforced against the durable counter store behind
//! [`storage::UsageStore`]. Multi-instance deployments swap in shared-store
//! trait implementations for stricter enforcement without changing call
//! sites.

#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod storage;
pub mod utils;

// Re-export the main entry points
pub use crate::config::{EngineConfig, FailurePolicy};
pub use crate::core::tiers::{Metric, Tier, UNLIMITED};
pub use crate::core::{Admission, MeteringEngine, Rejection};
pub use crate::storage::StorageLayer;
pub use crate::utils::error::{EngineError, Result};
