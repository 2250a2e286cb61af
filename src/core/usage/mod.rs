//! Usage recording
//!
//! Durable per-tenant, per-metric, per-day counters. All usage writes in the
//! platform go through this module; no other component writes counter rows.

mod recorder;

pub use recorder::UsageRecorder;
