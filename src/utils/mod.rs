//! Shared utilities for the metering engine

pub mod error;
pub mod logging;

pub use error::{EngineError, Result};
