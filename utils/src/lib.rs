//! Shared utilities for the emergency shutdown module.

pub mod logging;

pub use logging::{init_tracing, LogFormat, LoggingError};
