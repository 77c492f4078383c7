//! Shared utilities for the validator selection engine.

pub mod logging;

pub use logging::{init_logging, LogFormat, LoggingError};
