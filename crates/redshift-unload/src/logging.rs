//! Logger implementations.
//!
//! [`TracingLogger`] is what the unload builder uses unless told otherwise.
//! [`NoopLogger`] drops everything, for callers that want silence.

use tracing::{debug, info, warn};

use crate::core::traits::UnloadLogger;

/// Forwards every message to the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    /// Create a new tracing logger.
    pub fn new() -> Self {
        Self
    }
}

impl UnloadLogger for TracingLogger {
    fn info(&self, message: &str) {
        info!("{}", message);
    }

    fn debug(&self, message: &str) {
        debug!("{}", message);
    }

    fn warn(&self, message: &str) {
        warn!("{}", message);
    }
}

/// Logger that discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl NoopLogger {
    /// Create a new no-op logger.
    pub fn new() -> Self {
        Self
    }
}

impl UnloadLogger for NoopLogger {
    fn info(&self, _message: &str) {}

    fn debug(&self, _message: &str) {}

    fn warn(&self, _message: &str) {}
}
