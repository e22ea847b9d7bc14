//! Caller-supplied cancellation for a reasoning session
//!
//! Any one external call inside the loop can stall, so the controller checks
//! the token at the top of each cycle and exits with a failed status instead
//! of leaving a half-built trace behind.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cheap, clonable cancellation flag shared between caller and controller
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token in the not-cancelled state
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; observed at the next cycle boundary
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
