//! Cancellation for deferred work scheduled against a game instance.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Thread-safe cancellation flag.
///
/// Cheap to clone; every clone observes the same flag. A game hands a clone
/// to any deferred task it schedules (e.g. the computer reply) and cancels it
/// when the game is restarted, so stale tasks become no-ops.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// True if both handles share the same flag.
    pub fn same_as(&self, other: &CancelToken) -> bool {
        Arc::ptr_eq(&self.cancelled, &other.cancelled)
    }
}

#[cfg(test)]
#[path = "cancel_tests.rs"]
mod cancel_tests;
