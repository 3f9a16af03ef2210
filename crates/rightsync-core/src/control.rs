//! Run cancellation: a shared abort token.
//!
//! The CLI trips the token from its Ctrl-C handler; the transport checks it
//! from libcurl's progress callback and the orchestrator checks it between
//! items, so a run stops at the next blocking boundary.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cheap to clone; all clones share one flag.
#[derive(Debug, Clone, Default)]
pub struct AbortToken {
    flag: Arc<AtomicBool>,
}

impl AbortToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request abort. Only performs an atomic store, so it is cheap to call
    /// from any thread.
    pub fn abort(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_aborted(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
