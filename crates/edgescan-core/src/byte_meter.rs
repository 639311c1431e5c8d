//! Process-wide counter of application-layer bytes transferred.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Lock-free byte counter updated by probers and estimators as they run,
/// read at stage boundaries for reporting.
#[derive(Debug, Default)]
pub struct ByteMeter {
    total: AtomicU64,
}

impl ByteMeter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            total: AtomicU64::new(0),
        })
    }

    pub fn add(&self, bytes: u64) {
        self.total.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }
}
