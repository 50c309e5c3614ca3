//! Shared progress and cancellation primitives.
//!
//! Pollers hold clones while the controller runs; the controller is the only
//! writer, readers tolerate slightly stale values.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Cooperative cancellation flag. Requesting cancellation never interrupts
/// an in-flight row; the controller checks at row boundaries.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Default)]
struct ProgressState {
    generated: AtomicU32,
    total: AtomicU32,
}

/// Cheaply cloneable view of a run's progress counters.
#[derive(Debug, Clone, Default)]
pub struct ProgressHandle(Arc<ProgressState>);

impl ProgressHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_total(&self, total: u32) {
        self.0.total.store(total, Ordering::Relaxed);
        self.0.generated.store(0, Ordering::Relaxed);
    }

    pub(crate) fn set_generated(&self, generated: u32) {
        self.0.generated.store(generated, Ordering::Relaxed);
    }

    pub fn generated(&self) -> u32 {
        self.0.generated.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> u32 {
        self.0.total.load(Ordering::Relaxed)
    }

    pub fn percent(&self) -> u8 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        ((self.generated() as u64 * 100) / total as u64).min(100) as u8
    }
}
