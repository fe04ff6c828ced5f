use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{CatmergeError, Result};

/// Process-wide gate for pipeline runs.
pub static RUN_GATE: RunGate = RunGate::new();

/// Busy flag allowing at most one run at a time. No queue: a second caller
/// is turned away with [`CatmergeError::Busy`].
#[derive(Debug)]
pub struct RunGate {
    busy: AtomicBool,
}

impl RunGate {
    pub const fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
        }
    }

    /// Claim the gate. The returned permit releases it when dropped, whether
    /// the run succeeded, failed, or unwound.
    pub fn try_acquire(&self) -> Result<RunPermit<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map_err(|_| CatmergeError::Busy)?;
        tracing::debug!("run gate acquired");
        Ok(RunPermit { gate: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Default for RunGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Proof of holding the gate.
#[derive(Debug)]
pub struct RunPermit<'a> {
    gate: &'a RunGate,
}

impl Drop for RunPermit<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
        tracing::debug!("run gate released");
    }
}
