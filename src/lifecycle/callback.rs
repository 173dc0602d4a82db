use super::StopCallback;
use crate::process::{ProcessListener, ProcessState};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Runs a stop callback at most once, whichever path gets there first.
///
/// The flag decides; the mutex only hands the `FnOnce` to the winner.
pub(crate) struct GuardedCallback {
    executed: AtomicBool,
    callback: Mutex<Option<StopCallback>>,
}

impl GuardedCallback {
    pub(crate) fn new(callback: StopCallback) -> Self {
        Self {
            executed: AtomicBool::new(false),
            callback: Mutex::new(Some(callback)),
        }
    }

    /// Returns true if this call ran the callback.
    pub(crate) fn execute(&self) -> bool {
        if self
            .executed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        if let Some(callback) = self.callback.lock().take() {
            callback();
        }
        true
    }
}

impl ProcessListener for GuardedCallback {
    fn terminated(&self, from: ProcessState) {
        debug!("Process terminated from {}, running stop callback", from);
        self.execute();
    }

    fn failed(&self, from: ProcessState, failure: &str) {
        debug!(
            "Process failed from {} ({}), running stop callback",
            from, failure
        );
        self.execute();
    }
}
