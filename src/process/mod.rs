//! Managed processes: self-driving units with their own start/stop state
//! machine, observable through listeners.
//!
//! The adapter in [`crate::lifecycle`] only ever talks to [`ManagedProcess`];
//! [`ManualProcess`] and [`WorkerProcess`] are small reference implementations
//! built on [`ProcessCore`] for the binary and the tests.

mod machine;
mod manual;
mod state;
mod worker;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use thiserror::Error;

pub use machine::{ProcessCore, StopAction};
pub use manual::{ManualMode, ManualProcess};
pub use state::ProcessState;
pub use worker::{WorkerProcess, WorkerSettings};

/// Observer notified once when a process reaches a terminal state.
pub trait ProcessListener: Send + Sync {
    /// The process reached [`ProcessState::Terminated`] coming from `from`.
    fn terminated(&self, from: ProcessState);

    /// The process reached [`ProcessState::Failed`] coming from `from`.
    fn failed(&self, from: ProcessState, failure: &str);
}

/// Capability exposed by every adaptable process.
///
/// Implementations must be internally thread-safe: transitions happen on
/// threads the process owns, and every method may be called concurrently.
pub trait ManagedProcess: Send + Sync {
    fn state(&self) -> ProcessState;

    /// Non-blocking start trigger.
    fn request_start(&self);

    /// Non-blocking stop trigger. Stopping a process that never started moves
    /// it straight to [`ProcessState::Terminated`].
    fn request_stop(&self);

    /// Blocks until the process is running. Fails if it ends up stopping or terminal instead.
    fn await_running(&self) -> Result<(), WaitError>;

    /// Blocks until the process is terminated. Fails if it ends up failed.
    fn await_terminated(&self) -> Result<(), WaitError>;

    /// Registers a listener fired exactly once on termination or failure.
    /// If the process is already terminal the listener may fire on the calling thread.
    fn add_listener(&self, listener: Arc<dyn ProcessListener>);
}

/// A blocking wait ended in a state other than the one awaited.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "Expected the process to be {expected}, but the state is {actual}{}",
    .failure.as_deref().map(|f| format!(" ({f})")).unwrap_or_default()
)]
pub struct WaitError {
    pub expected: ProcessState,
    pub actual: ProcessState,
    pub failure: Option<String>,
}

impl WaitError {
    pub fn new(expected: ProcessState, actual: ProcessState) -> Self {
        Self {
            expected,
            actual,
            failure: None,
        }
    }

    pub fn with_failure<S: Into<String>>(mut self, failure: S) -> Self {
        self.failure = Some(failure.into());
        self
    }
}
