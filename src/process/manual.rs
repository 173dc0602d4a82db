use super::{ManagedProcess, ProcessCore, ProcessListener, ProcessState, StopAction, WaitError};
use std::sync::Arc;
use tracing::debug;

/// How a [`ManualProcess`] reacts once its shutdown begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualMode {
    /// Stays `Stopping` until [`ManualProcess::external_stop`] is called.
    Manual,
    /// Terminates synchronously inside `request_stop`.
    Immediate,
    /// Fails synchronously inside `request_stop`.
    FailingOnStop,
}

/// Externally driven process for tests and dry runs.
///
/// Startup completes synchronously inside `request_start`; everything after
/// that is under the caller's control.
pub struct ManualProcess {
    core: ProcessCore,
    mode: ManualMode,
}

impl ManualProcess {
    /// Process whose termination must be triggered by [`ManualProcess::external_stop`].
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self::with_mode(name, ManualMode::Manual)
    }

    /// Process that starts and stops synchronously.
    pub fn immediate<S: Into<String>>(name: S) -> Self {
        Self::with_mode(name, ManualMode::Immediate)
    }

    /// Process that fails as soon as it is asked to stop.
    pub fn failing_on_stop<S: Into<String>>(name: S) -> Self {
        Self::with_mode(name, ManualMode::FailingOnStop)
    }

    pub fn with_mode<S: Into<String>>(name: S, mode: ManualMode) -> Self {
        Self {
            core: ProcessCore::new(name),
            mode,
        }
    }

    pub fn name(&self) -> &str {
        self.core.name()
    }

    /// Completes a pending or running process normally.
    pub fn external_stop(&self) {
        debug!("External stop for process '{}'", self.core.name());
        self.core.notify_stopped();
    }

    /// Fails the process from whatever non-terminal state it is in.
    pub fn external_fail<S: Into<String>>(&self, cause: S) {
        self.core.notify_failed(cause);
    }

    fn shut_down(&self) {
        match self.mode {
            ManualMode::Manual => {}
            ManualMode::Immediate => self.core.notify_stopped(),
            ManualMode::FailingOnStop => self.core.notify_failed("failure on stop"),
        }
    }
}

impl ManagedProcess for ManualProcess {
    fn state(&self) -> ProcessState {
        self.core.state()
    }

    fn request_start(&self) {
        if self.core.begin_start() && self.core.notify_started() {
            self.shut_down();
        }
    }

    fn request_stop(&self) {
        if self.core.begin_stop() == StopAction::Shutdown {
            self.shut_down();
        }
    }

    fn await_running(&self) -> Result<(), WaitError> {
        self.core.await_running()
    }

    fn await_terminated(&self) -> Result<(), WaitError> {
        self.core.await_terminated()
    }

    fn add_listener(&self, listener: Arc<dyn ProcessListener>) {
        self.core.add_listener(listener);
    }
}
