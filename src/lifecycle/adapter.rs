use super::callback::GuardedCallback;
use super::{Disposable, Lifecycle, LifecycleSettings, SmartLifecycle, StopCallback};
use crate::error::{BridgeError, Result};
use crate::process::{ManagedProcess, ProcessState};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Adapts a self-driving [`ManagedProcess`] to the host lifecycle contract.
///
/// Configure it through the setters before sharing it with a host; once it
/// sits behind an `Arc` the settings can no longer change.
///
/// - `start` accepts `NotStarted`, `Starting` and `Running` processes and,
///   unless `async_start` is set, blocks until the process runs.
/// - `stop` always requests a stop and blocks until the process is terminal.
///   A wait error is swallowed only when the process ended `Failed`.
/// - `stop_with` never blocks and fires its callback exactly once.
pub struct ProcessLifecycle {
    process: Arc<dyn ManagedProcess>,
    settings: LifecycleSettings,
    label: String,
}

impl ProcessLifecycle {
    pub fn new(process: Arc<dyn ManagedProcess>) -> Self {
        Self::with_settings(process, LifecycleSettings::default())
    }

    pub fn with_settings(process: Arc<dyn ManagedProcess>, settings: LifecycleSettings) -> Self {
        Self {
            process,
            settings,
            label: "process".to_string(),
        }
    }

    /// Name used in log output.
    pub fn with_label<S: Into<String>>(mut self, label: S) -> Self {
        self.label = label.into();
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn process(&self) -> &Arc<dyn ManagedProcess> {
        &self.process
    }

    pub fn settings(&self) -> LifecycleSettings {
        self.settings
    }

    pub fn set_auto_startup(&mut self, auto_startup: bool) {
        self.settings.auto_startup = auto_startup;
    }

    pub fn is_async_start(&self) -> bool {
        self.settings.async_start
    }

    pub fn set_async_start(&mut self, async_start: bool) {
        self.settings.async_start = async_start;
    }

    pub fn set_phase(&mut self, phase: i32) {
        self.settings.phase = phase;
    }

    pub fn is_stop_on_destroy(&self) -> bool {
        self.settings.stop_on_destroy
    }

    pub fn set_stop_on_destroy(&mut self, stop_on_destroy: bool) {
        self.settings.stop_on_destroy = stop_on_destroy;
    }
}

impl Lifecycle for ProcessLifecycle {
    fn start(&self) -> Result<()> {
        let state = self.process.state();
        if !state.is_startable() {
            return Err(BridgeError::InvalidState { state });
        }
        if state == ProcessState::NotStarted {
            debug!("Requesting start of {}", self.label);
            self.process.request_start();
        } else {
            debug!("{} already {}, start is a no-op", self.label, state);
        }

        if !self.settings.async_start {
            self.process.await_running()?;
            info!("{} is running", self.label);
        }
        Ok(())
    }

    fn stop(&self) -> Result<()> {
        debug!("Requesting stop of {}", self.label);
        self.process.request_stop();

        match self.process.await_terminated() {
            Ok(()) => {
                info!("{} terminated", self.label);
                Ok(())
            }
            Err(e) if self.process.state() == ProcessState::Failed => {
                warn!("{} failed while stopping: {}", self.label, e);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn is_running(&self) -> bool {
        self.process.state().is_running()
    }
}

impl SmartLifecycle for ProcessLifecycle {
    fn is_auto_startup(&self) -> bool {
        self.settings.auto_startup
    }

    fn phase(&self) -> i32 {
        self.settings.phase
    }

    fn stop_with(&self, callback: StopCallback) -> Result<()> {
        let guard = Arc::new(GuardedCallback::new(callback));
        self.process.add_listener(guard.clone());

        debug!("Requesting asynchronous stop of {}", self.label);
        self.process.request_stop();

        // The process may have finished before the listener was attached.
        if self.process.state().is_terminal() && guard.execute() {
            debug!("{} was already terminal, stop callback ran inline", self.label);
        }
        Ok(())
    }
}

impl Disposable for ProcessLifecycle {
    fn destroy(&self) -> Result<()> {
        if self.settings.stop_on_destroy {
            debug!("Stopping {} on destroy", self.label);
            self.stop()?;
        }
        Ok(())
    }
}

impl fmt::Debug for ProcessLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessLifecycle")
            .field("label", &self.label)
            .field("state", &self.process.state())
            .field("settings", &self.settings)
            .finish()
    }
}
