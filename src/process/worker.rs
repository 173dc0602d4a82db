use super::{ManagedProcess, ProcessCore, ProcessListener, ProcessState, StopAction, WaitError};
use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info};

/// Timing and failure knobs for a [`WorkerProcess`].
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct WorkerSettings {
    /// Simulated startup work in milliseconds
    #[serde(default)]
    pub startup_ms: u64,

    /// Simulated shutdown work in milliseconds
    #[serde(default)]
    pub shutdown_ms: u64,

    /// Fail instead of terminating when asked to stop
    #[serde(default)]
    pub fail_on_stop: bool,
}

/// Process that performs its startup, run and shutdown on a dedicated thread.
///
/// The stop request is handed to the worker thread over a channel, so the
/// terminal transition (and every listener) fires on the worker thread.
pub struct WorkerProcess {
    core: Arc<ProcessCore>,
    settings: WorkerSettings,
    stop_tx: Mutex<Option<Sender<()>>>,
}

impl WorkerProcess {
    pub fn new<S: Into<String>>(name: S, settings: WorkerSettings) -> Self {
        Self {
            core: Arc::new(ProcessCore::new(name)),
            settings,
            stop_tx: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &str {
        self.core.name()
    }

    pub fn settings(&self) -> &WorkerSettings {
        &self.settings
    }

    fn run(core: Arc<ProcessCore>, settings: WorkerSettings, stop_rx: Receiver<()>) {
        if settings.startup_ms > 0 {
            thread::sleep(Duration::from_millis(settings.startup_ms));
        }

        if !core.notify_started() {
            info!("Worker '{}' running", core.name());
            // A closed channel also means shutdown: the process handle is gone.
            let _ = stop_rx.recv();
        }

        debug!("Worker '{}' shutting down", core.name());
        if settings.shutdown_ms > 0 {
            thread::sleep(Duration::from_millis(settings.shutdown_ms));
        }

        if settings.fail_on_stop {
            core.notify_failed(format!("worker '{}' failed during shutdown", core.name()));
        } else {
            core.notify_stopped();
        }
    }
}

impl ManagedProcess for WorkerProcess {
    fn state(&self) -> ProcessState {
        self.core.state()
    }

    fn request_start(&self) {
        if !self.core.begin_start() {
            return;
        }

        let (stop_tx, stop_rx) = channel::bounded(1);
        *self.stop_tx.lock() = Some(stop_tx);

        let core = Arc::clone(&self.core);
        let settings = self.settings.clone();
        let spawned = thread::Builder::new()
            .name(format!("worker-{}", self.core.name()))
            .spawn(move || Self::run(core, settings, stop_rx));

        if let Err(e) = spawned {
            error!("Failed to spawn worker thread for '{}': {}", self.core.name(), e);
            self.core
                .notify_failed(format!("failed to spawn worker thread: {}", e));
        }
    }

    fn request_stop(&self) {
        if self.core.begin_stop() != StopAction::Shutdown {
            return;
        }
        if let Some(stop_tx) = self.stop_tx.lock().take() {
            let _ = stop_tx.send(());
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
