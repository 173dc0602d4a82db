use super::{ProcessListener, ProcessState, WaitError};
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::sync::Arc;
use tracing::{debug, warn};

/// What a stop request requires from the process owning the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopAction {
    /// Already stopping or terminal.
    Idle,
    /// The process never started and moved straight to `Terminated`.
    Terminated,
    /// Still starting; the stop runs once startup reports in.
    Deferred,
    /// Moved from `Running` to `Stopping`; the owner must run its shutdown.
    Shutdown,
}

struct CoreInner {
    state: ProcessState,
    stop_requested: bool,
    failure: Option<String>,
    terminal_from: Option<ProcessState>,
    listeners: Vec<Arc<dyn ProcessListener>>,
}

/// Thread-safe state machine shared by the reference processes.
///
/// Owners drive it with `begin_*`/`notify_*` calls from whatever thread does
/// the work; waiters block on a condition variable. Listeners are drained on
/// the terminal transition and invoked outside the lock, so each fires once.
pub struct ProcessCore {
    name: String,
    inner: Mutex<CoreInner>,
    changed: Condvar,
}

impl ProcessCore {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            inner: Mutex::new(CoreInner {
                state: ProcessState::NotStarted,
                stop_requested: false,
                failure: None,
                terminal_from: None,
                listeners: Vec::new(),
            }),
            changed: Condvar::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> ProcessState {
        self.inner.lock().state
    }

    /// Failure cause recorded by [`ProcessCore::notify_failed`].
    pub fn failure(&self) -> Option<String> {
        self.inner.lock().failure.clone()
    }

    /// `NotStarted → Starting`. Returns true if the caller must now run startup.
    pub fn begin_start(&self) -> bool {
        let mut inner = self.inner.lock();
        if inner.state != ProcessState::NotStarted {
            warn!(
                "Ignoring start request for process '{}' in state {}",
                self.name, inner.state
            );
            return false;
        }
        inner.state = ProcessState::Starting;
        self.changed.notify_all();
        debug!("Process '{}' state changed to: {}", self.name, inner.state);
        true
    }

    pub fn begin_stop(&self) -> StopAction {
        let mut inner = self.inner.lock();
        let state = inner.state;
        match state {
            ProcessState::NotStarted => {
                self.finish_locked(inner, ProcessState::Terminated, None);
                StopAction::Terminated
            }
            ProcessState::Starting => {
                inner.stop_requested = true;
                StopAction::Deferred
            }
            ProcessState::Running => {
                inner.state = ProcessState::Stopping;
                self.changed.notify_all();
                debug!("Process '{}' state changed to: {}", self.name, inner.state);
                StopAction::Shutdown
            }
            ProcessState::Stopping | ProcessState::Terminated | ProcessState::Failed => {
                StopAction::Idle
            }
        }
    }

    /// `Starting → Running`. Returns true if a stop arrived during startup, in
    /// which case the state is already `Stopping` and the caller must shut down.
    pub fn notify_started(&self) -> bool {
        let mut inner = self.inner.lock();
        if inner.state != ProcessState::Starting {
            warn!(
                "Process '{}' reported started while {}",
                self.name, inner.state
            );
            return false;
        }
        inner.state = if inner.stop_requested {
            ProcessState::Stopping
        } else {
            ProcessState::Running
        };
        self.changed.notify_all();
        debug!("Process '{}' state changed to: {}", self.name, inner.state);
        inner.state == ProcessState::Stopping
    }

    pub fn notify_stopped(&self) {
        self.finish_locked(self.inner.lock(), ProcessState::Terminated, None);
    }

    pub fn notify_failed<S: Into<String>>(&self, cause: S) {
        self.finish_locked(self.inner.lock(), ProcessState::Failed, Some(cause.into()));
    }

    fn finish_locked(
        &self,
        mut inner: MutexGuard<'_, CoreInner>,
        terminal: ProcessState,
        failure: Option<String>,
    ) {
        let (from, listeners, failure) = {
            if inner.state.is_terminal() {
                debug!(
                    "Process '{}' already {}, ignoring transition to {}",
                    self.name, inner.state, terminal
                );
                return;
            }
            let from = inner.state;
            inner.state = terminal;
            inner.failure = failure.clone();
            inner.terminal_from = Some(from);
            self.changed.notify_all();
            let listeners = std::mem::take(&mut inner.listeners);
            drop(inner);
            (from, listeners, failure)
        };

        match &failure {
            Some(cause) => warn!("Process '{}' failed from {}: {}", self.name, from, cause),
            None => debug!("Process '{}' terminated from {}", self.name, from),
        }

        for listener in listeners {
            Self::fire(listener.as_ref(), terminal, from, failure.as_deref());
        }
    }

    fn fire(
        listener: &dyn ProcessListener,
        terminal: ProcessState,
        from: ProcessState,
        failure: Option<&str>,
    ) {
        if terminal == ProcessState::Failed {
            listener.failed(from, failure.unwrap_or("unknown failure"));
        } else {
            listener.terminated(from);
        }
    }

    /// Registers a listener; replays the terminal notification on this thread
    /// if the process has already finished.
    pub fn add_listener(&self, listener: Arc<dyn ProcessListener>) {
        let replay = {
            let mut inner = self.inner.lock();
            if inner.state.is_terminal() {
                Some((
                    inner.state,
                    inner.terminal_from.unwrap_or(ProcessState::NotStarted),
                    inner.failure.clone(),
                ))
            } else {
                inner.listeners.push(Arc::clone(&listener));
                None
            }
        };

        if let Some((terminal, from, failure)) = replay {
            Self::fire(listener.as_ref(), terminal, from, failure.as_deref());
        }
    }

    pub fn await_running(&self) -> Result<(), WaitError> {
        let mut inner = self.inner.lock();
        while matches!(inner.state, ProcessState::NotStarted | ProcessState::Starting) {
            self.changed.wait(&mut inner);
        }
        if inner.state == ProcessState::Running {
            return Ok(());
        }
        let error = WaitError::new(ProcessState::Running, inner.state);
        Err(match &inner.failure {
            Some(cause) => error.with_failure(cause.clone()),
            None => error,
        })
    }

    pub fn await_terminated(&self) -> Result<(), WaitError> {
        let mut inner = self.inner.lock();
        while !inner.state.is_terminal() {
            self.changed.wait(&mut inner);
        }
        if inner.state == ProcessState::Terminated {
            return Ok(());
        }
        let error = WaitError::new(ProcessState::Terminated, inner.state);
        Err(match &inner.failure {
            Some(cause) => error.with_failure(cause.clone()),
            None => error,
        })
    }
}
