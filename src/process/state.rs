use std::fmt;

/// States of a managed process.
///
/// `NotStarted → Starting → Running → Stopping → Terminated`, with `Failed`
/// reachable from any non-terminal state and `NotStarted → Terminated` when a
/// stop is requested before any start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessState {
    NotStarted,
    Starting,
    Running,
    Stopping,
    Terminated,
    Failed,
}

impl ProcessState {
    pub const ALL: [ProcessState; 6] = [
        ProcessState::NotStarted,
        ProcessState::Starting,
        ProcessState::Running,
        ProcessState::Stopping,
        ProcessState::Terminated,
        ProcessState::Failed,
    ];

    /// True while the process is alive from the host's point of view.
    pub const fn is_running(self) -> bool {
        matches!(
            self,
            ProcessState::Starting | ProcessState::Running | ProcessState::Stopping
        )
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, ProcessState::Terminated | ProcessState::Failed)
    }

    /// States from which a host may (re)issue a start.
    pub const fn is_startable(self) -> bool {
        matches!(
            self,
            ProcessState::NotStarted | ProcessState::Starting | ProcessState::Running
        )
    }

    pub const fn label(self) -> &'static str {
        match self {
            ProcessState::NotStarted => "NotStarted",
            ProcessState::Starting => "Starting",
            ProcessState::Running => "Running",
            ProcessState::Stopping => "Stopping",
            ProcessState::Terminated => "Terminated",
            ProcessState::Failed => "Failed",
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
