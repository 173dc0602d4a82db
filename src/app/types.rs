use crate::process::ProcessState;

/// Component lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentState {
    Stopped,
    Starting,
    Running,
    Stopping,
    Failed,
}

impl From<ProcessState> for ComponentState {
    fn from(state: ProcessState) -> Self {
        match state {
            ProcessState::NotStarted | ProcessState::Terminated => ComponentState::Stopped,
            ProcessState::Starting => ComponentState::Starting,
            ProcessState::Running => ComponentState::Running,
            ProcessState::Stopping => ComponentState::Stopping,
            ProcessState::Failed => ComponentState::Failed,
        }
    }
}
