/// Host-facing configuration of a [`super::ProcessLifecycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleSettings {
    /// Start automatically during the host's bulk startup
    pub auto_startup: bool,

    /// Return from `start` without waiting for the process to run
    pub async_start: bool,

    /// Ordering key: ascending on start, descending on stop
    pub phase: i32,

    /// Stop the process when the adapter is destroyed
    pub stop_on_destroy: bool,
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        Self {
            auto_startup: true,
            async_start: false,
            phase: 0,
            stop_on_destroy: false,
        }
    }
}
