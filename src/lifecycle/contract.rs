use crate::error::Result;

/// Completion callback handed to [`SmartLifecycle::stop_with`].
pub type StopCallback = Box<dyn FnOnce() + Send + 'static>;

/// Basic start/stop contract a host drives.
pub trait Lifecycle: Send + Sync {
    fn start(&self) -> Result<()>;

    /// Blocking stop.
    fn stop(&self) -> Result<()>;

    fn is_running(&self) -> bool;
}

/// Lifecycle with phase ordering, auto-startup and asynchronous stop.
///
/// Hosts start components in ascending phase order and stop them in
/// descending order.
pub trait SmartLifecycle: Lifecycle {
    fn is_auto_startup(&self) -> bool {
        true
    }

    fn phase(&self) -> i32 {
        0
    }

    /// Stops the component and runs `callback` exactly once when it is down.
    /// The default falls back to the blocking [`Lifecycle::stop`].
    fn stop_with(&self, callback: StopCallback) -> Result<()> {
        let result = self.stop();
        callback();
        result
    }
}

/// Teardown hook the host runs after shutdown.
pub trait Disposable {
    fn destroy(&self) -> Result<()>;
}
