use super::{ComponentState, Container};
use crate::error::Result;
use crate::lifecycle::{Lifecycle, ProcessLifecycle, SmartLifecycle};
use tracing::{debug, error, info};

impl Container {
    /// Start every auto-startup lifecycle, lowest phase first
    pub(super) fn start_auto(&self) -> Result<()> {
        info!("Starting auto-startup lifecycle components");
        self.start_where(|lifecycle| lifecycle.is_auto_startup())
    }

    /// Start every lifecycle that is not running, lowest phase first
    pub fn start(&self) -> Result<()> {
        info!("Starting all lifecycle components");
        self.start_where(|_| true)
    }

    fn start_where<F>(&self, include: F) -> Result<()>
    where
        F: Fn(&ProcessLifecycle) -> bool,
    {
        for (phase, members) in self.phases(include) {
            debug!("Starting {} components in phase {}", members.len(), phase);

            for entry in members {
                if entry.lifecycle.is_running() {
                    debug!("Component '{}' already running", entry.name);
                    continue;
                }

                self.set_component_state(&entry.name, ComponentState::Starting);
                if let Err(e) = entry.lifecycle.start() {
                    error!("Failed to start component '{}': {}", entry.name, e);
                    self.set_component_state(&entry.name, ComponentState::Failed);
                    if self.host.stop_on_startup_failure {
                        let report = self.stop();
                        debug!("Stopped started components after failure: {:?}", report);
                    }
                    return Err(e);
                }
                self.refresh_component_state(entry);
                info!("Component '{}' started in phase {}", entry.name, phase);
            }
        }

        Ok(())
    }
}
