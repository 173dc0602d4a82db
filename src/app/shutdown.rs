use super::{ComponentState, Container};
use crate::lifecycle::{Disposable, Lifecycle, SmartLifecycle};
use crossbeam::channel;
use std::collections::HashSet;
use std::sync::atomic::Ordering;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Outcome of a phase-ordered stop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopReport {
    /// Components that confirmed their stop
    pub stopped: Vec<String>,
    /// Components that did not confirm within the phase timeout
    pub timed_out: Vec<String>,
    /// Components whose stop call returned an error
    pub failed: Vec<String>,
}

impl StopReport {
    pub fn is_clean(&self) -> bool {
        self.timed_out.is_empty() && self.failed.is_empty()
    }
}

impl Container {
    /// Stop running lifecycles phase by phase, highest phase first.
    ///
    /// Members of a phase are stopped asynchronously; the phase waits up to
    /// the configured timeout for their callbacks before moving on.
    pub fn stop(&self) -> StopReport {
        let timeout = self.host.phase_stop_timeout();
        let mut report = StopReport::default();

        for (phase, members) in self.phases(|_| true).into_iter().rev() {
            let (done_tx, done_rx) = channel::unbounded::<String>();
            let mut pending = HashSet::new();

            for entry in &members {
                if !entry.lifecycle.is_running() {
                    continue;
                }

                self.set_component_state(&entry.name, ComponentState::Stopping);
                pending.insert(entry.name.clone());

                let done_tx = done_tx.clone();
                let name = entry.name.clone();
                let result = entry.lifecycle.stop_with(Box::new(move || {
                    let _ = done_tx.send(name);
                }));
                if let Err(e) = result {
                    error!("Error stopping component '{}': {}", entry.name, e);
                    pending.remove(&entry.name);
                    report.failed.push(entry.name.clone());
                }
            }
            drop(done_tx);

            if pending.is_empty() {
                continue;
            }
            info!("Stopping {} components in phase {}", pending.len(), phase);

            let deadline = Instant::now() + timeout;
            while !pending.is_empty() {
                let remaining = deadline.saturating_duration_since(Instant::now());
                match done_rx.recv_timeout(remaining) {
                    Ok(name) => {
                        if pending.remove(&name) {
                            debug!("Component '{}' stopped", name);
                            report.stopped.push(name);
                        }
                    }
                    Err(_) => break,
                }
            }

            if !pending.is_empty() {
                let mut late: Vec<String> = pending.into_iter().collect();
                late.sort();
                warn!(
                    "Failed to stop {} components in phase {} within {:?}: {:?}",
                    late.len(),
                    phase,
                    timeout,
                    late
                );
                report.timed_out.extend(late);
            }

            for entry in &members {
                self.refresh_component_state(entry);
            }
        }

        report
    }

    /// Stop everything, then destroy adapters in reverse registration order.
    ///
    /// Returns the process exit code: 0 when every component stopped and
    /// was destroyed cleanly, 1 otherwise. Closing twice is a no-op.
    pub fn close(&self) -> i32 {
        if self.closed.swap(true, Ordering::SeqCst) {
            debug!("Container already closed");
            return 0;
        }

        info!("Beginning graceful shutdown");
        let report = self.stop();
        let mut exit_code = if report.is_clean() { 0 } else { 1 };

        for entry in self.lifecycles.iter().rev() {
            if report.timed_out.contains(&entry.name) {
                warn!(
                    "Skipping destroy of '{}': it did not stop in time",
                    entry.name
                );
                continue;
            }
            if let Err(e) = entry.lifecycle.destroy() {
                error!("Error destroying component '{}': {}", entry.name, e);
                exit_code = 1;
            }
            self.refresh_component_state(entry);
        }

        info!("Graceful shutdown completed with exit code: {}", exit_code);
        exit_code
    }
}
