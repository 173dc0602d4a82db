use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
struct CountingListener {
    terminated: AtomicUsize,
    failed: AtomicUsize,
}

impl ProcessListener for CountingListener {
    fn terminated(&self, _from: ProcessState) {
        self.terminated.fetch_add(1, Ordering::SeqCst);
    }

    fn failed(&self, _from: ProcessState, _failure: &str) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_running_and_terminal_state_sets() {
    let running: Vec<_> = ProcessState::ALL
        .iter()
        .copied()
        .filter(|s| s.is_running())
        .collect();
    assert_eq!(
        running,
        vec![
            ProcessState::Starting,
            ProcessState::Running,
            ProcessState::Stopping
        ]
    );
    assert!(ProcessState::Terminated.is_terminal());
    assert!(ProcessState::Failed.is_terminal());
    assert!(!ProcessState::Stopping.is_startable());
    assert_eq!(ProcessState::NotStarted.to_string(), "NotStarted");
}

#[test]
fn test_stop_before_start_terminates() {
    let process = ManualProcess::new("idle");
    let listener = Arc::new(CountingListener::default());
    process.add_listener(listener.clone());

    process.request_stop();

    assert_eq!(process.state(), ProcessState::Terminated);
    assert!(process.await_terminated().is_ok());
    assert_eq!(listener.terminated.load(Ordering::SeqCst), 1);
}

#[test]
fn test_manual_process_waits_for_external_stop() {
    let process = ManualProcess::new("manual");
    process.request_start();
    assert_eq!(process.state(), ProcessState::Running);

    process.request_stop();
    assert_eq!(process.state(), ProcessState::Stopping);

    process.external_stop();
    assert_eq!(process.state(), ProcessState::Terminated);
}

#[test]
fn test_listener_added_after_termination_is_replayed_once() {
    let process = ManualProcess::immediate("done");
    process.request_start();
    process.request_stop();

    let listener = Arc::new(CountingListener::default());
    process.add_listener(listener.clone());
    process.external_stop();

    assert_eq!(listener.terminated.load(Ordering::SeqCst), 1);
    assert_eq!(listener.failed.load(Ordering::SeqCst), 0);
}

#[test]
fn test_await_terminated_reports_failure() {
    let process = ManualProcess::failing_on_stop("broken");
    process.request_start();
    process.request_stop();

    let err = process.await_terminated().unwrap_err();
    assert_eq!(err.expected, ProcessState::Terminated);
    assert_eq!(err.actual, ProcessState::Failed);
    assert_eq!(err.failure.as_deref(), Some("failure on stop"));
    assert!(err.to_string().contains("Failed"));
}

#[test]
fn test_await_running_fails_on_terminated_process() {
    let process = ManualProcess::new("gone");
    process.request_stop();

    let err = process.await_running().unwrap_err();
    assert_eq!(err, WaitError::new(ProcessState::Running, ProcessState::Terminated));
}

#[test]
fn test_failure_is_sticky() {
    let process = ManualProcess::new("sticky");
    process.request_start();
    process.external_fail("boom");
    process.external_stop();

    assert_eq!(process.state(), ProcessState::Failed);
}

#[test]
fn test_core_records_failure_cause() {
    let core = ProcessCore::new("core");
    assert!(core.begin_start());
    assert!(!core.notify_started());
    assert_eq!(core.failure(), None);

    core.notify_failed("boom");
    core.notify_failed("second");

    assert_eq!(core.state(), ProcessState::Failed);
    assert_eq!(core.failure().as_deref(), Some("boom"));
}

#[test]
fn test_worker_process_lifecycle() {
    let process = WorkerProcess::new(
        "worker",
        WorkerSettings {
            startup_ms: 10,
            shutdown_ms: 10,
            fail_on_stop: false,
        },
    );
    let listener = Arc::new(CountingListener::default());
    process.add_listener(listener.clone());

    process.request_start();
    process.await_running().unwrap();
    assert_eq!(process.state(), ProcessState::Running);

    process.request_stop();
    process.await_terminated().unwrap();
    assert_eq!(listener.terminated.load(Ordering::SeqCst), 1);
}

#[test]
fn test_worker_stop_during_startup_is_deferred() {
    let process = WorkerProcess::new(
        "slow-start",
        WorkerSettings {
            startup_ms: 50,
            ..WorkerSettings::default()
        },
    );

    process.request_start();
    process.request_stop();
    assert_eq!(process.state(), ProcessState::Starting);

    process.await_terminated().unwrap();
    assert!(process.await_running().is_err());
}

#[test]
fn test_worker_failing_on_stop() {
    let process = WorkerProcess::new(
        "fragile",
        WorkerSettings {
            fail_on_stop: true,
            ..WorkerSettings::default()
        },
    );

    process.request_start();
    process.await_running().unwrap();
    process.request_stop();

    let err = process.await_terminated().unwrap_err();
    assert_eq!(err.actual, ProcessState::Failed);
    assert_eq!(process.state(), ProcessState::Failed);
}
