//! phasebridge: host-driven, phase-ordered lifecycle adapters for
//! self-driving managed processes.
//!
//! - [`process`]: the managed-process capability plus small reference processes.
//! - [`lifecycle`]: the host lifecycle contract and the process adapter.
//! - [`registry`]: component declarations and the one-shot adapter registration pass.
//! - [`app`]: a minimal host container running the collect → register → instantiate protocol.

pub mod app;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod process;
pub mod registry;

pub use app::{
    wait_for_shutdown_signal, ComponentState, Container, ContainerBuilder, PreparedContainer,
    StopReport,
};
pub use config::{BridgeConfig, ComponentConfig, HostConfig};
pub use error::{BridgeError, Result};
pub use lifecycle::{
    Disposable, Lifecycle, LifecycleSettings, ProcessLifecycle, SmartLifecycle, StopCallback,
};
pub use process::{
    ManagedProcess, ManualProcess, ProcessCore, ProcessListener, ProcessState, WaitError,
    WorkerProcess, WorkerSettings,
};
pub use registry::{
    AdapterBinding, AdapterRegistrar, ComponentDeclaration, ComponentKind, DeclarationRegistry,
    LifecycleMarker, MarkerMetadata, PropertyValue, Scope, DEFAULT_ADAPTER_SUFFIX,
};
