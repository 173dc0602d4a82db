mod adapter;
mod callback;
mod contract;
mod settings;


pub use adapter::ProcessLifecycle;
pub use contract::{Disposable, Lifecycle, SmartLifecycle, StopCallback};
pub use settings::LifecycleSettings;
