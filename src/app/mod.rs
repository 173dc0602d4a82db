mod container;
mod runtime;
mod shutdown;
mod startup;
mod state;
mod types;


pub use container::{Container, ContainerBuilder, PreparedContainer};
pub use runtime::wait_for_shutdown_signal;
pub use shutdown::StopReport;
pub use types::ComponentState;
