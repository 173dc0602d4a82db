use crate::process::{ProcessState, WaitError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("Can't start process in state {state}")]
    InvalidState { state: ProcessState },

    #[error("Process wait failed: {0}")]
    Wait(#[from] WaitError),

    #[error("Cannot construct component [{component}]: {message}")]
    Construction { component: String, message: String },

    #[error("Invalid declaration [{component}]: {message}")]
    Validation { component: String, message: String },

    #[error("System error: {message}")]
    System { message: String },
}

impl BridgeError {
    pub fn system<S: Into<String>>(message: S) -> Self {
        Self::System {
            message: message.into(),
        }
    }

    pub fn construction<C: Into<String>, M: Into<String>>(component: C, message: M) -> Self {
        Self::Construction {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn validation<C: Into<String>, M: Into<String>>(component: C, message: M) -> Self {
        Self::Validation {
            component: component.into(),
            message: message.into(),
        }
    }

    /// True for failures raised by the registration pass.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// True when a lifecycle call was refused because of the process state.
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState { .. })
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
