use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub(crate) const BEAN_NAME: &str = "beanName";
pub(crate) const AUTO_STARTUP: &str = "autoStartup";
pub(crate) const ASYNC_START: &str = "asyncStart";
pub(crate) const PHASE: &str = "phase";
pub(crate) const STOP_ON_DESTROY: &str = "stopOnDestroy";

/// A single attribute or property value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl PropertyValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::Int(i) => write!(f, "{}", i),
            PropertyValue::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// Named property values, ordered by name.
pub type Properties = BTreeMap<String, PropertyValue>;

/// Marker requesting a lifecycle adapter for the declaration carrying it.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LifecycleMarker {
    /// Adapter registration name; derived from the component name when empty
    #[serde(default)]
    pub bean_name: String,

    /// Start automatically during the host's bulk startup
    #[serde(default = "default_auto_startup")]
    pub auto_startup: bool,

    /// Do not wait for the process to run in `start`
    #[serde(default)]
    pub async_start: bool,

    /// Start/stop ordering key
    #[serde(default)]
    pub phase: i32,

    /// Stop the process when the adapter is destroyed
    #[serde(default)]
    pub stop_on_destroy: bool,
}

impl Default for LifecycleMarker {
    fn default() -> Self {
        Self {
            bean_name: String::new(),
            auto_startup: default_auto_startup(),
            async_start: false,
            phase: 0,
            stop_on_destroy: false,
        }
    }
}

impl LifecycleMarker {
    pub fn named<S: Into<String>>(bean_name: S) -> Self {
        Self {
            bean_name: bean_name.into(),
            ..Self::default()
        }
    }

    pub fn with_auto_startup(mut self, auto_startup: bool) -> Self {
        self.auto_startup = auto_startup;
        self
    }

    pub fn with_async_start(mut self, async_start: bool) -> Self {
        self.async_start = async_start;
        self
    }

    pub fn with_phase(mut self, phase: i32) -> Self {
        self.phase = phase;
        self
    }

    pub fn with_stop_on_destroy(mut self, stop_on_destroy: bool) -> Self {
        self.stop_on_destroy = stop_on_destroy;
        self
    }

    /// Full attribute bag, defaults included, keyed by attribute name.
    pub fn attributes(&self) -> Properties {
        let mut attributes = Properties::new();
        attributes.insert(
            BEAN_NAME.to_string(),
            PropertyValue::Text(self.bean_name.clone()),
        );
        attributes.insert(
            AUTO_STARTUP.to_string(),
            PropertyValue::Bool(self.auto_startup),
        );
        attributes.insert(
            ASYNC_START.to_string(),
            PropertyValue::Bool(self.async_start),
        );
        attributes.insert(PHASE.to_string(), PropertyValue::Int(self.phase.into()));
        attributes.insert(
            STOP_ON_DESTROY.to_string(),
            PropertyValue::Bool(self.stop_on_destroy),
        );
        attributes
    }
}

fn default_auto_startup() -> bool {
    true
}
