use super::container::LifecycleEntry;
use super::{ComponentState, Container};
use std::collections::HashMap;
use tracing::debug;

impl Container {
    /// Update component state
    pub(super) fn set_component_state(&self, component: &str, state: ComponentState) {
        let mut states = self.component_states.lock();
        if states.insert(component.to_string(), state) != Some(state) {
            debug!("Component '{}' state changed to: {:?}", component, state);
        }
    }

    /// Re-read the component state from its process
    pub(super) fn refresh_component_state(&self, entry: &LifecycleEntry) {
        let state = ComponentState::from(entry.lifecycle.process().state());
        self.set_component_state(&entry.name, state);
    }

    /// Get component state
    pub fn component_state(&self, component: &str) -> Option<ComponentState> {
        self.component_states.lock().get(component).copied()
    }

    /// Get all component states
    pub fn component_states(&self) -> HashMap<String, ComponentState> {
        self.component_states.lock().clone()
    }
}
