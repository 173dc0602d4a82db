use super::ComponentState;
use crate::config::HostConfig;
use crate::error::{BridgeError, Result};
use crate::lifecycle::{ProcessLifecycle, SmartLifecycle};
use crate::process::ManagedProcess;
use crate::registry::{
    AdapterRegistrar, ComponentDeclaration, ComponentKind, DeclarationRegistry, DeclarationSummary,
};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, info};

/// Collects declarations; nothing is registered or instantiated yet.
pub struct ContainerBuilder {
    host: HostConfig,
    registry: DeclarationRegistry,
}

impl ContainerBuilder {
    pub fn new(host: HostConfig) -> Self {
        Self {
            host,
            registry: DeclarationRegistry::new(),
        }
    }

    pub fn declare(&mut self, declaration: ComponentDeclaration) -> Result<&mut Self> {
        debug!(
            "Declaring {} component '{}'",
            declaration.scope(),
            declaration.name()
        );
        self.registry.register(declaration)?;
        Ok(self)
    }

    pub fn registry(&self) -> &DeclarationRegistry {
        &self.registry
    }

    /// Runs the adapter registration pass over everything declared so far.
    pub fn prepare(self) -> Result<PreparedContainer> {
        let mut registry = self.registry;
        let adapters = AdapterRegistrar::new().process(&mut registry)?;
        Ok(PreparedContainer {
            host: self.host,
            registry,
            adapters,
        })
    }

    /// Registration pass, instantiation, then auto-startup in phase order.
    pub fn refresh(self) -> Result<Container> {
        let container = self.prepare()?.instantiate()?;
        container.start_auto()?;
        Ok(container)
    }
}

/// Declarations after the registration pass; still nothing instantiated.
pub struct PreparedContainer {
    host: HostConfig,
    registry: DeclarationRegistry,
    adapters: Vec<String>,
}

impl PreparedContainer {
    pub fn registry(&self) -> &DeclarationRegistry {
        &self.registry
    }

    /// Adapters synthesized by the registration pass.
    pub fn adapter_names(&self) -> &[String] {
        &self.adapters
    }

    pub fn summaries(&self) -> Vec<DeclarationSummary> {
        self.registry.summaries()
    }

    /// Creates every singleton process, then every lifecycle adapter.
    pub fn instantiate(self) -> Result<Container> {
        let mut processes = HashMap::new();
        for declaration in self.registry.iter() {
            if let ComponentKind::Process(factory) = declaration.kind() {
                if declaration.is_singleton() {
                    debug!("Instantiating process '{}'", declaration.name());
                    processes.insert(declaration.name().to_string(), factory());
                }
            }
        }

        let mut lifecycles = Vec::new();
        for declaration in self.registry.iter() {
            let Some(binding) = declaration.adapter_binding() else {
                continue;
            };
            let process =
                resolve_process(&self.registry, &processes, &binding.target).map_err(|message| {
                    BridgeError::construction(declaration.name(), message)
                })?;
            let settings = binding
                .settings()
                .map_err(|message| BridgeError::construction(declaration.name(), message))?;

            debug!(
                "Instantiating lifecycle adapter '{}' for '{}' ({:?})",
                declaration.name(),
                binding.target,
                settings
            );
            lifecycles.push(LifecycleEntry {
                name: declaration.name().to_string(),
                lifecycle: Arc::new(
                    ProcessLifecycle::with_settings(process, settings).with_label(declaration.name()),
                ),
            });
        }

        let component_states = lifecycles
            .iter()
            .map(|entry| {
                (
                    entry.name.clone(),
                    ComponentState::from(entry.lifecycle.process().state()),
                )
            })
            .collect();

        info!(
            "Instantiated {} processes and {} lifecycle adapters",
            processes.len(),
            lifecycles.len()
        );
        Ok(Container {
            host: self.host,
            registry: self.registry,
            processes,
            lifecycles,
            component_states: Mutex::new(component_states),
            closed: AtomicBool::new(false),
        })
    }
}

fn resolve_process(
    registry: &DeclarationRegistry,
    singletons: &HashMap<String, Arc<dyn ManagedProcess>>,
    name: &str,
) -> std::result::Result<Arc<dyn ManagedProcess>, String> {
    let declaration = registry
        .get(name)
        .ok_or_else(|| format!("no component named '{}'", name))?;
    match declaration.kind() {
        ComponentKind::Process(factory) => match singletons.get(name) {
            Some(process) => Ok(Arc::clone(process)),
            None => Ok(factory()),
        },
        ComponentKind::LifecycleAdapter(_) => {
            Err(format!("component '{}' is not a managed process", name))
        }
    }
}

pub(super) struct LifecycleEntry {
    pub(super) name: String,
    pub(super) lifecycle: Arc<ProcessLifecycle>,
}

/// Instantiated components with phase-ordered start, stop and close.
pub struct Container {
    pub(super) host: HostConfig,
    pub(super) registry: DeclarationRegistry,
    pub(super) processes: HashMap<String, Arc<dyn ManagedProcess>>,
    pub(super) lifecycles: Vec<LifecycleEntry>,
    pub(super) component_states: Mutex<HashMap<String, ComponentState>>,
    pub(super) closed: AtomicBool,
}

impl Container {
    pub fn registry(&self) -> &DeclarationRegistry {
        &self.registry
    }

    /// Singleton instance, or a fresh one for prototype declarations.
    pub fn process(&self, name: &str) -> Result<Arc<dyn ManagedProcess>> {
        resolve_process(&self.registry, &self.processes, name).map_err(BridgeError::system)
    }

    pub fn lifecycle(&self, name: &str) -> Option<Arc<ProcessLifecycle>> {
        self.lifecycles
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| Arc::clone(&entry.lifecycle))
    }

    /// Lifecycle adapter names in registration order.
    pub fn lifecycle_names(&self) -> Vec<String> {
        self.lifecycles.iter().map(|entry| entry.name.clone()).collect()
    }

    /// Lifecycle entries grouped by phase, ascending; registration order within a phase.
    pub(super) fn phases<F>(&self, include: F) -> BTreeMap<i32, Vec<&LifecycleEntry>>
    where
        F: Fn(&ProcessLifecycle) -> bool,
    {
        let mut phases: BTreeMap<i32, Vec<&LifecycleEntry>> = BTreeMap::new();
        for entry in &self.lifecycles {
            if include(&entry.lifecycle) {
                phases.entry(entry.lifecycle.phase()).or_default().push(entry);
            }
        }
        phases
    }
}
