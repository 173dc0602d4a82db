use super::declaration::{ComponentDeclaration, DeclarationRegistry};
use super::marker::{LifecycleMarker, BEAN_NAME};
use crate::error::{BridgeError, Result};
use std::collections::HashSet;
use tracing::{debug, info};

/// Suffix appended to a component name to derive its adapter's name.
pub const DEFAULT_ADAPTER_SUFFIX: &str = "-service-smart-lifecycle-support";

/// One-shot registration pass turning marked declarations into lifecycle
/// adapter declarations.
///
/// The pass sees only the declarations present when it starts. Every adapter
/// is planned and validated before the first one is registered, so a failure
/// leaves the registry untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct AdapterRegistrar;

impl AdapterRegistrar {
    pub fn new() -> Self {
        Self
    }

    /// Runs the pass and returns the names of the registered adapters.
    pub fn process(&self, registry: &mut DeclarationRegistry) -> Result<Vec<String>> {
        let names = registry.names();
        debug!("Scanning {} declarations for lifecycle markers", names.len());

        let mut planned = Vec::new();
        for name in &names {
            let Some(declaration) = registry.get(name) else {
                continue;
            };
            if let Some(adapter) = self.plan(declaration)? {
                planned.push(adapter);
            }
        }

        let mut taken = HashSet::new();
        for adapter in &planned {
            if registry.contains(adapter.name()) || !taken.insert(adapter.name().to_string()) {
                return Err(BridgeError::validation(
                    adapter.name(),
                    "lifecycle adapter name collides with another component",
                ));
            }
        }

        let mut registered = Vec::with_capacity(planned.len());
        for adapter in planned {
            registered.push(adapter.name().to_string());
            registry.register(adapter)?;
        }

        info!("Registered {} lifecycle adapters", registered.len());
        Ok(registered)
    }

    fn plan(&self, declaration: &ComponentDeclaration) -> Result<Option<ComponentDeclaration>> {
        let Some(marker) = declaration.markers().resolve() else {
            return Ok(None);
        };

        if !declaration.is_singleton() {
            return Err(BridgeError::validation(
                declaration.name(),
                format!(
                    "{} component carries a lifecycle marker; only singletons can be adapted",
                    declaration.scope()
                ),
            ));
        }

        let adapter_name = Self::adapter_name(declaration.name(), marker);
        let mut properties = marker.attributes();
        properties.remove(BEAN_NAME);

        debug!(
            "Planning lifecycle adapter '{}' for component '{}'",
            adapter_name,
            declaration.name()
        );
        Ok(Some(ComponentDeclaration::lifecycle_adapter(
            adapter_name,
            declaration.name(),
            properties,
        )))
    }

    /// Registration name of the adapter for `component`.
    pub fn adapter_name(component: &str, marker: &LifecycleMarker) -> String {
        if marker.bean_name.is_empty() {
            format!("{}{}", component, DEFAULT_ADAPTER_SUFFIX)
        } else {
            marker.bean_name.clone()
        }
    }
}
