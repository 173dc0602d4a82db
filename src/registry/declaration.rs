use super::marker::{
    LifecycleMarker, Properties, PropertyValue, ASYNC_START, AUTO_STARTUP, PHASE, STOP_ON_DESTROY,
};
use crate::error::{BridgeError, Result};
use crate::lifecycle::LifecycleSettings;
use crate::process::ManagedProcess;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Instance scope of a declared component.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// One shared instance per host
    #[default]
    Singleton,
    /// A fresh instance on every lookup
    Prototype,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Singleton => f.write_str("singleton"),
            Scope::Prototype => f.write_str("prototype"),
        }
    }
}

/// Creates a new process instance for a declaration.
pub type ProcessFactory = Arc<dyn Fn() -> Arc<dyn ManagedProcess> + Send + Sync>;

/// Constructor binding of a lifecycle adapter declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdapterBinding {
    /// Name of the process component the adapter wraps
    pub target: String,
    /// Property values applied to the adapter by name
    pub properties: Properties,
}

impl AdapterBinding {
    /// Resolves the property bag into adapter settings.
    ///
    /// Unknown property names and mistyped values are rejected.
    pub fn settings(&self) -> std::result::Result<LifecycleSettings, String> {
        let mut settings = LifecycleSettings::default();
        for (name, value) in &self.properties {
            match name.as_str() {
                AUTO_STARTUP => settings.auto_startup = expect_bool(name, value)?,
                ASYNC_START => settings.async_start = expect_bool(name, value)?,
                STOP_ON_DESTROY => settings.stop_on_destroy = expect_bool(name, value)?,
                PHASE => {
                    let phase = value
                        .as_int()
                        .ok_or_else(|| format!("property '{}' expects an integer, got {}", name, value))?;
                    settings.phase = i32::try_from(phase)
                        .map_err(|_| format!("property '{}' out of range: {}", name, phase))?;
                }
                other => return Err(format!("unknown property '{}'", other)),
            }
        }
        Ok(settings)
    }
}

fn expect_bool(name: &str, value: &PropertyValue) -> std::result::Result<bool, String> {
    value
        .as_bool()
        .ok_or_else(|| format!("property '{}' expects a boolean, got {}", name, value))
}

/// What a declaration instantiates to.
#[derive(Clone)]
pub enum ComponentKind {
    Process(ProcessFactory),
    LifecycleAdapter(AdapterBinding),
}

impl fmt::Debug for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentKind::Process(_) => f.write_str("Process(..)"),
            ComponentKind::LifecycleAdapter(binding) => {
                f.debug_tuple("LifecycleAdapter").field(binding).finish()
            }
        }
    }
}

/// Marker metadata attached to a declaration by whatever declared it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerMetadata {
    /// Marker on the component type itself
    pub type_marker: Option<LifecycleMarker>,
    /// Marker on the factory that produces the component
    pub factory_marker: Option<LifecycleMarker>,
}

impl MarkerMetadata {
    /// The effective marker. A factory-level marker replaces the type-level
    /// one entirely; the two are never merged.
    pub fn resolve(&self) -> Option<&LifecycleMarker> {
        self.factory_marker.as_ref().or(self.type_marker.as_ref())
    }
}

/// A named component known to the host before instantiation.
#[derive(Debug, Clone)]
pub struct ComponentDeclaration {
    name: String,
    scope: Scope,
    kind: ComponentKind,
    markers: MarkerMetadata,
}

impl ComponentDeclaration {
    /// Singleton process component built by `factory`.
    pub fn process<S, F>(name: S, factory: F) -> Self
    where
        S: Into<String>,
        F: Fn() -> Arc<dyn ManagedProcess> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            scope: Scope::Singleton,
            kind: ComponentKind::Process(Arc::new(factory)),
            markers: MarkerMetadata::default(),
        }
    }

    /// Singleton lifecycle adapter bound to the process component `target`.
    pub fn lifecycle_adapter<S: Into<String>, T: Into<String>>(
        name: S,
        target: T,
        properties: Properties,
    ) -> Self {
        Self {
            name: name.into(),
            scope: Scope::Singleton,
            kind: ComponentKind::LifecycleAdapter(AdapterBinding {
                target: target.into(),
                properties,
            }),
            markers: MarkerMetadata::default(),
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Attaches a type-level marker.
    pub fn with_marker(mut self, marker: LifecycleMarker) -> Self {
        self.markers.type_marker = Some(marker);
        self
    }

    /// Attaches a factory-level marker.
    pub fn with_factory_marker(mut self, marker: LifecycleMarker) -> Self {
        self.markers.factory_marker = Some(marker);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn is_singleton(&self) -> bool {
        self.scope == Scope::Singleton
    }

    pub fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    pub fn markers(&self) -> &MarkerMetadata {
        &self.markers
    }

    /// Adapter binding, if this declares a lifecycle adapter.
    pub fn adapter_binding(&self) -> Option<&AdapterBinding> {
        match &self.kind {
            ComponentKind::LifecycleAdapter(binding) => Some(binding),
            ComponentKind::Process(_) => None,
        }
    }

    pub fn summary(&self) -> DeclarationSummary {
        let binding = self.adapter_binding();
        DeclarationSummary {
            name: self.name.clone(),
            scope: self.scope,
            kind: match self.kind {
                ComponentKind::Process(_) => "process",
                ComponentKind::LifecycleAdapter(_) => "lifecycle-adapter",
            },
            marked: self.markers.resolve().is_some(),
            target: binding.map(|b| b.target.clone()),
            properties: binding.map(|b| b.properties.clone()),
        }
    }
}

/// Serializable view of a declaration for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclarationSummary {
    pub name: String,
    pub scope: Scope,
    pub kind: &'static str,
    pub marked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
}

/// Name-indexed declarations, kept in registration order.
#[derive(Debug, Clone, Default)]
pub struct DeclarationRegistry {
    order: Vec<String>,
    declarations: HashMap<String, ComponentDeclaration>,
}

impl DeclarationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a declaration. Names are unique.
    pub fn register(&mut self, declaration: ComponentDeclaration) -> Result<()> {
        if self.declarations.contains_key(declaration.name()) {
            return Err(BridgeError::validation(
                declaration.name(),
                "a component with this name is already declared",
            ));
        }
        self.order.push(declaration.name().to_string());
        self.declarations
            .insert(declaration.name().to_string(), declaration);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ComponentDeclaration> {
        self.declarations.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.declarations.contains_key(name)
    }

    /// Snapshot of the declared names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.order.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComponentDeclaration> {
        self.order
            .iter()
            .filter_map(move |name| self.declarations.get(name))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn summaries(&self) -> Vec<DeclarationSummary> {
        self.iter().map(ComponentDeclaration::summary).collect()
    }
}
