//! Component declarations and the adapter registration pass.
//!
//! Declarations are collected first, [`AdapterRegistrar`] runs once over the
//! collected set, and only then does a host instantiate anything.

mod declaration;
mod marker;
mod registrar;

#[cfg(test)]
mod tests;

pub use declaration::{
    AdapterBinding, ComponentDeclaration, ComponentKind, DeclarationRegistry, DeclarationSummary,
    MarkerMetadata, ProcessFactory, Scope,
};
pub use marker::{LifecycleMarker, Properties, PropertyValue};
pub use registrar::{AdapterRegistrar, DEFAULT_ADAPTER_SUFFIX};
