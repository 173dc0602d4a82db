use super::*;
use crate::error::BridgeError;
use crate::process::{ManagedProcess, ManualProcess};
use std::sync::Arc;

fn process_declaration(name: &str) -> ComponentDeclaration {
    let process_name = name.to_string();
    ComponentDeclaration::process(name, move || {
        Arc::new(ManualProcess::immediate(process_name.clone())) as Arc<dyn ManagedProcess>
    })
}

fn expected_properties(
    auto_startup: bool,
    async_start: bool,
    phase: i64,
    stop_on_destroy: bool,
) -> Properties {
    let mut properties = Properties::new();
    properties.insert("autoStartup".to_string(), PropertyValue::Bool(auto_startup));
    properties.insert("asyncStart".to_string(), PropertyValue::Bool(async_start));
    properties.insert("phase".to_string(), PropertyValue::Int(phase));
    properties.insert(
        "stopOnDestroy".to_string(),
        PropertyValue::Bool(stop_on_destroy),
    );
    properties
}

#[test]
fn test_default_marker_yields_default_adapter() {
    let mut registry = DeclarationRegistry::new();
    registry
        .register(process_declaration("svc").with_marker(LifecycleMarker::default()))
        .unwrap();

    let registered = AdapterRegistrar::new().process(&mut registry).unwrap();

    assert_eq!(registered, vec!["svc-service-smart-lifecycle-support"]);
    let adapter = registry
        .get("svc-service-smart-lifecycle-support")
        .unwrap();
    assert!(adapter.is_singleton());
    let binding = adapter.adapter_binding().unwrap();
    assert_eq!(binding.target, "svc");
    assert_eq!(
        binding.properties,
        expected_properties(true, false, 0, false)
    );
}

#[test]
fn test_custom_bean_name_is_used_verbatim() {
    let mut registry = DeclarationRegistry::new();
    registry
        .register(process_declaration("svc").with_marker(LifecycleMarker::named("custom")))
        .unwrap();

    AdapterRegistrar::new().process(&mut registry).unwrap();

    assert!(registry.contains("custom"));
    assert!(!registry.contains("svc-service-smart-lifecycle-support"));
    let binding = registry.get("custom").unwrap().adapter_binding().unwrap();
    assert_eq!(binding.target, "svc");
    assert!(!binding.properties.contains_key("beanName"));
}

#[test]
fn test_marker_attributes_are_copied() {
    let mut registry = DeclarationRegistry::new();
    registry
        .register(
            process_declaration("tuned").with_marker(
                LifecycleMarker::default()
                    .with_auto_startup(false)
                    .with_async_start(true)
                    .with_phase(42)
                    .with_stop_on_destroy(true),
            ),
        )
        .unwrap();

    AdapterRegistrar::new().process(&mut registry).unwrap();

    let binding = registry
        .get("tuned-service-smart-lifecycle-support")
        .unwrap()
        .adapter_binding()
        .unwrap();
    assert_eq!(
        binding.properties,
        expected_properties(false, true, 42, true)
    );

    let settings = binding.settings().unwrap();
    assert!(!settings.auto_startup);
    assert!(settings.async_start);
    assert_eq!(settings.phase, 42);
    assert!(settings.stop_on_destroy);
}

#[test]
fn test_unmarked_declarations_are_skipped() {
    let mut registry = DeclarationRegistry::new();
    registry.register(process_declaration("plain")).unwrap();

    let registered = AdapterRegistrar::new().process(&mut registry).unwrap();

    assert!(registered.is_empty());
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_prototype_with_marker_fails_whole_pass() {
    let mut registry = DeclarationRegistry::new();
    registry
        .register(process_declaration("first").with_marker(LifecycleMarker::default()))
        .unwrap();
    registry
        .register(
            process_declaration("per-request")
                .with_scope(Scope::Prototype)
                .with_marker(LifecycleMarker::default()),
        )
        .unwrap();

    let err = AdapterRegistrar::new().process(&mut registry).unwrap_err();

    match &err {
        BridgeError::Validation { component, .. } => assert_eq!(component, "per-request"),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(err.to_string().contains("per-request"));
    assert_eq!(registry.len(), 2);
    assert!(!registry.contains("first-service-smart-lifecycle-support"));
}

#[test]
fn test_factory_marker_wins_over_type_marker() {
    let mut registry = DeclarationRegistry::new();
    registry
        .register(
            process_declaration("both")
                .with_marker(LifecycleMarker::named("from-type").with_phase(1))
                .with_factory_marker(LifecycleMarker::default().with_async_start(true)),
        )
        .unwrap();

    AdapterRegistrar::new().process(&mut registry).unwrap();

    assert!(!registry.contains("from-type"));
    let binding = registry
        .get("both-service-smart-lifecycle-support")
        .unwrap()
        .adapter_binding()
        .unwrap();
    // Phase comes from the factory marker's default, not the type marker.
    assert_eq!(binding.properties, expected_properties(true, true, 0, false));
}

#[test]
fn test_type_marker_used_without_factory_marker() {
    let markers = MarkerMetadata {
        type_marker: Some(LifecycleMarker::default().with_phase(7)),
        factory_marker: None,
    };

    assert_eq!(markers.resolve().map(|m| m.phase), Some(7));
}

#[test]
fn test_adapter_name_collision_fails_whole_pass() {
    let mut registry = DeclarationRegistry::new();
    registry
        .register(process_declaration("a").with_marker(LifecycleMarker::named("shared")))
        .unwrap();
    registry
        .register(process_declaration("b").with_marker(LifecycleMarker::named("shared")))
        .unwrap();

    let err = AdapterRegistrar::new().process(&mut registry).unwrap_err();

    assert!(err.is_validation());
    assert!(!registry.contains("shared"));
}

#[test]
fn test_adapters_are_not_rescanned() {
    let mut registry = DeclarationRegistry::new();
    registry
        .register(process_declaration("svc").with_marker(LifecycleMarker::default()))
        .unwrap();
    let registrar = AdapterRegistrar::new();

    registrar.process(&mut registry).unwrap();
    assert_eq!(registry.len(), 2);

    let adapter = registry
        .get("svc-service-smart-lifecycle-support")
        .unwrap();
    assert!(adapter.markers().resolve().is_none());
}

#[test]
fn test_duplicate_declaration_rejected() {
    let mut registry = DeclarationRegistry::new();
    registry.register(process_declaration("dup")).unwrap();

    let err = registry.register(process_declaration("dup")).unwrap_err();

    assert!(err.is_validation());
    assert_eq!(registry.names(), vec!["dup"]);
}

#[test]
fn test_binding_rejects_unknown_and_mistyped_properties() {
    let mut properties = Properties::new();
    properties.insert("phase".to_string(), PropertyValue::Bool(true));
    let binding = AdapterBinding {
        target: "svc".to_string(),
        properties,
    };
    assert!(binding.settings().unwrap_err().contains("phase"));

    let mut properties = Properties::new();
    properties.insert("colour".to_string(), PropertyValue::Text("red".to_string()));
    let binding = AdapterBinding {
        target: "svc".to_string(),
        properties,
    };
    assert!(binding.settings().unwrap_err().contains("colour"));
}

#[test]
fn test_summary_serializes_adapter_binding() {
    let mut registry = DeclarationRegistry::new();
    registry
        .register(process_declaration("svc").with_marker(LifecycleMarker::default()))
        .unwrap();
    AdapterRegistrar::new().process(&mut registry).unwrap();

    let json = serde_json::to_value(registry.summaries()).unwrap();

    assert_eq!(json[0]["kind"], "process");
    assert_eq!(json[0]["marked"], true);
    assert_eq!(json[1]["kind"], "lifecycle-adapter");
    assert_eq!(json[1]["target"], "svc");
    assert_eq!(json[1]["properties"]["phase"], 0);
    assert_eq!(json[1]["scope"], "singleton");
}
