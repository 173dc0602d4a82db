use crate::app::ContainerBuilder;
use crate::error::Result;
use crate::process::{ManagedProcess, WorkerProcess, WorkerSettings};
use crate::registry::{ComponentDeclaration, LifecycleMarker, Scope};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct BridgeConfig {
    #[serde(default)]
    pub host: HostConfig,

    /// Declared components, in registration order
    #[serde(default)]
    pub components: Vec<ComponentConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct HostConfig {
    /// How long a stop phase waits for its members to confirm
    #[serde(default = "default_phase_stop_timeout_ms")]
    pub phase_stop_timeout_ms: u64,

    /// Stop already started components when a start fails
    #[serde(default = "default_stop_on_startup_failure")]
    pub stop_on_startup_failure: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ComponentConfig {
    pub name: String,

    #[serde(default)]
    pub scope: Scope,

    /// Marker on the component type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle: Option<LifecycleMarker>,

    /// Marker on the factory method; replaces `lifecycle` when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factory_lifecycle: Option<LifecycleMarker>,

    #[serde(default)]
    pub worker: WorkerSettings,
}

impl HostConfig {
    pub fn phase_stop_timeout(&self) -> Duration {
        Duration::from_millis(self.phase_stop_timeout_ms)
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            phase_stop_timeout_ms: default_phase_stop_timeout_ms(),
            stop_on_startup_failure: default_stop_on_startup_failure(),
        }
    }
}

impl ComponentConfig {
    /// Worker process declaration carrying this component's markers.
    pub fn to_declaration(&self) -> ComponentDeclaration {
        let name = self.name.clone();
        let settings = self.worker.clone();
        let mut declaration = ComponentDeclaration::process(self.name.clone(), move || {
            Arc::new(WorkerProcess::new(name.clone(), settings.clone())) as Arc<dyn ManagedProcess>
        })
        .with_scope(self.scope);

        if let Some(marker) = &self.lifecycle {
            declaration = declaration.with_marker(marker.clone());
        }
        if let Some(marker) = &self.factory_lifecycle {
            declaration = declaration.with_factory_marker(marker.clone());
        }
        declaration
    }
}

impl BridgeConfig {
    /// Load configuration from a specific file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> std::result::Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy();
        debug!("Loading configuration from: {}", path_str);

        let settings = Config::builder()
            .set_default(
                "host.phase_stop_timeout_ms",
                default_phase_stop_timeout_ms(),
            )?
            .set_default(
                "host.stop_on_startup_failure",
                default_stop_on_startup_failure(),
            )?
            // Add configuration file (optional)
            .add_source(File::with_name(&path_str).required(false))
            // PHASEBRIDGE_HOST__PHASE_STOP_TIMEOUT_MS and friends
            .add_source(
                Environment::with_prefix("PHASEBRIDGE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: BridgeConfig = settings.try_deserialize()?;

        info!(
            "Configuration loaded successfully ({} components)",
            config.components.len()
        );
        debug!("Final configuration: {:#?}", config);

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.host.phase_stop_timeout_ms == 0 {
            return Err(ConfigError::Message(
                "Host phase_stop_timeout_ms must be greater than 0".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for component in &self.components {
            if component.name.trim().is_empty() {
                return Err(ConfigError::Message(
                    "Component name must not be empty".to_string(),
                ));
            }
            if !seen.insert(component.name.as_str()) {
                return Err(ConfigError::Message(format!(
                    "Duplicate component name: {}",
                    component.name
                )));
            }
        }

        Ok(())
    }

    /// Builder with every configured component declared.
    pub fn container_builder(&self) -> Result<ContainerBuilder> {
        let mut builder = ContainerBuilder::new(self.host.clone());
        for component in &self.components {
            builder.declare(component.to_declaration())?;
        }
        Ok(builder)
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Small three-phase setup used by `--print-config`.
    pub fn example() -> Self {
        Self {
            host: HostConfig::default(),
            components: vec![
                ComponentConfig {
                    name: "storage".to_string(),
                    scope: Scope::Singleton,
                    lifecycle: Some(LifecycleMarker::default().with_phase(-10)),
                    factory_lifecycle: None,
                    worker: WorkerSettings {
                        startup_ms: 50,
                        shutdown_ms: 50,
                        fail_on_stop: false,
                    },
                },
                ComponentConfig {
                    name: "ingest".to_string(),
                    scope: Scope::Singleton,
                    lifecycle: Some(LifecycleMarker::default()),
                    factory_lifecycle: Some(
                        LifecycleMarker::named("ingest-lifecycle").with_stop_on_destroy(true),
                    ),
                    worker: WorkerSettings {
                        startup_ms: 100,
                        shutdown_ms: 100,
                        fail_on_stop: false,
                    },
                },
                ComponentConfig {
                    name: "reporter".to_string(),
                    scope: Scope::Singleton,
                    lifecycle: Some(
                        LifecycleMarker::default()
                            .with_phase(10)
                            .with_async_start(true),
                    ),
                    factory_lifecycle: None,
                    worker: WorkerSettings::default(),
                },
            ],
        }
    }
}

fn default_phase_stop_timeout_ms() -> u64 {
    30_000
}
fn default_stop_on_startup_failure() -> bool {
    true
}
