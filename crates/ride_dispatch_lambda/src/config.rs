use std::env;
use std::time::Duration;

use config::{Config as Loader, Environment, File, FileFormat};
use ride_dispatch_core::contract::Vehicle;
use ride_dispatch_core::fleet::{FleetRoster, SelectionError};
use serde::Deserialize;

use crate::handlers::api_gateway::DecodePolicy;
use crate::handlers::request_ride::DispatchSettings;

const DEFAULT_CONFIG: &str = include_str!("../config/dispatch.toml");
const CONFIG_PATH_VAR: &str = "DISPATCH_CONFIG";
const ENV_PREFIX: &str = "DISPATCH";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load dispatch configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid dispatch configuration: {0}")]
    Invalid(String),
    #[error("invalid fleet configuration: {0}")]
    Fleet(#[from] SelectionError),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VehicleConfig {
    pub name: String,
    pub color: String,
    pub gender: String,
}

impl From<VehicleConfig> for Vehicle {
    fn from(value: VehicleConfig) -> Self {
        Vehicle::new(value.name, value.color, value.gender)
    }
}

/// Process-level dispatch configuration, resolved once at cold start.
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchConfig {
    pub table_name: String,
    pub eta_text: String,
    pub store_timeout_ms: u64,
    #[serde(default)]
    pub decode_policy: DecodePolicy,
    pub fleet: Vec<VehicleConfig>,
}

impl DispatchConfig {
    /// Layers built-in defaults, the optional `$DISPATCH_CONFIG` file and
    /// `DISPATCH__*` environment variables, in that order.
    pub fn load() -> Result<Self, ConfigError> {
        let override_path = env::var(CONFIG_PATH_VAR).ok();
        Self::load_from(override_path.as_deref(), dispatch_environment())
    }

    pub fn load_from(
        override_path: Option<&str>,
        environment: Environment,
    ) -> Result<Self, ConfigError> {
        let mut builder =
            Loader::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));
        if let Some(path) = override_path.filter(|value| !value.trim().is_empty()) {
            builder = builder.add_source(File::with_name(path).required(true));
        }
        let config: Self = builder.add_source(environment).build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.table_name.trim().is_empty() {
            return Err(ConfigError::Invalid("table_name cannot be empty".to_string()));
        }
        if self.store_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "store_timeout_ms must be a positive integer".to_string(),
            ));
        }
        if self.fleet.is_empty() {
            return Err(ConfigError::Fleet(SelectionError::EmptyRoster));
        }
        Ok(())
    }

    pub fn roster(&self) -> Result<FleetRoster, ConfigError> {
        let vehicles = self.fleet.iter().cloned().map(Vehicle::from).collect();
        Ok(FleetRoster::new(vehicles)?)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn settings(&self) -> DispatchSettings {
        DispatchSettings {
            eta_text: self.eta_text.clone(),
            store_timeout: self.store_timeout(),
            decode_policy: self.decode_policy,
        }
    }
}

pub fn dispatch_environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
