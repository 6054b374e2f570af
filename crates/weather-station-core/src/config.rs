//! Station configuration loaded from TOML.
//!
//! ```toml
//! receive_prefix = "RF receive "
//!
//! [sensors.91]
//! location = "kitchen"
//! protocol = "weather12"
//! ```
//!
//! Without any sensor the station runs in scanning mode: every capture is
//! reported with its candidate decodings so sensors can be added.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::protocols::ProtocolRegistry;

/// Prefix the RFControl relay puts in front of every received capture.
pub const DEFAULT_RECEIVE_PREFIX: &str = "RF receive ";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("sensor id '{id}' is not an unsigned integer")]
    InvalidSensorId { id: String },
    #[error("sensor {id} has no location")]
    MissingLocation { id: String },
    #[error("sensor {id} has no protocol")]
    MissingProtocol { id: String },
    #[error("sensor {id} uses unknown protocol '{protocol}' (supported: {supported})")]
    UnknownProtocol {
        id: String,
        protocol: String,
        supported: String,
    },
}

/// One configured sensor, keyed by its decoded id in `StationConfig`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Where the sensor is placed (e.g., "kitchen").
    pub location: String,
    /// Protocol name the sensor transmits with (e.g., "weather12").
    pub protocol: String,
}

/// Sensor table and relay settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    /// Prefix marking capture lines; other lines are relay chatter.
    pub receive_prefix: String,
    /// Sensors by decoded id.
    pub sensors: BTreeMap<String, SensorConfig>,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            receive_prefix: DEFAULT_RECEIVE_PREFIX.to_string(),
            sensors: BTreeMap::new(),
        }
    }
}

/// A validated sensor entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredSensor {
    pub id: u32,
    pub location: String,
    pub protocol: &'static str,
}

impl StationConfig {
    /// Read and parse a TOML file.
    ///
    /// # Errors
    /// Returns `ConfigError` when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::parse(&content, &path.display().to_string())?;
        info!(
            path = %path.display(),
            sensors = config.sensors.len(),
            "station configuration loaded"
        );
        Ok(config)
    }

    /// Parse TOML text; `origin` names the text in error messages.
    pub fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            origin: origin.to_string(),
            source,
        })
    }

    /// Check every sensor against `registry`, returning them by ascending id.
    ///
    /// # Errors
    /// Returns the first invalid entry: a non-numeric id, an empty location or
    /// protocol, or a protocol the registry does not know.
    pub fn validate(
        &self,
        registry: &ProtocolRegistry,
    ) -> Result<Vec<ConfiguredSensor>, ConfigError> {
        let mut sensors = Vec::with_capacity(self.sensors.len());
        for (key, sensor) in &self.sensors {
            let id = key
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidSensorId { id: key.clone() })?;
            if sensor.location.trim().is_empty() {
                return Err(ConfigError::MissingLocation { id: key.clone() });
            }
            if sensor.protocol.trim().is_empty() {
                return Err(ConfigError::MissingProtocol { id: key.clone() });
            }
            let descriptor = registry.get(sensor.protocol.trim()).ok_or_else(|| {
                ConfigError::UnknownProtocol {
                    id: key.clone(),
                    protocol: sensor.protocol.clone(),
                    supported: registry.names().join(", "),
                }
            })?;
            sensors.push(ConfiguredSensor {
                id,
                location: sensor.location.trim().to_string(),
                protocol: descriptor.name,
            });
        }
        sensors.sort_by_key(|sensor| sensor.id);
        Ok(sensors)
    }
}
