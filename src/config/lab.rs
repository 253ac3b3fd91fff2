use std::{num::NonZeroUsize, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use super::HyperparameterConfig;
use crate::error::{ConfigError, LabError};

const DEFAULT_TOTAL_STEPS: usize = 50;
const DEFAULT_TICK_MS: u64 = 100;
const DEFAULT_LATENCY_MS: u64 = 600;

/// Pacing of a simulated run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Ticks per run; the run completes on the last one.
    pub total_steps: NonZeroUsize,
    /// Wall-clock time between ticks.
    pub tick_ms: u64,
    /// Fixed noise seed. Unseeded runs draw a fresh one per run.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            total_steps: NonZeroUsize::new(DEFAULT_TOTAL_STEPS).unwrap_or(NonZeroUsize::MIN),
            tick_ms: DEFAULT_TICK_MS,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        Ok(())
    }
}

/// Simulated inference behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub latency_ms: u64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            latency_ms: DEFAULT_LATENCY_MS,
        }
    }
}

impl InferenceConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

/// Everything the lab needs to run, as read from a JSON file.
///
/// Every section and field is optional:
///
/// ```json
/// {
///   "hyperparameters": { "rank": 16, "alpha": 32, "learning_rate": 0.001 },
///   "simulation": { "total_steps": 50, "tick_ms": 100, "seed": 7 },
///   "inference": { "latency_ms": 600 }
/// }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    pub hyperparameters: HyperparameterConfig,
    pub simulation: SimulationConfig,
    pub inference: InferenceConfig,
}

impl LabConfig {
    /// Parses and validates a config from its JSON text.
    ///
    /// # Errors
    /// Returns `LabError::Json` on malformed input and `LabError::InvalidConfig`
    /// if any value is out of its domain.
    pub fn from_json(content: &str) -> Result<Self, LabError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    ///
    /// # Errors
    /// Returns `LabError::Io` if the file cannot be read, otherwise see
    /// [`LabConfig::from_json`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LabError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LabError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!("loaded config from {}", path.display());
        Self::from_json(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.hyperparameters.validate()?;
        self.simulation.validate()
    }
}
