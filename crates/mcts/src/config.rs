//! MCTS configuration parameters.
//!
//! These parameters control the behavior of the search. A run configuration
//! can be loaded from JSON; missing fields fall back to the defaults below.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// MCTS configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// Exploration weight scaling the prior-driven bonus.
    pub cpuct: f32,

    /// Added to the parent visit total under the square root so priors drive
    /// selection at a node whose actions have never been visited.
    /// 0 turns the floor off.
    pub epsilon: f32,

    /// Number of simulations per search.
    pub num_simulations: usize,

    /// Maximum number of selections in one simulation.
    /// `None` trusts the game to terminate.
    pub max_depth: Option<usize>,

    /// Temperature for shaping the visit distribution.
    /// - 0.0: one-hot on the most visited action (greedy)
    /// - 1.0: proportional to visit counts
    /// - >1.0: flatter, <1.0: more peaked
    pub temperature: f32,

    /// Move number at which to drop temperature to 0 (greedy).
    /// Set to 0 to always use the configured temperature.
    pub temperature_drop_move: usize,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            cpuct: 1.0,
            epsilon: 1e-6,
            num_simulations: 25,
            max_depth: None,
            temperature: 1.0,
            temperature_drop_move: 0,
        }
    }
}

impl MctsConfig {
    /// Create a new config with the specified number of simulations.
    pub fn with_simulations(num_simulations: usize) -> Self {
        Self {
            num_simulations,
            ..Default::default()
        }
    }

    /// Create a config for evaluation (greedy action selection).
    pub fn for_evaluation(num_simulations: usize) -> Self {
        Self {
            num_simulations,
            temperature: 0.0,
            temperature_drop_move: 0,
            ..Default::default()
        }
    }

    /// Parse and validate a JSON run configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON run configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Check that every parameter is usable by the search.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.cpuct.is_finite() || self.cpuct < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "cpuct must be a finite non-negative number, got {}",
                self.cpuct
            )));
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "epsilon must be a finite non-negative number, got {}",
                self.epsilon
            )));
        }
        if self.num_simulations == 0 {
            return Err(ConfigError::Invalid(
                "num_simulations must be at least 1".to_string(),
            ));
        }
        if self.max_depth == Some(0) {
            return Err(ConfigError::Invalid(
                "max_depth must be at least 1 when set".to_string(),
            ));
        }
        if self.temperature.is_nan() || self.temperature < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "temperature must be non-negative, got {}",
                self.temperature
            )));
        }
        Ok(())
    }

    /// Get the effective temperature for a given move number.
    pub fn effective_temperature(&self, move_number: usize) -> f32 {
        if self.temperature_drop_move > 0 && move_number >= self.temperature_drop_move {
            0.0
        } else {
            self.temperature
        }
    }
}
