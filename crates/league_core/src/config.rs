//! # Engine configuration
//!
//! Tunables for prediction and auto-play, loadable from YAML or JSON.
//! Formula constants (home advantage, decay factor, ...) live next to the
//! code that uses them and are not configurable.
//!
//! ```rust
//! use league_core::config::EngineConfig;
//!
//! let config = EngineConfig::default();
//! assert_eq!(config.prediction.monte_carlo_runs, 1000);
//! let quick = EngineConfig::quick();
//! assert!(quick.prediction.monte_carlo_runs < config.prediction.monte_carlo_runs);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::SimulationMode;
use crate::error::{LeagueError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EngineConfig {
    #[serde(default)]
    pub prediction: PredictionConfig,
    #[serde(default)]
    pub autoplay: AutoPlayConfig,
    /// Default seed when the caller does not pass one.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Prediction ensemble parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PredictionConfig {
    /// Full-season trials (default: 1000)
    pub monte_carlo_runs: usize,
    /// strength_based confidence (default: 0.7)
    pub strength_confidence: f64,
    /// form_based confidence = form.confidence x this (default: 0.8)
    pub form_confidence_scale: f64,
    /// consensus confidence (default: 0.85)
    pub consensus_confidence: f64,
    pub consensus_weights: ConsensusWeights,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConsensusWeights {
    pub strength: f64,
    pub form: f64,
    pub statistical: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AutoPlayConfig {
    pub mode: SimulationMode,
    /// Batch cap when no speed is given (default: 5)
    pub max_games_per_batch: usize,
    pub include_analytics: bool,
    pub stop_at_week: Option<u32>,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            monte_carlo_runs: 1000,
            strength_confidence: 0.7,
            form_confidence_scale: 0.8,
            consensus_confidence: 0.85,
            consensus_weights: ConsensusWeights::default(),
        }
    }
}

impl Default for ConsensusWeights {
    fn default() -> Self {
        Self { strength: 0.4, form: 0.35, statistical: 0.25 }
    }
}

impl Default for AutoPlayConfig {
    fn default() -> Self {
        Self {
            mode: SimulationMode::Realistic,
            max_games_per_batch: 5,
            include_analytics: true,
            stop_at_week: None,
        }
    }
}

impl EngineConfig {
    /// Fewer Monte Carlo trials, for previews and tests.
    pub fn quick() -> Self {
        let mut cfg = Self::default();
        cfg.prediction.monte_carlo_runs = 100;
        cfg
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let cfg: Self = serde_yaml::from_str(yaml)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// `.json` files parse as JSON, everything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| LeagueError::Config(format!("{}: {}", path.display(), e)))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&text),
            _ => Self::from_yaml_str(&text),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.prediction.monte_carlo_runs == 0 {
            return Err(LeagueError::Config("monte_carlo_runs must be at least 1".into()));
        }
        if self.autoplay.max_games_per_batch == 0 {
            return Err(LeagueError::Config("max_games_per_batch must be at least 1".into()));
        }
        Ok(())
    }
}

// ========== Tests ==========
