//! Planner tuning
//!
//! Defaults match the game's 50 ms turn limit. Any field can be overridden
//! from a JSON file or the command line.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::{BEAM_WIDTH, STOP_FACTOR, TIME_BUDGET_MS};
use crate::error::{Error, Result};

/// Beam-search configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// States kept after pruning each round
    pub beam_width: usize,
    /// Wall-clock budget per tick (milliseconds)
    pub time_budget_ms: u64,
    /// Safety multiplier in the stop heuristic: a new round starts only while
    /// `elapsed * (1 + stop_factor / rounds)` is under budget
    pub stop_factor: f64,
    /// Tiebreak RNG seed (random if unset)
    pub seed: Option<u64>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            beam_width: BEAM_WIDTH,
            time_budget_ms: TIME_BUDGET_MS,
            stop_factor: STOP_FACTOR,
            seed: None,
        }
    }
}

impl PlannerConfig {
    /// Time budget as a `Duration`
    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }

    pub fn with_beam_width(mut self, beam_width: usize) -> Self {
        self.beam_width = beam_width;
        self
    }

    pub fn with_time_budget_ms(mut self, time_budget_ms: u64) -> Self {
        self.time_budget_ms = time_budget_ms;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject settings that would leave the search without an answer
    pub fn validate(&self) -> Result<()> {
        if self.beam_width == 0 {
            return Err(Error::InvalidConfiguration {
                message: "beam_width must be at least 1".to_string(),
            });
        }
        if self.time_budget_ms == 0 {
            return Err(Error::InvalidConfiguration {
                message: "time_budget_ms must be positive".to_string(),
            });
        }
        if !self.stop_factor.is_finite() || self.stop_factor < 0.0 {
            return Err(Error::InvalidConfiguration {
                message: format!("stop_factor must be finite and >= 0, got {}", self.stop_factor),
            });
        }
        Ok(())
    }

    /// Parse a JSON config; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("read config {}", path.display()), e))?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded planner config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlannerConfig::default();
        assert_eq!(config.beam_width, 80);
        assert_eq!(config.time_budget(), Duration::from_millis(50));
        assert_eq!(config.stop_factor, 2.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = PlannerConfig::from_json(r#"{"beam_width": 12, "seed": 7}"#).unwrap();
        assert_eq!(config.beam_width, 12);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.time_budget_ms, 50);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let zero_beam = PlannerConfig::default().with_beam_width(0);
        assert!(matches!(
            zero_beam.validate(),
            Err(Error::InvalidConfiguration { .. })
        ));

        let zero_budget = PlannerConfig::default().with_time_budget_ms(0);
        assert!(zero_budget.validate().is_err());

        let bad_factor = PlannerConfig {
            stop_factor: f64::NAN,
            ..Default::default()
        };
        assert!(bad_factor.validate().is_err());

        assert!(matches!(
            PlannerConfig::from_json(r#"{"beam_width": "wide"}"#),
            Err(Error::Serialization(_))
        ));
    }
}
