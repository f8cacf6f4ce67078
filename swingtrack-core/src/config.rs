//! Engine configuration.
//!
//! Every field has a default, so an empty TOML file is a valid configuration
//! and partial files override only what they name. The rule ORDER is not
//! configurable; only the thresholds the rules compare against are.

use crate::indicators::SwingLowDetector;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Thresholds used by the evaluation rule chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// RSI at or above this is overbought.
    pub rsi_overbought: f64,
    /// Minimum R-multiple to scale out (rather than fully exit) when overbought.
    pub partial_exit_r: f64,
    /// Minimum R-multiple before recommending a tighter stop.
    pub tighten_stop_r: f64,
    /// Price must exceed `ema20 * tighten_extension` to tighten.
    pub tighten_extension: f64,
    /// Relative volume strictly above this counts as heavy.
    pub distribution_relative_volume: f64,
    /// P/L percent strictly below this counts as losing.
    pub distribution_pnl_pct: f64,
    /// Days held before the time stop may fire.
    pub time_stop_days: u32,
    /// |R-multiple| strictly below this counts as stagnant.
    pub time_stop_r_band: f64,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            rsi_overbought: 70.0,
            partial_exit_r: 2.0,
            tighten_stop_r: 1.5,
            tighten_extension: 1.05,
            distribution_relative_volume: 2.0,
            distribution_pnl_pct: -2.0,
            time_stop_days: 30,
            time_stop_r_band: 0.5,
        }
    }
}

impl EvaluatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("rsi_overbought", self.rsi_overbought)?;
        if self.rsi_overbought > 100.0 {
            return Err(invalid("rsi_overbought", "must be <= 100"));
        }
        positive("partial_exit_r", self.partial_exit_r)?;
        positive("tighten_stop_r", self.tighten_stop_r)?;
        at_least("tighten_extension", self.tighten_extension, 1.0)?;
        positive(
            "distribution_relative_volume",
            self.distribution_relative_volume,
        )?;
        if self.distribution_pnl_pct.is_nan() || self.distribution_pnl_pct > 0.0 {
            return Err(invalid("distribution_pnl_pct", "must be <= 0"));
        }
        if self.time_stop_days == 0 {
            return Err(invalid("time_stop_days", "must be > 0"));
        }
        at_least("time_stop_r_band", self.time_stop_r_band, 0.0)
    }
}

/// Indicator-derivation settings that are not fixed by the rule chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub swing_low: SwingLowDetector,
    /// Percent distance from ema20 treated as consolidation when screening.
    pub consolidation_band_pct: f64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            swing_low: SwingLowDetector::default(),
            consolidation_band_pct: 2.0,
        }
    }
}

impl IndicatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.swing_low.strength == 0 {
            return Err(invalid("swing_low.strength", "must be > 0"));
        }
        if self.swing_low.lookback < 2 * self.swing_low.strength + 1 {
            return Err(invalid(
                "swing_low.lookback",
                "must cover at least one full pivot window",
            ));
        }
        at_least("consolidation_band_pct", self.consolidation_band_pct, 0.0)
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub indicators: IndicatorConfig,
    pub evaluator: EvaluatorConfig,
}

impl EngineConfig {
    /// Load and validate a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.indicators.validate()?;
        self.evaluator.validate()
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be > 0"))
    }
}

fn at_least(field: &'static str, value: f64, min: f64) -> Result<(), ConfigError> {
    if value >= min {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be >= {min}"),
        })
    }
}
