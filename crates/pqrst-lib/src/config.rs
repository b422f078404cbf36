use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Thresholds consumed by the beat classifiers.
///
/// Every field has a default; a TOML file only needs to list the ones it overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThresholdConfig {
    /// RR standard deviation (samples) above which the rhythm is irregular.
    pub rhythm_std_dev: f64,
    /// Mean rate (bpm) strictly below which the rhythm is bradycardic.
    pub bradycardia_bpm: f64,
    /// Mean rate (bpm) strictly above which the rhythm is tachycardic.
    pub tachycardia_bpm: f64,
    /// PR segment length (samples) above which a beat counts as prolonged.
    pub pr_distance_samples: f64,
    /// Share of prolonged beats needed for a conduction delay finding.
    pub pr_repetition_fraction: f64,
    /// QRS width (samples) above which a complex counts as wide.
    pub qrs_width_samples: f64,
    /// PR standard deviation (samples) up to which P-wave timing is consistent.
    pub p_wave_std_dev: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            rhythm_std_dev: 55.0,
            bradycardia_bpm: 59.4,
            tachycardia_bpm: 100.0,
            pr_distance_samples: 110.0,
            pr_repetition_fraction: 0.5,
            qrs_width_samples: 63.0,
            p_wave_std_dev: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("pr_repetition_fraction must lie in (0, 1], got {0}")]
    FractionOutOfRange(f64),
    #[error("bradycardia_bpm ({bradycardia}) exceeds tachycardia_bpm ({tachycardia})")]
    InvertedRateBounds { bradycardia: f64, tachycardia: f64 },
}

impl ThresholdConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("rhythm_std_dev", self.rhythm_std_dev),
            ("bradycardia_bpm", self.bradycardia_bpm),
            ("tachycardia_bpm", self.tachycardia_bpm),
            ("pr_distance_samples", self.pr_distance_samples),
            ("qrs_width_samples", self.qrs_width_samples),
            ("p_wave_std_dev", self.p_wave_std_dev),
        ];
        for (field, value) in fields {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        let fraction = self.pr_repetition_fraction;
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(ConfigError::FractionOutOfRange(fraction));
        }
        if self.bradycardia_bpm > self.tachycardia_bpm {
            return Err(ConfigError::InvertedRateBounds {
                bradycardia: self.bradycardia_bpm,
                tachycardia: self.tachycardia_bpm,
            });
        }
        Ok(())
    }

    /// Parse a TOML document, filling unspecified thresholds with defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let cfg: ThresholdConfig = toml::from_str(text).context("parsing threshold config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("invalid config {}", path.display()))
    }
}
