use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const MIN_RANK: u32 = 2;
pub const MAX_RANK: u32 = 64;
pub const RANK_STEP: u32 = 2;

pub const MIN_ALPHA: u32 = 8;
pub const MAX_ALPHA: u32 = 128;
pub const ALPHA_STEP: u32 = 8;

/// Learning rates offered by the dashboard: conservative, standard, aggressive.
pub const LEARNING_RATES: [f64; 3] = [1e-4, 3e-4, 1e-3];

const LEARNING_RATE_TOLERANCE: f64 = 1e-12;

/// Hyperparameters of one simulated fine-tuning run.
///
/// Only `rank` and `learning_rate` shape the simulated curve. `alpha` feeds the
/// adapter scaling shown next to it, `epochs` the epoch counter, and
/// `batch_size` is carried for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HyperparameterConfig {
    pub rank: u32,
    pub alpha: u32,
    pub learning_rate: f64,
    pub epochs: u32,
    pub batch_size: u32,
}

impl Default for HyperparameterConfig {
    fn default() -> Self {
        Self {
            rank: 8,
            alpha: 16,
            learning_rate: 3e-4,
            epochs: 5,
            batch_size: 32,
        }
    }
}

impl HyperparameterConfig {
    /// Checks every field against its accepted domain.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found, checking rank, alpha, learning
    /// rate, epochs and batch size in that order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_RANK..=MAX_RANK).contains(&self.rank) || self.rank % RANK_STEP != 0 {
            return Err(ConfigError::InvalidRank(self.rank));
        }

        if !(MIN_ALPHA..=MAX_ALPHA).contains(&self.alpha) || self.alpha % ALPHA_STEP != 0 {
            return Err(ConfigError::InvalidAlpha(self.alpha));
        }

        let supported = LEARNING_RATES
            .iter()
            .any(|lr| (lr - self.learning_rate).abs() < LEARNING_RATE_TOLERANCE);
        if !supported {
            return Err(ConfigError::UnsupportedLearningRate(self.learning_rate));
        }

        if self.epochs == 0 {
            return Err(ConfigError::ZeroEpochs);
        }
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }

        Ok(())
    }

    /// The LoRA output scale, `alpha / rank`.
    pub fn scaling(&self) -> f64 {
        self.alpha as f64 / self.rank as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(rank: u32, alpha: u32, learning_rate: f64) -> HyperparameterConfig {
        HyperparameterConfig {
            rank,
            alpha,
            learning_rate,
            ..Default::default()
        }
    }

    #[test]
    fn default_is_valid() {
        assert_eq!(HyperparameterConfig::default().validate(), Ok(()));
    }

    #[test]
    fn accepts_range_bounds() {
        for lr in LEARNING_RATES {
            assert_eq!(config(2, 8, lr).validate(), Ok(()));
            assert_eq!(config(64, 128, lr).validate(), Ok(()));
        }
    }

    #[test]
    fn rejects_rank_outside_range_or_step() {
        for rank in [0, 1, 3, 63, 66] {
            assert_eq!(
                config(rank, 16, 3e-4).validate(),
                Err(ConfigError::InvalidRank(rank))
            );
        }
    }

    #[test]
    fn rejects_alpha_outside_range_or_step() {
        for alpha in [0, 4, 12, 136] {
            assert_eq!(
                config(8, alpha, 3e-4).validate(),
                Err(ConfigError::InvalidAlpha(alpha))
            );
        }
    }

    #[test]
    fn rejects_learning_rate_outside_presets() {
        for lr in [0.0, 2e-4, 0.01, f64::NAN] {
            assert!(matches!(
                config(8, 16, lr).validate(),
                Err(ConfigError::UnsupportedLearningRate(_))
            ));
        }
    }

    #[test]
    fn rejects_zero_display_fields() {
        let zero_epochs = HyperparameterConfig {
            epochs: 0,
            ..Default::default()
        };
        assert_eq!(zero_epochs.validate(), Err(ConfigError::ZeroEpochs));

        let zero_batch = HyperparameterConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert_eq!(zero_batch.validate(), Err(ConfigError::ZeroBatchSize));
    }

    #[test]
    fn scaling_is_alpha_over_rank() {
        assert_eq!(config(8, 16, 3e-4).scaling(), 2.0);
        assert_eq!(config(64, 8, 3e-4).scaling(), 0.125);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let parsed: HyperparameterConfig =
            serde_json::from_str(r#"{ "rank": 32, "learning_rate": 0.001 }"#).unwrap();
        assert_eq!(parsed.rank, 32);
        assert_eq!(parsed.learning_rate, 1e-3);
        assert_eq!(parsed.alpha, 16);
        assert_eq!(parsed.epochs, 5);
    }
}
