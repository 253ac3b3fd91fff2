use std::{fmt, io, path::PathBuf};

/// A hyperparameter or simulation setting outside of its accepted domain.
///
/// Raised before any session state is touched, so a rejected `start` leaves the
/// session exactly as it was.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Rank must be even and within `[2, 64]`.
    InvalidRank(u32),
    /// Alpha must be a multiple of 8 within `[8, 128]`.
    InvalidAlpha(u32),
    /// Learning rate must be one of the offered presets.
    UnsupportedLearningRate(f64),
    ZeroEpochs,
    ZeroBatchSize,
    /// The tick interval of the simulated run must be positive.
    ZeroTickInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRank(rank) => {
                write!(f, "rank {rank} is not an even value in [2, 64]")
            }
            Self::InvalidAlpha(alpha) => {
                write!(f, "alpha {alpha} is not a multiple of 8 in [8, 128]")
            }
            Self::UnsupportedLearningRate(lr) => {
                write!(f, "learning rate {lr} is not one of 1e-4, 3e-4, 1e-3")
            }
            Self::ZeroEpochs => write!(f, "epochs must be greater than 0"),
            Self::ZeroBatchSize => write!(f, "batch size must be greater than 0"),
            Self::ZeroTickInterval => write!(f, "tick interval must be greater than 0 ms"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// All errors that can surface from the lab library.
#[derive(Debug)]
pub enum LabError {
    /// Invalid configuration, caught before anything runs.
    InvalidConfig(ConfigError),
    /// A config file could not be read.
    Io { path: PathBuf, source: io::Error },
    /// A config file is not valid JSON for [`crate::config::LabConfig`].
    Json(serde_json::Error),
}

impl fmt::Display for LabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(e) => write!(f, "invalid config: {e}"),
            Self::Io { path, source } => {
                write!(f, "cannot read '{}': {source}", path.display())
            }
            Self::Json(e) => write!(f, "invalid JSON: {e}"),
        }
    }
}

impl std::error::Error for LabError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidConfig(e) => Some(e),
            Self::Io { source, .. } => Some(source),
            Self::Json(e) => Some(e),
        }
    }
}

impl From<ConfigError> for LabError {
    fn from(e: ConfigError) -> Self {
        Self::InvalidConfig(e)
    }
}

impl From<serde_json::Error> for LabError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn config_error_messages_name_the_offending_value() {
        assert_eq!(
            ConfigError::InvalidRank(7).to_string(),
            "rank 7 is not an even value in [2, 64]"
        );
        assert!(ConfigError::InvalidAlpha(12).to_string().contains("12"));
    }

    #[test]
    fn lab_error_wraps_config_error_as_source() {
        let err = LabError::from(ConfigError::ZeroEpochs);
        assert_eq!(err.to_string(), "invalid config: epochs must be greater than 0");
        assert!(err.source().is_some());
    }
}
