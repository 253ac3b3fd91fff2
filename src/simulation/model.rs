use serde::{Deserialize, Serialize};

use crate::config::HyperparameterConfig;

/// Lifecycle states of a [`super::TrainingSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    #[default]
    Idle,
    Running,
    Completed,
}

/// One tick of a simulated run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingLogPoint {
    /// 1-based, strictly increasing within a run.
    pub step: usize,
    /// Never below [`super::curve::MIN_LOSS`].
    pub loss: f64,
    /// Never above [`super::curve::MAX_ACCURACY`].
    pub accuracy: f64,
}

/// Full snapshot of a session, cheap enough to hand to a renderer every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    /// Id of the current or most recent run, 0 before the first one.
    pub run: u64,
    pub phase: SessionPhase,
    pub config: Option<HyperparameterConfig>,
    pub history: Vec<TrainingLogPoint>,
    pub progress_percent: f64,
    pub current_epoch: u32,
}

impl SessionView {
    pub fn latest(&self) -> Option<&TrainingLogPoint> {
        self.history.last()
    }
}

/// `100 * step / total_steps`.
pub fn progress_percent(step: usize, total_steps: usize) -> f64 {
    if total_steps == 0 {
        return 0.0;
    }
    100.0 * step as f64 / total_steps as f64
}

/// The epoch a progress value falls into when the run is split into `epochs`
/// equal parts; 0 before the first tick.
pub fn epoch_at(progress_percent: f64, epochs: u32) -> u32 {
    let epoch = (progress_percent / 100.0 * epochs as f64).ceil();
    (epoch.max(0.0) as u32).min(epochs)
}
