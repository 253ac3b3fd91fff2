mod hyperparameters;
mod lab;

pub use hyperparameters::{
    ALPHA_STEP, HyperparameterConfig, LEARNING_RATES, MAX_ALPHA, MAX_RANK, MIN_ALPHA, MIN_RANK,
    RANK_STEP,
};
pub use lab::{InferenceConfig, LabConfig, SimulationConfig};
