//! Simulator behind the LoRA Lab: a fake fine-tuning run whose loss and
//! accuracy follow a noisy decay curve shaped by rank and learning rate, and a
//! keyword sentiment classifier that only "learns" once a run completes.

pub mod adapter;
pub mod config;
pub mod error;
pub mod inference;
pub mod simulation;

pub use adapter::AdapterShape;
pub use config::{HyperparameterConfig, InferenceConfig, LabConfig, SimulationConfig};
pub use error::{ConfigError, LabError};
pub use inference::{Playground, SentimentLabel, SentimentResult, ToyClassifier};
pub use simulation::{
    EventReceiver, LearningCurve, SessionPhase, SessionView, TrainingEvent, TrainingLogPoint,
    TrainingSession,
};
