//! Simulated LoRA fine-tuning runs.
//!
//! A [`TrainingSession`] ticks a [`LearningCurve`] on a fixed interval and
//! publishes the growing history as [`TrainingEvent`]s.

pub mod curve;
mod event;
mod model;
mod session;

pub use curve::LearningCurve;
pub use event::TrainingEvent;
pub use model::{SessionPhase, SessionView, TrainingLogPoint, epoch_at, progress_percent};
pub use session::{EventReceiver, TrainingSession};
