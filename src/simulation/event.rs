use super::TrainingLogPoint;

/// Notifications pushed to every subscriber of a session.
///
/// Each event carries the id of the run that produced it, and the full history
/// of that run up to and including the newest point.
#[derive(Debug, Clone, PartialEq)]
pub enum TrainingEvent {
    /// Emitted on every tick, the last one included.
    Progress {
        run: u64,
        history: Vec<TrainingLogPoint>,
        progress_percent: f64,
    },
    /// Emitted exactly once per run, right after its final `Progress`.
    Completed {
        run: u64,
        history: Vec<TrainingLogPoint>,
    },
}

impl TrainingEvent {
    pub fn run(&self) -> u64 {
        match self {
            Self::Progress { run, .. } | Self::Completed { run, .. } => *run,
        }
    }

    pub fn history(&self) -> &[TrainingLogPoint] {
        match self {
            Self::Progress { history, .. } | Self::Completed { history, .. } => history,
        }
    }
}
