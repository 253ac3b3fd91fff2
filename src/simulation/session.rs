use std::{sync::Arc, time::Duration};

use log::{debug, info};
use parking_lot::Mutex;
use rand::{SeedableRng, rngs::StdRng};
use tokio::{
    runtime::Handle,
    sync::mpsc,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use super::{
    LearningCurve, SessionPhase, SessionView, TrainingEvent, TrainingLogPoint,
    model::{epoch_at, progress_percent},
};
use crate::{
    config::{HyperparameterConfig, SimulationConfig},
    error::ConfigError,
};

/// Receiving end of a session subscription.
pub type EventReceiver = mpsc::UnboundedReceiver<TrainingEvent>;

/// State shared between the session owner and the tick task of the active run.
#[derive(Default)]
struct Shared {
    run: u64,
    phase: SessionPhase,
    config: Option<HyperparameterConfig>,
    history: Vec<TrainingLogPoint>,
    subscribers: Vec<mpsc::UnboundedSender<TrainingEvent>>,
}

impl Shared {
    fn publish(&mut self, event: TrainingEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

/// Handle to the tick task of a run. Cancelling it stops the task at its next
/// suspension point.
struct RunHandle {
    run: u64,
    token: CancellationToken,
}

/// A simulated fine-tuning run that ticks in the background.
///
/// State machine:
///
/// ```text
/// Idle      --start--> Running
/// Running   --tick---> Running     (step < total)
/// Running   --tick---> Completed   (step == total)
/// Running   --cancel-> Idle
/// Running   --start--> Running     (previous run cancelled first)
/// Completed --start--> Running
/// Completed --cancel-> Completed
/// ```
///
/// Points are published to subscribers from a tokio task. Every publication
/// happens under the shared lock after checking that its run is still the
/// current, running one, so once [`TrainingSession::cancel`] or
/// [`TrainingSession::start`] returns no point of a previous run can be
/// observed anymore. Dropping the session cancels its run.
pub struct TrainingSession {
    simulation: SimulationConfig,
    shared: Arc<Mutex<Shared>>,
    active: Option<RunHandle>,
}

impl TrainingSession {
    /// Creates an idle session.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if the simulation settings are invalid.
    pub fn new(simulation: SimulationConfig) -> Result<Self, ConfigError> {
        simulation.validate()?;

        Ok(Self {
            simulation,
            shared: Arc::new(Mutex::new(Shared::default())),
            active: None,
        })
    }

    /// Starts a new run, cancelling the active one if there is any.
    ///
    /// On success history and progress are cleared and the session is
    /// `Running`. On error nothing changes.
    ///
    /// # Returns
    /// The id of the new run.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if `config` is out of range.
    ///
    /// # Panics
    /// Panics if called outside of a tokio runtime.
    pub fn start(&mut self, config: HyperparameterConfig) -> Result<u64, ConfigError> {
        config.validate()?;
        let runtime = Handle::current();

        if let Some(previous) = self.active.take() {
            previous.token.cancel();
        }

        let run = {
            let mut shared = self.shared.lock();
            shared.run += 1;
            shared.phase = SessionPhase::Running;
            shared.config = Some(config);
            shared.history.clear();
            shared.run
        };

        let rng = match self.simulation.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        let token = CancellationToken::new();
        let ticker = Ticker {
            run,
            curve: LearningCurve::new(&config),
            total_steps: self.simulation.total_steps.get(),
            period: self.simulation.tick(),
            rng,
            shared: Arc::clone(&self.shared),
            token: token.clone(),
        };

        info!(
            "run {run} started: rank={} alpha={} lr={} steps={}",
            config.rank,
            config.alpha,
            config.learning_rate,
            self.simulation.total_steps
        );

        runtime.spawn(ticker.run());
        self.active = Some(RunHandle { run, token });
        Ok(run)
    }

    /// Stops the active run. A run that was still ticking leaves the session
    /// `Idle` with its partial history; a completed session stays `Completed`.
    /// Calling it again, or on an idle session, does nothing.
    pub fn cancel(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        active.token.cancel();

        let mut shared = self.shared.lock();
        if shared.run == active.run && shared.phase == SessionPhase::Running {
            shared.phase = SessionPhase::Idle;
            info!(
                "run {} cancelled after {} step(s)",
                active.run,
                shared.history.len()
            );
        }
    }

    /// Registers a new observer. It receives the events of every run started
    /// from now on, until the receiver is dropped.
    pub fn subscribe(&self) -> EventReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        self.shared.lock().subscribers.push(tx);
        rx
    }

    /// Returns a snapshot used by renderers.
    pub fn view(&self) -> SessionView {
        let shared = self.shared.lock();
        let progress_percent =
            progress_percent(shared.history.len(), self.simulation.total_steps.get());
        let current_epoch = shared
            .config
            .map_or(0, |config| epoch_at(progress_percent, config.epochs));

        SessionView {
            run: shared.run,
            phase: shared.phase,
            config: shared.config,
            history: shared.history.clone(),
            progress_percent,
            current_epoch,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.shared.lock().phase
    }

    /// Whether the most recent run reached its last step.
    pub fn is_trained(&self) -> bool {
        self.phase() == SessionPhase::Completed
    }

    pub fn history(&self) -> Vec<TrainingLogPoint> {
        self.shared.lock().history.clone()
    }

    pub fn progress_percent(&self) -> f64 {
        let done = self.shared.lock().history.len();
        progress_percent(done, self.simulation.total_steps.get())
    }

    pub fn simulation(&self) -> &SimulationConfig {
        &self.simulation
    }
}

impl Default for TrainingSession {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            shared: Arc::new(Mutex::new(Shared::default())),
            active: None,
        }
    }
}

impl Drop for TrainingSession {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Background task producing the points of a single run.
struct Ticker {
    run: u64,
    curve: LearningCurve,
    total_steps: usize,
    period: Duration,
    rng: StdRng,
    shared: Arc<Mutex<Shared>>,
    token: CancellationToken,
}

impl Ticker {
    async fn run(mut self) {
        let mut interval = time::interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        for step in 1..=self.total_steps {
            tokio::select! {
                biased;
                _ = self.token.cancelled() => {
                    debug!(run = self.run, step = step; "tick task cancelled");
                    return;
                }
                _ = interval.tick() => {}
            }

            let point = self.curve.sample(step, &mut self.rng);
            if !self.publish(point) {
                return;
            }
        }
    }

    /// Appends `point` and notifies subscribers.
    ///
    /// # Returns
    /// Whether the run should keep ticking.
    fn publish(&self, point: TrainingLogPoint) -> bool {
        let mut shared = self.shared.lock();
        if shared.run != self.run || shared.phase != SessionPhase::Running {
            debug!(run = self.run; "dropping point of a superseded run");
            return false;
        }

        shared.history.push(point);
        debug!(
            run = self.run,
            step = point.step,
            loss = point.loss,
            accuracy = point.accuracy;
            "tick"
        );

        let history = shared.history.clone();
        shared.publish(TrainingEvent::Progress {
            run: self.run,
            history: history.clone(),
            progress_percent: progress_percent(point.step, self.total_steps),
        });

        if point.step < self.total_steps {
            return true;
        }

        shared.phase = SessionPhase::Completed;
        info!(
            "run {} completed: loss={} accuracy={}",
            self.run, point.loss, point.accuracy
        );
        shared.publish(TrainingEvent::Completed {
            run: self.run,
            history,
        });
        false
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;

    fn fast_simulation(total_steps: usize) -> SimulationConfig {
        SimulationConfig {
            total_steps: NonZeroUsize::new(total_steps).unwrap(),
            tick_ms: 10,
            seed: Some(1),
        }
    }

    #[test]
    fn new_session_is_idle_and_empty() {
        let session = TrainingSession::default();
        let view = session.view();

        assert_eq!(view.phase, SessionPhase::Idle);
        assert_eq!(view.run, 0);
        assert!(view.history.is_empty());
        assert_eq!(view.progress_percent, 0.0);
        assert_eq!(view.current_epoch, 0);
        assert!(!session.is_trained());
    }

    #[test]
    fn rejects_zero_tick_interval() {
        let simulation = SimulationConfig {
            tick_ms: 0,
            ..Default::default()
        };
        assert!(matches!(
            TrainingSession::new(simulation),
            Err(ConfigError::ZeroTickInterval)
        ));
    }

    #[test]
    fn cancel_on_idle_session_is_a_noop() {
        let mut session = TrainingSession::default();
        session.cancel();
        session.cancel();
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_config_leaves_session_untouched() {
        let mut session = TrainingSession::new(fast_simulation(5)).unwrap();
        let bad = HyperparameterConfig {
            rank: 3,
            ..Default::default()
        };

        assert_eq!(session.start(bad), Err(ConfigError::InvalidRank(3)));
        assert_eq!(session.view().run, 0);
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn start_enters_running_with_cleared_history() {
        let mut session = TrainingSession::new(fast_simulation(5)).unwrap();
        let run = session.start(HyperparameterConfig::default()).unwrap();

        let view = session.view();
        assert_eq!(run, 1);
        assert_eq!(view.phase, SessionPhase::Running);
        assert!(view.history.is_empty());
        assert_eq!(view.config, Some(HyperparameterConfig::default()));
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_waits_one_period() {
        let mut session = TrainingSession::new(fast_simulation(5)).unwrap();
        session.start(HyperparameterConfig::default()).unwrap();

        time::sleep(Duration::from_millis(5)).await;
        assert!(session.history().is_empty());

        time::sleep(Duration::from_millis(10)).await;
        assert_eq!(session.history().len(), 1);
    }
}
