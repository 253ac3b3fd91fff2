use rand::Rng;

use super::TrainingLogPoint;
use crate::config::HyperparameterConfig;

pub const INITIAL_LOSS: f64 = 2.5;
pub const MIN_LOSS: f64 = 0.1;
pub const MAX_ACCURACY: f64 = 0.95;
/// Peak-to-peak width of the uniform noise added to every point.
pub const NOISE_AMPLITUDE: f64 = 0.1;

const BASE_TIME_CONSTANT: f64 = 10.0;

/// Noisy exponential-decay learning curve parameterised by a run's
/// hyperparameters.
///
/// ```text
/// learning_speed = learning_rate * 1000 + rank / 16
/// decay(step)    = exp(-step / (10 + learning_speed))
/// loss           = max(0.1, 2.5 * decay + noise)
/// accuracy       = min(0.95, 1 - decay + noise)
/// ```
///
/// Both loss and accuracy share the same noise draw and are rounded to three
/// decimals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearningCurve {
    learning_speed: f64,
}

impl LearningCurve {
    pub fn new(config: &HyperparameterConfig) -> Self {
        Self {
            learning_speed: config.learning_rate * 1000.0 + config.rank as f64 / 16.0,
        }
    }

    pub fn learning_speed(&self) -> f64 {
        self.learning_speed
    }

    /// Denominator of the decay exponent, `10 + learning_speed`.
    pub fn time_constant(&self) -> f64 {
        BASE_TIME_CONSTANT + self.learning_speed
    }

    pub fn decay(&self, step: usize) -> f64 {
        (-(step as f64) / self.time_constant()).exp()
    }

    /// The noise-free loss at `step`.
    pub fn envelope(&self, step: usize) -> f64 {
        INITIAL_LOSS * self.decay(step)
    }

    /// Builds the point for `step` with an explicit noise term.
    pub fn point(&self, step: usize, noise: f64) -> TrainingLogPoint {
        let decay = self.decay(step);
        let loss = (INITIAL_LOSS * decay + noise).max(MIN_LOSS);
        let accuracy = (1.0 - decay + noise).min(MAX_ACCURACY);

        TrainingLogPoint {
            step,
            loss: round3(loss),
            accuracy: round3(accuracy),
        }
    }

    /// Builds the point for `step`, drawing noise uniformly from
    /// `[-0.05, 0.05)`.
    pub fn sample<R: Rng + ?Sized>(&self, step: usize, rng: &mut R) -> TrainingLogPoint {
        let noise = (rng.random::<f64>() - 0.5) * NOISE_AMPLITUDE;
        self.point(step, noise)
    }

    /// First step in `1..=max_steps` whose envelope is at or below `loss`.
    pub fn steps_to_reach(&self, loss: f64, max_steps: usize) -> Option<usize> {
        (1..=max_steps).find(|&step| self.envelope(step) <= loss)
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn curve(rank: u32, learning_rate: f64) -> LearningCurve {
        LearningCurve::new(&HyperparameterConfig {
            rank,
            learning_rate,
            ..Default::default()
        })
    }

    #[test]
    fn learning_speed_combines_rate_and_rank() {
        let c = curve(8, 3e-4);
        assert!((c.learning_speed() - 0.8).abs() < 1e-12);
        assert!((c.time_constant() - 10.8).abs() < 1e-12);

        let c = curve(64, 1e-3);
        assert!((c.learning_speed() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn envelope_is_strictly_decreasing() {
        let c = curve(8, 3e-4);
        assert!(c.envelope(1) < INITIAL_LOSS);
        for step in 1..50 {
            assert!(c.envelope(step + 1) < c.envelope(step));
        }
    }

    #[test]
    fn noiseless_point_follows_envelope() {
        let c = curve(16, 1e-3);
        let p = c.point(10, 0.0);
        let decay = (-10.0_f64 / 12.0).exp();

        assert_eq!(p.step, 10);
        assert!((p.loss - 2.5 * decay).abs() <= 5e-4);
        assert!((p.accuracy - (1.0 - decay)).abs() <= 5e-4);
    }

    #[test]
    fn clamps_loss_floor_and_accuracy_ceiling() {
        let c = curve(2, 1e-4);
        let late = c.point(500, 0.05);
        assert_eq!(late.loss, MIN_LOSS);
        assert_eq!(late.accuracy, MAX_ACCURACY);
    }

    #[test]
    fn rounds_to_three_decimals() {
        let p = curve(8, 3e-4).point(3, 0.012_345);
        assert_eq!(p.loss, (p.loss * 1000.0).round() / 1000.0);
        assert_eq!(p.accuracy, (p.accuracy * 1000.0).round() / 1000.0);
    }

    #[test]
    fn sampled_noise_stays_within_amplitude() {
        let c = curve(8, 3e-4);
        let mut rng = StdRng::seed_from_u64(42);

        for step in 1..=50 {
            let p = c.sample(step, &mut rng);
            let envelope = c.envelope(step);
            assert!(p.loss >= MIN_LOSS);
            assert!(p.accuracy <= MAX_ACCURACY);
            if p.loss > MIN_LOSS {
                assert!((p.loss - envelope).abs() <= NOISE_AMPLITUDE / 2.0 + 5e-4);
            }
        }
    }

    #[test]
    fn same_seed_reproduces_the_curve() {
        let c = curve(32, 1e-3);
        let mut a = StdRng::seed_from_u64(9);
        let mut b = StdRng::seed_from_u64(9);

        for step in 1..=50 {
            assert_eq!(c.sample(step, &mut a), c.sample(step, &mut b));
        }
    }

    #[test]
    fn steps_to_reach_uses_the_envelope() {
        let c = curve(8, 3e-4);
        let steps = c.steps_to_reach(0.5, 50).unwrap();
        assert!(c.envelope(steps) <= 0.5);
        assert!(c.envelope(steps - 1) > 0.5);
        assert_eq!(c.steps_to_reach(0.0, 50), None);
    }

    #[test]
    fn larger_learning_speed_widens_the_time_constant() {
        let slow = curve(8, 1e-4);
        let fast = curve(8, 1e-3);
        assert!(fast.time_constant() > slow.time_constant());
        assert!(fast.steps_to_reach(0.5, 50) >= slow.steps_to_reach(0.5, 50));

        let small = curve(2, 3e-4);
        let large = curve(64, 3e-4);
        assert!(large.time_constant() > small.time_constant());
        assert!(large.steps_to_reach(0.5, 50) >= small.steps_to_reach(0.5, 50));
    }
}
