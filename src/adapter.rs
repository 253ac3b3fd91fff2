/// Shape of one frozen projection a LoRA adapter is attached to.
///
/// The adapter learns `B (d_out x r) * A (r x d_in)` next to the frozen
/// `d_out x d_in` weight, so only `r * (d_in + d_out)` parameters train.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterShape {
    pub d_in: usize,
    pub d_out: usize,
}

impl AdapterShape {
    /// A GPT-2 small attention projection.
    pub const GPT2_PROJECTION: Self = Self::square(768);

    pub const fn square(d_model: usize) -> Self {
        Self {
            d_in: d_model,
            d_out: d_model,
        }
    }

    pub fn frozen_params(&self) -> usize {
        self.d_in * self.d_out
    }

    pub fn trainable_params(&self, rank: u32) -> usize {
        rank as usize * (self.d_in + self.d_out)
    }

    /// Trainable parameters as a fraction of the frozen ones.
    pub fn trainable_ratio(&self, rank: u32) -> f64 {
        let frozen = self.frozen_params();
        if frozen == 0 {
            return 0.0;
        }
        self.trainable_params(rank) as f64 / frozen as f64
    }
}
