/// Simulated network conditions for the unreliable channel
#[derive(Clone, Debug, PartialEq)]
pub struct LinkConditionerConfig {
    /// Probability in `[0, 1]` that a packet is dropped
    pub loss: f32,
    /// Probability in `[0, 1]` that a batch is delivered out of order
    pub reorder: f32,
    /// Seed for the conditioner's generator
    pub seed: u64,
}

impl LinkConditionerConfig {
    pub fn new(loss: f32, reorder: f32) -> Self {
        Self {
            loss,
            reorder,
            seed: 0x5eed,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn good_condition() -> Self {
        Self::new(0.001, 0.01)
    }

    pub fn average_condition() -> Self {
        Self::new(0.02, 0.1)
    }

    pub fn poor_condition() -> Self {
        Self::new(0.1, 0.3)
    }
}

pub(crate) struct LinkConditioner {
    config: LinkConditionerConfig,
    rng: fastrand::Rng,
}

impl LinkConditioner {
    pub fn new(config: LinkConditionerConfig) -> Self {
        let rng = fastrand::Rng::with_seed(config.seed);
        Self { config, rng }
    }

    /// Drops and shuffles a batch of unreliable packets in place
    pub fn condition(&mut self, batch: &mut Vec<Vec<u8>>) {
        let loss = self.config.loss;
        let rng = &mut self.rng;
        batch.retain(|_| rng.f32() >= loss);
        if batch.len() > 1 && self.rng.f32() < self.config.reorder {
            self.rng.shuffle(batch);
        }
    }
}
