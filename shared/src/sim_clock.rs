use crate::{RoleContext, RoleError, Tick};

// absorbs float rounding when many small deltas sum to one interval
const TICK_EPSILON: f64 = 1e-9;

/// Fixed-step accumulator driving the authoritative simulation.
///
/// Simulation time is always `tick * interval`, so it depends only on how
/// many ticks ran and never on how wall time was chunked.
#[derive(Clone, Debug)]
pub struct SimClock {
    interval: f64,
    remainder: f64,
    tick: Tick,
}

impl SimClock {
    /// `interval` in seconds. Callers validate it is positive and finite.
    pub fn new(interval: f64) -> Self {
        Self {
            interval,
            remainder: 0.0,
            tick: 0,
        }
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn sim_time(&self) -> f64 {
        self.tick as f64 * self.interval
    }

    pub fn sim_time_ms(&self) -> i64 {
        (self.sim_time() * 1000.0).round() as i64
    }

    /// Wall time accumulated but not yet consumed by a tick
    pub fn remainder(&self) -> f64 {
        self.remainder
    }

    /// Adds elapsed wall time. Negative or non-finite deltas are ignored.
    pub fn accumulate(&mut self, delta: f64) {
        if delta.is_finite() && delta > 0.0 {
            self.remainder += delta;
        }
    }

    /// Consumes one interval if enough time has accumulated, advancing the
    /// simulation by exactly one tick. Only the server may commit ticks.
    pub fn try_advance(&mut self, context: &RoleContext) -> Result<bool, RoleError> {
        context.require_server("SimClock::try_advance")?;
        if self.remainder + TICK_EPSILON < self.interval {
            return Ok(false);
        }
        self.remainder = (self.remainder - self.interval).max(0.0);
        self.tick += 1;
        Ok(true)
    }
}
