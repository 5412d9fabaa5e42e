/// Tunables for driving a simulation.

use crate::level::Level;

/// Configuration for the driver loop.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Grace period after a level is won or lost, in time units.
    pub finish_delay: f64,
    /// Longest sub-step a frame is split into.
    pub max_step: f64,
    /// Player steering speed, in cells per time unit.
    pub player_speed: f64,
    /// Seed for coin phases; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            finish_delay: Level::DEFAULT_FINISH_DELAY,
            max_step: 0.05,
            player_speed: 7.0,
            seed: None,
        }
    }
}

impl SimConfig {
    pub fn with_finish_delay(mut self, delay: f64) -> Self {
        self.finish_delay = delay;
        self
    }

    /// Set the sub-step length (non-positive values fall back to the default).
    pub fn with_max_step(mut self, step: f64) -> Self {
        self.max_step = positive_or(step, Self::default().max_step);
        self
    }

    /// Set the steering speed (non-positive values fall back to the default).
    pub fn with_player_speed(mut self, speed: f64) -> Self {
        self.player_speed = positive_or(speed, Self::default().player_speed);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// `max_step`, or the default when it was set to a non-positive value
    /// directly on the field.
    pub fn step_length(&self) -> f64 {
        positive_or(self.max_step, Self::default().max_step)
    }
}

pub(crate) fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}
