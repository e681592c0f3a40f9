use crate::error::ConfigError;
use std::ops::RangeInclusive;

/// How a particle reacts when it reaches the edge of its bar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Boundary {
    /// Clamp to the edge and point the velocity component back inward.
    Reflect,
    /// Like `Reflect`, but scale the reflected component by `restitution`.
    Damped { restitution: f32 },
}

pub struct VisualizerConfig {
    /// Upper end of the value range; values are drawn from `[min_value(), max_value]`.
    pub max_value: u32,
    pub default_len: usize,
    pub max_len: usize,
    pub particles_per_element: usize,
    /// Initial velocity components are drawn from `[-max/2, max/2)`, in pixels per update.
    pub particle_max_speed: f32,
    pub boundary: Boundary,
    /// Wall-clock time the frame pump may spend per display frame.
    pub frame_budget_ms: f64,
    /// Pause between restoring a finished run and starting it again.
    pub restart_delay_ms: f64,
    pub speed_range: RangeInclusive<u32>,
    pub default_speed: u32,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            max_value: 1000,
            default_len: 50,
            max_len: 200,
            particles_per_element: 20,
            particle_max_speed: 1.5,
            boundary: Boundary::Damped { restitution: 0.8 },
            frame_budget_ms: 1000.0 / 60.0,
            restart_delay_ms: 1200.0,
            speed_range: 1..=200,
            default_speed: 100,
        }
    }
}

impl VisualizerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.frame_budget_ms.is_finite() && self.frame_budget_ms > 0.0) {
            return Err(ConfigError::FrameBudget(self.frame_budget_ms));
        }
        if self.max_value < 10 {
            return Err(ConfigError::MaxValue(self.max_value));
        }
        if self.max_len == 0 || self.default_len > self.max_len {
            return Err(ConfigError::ElementCount {
                default_len: self.default_len,
                max_len: self.max_len,
            });
        }
        if self.particles_per_element == 0 {
            return Err(ConfigError::NoParticles);
        }
        if !(self.particle_max_speed.is_finite() && self.particle_max_speed >= 0.0) {
            return Err(ConfigError::ParticleSpeed(self.particle_max_speed));
        }
        if let Boundary::Damped { restitution } = self.boundary {
            if !(0.0..=1.0).contains(&restitution) {
                return Err(ConfigError::Restitution(restitution));
            }
        }
        let (min, max) = (*self.speed_range.start(), *self.speed_range.end());
        if min == 0 || min > max || !self.speed_range.contains(&self.default_speed) {
            return Err(ConfigError::SpeedRange {
                min,
                max,
                default: self.default_speed,
            });
        }
        if !(self.restart_delay_ms.is_finite() && self.restart_delay_ms >= 0.0) {
            return Err(ConfigError::RestartDelay(self.restart_delay_ms));
        }
        Ok(())
    }

    /// Smallest value a freshly generated element may take: 10% of
    /// `max_value`, rounded up.
    pub fn min_value(&self) -> u32 {
        self.max_value.div_ceil(10)
    }
}
