use thiserror::Error;

/// Rejected [`VisualizerConfig`](crate::config::VisualizerConfig) values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("frame budget must be a positive number of milliseconds, got {0}")]
    FrameBudget(f64),
    #[error("max_value must be at least 10, got {0}")]
    MaxValue(u32),
    #[error("element count bounds invalid: default_len={default_len} max_len={max_len}")]
    ElementCount { default_len: usize, max_len: usize },
    #[error("particles_per_element must be non-zero")]
    NoParticles,
    #[error("particle_max_speed must be finite and non-negative, got {0}")]
    ParticleSpeed(f32),
    #[error("restitution must lie in [0, 1], got {0}")]
    Restitution(f32),
    #[error("speed range invalid: {min}..={max} with default {default}")]
    SpeedRange { min: u32, max: u32, default: u32 },
    #[error("restart delay must be finite and non-negative, got {0}")]
    RestartDelay(f64),
}

/// A speed value outside the accepted slider range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("speed {value} outside {min}..={max}")]
pub struct SpeedError {
    pub value: i64,
    pub min: u32,
    pub max: u32,
}
