//! Stepwise sorting-animation engine.
//!
//! A bubble sort runs as a resumable state machine, advanced by a
//! time-budgeted frame pump and owned by a playback controller. A small
//! per-bar particle field provides the decorative motion drawn on top.

pub mod clock;
pub mod config;
pub mod controller;
pub mod delay;
pub mod elements;
pub mod error;
pub mod particle;
pub mod pump;
pub mod signal;
pub mod stepper;

pub use clock::{Clock, SimulatedClock, SystemClock};
pub use config::{Boundary, VisualizerConfig};
pub use controller::{FrameReport, PlaybackState, Visualizer};
pub use delay::{delay_ms, Speed};
pub use elements::ElementArray;
pub use error::{ConfigError, SpeedError};
pub use particle::{ElementRect, ParticleField};
pub use pump::{FramePump, FrameStats};
pub use signal::{StepSignal, VisualState};
pub use stepper::{CancelFlag, Cursor, Resume, SortStepper};
