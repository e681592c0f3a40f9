use crate::clock::Clock;
use crate::config::VisualizerConfig;
use crate::delay::Speed;
use crate::elements::ElementArray;
use crate::error::ConfigError;
use crate::particle::{ElementRect, ParticleField};
use crate::pump::{FramePump, FrameStats};
use crate::signal::{StepSignal, VisualState};
use crate::stepper::{CancelFlag, Cursor, Resume, SortStepper};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Running,
    Paused,
    Completed,
}

/// What happened during one [`Visualizer::frame`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    pub state: PlaybackState,
    /// Pump statistics, if a stepper was driven this frame.
    pub pump: Option<FrameStats>,
    /// Whether particle positions were integrated this frame.
    pub particles_moved: bool,
}

type Listener = Box<dyn FnMut(&StepSignal)>;

/// Playback controller: owns the element array, its snapshot, the particle
/// field and at most one live [`SortStepper`].
///
/// The display loop calls [`frame`](Self::frame) once per refresh; UI controls
/// call [`start`](Self::start), [`pause`](Self::pause), [`reset`](Self::reset)
/// and [`regenerate`](Self::regenerate). Renderers read through accessors and
/// the signal stream only.
pub struct Visualizer<C: Clock> {
    config: VisualizerConfig,
    clock: C,
    rng: StdRng,
    elements: ElementArray,
    particles: ParticleField,
    state: PlaybackState,
    stepper: Option<SortStepper>,
    cancel: CancelFlag,
    /// First unprocessed pair of a paused run.
    checkpoint: Option<Cursor>,
    /// When a restored run may begin after a finished one.
    restart_at: Option<f64>,
    speed: Speed,
    pump: FramePump,
    visual: VisualState,
    pending: Vec<StepSignal>,
    listener: Option<Listener>,
    generation: u64,
}

impl<C: Clock> Visualizer<C> {
    /// Validate `config` and generate the first array from `seed`.
    pub fn new(config: VisualizerConfig, clock: C, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let elements = ElementArray::generate(config.default_len, &config, &mut rng);
        let particles = ParticleField::new(elements.len(), &config, &mut rng);
        let speed = Speed::clamped(config.default_speed as i64, &config.speed_range);
        let pump = FramePump::new(config.frame_budget_ms);

        Ok(Self {
            config,
            clock,
            rng,
            elements,
            particles,
            state: PlaybackState::Idle,
            stepper: None,
            cancel: CancelFlag::new(),
            checkpoint: None,
            restart_at: None,
            speed,
            pump,
            visual: VisualState::default(),
            pending: Vec::new(),
            listener: None,
            generation: 0,
        })
    }

    /// Replace the current array with `values` (e.g. a fixed scenario).
    ///
    /// Same effect as a regenerate, with the values chosen by the caller.
    pub fn load(&mut self, values: Vec<u32>) {
        self.abandon_stepper();
        self.elements = ElementArray::from_values(values);
        self.rebuild_field();
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// True while the play button should read "pause", including the
    /// cosmetic delay before a restarted run begins.
    pub fn is_running(&self) -> bool {
        self.state == PlaybackState::Running
    }

    pub fn current_array(&self) -> &[u32] {
        self.elements.values()
    }

    pub fn original_array(&self) -> &[u32] {
        self.elements.original()
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn visual_state(&self) -> VisualState {
        self.visual
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn pump(&self) -> &FramePump {
        &self.pump
    }

    /// Bumped on every regenerate; renderers rebuild their bars when it changes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Position of the live stepper, or of the paused run.
    pub fn progress(&self) -> Option<Cursor> {
        self.stepper.as_ref().map(SortStepper::cursor).or(self.checkpoint)
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    /// Set the speed from raw UI input, clamped into the configured range.
    pub fn set_speed(&mut self, value: i64) -> Speed {
        self.speed = Speed::clamped(value, &self.config.speed_range);
        self.speed
    }

    pub fn set_frame_budget(&mut self, budget_ms: f64) -> Result<(), ConfigError> {
        if !(budget_ms.is_finite() && budget_ms > 0.0) {
            return Err(ConfigError::FrameBudget(budget_ms));
        }
        self.config.frame_budget_ms = budget_ms;
        self.pump.budget_ms = budget_ms;
        Ok(())
    }

    /// Register the step listener, replacing any previous one.
    ///
    /// While a listener is registered, signals go to it alone and are not
    /// queued for [`drain_signals`](Self::drain_signals).
    pub fn on_step<F: FnMut(&StepSignal) + 'static>(&mut self, listener: F) {
        self.listener = Some(Box::new(listener));
    }

    /// Take every signal emitted since the last drain while no listener was
    /// registered.
    pub fn drain_signals(&mut self) -> Vec<StepSignal> {
        std::mem::take(&mut self.pending)
    }

    /// Begin or resume sorting. Returns false if already running.
    ///
    /// A paused run continues from the pair it stopped at. A finished run is
    /// first restored to its snapshot and restarts after the configured delay.
    pub fn start(&mut self) -> bool {
        match self.state {
            PlaybackState::Running => false,
            PlaybackState::Completed => {
                self.restore_snapshot();
                self.restart_at = Some(self.clock.now_ms() + self.config.restart_delay_ms);
                self.transition(PlaybackState::Running);
                true
            }
            PlaybackState::Idle | PlaybackState::Paused => {
                self.launch();
                true
            }
        }
    }

    /// Suspend a running sort. Returns false if nothing was running.
    pub fn pause(&mut self) -> bool {
        if self.state != PlaybackState::Running {
            return false;
        }
        self.restart_at = None;
        self.checkpoint = self.abandon_stepper();
        self.transition(PlaybackState::Paused);
        true
    }

    /// Play/pause button semantics.
    pub fn toggle(&mut self) -> bool {
        if self.is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Stop any run and restore the snapshot. Never draws new values.
    pub fn reset(&mut self) {
        self.abandon_stepper();
        self.restore_snapshot();
        self.transition(PlaybackState::Idle);
    }

    /// Draw a new array of the current length.
    pub fn regenerate(&mut self) {
        let len = self.elements.len().max(1);
        self.regenerate_with(len);
    }

    /// Draw a new array of `len` elements (clamped to `1..=max_len`).
    pub fn regenerate_with(&mut self, len: usize) {
        let len = len.clamp(1, self.config.max_len);
        self.abandon_stepper();
        self.elements = ElementArray::generate(len, &self.config, &mut self.rng);
        self.rebuild_field();
    }

    /// Change the element count. Ignored while a sort is running.
    pub fn resize(&mut self, len: usize) -> bool {
        if self.is_running() {
            return false;
        }
        self.regenerate_with(len);
        true
    }

    /// Advance one display frame: start a delayed restart if due, pump the
    /// live stepper within the frame budget, then move the particles.
    pub fn frame(&mut self, rects: &[Option<ElementRect>]) -> FrameReport {
        if let Some(at) = self.restart_at {
            if self.clock.now_ms() >= at {
                self.restart_at = None;
                self.launch();
            }
        }

        let pump = self.pump_stepper();
        if let Some(stats) = pump {
            if stats.outcome.is_some() {
                let steps = self.stepper.as_ref().map_or(0, SortStepper::comparisons);
                self.stepper = None;
                if stats.outcome == Some(Resume::Complete) {
                    info!(len = self.elements.len(), steps, "sort complete");
                    self.transition(PlaybackState::Completed);
                } else {
                    self.transition(PlaybackState::Paused);
                }
            }
        }

        let particles_moved = self.particles.tick(rects);
        FrameReport {
            state: self.state,
            pump,
            particles_moved,
        }
    }

    fn pump_stepper(&mut self) -> Option<FrameStats> {
        let Self {
            stepper,
            elements,
            clock,
            pump,
            pending,
            visual,
            listener,
            speed,
            ..
        } = self;
        let stepper = stepper.as_mut()?;
        let speed = *speed;
        let values = elements.values_mut();
        let clock = &*clock;

        Some(pump.pump(clock, || {
            stepper.resume(values, clock, speed, |s| deliver(s, visual, pending, listener))
        }))
    }

    /// Construct a stepper, from the paused checkpoint if there is one.
    fn launch(&mut self) {
        self.cancel = CancelFlag::new();
        let len = self.elements.len();
        let stepper = match self.checkpoint.take() {
            Some(cursor) => SortStepper::starting_at(len, cursor, self.cancel.clone()),
            None => SortStepper::new(len, self.cancel.clone()),
        };
        debug!(pass = stepper.cursor().pass, index = stepper.cursor().index, "stepper launched");
        self.stepper = Some(stepper);
        self.transition(PlaybackState::Running);
    }

    /// Cancel and drop the live stepper, letting it emit its cleanup signal.
    /// Returns where it stopped.
    fn abandon_stepper(&mut self) -> Option<Cursor> {
        let mut stepper = self.stepper.take()?;
        self.cancel.cancel();
        let Self {
            elements,
            clock,
            pending,
            visual,
            listener,
            speed,
            ..
        } = self;
        let outcome = stepper.resume(elements.values_mut(), &*clock, *speed, |s| {
            deliver(s, visual, pending, listener)
        });
        debug_assert_eq!(outcome, Resume::Cancelled);
        Some(stepper.cursor())
    }

    fn restore_snapshot(&mut self) {
        self.restart_at = None;
        self.checkpoint = None;
        self.elements.restore();
        self.emit(StepSignal::Cleared);
    }

    fn rebuild_field(&mut self) {
        self.particles = ParticleField::new(self.elements.len(), &self.config, &mut self.rng);
        self.restart_at = None;
        self.checkpoint = None;
        self.generation += 1;
        self.emit(StepSignal::Cleared);
        info!(
            len = self.elements.len(),
            particles = self.particles.count,
            generation = self.generation,
            "elements regenerated"
        );
        self.transition(PlaybackState::Idle);
    }

    fn emit(&mut self, signal: StepSignal) {
        deliver(signal, &mut self.visual, &mut self.pending, &mut self.listener);
    }

    fn transition(&mut self, to: PlaybackState) {
        if self.state != to {
            debug!(from = ?self.state, to = ?to, "playback transition");
            self.state = to;
        }
    }
}

fn deliver(
    signal: StepSignal,
    visual: &mut VisualState,
    pending: &mut Vec<StepSignal>,
    listener: &mut Option<Listener>,
) {
    visual.apply(&signal);
    match listener.as_mut() {
        Some(listener) => listener(&signal),
        None => pending.push(signal),
    }
}
