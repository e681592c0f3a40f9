use sortviz_core::{Clock, ElementRect, PlaybackState, StepSignal, Visualizer, VisualizerConfig};
use wasm_bindgen::prelude::*;

/// Ints per record in the buffer returned by `drain_signals`:
/// `[code, a, b, value_a, value_b]`, unused slots set to -1.
const SIGNAL_STRIDE: usize = 5;

/// Browser clock. `performance.now()` would need extra web-sys features;
/// millisecond resolution is enough for the step delays used here.
struct DateClock;

impl Clock for DateClock {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }
}

/// GPU-compatible particle vertex: 16 bytes, screen-space position + owning bar.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct ParticleVertex {
    position: [f32; 2], // 8 bytes
    owner: u32,         // 4 bytes
    _pad: u32,          // 4 bytes
}

#[wasm_bindgen]
pub struct SortVisualizer {
    vis: Visualizer<DateClock>,
    rects: Vec<Option<ElementRect>>,
    screen: Vec<glam::Vec2>,
    vertex_buffer: Vec<ParticleVertex>,
    last_state: PlaybackState,
}

#[wasm_bindgen]
impl SortVisualizer {
    #[wasm_bindgen(constructor)]
    pub fn new(count: usize, seed: u32) -> Result<SortVisualizer, JsValue> {
        let config = VisualizerConfig {
            default_len: count,
            ..Default::default()
        };
        let vis = Visualizer::new(config, DateClock, seed as u64)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        web_sys::console::log_1(
            &format!(
                "SortVisualizer created: {} bars, {} particles",
                vis.current_array().len(),
                vis.particles().count
            )
            .into(),
        );

        let mut world = SortVisualizer {
            vis,
            rects: Vec::new(),
            screen: Vec::new(),
            vertex_buffer: Vec::new(),
            last_state: PlaybackState::Idle,
        };
        world.write_vertex_output();
        Ok(world)
    }

    /// Advance one display frame. Returns the playback state code.
    #[wasm_bindgen]
    pub fn frame(&mut self) -> u32 {
        let report = self.vis.frame(&self.rects);
        if report.state != self.last_state {
            if report.state == PlaybackState::Completed {
                web_sys::console::log_1(&"SortVisualizer: sort complete".into());
            }
            self.last_state = report.state;
        }
        if report.particles_moved {
            self.write_vertex_output();
        }
        state_code(report.state)
    }

    #[wasm_bindgen]
    pub fn start(&mut self) -> bool {
        self.track(|vis| vis.start())
    }

    #[wasm_bindgen]
    pub fn pause(&mut self) -> bool {
        self.track(|vis| vis.pause())
    }

    #[wasm_bindgen]
    pub fn toggle(&mut self) -> bool {
        self.track(|vis| vis.toggle())
    }

    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.track(|vis| vis.reset());
    }

    #[wasm_bindgen]
    pub fn regenerate(&mut self) {
        self.track(|vis| vis.regenerate());
        self.after_regenerate();
    }

    /// Change the bar count. Ignored (returns false) while sorting.
    #[wasm_bindgen]
    pub fn resize(&mut self, count: usize) -> bool {
        let resized = self.track(|vis| vis.resize(count));
        if resized {
            self.after_regenerate();
        }
        resized
    }

    /// Speed slider input; returns the clamped value actually applied.
    #[wasm_bindgen]
    pub fn set_speed(&mut self, speed: i32) -> u32 {
        self.vis.set_speed(speed as i64).get()
    }

    #[wasm_bindgen]
    pub fn set_frame_budget(&mut self, budget_ms: f64) -> Result<(), JsValue> {
        self.vis
            .set_frame_budget(budget_ms)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Bar rectangles as flat `[left, top, width, height]` quads, one per bar.
    /// A bar with zero or non-finite width is treated as off-screen.
    #[wasm_bindgen]
    pub fn set_bar_rects(&mut self, rects: &[f32]) {
        self.rects.clear();
        self.rects.extend(rects.chunks_exact(4).map(|q| {
            let rect = ElementRect::new(q[0], q[1], q[2], q[3]);
            rect.has_area().then_some(rect)
        }));
    }

    #[wasm_bindgen]
    pub fn state(&self) -> u32 {
        state_code(self.vis.state())
    }

    #[wasm_bindgen]
    pub fn is_running(&self) -> bool {
        self.vis.is_running()
    }

    #[wasm_bindgen]
    pub fn generation(&self) -> u32 {
        self.vis.generation() as u32
    }

    #[wasm_bindgen]
    pub fn get_array_ptr(&self) -> *const u32 {
        self.vis.current_array().as_ptr()
    }

    #[wasm_bindgen]
    pub fn array_len(&self) -> usize {
        self.vis.current_array().len()
    }

    #[wasm_bindgen]
    pub fn max_value(&self) -> u32 {
        self.vis.config().max_value
    }

    #[wasm_bindgen]
    pub fn get_particle_buffer_ptr(&self) -> *const f32 {
        self.vertex_buffer.as_ptr() as *const f32
    }

    #[wasm_bindgen]
    pub fn get_particle_buffer_byte_length(&self) -> usize {
        self.vertex_buffer.len() * std::mem::size_of::<ParticleVertex>()
    }

    /// Number of vertices in the particle buffer (visible particles only).
    #[wasm_bindgen]
    pub fn visible_particle_count(&self) -> usize {
        self.vertex_buffer.len()
    }

    #[wasm_bindgen]
    pub fn pointer(&self) -> i32 {
        self.vis.visual_state().pointer.map_or(-1, |i| i as i32)
    }

    #[wasm_bindgen]
    pub fn highlight_left(&self) -> i32 {
        self.vis.visual_state().highlighted.map_or(-1, |(l, _)| l as i32)
    }

    #[wasm_bindgen]
    pub fn highlight_right(&self) -> i32 {
        self.vis.visual_state().highlighted.map_or(-1, |(_, r)| r as i32)
    }

    #[wasm_bindgen]
    pub fn is_completed(&self) -> bool {
        self.vis.visual_state().completed
    }

    #[wasm_bindgen]
    pub fn average_frame_ms(&self) -> f64 {
        self.vis.pump().average_frame_ms()
    }

    /// Pending step signals, `SIGNAL_STRIDE` ints per record.
    #[wasm_bindgen]
    pub fn drain_signals(&mut self) -> js_sys::Int32Array {
        let signals = self.vis.drain_signals();
        let mut flat = Vec::with_capacity(signals.len() * SIGNAL_STRIDE);
        for signal in &signals {
            flat.extend_from_slice(&encode_signal(signal));
        }
        js_sys::Int32Array::from(flat.as_slice())
    }
}

impl SortVisualizer {
    fn track<R>(&mut self, f: impl FnOnce(&mut Visualizer<DateClock>) -> R) -> R {
        let r = f(&mut self.vis);
        self.last_state = self.vis.state();
        r
    }

    fn after_regenerate(&mut self) {
        self.rects.clear();
        self.write_vertex_output();
        web_sys::console::log_1(
            &format!(
                "SortVisualizer regenerated: {} bars (generation {})",
                self.vis.current_array().len(),
                self.vis.generation()
            )
            .into(),
        );
    }

    fn write_vertex_output(&mut self) {
        let particles = self.vis.particles();
        particles.screen_positions(
            &self.rects,
            self.vis.current_array(),
            self.vis.config().max_value,
            &mut self.screen,
        );

        self.vertex_buffer.clear();
        let visible = (0..particles.count).filter(|&i| {
            matches!(self.rects.get(particles.owner[i] as usize), Some(Some(_)))
        });
        for (i, pos) in visible.zip(&self.screen) {
            self.vertex_buffer.push(ParticleVertex {
                position: [pos.x, pos.y],
                owner: particles.owner[i],
                _pad: 0,
            });
        }
    }
}

fn state_code(state: PlaybackState) -> u32 {
    match state {
        PlaybackState::Idle => 0,
        PlaybackState::Running => 1,
        PlaybackState::Paused => 2,
        PlaybackState::Completed => 3,
    }
}

fn encode_signal(signal: &StepSignal) -> [i32; SIGNAL_STRIDE] {
    let code = signal.code();
    match *signal {
        StepSignal::CompareStart { left, right } | StepSignal::CompareEnd { left, right } => {
            [code, left as i32, right as i32, -1, -1]
        }
        StepSignal::PointerMove { index } => [code, index as i32, -1, -1, -1],
        StepSignal::Swap { left, right, values } => {
            [code, left as i32, right as i32, values[0] as i32, values[1] as i32]
        }
        StepSignal::Complete | StepSignal::Cleared => [code, -1, -1, -1, -1],
    }
}
