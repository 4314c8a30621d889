//! Pacing for real-time hosts.
//!
//! The engine knows nothing about seconds: one `Engine::tick` is one
//! [`FIXED_DT`] quantum. A host measures each display frame, feeds the
//! duration in, and calls `Engine::tick` once for every `should_step()` that
//! returns true. A frame may run zero, one or several ticks; whatever is left
//! over carries into the next frame and shows up as `interpolation_alpha`.

use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;

/// Simulation rate of the NES.
pub const TICKS_PER_SECOND: f64 = 60.0;
/// Seconds covered by one engine tick.
pub const FIXED_DT: f64 = 1.0 / TICKS_PER_SECOND;

pub struct TimeState {
    pub fixed_dt: f64,
    pub max_frame_time: f64,
    accumulator: f64,
    pub total_time: f64,
    pub tick_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    pub real_dt: f64,
    last_instant: Instant,
    pub interpolation_alpha: f64,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
}

impl TimeState {
    pub fn new() -> Self {
        Self::with_fixed_dt(FIXED_DT)
    }

    pub fn with_fixed_dt(fixed_dt: f64) -> Self {
        Self {
            fixed_dt,
            max_frame_time: 0.25,
            accumulator: 0.0,
            total_time: 0.0,
            tick_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            real_dt: 0.0,
            last_instant: Instant::now(),
            interpolation_alpha: 0.0,
            fps_samples: [fixed_dt; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 1.0 / fixed_dt,
        }
    }

    /// Measure the wall-clock time since the previous display frame and feed
    /// it in.
    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(elapsed);
    }

    /// Feed a display frame of `elapsed` seconds. Anything over
    /// `max_frame_time` is dropped so a stalled host cannot queue up
    /// hundreds of ticks.
    pub fn advance(&mut self, elapsed: f64) {
        self.real_dt = elapsed.max(0.0);

        // Spiral-of-death cap
        if self.real_dt > self.max_frame_time {
            log::warn!(
                "Frame took {:.1}ms, capping to {:.0}ms",
                self.real_dt * 1000.0,
                self.max_frame_time * 1000.0
            );
            self.real_dt = self.max_frame_time;
        }

        self.accumulator += self.real_dt;
        self.steps_this_frame = 0;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }

    /// True when a whole quantum is banked; the host then runs one
    /// `Engine::tick`.
    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.total_time += self.fixed_dt;
            self.tick_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }

    pub fn end_frame(&mut self) {
        self.interpolation_alpha = self.accumulator / self.fixed_dt;
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}
