use std::time::{Duration, Instant};

/// Weight of the newest sample in the frames-per-second average.
const FPS_SMOOTHING: f32 = 0.1;

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous tick, in seconds.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Number of frames ticked before this one.
    pub frame_index: u64,

    /// Exponential moving average of `1 / dt`.
    pub fps: f32,
}

/// Per-framebuffer clock producing [`FrameTime`] snapshots.
///
/// Delta time is clamped so a stalled loop (debugger, minimized window,
/// a sender that went quiet) does not produce absurd values.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    fps: f32,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            frame_index: 0,
            fps: 0.0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the baseline, e.g. after a long wait for input.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Frames ticked so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frame_index
    }

    /// Advances the clock to now.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to `now`.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max)
            .as_secs_f32();
        self.last = now;

        let instant_fps = 1.0 / dt;
        self.fps = if self.frame_index == 0 {
            instant_fps
        } else {
            self.fps + FPS_SMOOTHING * (instant_fps - self.fps)
        };

        let ft = FrameTime {
            dt,
            now,
            frame_index: self.frame_index,
            fps: self.fps,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_index_counts_ticks() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        assert_eq!(clock.tick_at(start).frame_index, 0);
        assert_eq!(clock.tick_at(start + Duration::from_millis(10)).frame_index, 1);
        assert_eq!(clock.frames(), 2);
    }

    #[test]
    fn dt_is_clamped() {
        let start = Instant::now();
        let mut clock = FrameClock::with_clamps(Duration::from_millis(1), Duration::from_millis(100));
        clock.tick_at(start);

        let stalled = clock.tick_at(start + Duration::from_secs(5));
        assert!((stalled.dt - 0.1).abs() < 1e-6);

        let same = clock.tick_at(start + Duration::from_secs(5));
        assert!((same.dt - 0.001).abs() < 1e-6);
    }

    #[test]
    fn fps_converges_on_steady_rate() {
        let start = Instant::now();
        let mut clock = FrameClock::new();
        clock.tick_at(start);

        let mut ft = None;
        for i in 1..=200u32 {
            ft = Some(clock.tick_at(start + Duration::from_millis(20) * i));
        }
        let fps = ft.map(|f| f.fps).unwrap_or_default();
        assert!((fps - 50.0).abs() < 0.5, "fps = {fps}");
    }
}
