use super::damping::clamp_frame_delta;

/// Timing handed to every animator for one displayed frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Seconds since the scene was mounted
    pub elapsed: f32,
    /// Seconds since the previous frame, already clamped
    pub delta: f32,
}

impl FrameTime {
    pub const fn new(elapsed: f32, delta: f32) -> Self {
        Self { elapsed, delta }
    }
}

/// Accumulates raw frame deltas from the host loop
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    elapsed: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by a raw delta and return the clamped timing for this frame
    pub fn tick(&mut self, raw_dt: f32) -> FrameTime {
        let delta = clamp_frame_delta(raw_dt);
        self.elapsed += delta;
        FrameTime::new(self.elapsed, delta)
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::MAX_FRAME_DELTA;

    #[test]
    fn test_tick_accumulates() {
        let mut clock = FrameClock::new();
        clock.tick(0.25 / 4.0);
        let t = clock.tick(0.0625);
        assert!((t.elapsed - 0.125).abs() < 1e-6);
        assert!((t.delta - 0.0625).abs() < 1e-6);
    }

    #[test]
    fn test_spike_is_clamped() {
        let mut clock = FrameClock::new();
        let t = clock.tick(12.0);
        assert_eq!(t.delta, MAX_FRAME_DELTA);
        assert_eq!(clock.elapsed(), MAX_FRAME_DELTA);
    }
}
