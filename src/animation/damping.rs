//! Frame-rate independent convergence helpers
//!
//! Two models drive the morph: [`damp`] smooths a scalar with a fixed
//! time constant (foliage progress), [`approach`] moves a point a fraction
//! `dt * rate` of the remaining distance each frame (ornaments, topper).
//! Neither can overshoot its target.

use crate::math::Vec3;

/// Largest frame delta fed to any animator, in seconds
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// Clamp a raw frame delta into `[0, MAX_FRAME_DELTA]`.
///
/// Tab switches and debugger pauses can report multi-second frames; those
/// would turn rotation accumulators into visible jumps.
pub fn clamp_frame_delta(dt: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DELTA)
    } else {
        0.0
    }
}

/// Exponential smoothing: `target + (current - target) * e^(-lambda * dt)`
pub fn damp(current: f32, target: f32, lambda: f32, dt: f32) -> f32 {
    target + (current - target) * (-lambda * dt).exp()
}

/// Fraction of the remaining distance covered this frame, clamped to [0, 1]
pub fn approach_factor(dt: f32, rate: f32) -> f32 {
    (dt * rate).clamp(0.0, 1.0)
}

/// First-order approach of `current` toward `destination`
pub fn approach(current: Vec3, destination: Vec3, dt: f32, rate: f32) -> Vec3 {
    current.lerp(&destination, approach_factor(dt, rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damp_idempotent_at_target() {
        for dt in [0.0, 0.001, 0.016, 0.1, 5.0] {
            assert_eq!(damp(1.0, 1.0, 2.0, dt), 1.0);
            assert_eq!(damp(0.0, 0.0, 2.0, dt), 0.0);
        }
    }

    #[test]
    fn test_damp_never_overshoots() {
        let mut p = 0.0;
        let mut prev = p;
        for _ in 0..600 {
            p = damp(p, 1.0, 2.0, 1.0 / 60.0);
            assert!(p >= prev && p <= 1.0);
            prev = p;
        }
        assert!(p > 0.99);
    }

    #[test]
    fn test_damp_frame_rate_independent() {
        let mut at_30 = 0.0;
        for _ in 0..30 {
            at_30 = damp(at_30, 1.0, 2.0, 1.0 / 30.0);
        }
        let mut at_120 = 0.0;
        for _ in 0..120 {
            at_120 = damp(at_120, 1.0, 2.0, 1.0 / 120.0);
        }
        assert!((at_30 - at_120).abs() < 1e-4);
        assert!((at_30 - (1.0 - (-2.0f32).exp())).abs() < 1e-4);
    }

    #[test]
    fn test_clamp_frame_delta() {
        assert_eq!(clamp_frame_delta(0.016), 0.016);
        assert_eq!(clamp_frame_delta(3.0), MAX_FRAME_DELTA);
        assert_eq!(clamp_frame_delta(-1.0), 0.0);
        assert_eq!(clamp_frame_delta(f32::NAN), 0.0);
    }

    #[test]
    fn test_approach_factor_saturates() {
        assert_eq!(approach_factor(0.5, 3.0), 1.0);
        assert!((approach_factor(0.01, 1.5) - 0.015).abs() < 1e-6);
    }

    #[test]
    fn test_approach_moves_fractionally() {
        let p = approach(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 0.1, 1.5);
        assert!((p.x - 1.5).abs() < 1e-5);
    }
}
