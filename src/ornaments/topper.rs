use crate::animation::{approach, FrameTime};
use crate::config::TreeConfig;
use crate::math::{Color, Euler, Mat4, Vec3};
use crate::scene::lighting::PointLight;

/// Where the star sits on the assembled tree
pub const CROWN_POSITION: Vec3 = Vec3::new(0.0, 4.0, 0.0);
/// Where the star drifts to while the tree is scattered
pub const LAUNCH_POSITION: Vec3 = Vec3::new(0.0, 15.0, 0.0);
/// Initial position on mount
pub const START_POSITION: Vec3 = Vec3::new(0.0, 10.0, 0.0);

const APPROACH_RATE: f32 = 1.5;
const SPIN_RATE: f32 = 0.5;
const EMISSIVE_LIT: f32 = 2.0;

/// Star color; also its emissive color
pub const TOPPER_COLOR: Color = Color::from_u32(0xFFD700);
/// Octahedron radius
pub const TOPPER_RADIUS: f32 = 0.4;

/// The star on top of the tree
#[derive(Debug, Clone)]
pub struct Topper {
    position: Vec3,
    rotation_y: f32,
    scale: f32,
    lit: bool,
    assembled: bool,
}

impl Default for Topper {
    fn default() -> Self {
        Self::new()
    }
}

impl Topper {
    pub fn new() -> Self {
        Self {
            position: START_POSITION,
            rotation_y: 0.0,
            scale: 1.0,
            lit: false,
            assembled: false,
        }
    }

    pub fn update(&mut self, config: &TreeConfig, frame: FrameTime) {
        self.lit = config.lights_on;
        self.assembled = config.is_assembled;

        let destination = if self.assembled { CROWN_POSITION } else { LAUNCH_POSITION };
        self.position = approach(self.position, destination, frame.delta, APPROACH_RATE);
        self.rotation_y += frame.delta * SPIN_RATE;
        self.scale = pulse_scale(frame.elapsed);
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Glowing only while lit and sitting on the tree
    pub fn is_glowing(&self) -> bool {
        self.lit && self.assembled
    }

    pub fn emissive_intensity(&self) -> f32 {
        if self.is_glowing() {
            EMISSIVE_LIT
        } else {
            0.0
        }
    }

    /// Attached point light in the topper's local frame (at its origin)
    pub fn light(&self) -> Option<PointLight> {
        self.is_glowing().then(PointLight::star)
    }

    pub fn transform(&self) -> Mat4 {
        Mat4::compose(
            self.position,
            Euler::new(0.0, self.rotation_y, 0.0),
            Vec3::splat(self.scale),
        )
    }
}

/// Breathing scale `1 + 0.1 sin(2t)`
pub fn pulse_scale(elapsed: f32) -> f32 {
    1.0 + (elapsed * 2.0).sin() * 0.1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(lights_on: bool, is_assembled: bool) -> TreeConfig {
        TreeConfig { lights_on, is_assembled, ..Default::default() }
    }

    #[test]
    fn test_light_gated_by_both_flags() {
        let mut topper = Topper::new();

        topper.update(&config(false, true), FrameTime::new(0.016, 0.016));
        assert!(topper.light().is_none());
        assert_eq!(topper.emissive_intensity(), 0.0);

        topper.update(&config(true, true), FrameTime::new(0.032, 0.016));
        let light = topper.light().expect("lit and assembled");
        assert_eq!(light.intensity, 3.0);
        assert_eq!(topper.emissive_intensity(), 2.0);

        topper.update(&config(true, false), FrameTime::new(0.048, 0.016));
        assert!(topper.light().is_none());
    }

    #[test]
    fn test_approaches_crown() {
        let mut topper = Topper::new();
        let cfg = config(true, true);
        let mut prev = topper.position().distance(&CROWN_POSITION);
        for frame in 1..=600 {
            topper.update(&cfg, FrameTime::new(frame as f32 / 60.0, 1.0 / 60.0));
            let d = topper.position().distance(&CROWN_POSITION);
            assert!(d <= prev);
            prev = d;
        }
        assert!(prev < 1e-3);
    }

    #[test]
    fn test_launches_when_scattered() {
        let mut topper = Topper::new();
        topper.update(&config(true, false), FrameTime::new(0.1, 0.1));
        // 10 -> 15 by 15% of the gap
        assert!((topper.position().y - 10.75).abs() < 1e-5);
    }

    #[test]
    fn test_spins_in_both_states() {
        let mut topper = Topper::new();
        topper.update(&config(true, true), FrameTime::new(0.1, 0.1));
        topper.update(&config(true, false), FrameTime::new(0.2, 0.1));
        assert!((topper.rotation_y() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_pulse_depends_only_on_time() {
        assert_eq!(pulse_scale(0.0), 1.0);
        let peak = pulse_scale(std::f32::consts::FRAC_PI_4);
        assert!((peak - 1.1).abs() < 1e-5);

        let mut a = Topper::new();
        let mut b = Topper::new();
        a.update(&config(true, true), FrameTime::new(1.3, 0.016));
        b.update(&config(false, false), FrameTime::new(1.3, 0.016));
        assert_eq!(a.scale(), b.scale());
    }
}
