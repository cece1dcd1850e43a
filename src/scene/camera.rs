//! Orbit camera around the tree
//!
//! Spherical coordinates around a fixed target: no panning, the polar angle
//! stays between a raised and a slightly lowered view, and the distance is
//! bounded so the tree always fills the frame.

use std::f32::consts::{PI, TAU};
use crate::math::{Mat4, Vec3};

pub const CAMERA_START: Vec3 = Vec3::new(0.0, 1.0, 8.0);
/// Vertical field of view in degrees
pub const CAMERA_FOV_DEG: f32 = 45.0;

const MIN_POLAR: f32 = PI / 3.0;
const MAX_POLAR: f32 = PI / 1.8;
const MIN_DISTANCE: f32 = 5.0;
const MAX_DISTANCE: f32 = 15.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 1000.0;

const ORBIT_SENSITIVITY: f32 = 0.01;
const ZOOM_SENSITIVITY: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct CameraRig {
    target: Vec3,
    distance: f32,
    /// Angle from +Y
    polar: f32,
    /// Angle around +Y, 0 looking down -Z from +Z
    azimuth: f32,
    pub fov: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraRig {
    pub fn new() -> Self {
        let offset = CAMERA_START;
        let distance = offset.length();
        let polar = (offset.y / distance).clamp(-1.0, 1.0).acos();
        let azimuth = offset.x.atan2(offset.z);

        let mut rig = Self {
            target: Vec3::ZERO,
            distance,
            polar,
            azimuth,
            fov: CAMERA_FOV_DEG.to_radians(),
        };
        rig.clamp();
        rig
    }

    fn clamp(&mut self) {
        self.polar = self.polar.clamp(MIN_POLAR, MAX_POLAR);
        self.distance = self.distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Auto-rotation: `speed` is in turns per minute, so 2π/60·speed rad/s
    pub fn auto_rotate(&mut self, speed: f32, dt: f32) {
        self.azimuth -= TAU / 60.0 * speed * dt;
    }

    /// Drag in screen pixels
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        self.azimuth -= delta_x * ORBIT_SENSITIVITY;
        self.polar -= delta_y * ORBIT_SENSITIVITY;
        self.clamp();
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance += delta * ZOOM_SENSITIVITY;
        self.clamp();
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn polar(&self) -> f32 {
        self.polar
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn eye(&self) -> Vec3 {
        let sin_polar = self.polar.sin();
        self.target
            + Vec3::new(
                self.distance * sin_polar * self.azimuth.sin(),
                self.distance * self.polar.cos(),
                self.distance * sin_polar * self.azimuth.cos(),
            )
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at(self.eye(), self.target, Vec3::UP)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective(self.fov, aspect, NEAR, FAR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_configured_position() {
        let rig = CameraRig::new();
        assert!(rig.eye().distance(&CAMERA_START) < 1e-4);
        assert!((rig.fov - 45f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn test_orbit_respects_polar_limits() {
        let mut rig = CameraRig::new();
        rig.orbit(0.0, 10_000.0);
        assert!((rig.polar() - MIN_POLAR).abs() < 1e-6);
        rig.orbit(0.0, -10_000.0);
        assert!((rig.polar() - MAX_POLAR).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_limits() {
        let mut rig = CameraRig::new();
        rig.zoom(100.0);
        assert_eq!(rig.distance(), MAX_DISTANCE);
        rig.zoom(-100.0);
        assert_eq!(rig.distance(), MIN_DISTANCE);
    }

    #[test]
    fn test_auto_rotate_rate() {
        let mut rig = CameraRig::new();
        let before = rig.azimuth();
        // one minute at speed 1 is one full turn
        for _ in 0..600 {
            rig.auto_rotate(1.0, 0.1);
        }
        assert!((before - rig.azimuth() - TAU).abs() < 1e-3);
        let height = rig.eye().y;
        assert!((height - CAMERA_START.y).abs() < 1e-3);
    }
}
