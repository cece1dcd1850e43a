//! Gentle bobbing of the whole tree while it stands assembled

use crate::math::{Euler, Mat4, Vec3};

#[derive(Debug, Clone, Copy)]
pub struct FloatParams {
    pub speed: f32,
    pub rotation_intensity: f32,
    pub float_intensity: f32,
    /// Vertical range the sine is remapped onto
    pub range: (f32, f32),
}

impl Default for FloatParams {
    fn default() -> Self {
        Self {
            speed: 2.0,
            rotation_intensity: 0.1,
            float_intensity: 0.2,
            range: (-0.1, 0.1),
        }
    }
}

/// Time-driven sway. While disabled the last pose is held.
#[derive(Debug, Clone)]
pub struct FloatMotion {
    params: FloatParams,
    /// Per-instance phase so two scenes never sway in sync
    offset: f32,
    rotation: Euler,
    height: f32,
}

impl FloatMotion {
    pub fn new(params: FloatParams) -> Self {
        Self::with_offset(params, rand::random::<f32>() * 10_000.0)
    }

    pub fn with_offset(params: FloatParams, offset: f32) -> Self {
        Self {
            params,
            offset,
            rotation: Euler::default(),
            height: 0.0,
        }
    }

    pub fn update(&mut self, elapsed: f32, enabled: bool) {
        if !enabled {
            return;
        }

        let p = &self.params;
        let t = (self.offset + elapsed) / 4.0 * p.speed;
        self.rotation = Euler::new(
            t.cos() / 8.0 * p.rotation_intensity,
            t.sin() / 8.0 * p.rotation_intensity,
            t.sin() / 20.0 * p.rotation_intensity,
        );

        let wave = t.sin() / 10.0;
        self.height = map_linear(wave, -0.1, 0.1, p.range.0, p.range.1) * p.float_intensity;
    }

    pub fn rotation(&self) -> Euler {
        self.rotation
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn transform(&self) -> Mat4 {
        Mat4::compose(Vec3::new(0.0, self.height, 0.0), self.rotation, Vec3::ONE)
    }
}

fn map_linear(x: f32, a1: f32, a2: f32, b1: f32, b2: f32) -> f32 {
    b1 + (x - a1) * (b2 - b1) / (a2 - a1)
}
