//! Ambient "magic dust" floating around the tree

use rand::Rng;
use crate::math::{Color, Vec3};
use super::{push_particle, PARTICLE_STRIDE};

/// Parameters of the sparkle field
#[derive(Debug, Clone, Copy)]
pub struct SparkleParams {
    pub count: usize,
    /// Edge of the cube the sparkles are spread over
    pub scale: f32,
    pub size: f32,
    pub speed: f32,
    pub opacity: f32,
    /// Spatial frequency of the wobble
    pub noise: f32,
}

impl Default for SparkleParams {
    fn default() -> Self {
        Self {
            count: 200,
            scale: 15.0,
            size: 4.0,
            speed: 0.4,
            opacity: 0.3,
            noise: 1.0,
        }
    }
}

/// Wobble amplitude around each home position
const WOBBLE: f32 = 0.2;

#[derive(Debug, Clone)]
pub struct SparkleField {
    params: SparkleParams,
    homes: Vec<Vec3>,
    color: Color,
    visible: bool,
}

impl SparkleField {
    pub fn new(params: SparkleParams, color: Color) -> Self {
        Self::generate_with(&mut rand::thread_rng(), params, color)
    }

    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R, params: SparkleParams, color: Color) -> Self {
        let half = params.scale * 0.5;
        let homes = (0..params.count)
            .map(|_| {
                Vec3::new(
                    rng.gen_range(-half..half),
                    rng.gen_range(-half..half),
                    rng.gen_range(-half..half),
                )
            })
            .collect();

        Self {
            params,
            homes,
            color,
            visible: true,
        }
    }

    pub fn params(&self) -> &SparkleParams {
        &self.params
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn len(&self) -> usize {
        self.homes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.homes.is_empty()
    }

    /// Position of sparkle `i` at time `t`
    pub fn position_at(&self, i: usize, time: f32) -> Vec3 {
        let home = self.homes[i];
        let phase = time * self.params.speed;
        let n = home.x * self.params.noise;
        Vec3::new(
            home.x + (phase + n * 100.0).cos() * WOBBLE,
            home.y + (phase + n * 100.0).sin() * WOBBLE,
            home.z + (phase + n * 200.0).cos() * WOBBLE,
        )
    }

    /// Particle data for GPU upload; empty while hidden
    /// Format: position(3) + size(1) + alpha(1) + color(3) = 8 floats per sparkle
    pub fn particle_data(&self, time: f32) -> Vec<f32> {
        if !self.visible {
            return Vec::new();
        }

        let mut data = Vec::with_capacity(self.homes.len() * PARTICLE_STRIDE);
        for i in 0..self.homes.len() {
            push_particle(
                &mut data,
                self.position_at(i, time),
                self.params.size,
                self.params.opacity,
                self.color,
            );
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn field() -> SparkleField {
        let mut rng = StdRng::seed_from_u64(8);
        SparkleField::generate_with(&mut rng, SparkleParams::default(), Color::from_u32(0x10b981))
    }

    #[test]
    fn test_homes_inside_cube() {
        let f = field();
        assert_eq!(f.len(), 200);
        for i in 0..f.len() {
            let p = f.position_at(i, 0.0);
            for c in p.to_array() {
                assert!(c.abs() <= 7.5 + WOBBLE + 1e-4);
            }
        }
    }

    #[test]
    fn test_hidden_field_emits_nothing() {
        let mut f = field();
        assert_eq!(f.particle_data(1.0).len(), 200 * PARTICLE_STRIDE);
        f.set_visible(false);
        assert!(f.particle_data(1.0).is_empty());
    }

    #[test]
    fn test_wobble_is_bounded() {
        let f = field();
        let a = f.position_at(7, 0.0);
        for step in 0..100 {
            let p = f.position_at(7, step as f32 * 0.5);
            assert!(p.distance(&a) <= 3.0 * WOBBLE);
        }
    }

    #[test]
    fn test_color_and_opacity_in_data() {
        let f = field();
        let data = f.particle_data(0.0);
        assert!((data[4] - 0.3).abs() < 1e-6);
        let [r, g, b] = Color::from_u32(0x10b981).to_rgb_f32();
        assert_eq!(&data[5..8], &[r, g, b]);
    }
}
