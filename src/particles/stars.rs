//! Static background star shell

use rand::Rng;
use crate::math::{Color, Vec3};
use super::{push_particle, PARTICLE_STRIDE};

#[derive(Debug, Clone, Copy)]
pub struct StarParams {
    /// Inner radius of the shell
    pub radius: f32,
    /// Thickness of the shell
    pub depth: f32,
    pub count: usize,
    /// Size multiplier
    pub factor: f32,
    /// HSL saturation of the star colors (0 = white)
    pub saturation: f32,
    /// Soft-edged sprites
    pub fade: bool,
    /// Twinkle speed
    pub speed: f32,
}

impl Default for StarParams {
    fn default() -> Self {
        Self {
            radius: 100.0,
            depth: 50.0,
            count: 5000,
            factor: 4.0,
            saturation: 0.0,
            fade: true,
            speed: 1.0,
        }
    }
}

/// Star positions and colors, generated once
#[derive(Debug, Clone)]
pub struct StarField {
    params: StarParams,
    data: Vec<f32>,
    time: f32,
}

impl StarField {
    pub fn new(params: StarParams) -> Self {
        Self::generate_with(&mut rand::thread_rng(), params)
    }

    /// Stars are laid out from the outer edge inward, each one a random
    /// step closer than the last
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R, params: StarParams) -> Self {
        let mut data = Vec::with_capacity(params.count * PARTICLE_STRIDE);
        let mut r = params.radius + params.depth;
        let increment = params.depth / params.count.max(1) as f32;

        for i in 0..params.count {
            r -= increment * rng.gen::<f32>();

            let polar = (1.0 - rng.gen::<f32>() * 2.0).acos();
            let azimuth = rng.gen::<f32>() * std::f32::consts::TAU;
            let position = Vec3::new(
                r * polar.sin() * azimuth.sin(),
                r * polar.cos(),
                r * polar.sin() * azimuth.cos(),
            );

            let hue = i as f32 / params.count as f32;
            let color = hsl_to_rgb(hue, params.saturation, 0.9);
            let size = (0.5 + 0.5 * rng.gen::<f32>()) * params.factor;

            push_particle(&mut data, position, size, 1.0, color);
        }

        Self { params, data, time: 0.0 }
    }

    pub fn params(&self) -> &StarParams {
        &self.params
    }

    pub fn update(&mut self, dt: f32) {
        self.time += dt * self.params.speed;
    }

    /// Size multiplier for the shader: slow global twinkle
    pub fn twinkle(&self) -> f32 {
        30.0 * (3.0 + (self.time + 100.0).sin())
    }

    /// Particle data in the shared 8-float layout
    pub fn particle_data(&self) -> &[f32] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len() / PARTICLE_STRIDE
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// HSL to RGB conversion, all channels in [0, 1]
fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Color {
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    let channel = |t: f32| {
        let t = t.rem_euclid(1.0);
        let v = if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * 6.0 * (2.0 / 3.0 - t)
        } else {
            p
        };
        (v.clamp(0.0, 1.0) * 255.0).round() as u8
    };

    Color::rgb8(channel(h + 1.0 / 3.0), channel(h), channel(h - 1.0 / 3.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_stars_inside_shell() {
        let mut rng = StdRng::seed_from_u64(4);
        let stars = StarField::generate_with(&mut rng, StarParams::default());
        assert_eq!(stars.len(), 5000);

        for chunk in stars.particle_data().chunks_exact(PARTICLE_STRIDE) {
            let r = Vec3::new(chunk[0], chunk[1], chunk[2]).length();
            assert!(r >= 100.0 - 1e-2 && r <= 150.0 + 1e-2, "radius {r}");
            assert!(chunk[3] >= 2.0 && chunk[3] <= 4.0);
        }
    }

    #[test]
    fn test_zero_saturation_is_grey() {
        let c = hsl_to_rgb(0.37, 0.0, 0.9);
        assert_eq!(c.r, c.g);
        assert_eq!(c.g, c.b);
        assert!((229..=230).contains(&c.r));
    }

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), Color::rgb8(255, 0, 0));
        assert_eq!(hsl_to_rgb(1.0 / 3.0, 1.0, 0.5), Color::rgb8(0, 255, 0));
    }

    #[test]
    fn test_twinkle_advances_with_speed() {
        let mut stars = StarField::generate_with(&mut StdRng::seed_from_u64(1), StarParams {
            count: 10,
            ..Default::default()
        });
        let before = stars.twinkle();
        stars.update(0.5);
        assert_ne!(before, stars.twinkle());
        assert!(stars.twinkle() >= 60.0 && stars.twinkle() <= 120.0);
    }
}
