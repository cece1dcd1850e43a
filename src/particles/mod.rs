//! Point-based layers: the morphing foliage plus decorative sparkles and stars

pub mod foliage;
pub mod sparkles;
pub mod stars;

pub use foliage::{FoliageLayer, FoliageUniforms, FOLIAGE_POINT_COUNT};
pub use sparkles::{SparkleField, SparkleParams};
pub use stars::{StarField, StarParams};

use crate::math::{Color, Vec3};

/// Floats per decorative particle: position(3) + size(1) + alpha(1) + color(3)
pub const PARTICLE_STRIDE: usize = 8;

fn push_particle(data: &mut Vec<f32>, position: Vec3, size: f32, alpha: f32, color: Color) {
    let [r, g, b] = color.to_rgb_f32();
    data.extend_from_slice(&[position.x, position.y, position.z, size, alpha, r, g, b]);
}
