use rand::Rng;
use crate::math::Vec3;
use super::cones::{sample_silhouette, RadialPlacement, TREE_SEGMENTS};

/// Parallel per-point arrays for one foliage layer.
///
/// Built once on mount and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct PointCloud {
    /// Assembled positions inside the tree silhouette
    pub targets: Vec<Vec3>,
    /// Dispersed positions inside the scatter sphere
    pub scatters: Vec<Vec3>,
    /// Per-point jitter seed in [0, 1)
    pub randoms: Vec<f32>,
}

impl PointCloud {
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Flat `xyz` target positions for a vertex buffer
    pub fn target_data(&self) -> Vec<f32> {
        self.targets.iter().flat_map(|v| v.to_array()).collect()
    }

    /// Flat `xyz` scatter positions for a vertex buffer
    pub fn scatter_data(&self) -> Vec<f32> {
        self.scatters.iter().flat_map(|v| v.to_array()).collect()
    }
}

/// Generate a foliage cloud with the thread-local (unseeded) generator.
///
/// `count` and `scatter_radius` are expected positive.
pub fn generate_cloud(count: usize, scatter_radius: f32) -> PointCloud {
    generate_cloud_with(&mut rand::thread_rng(), count, scatter_radius)
}

pub fn generate_cloud_with<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    scatter_radius: f32,
) -> PointCloud {
    let mut cloud = PointCloud {
        targets: Vec::with_capacity(count),
        scatters: Vec::with_capacity(count),
        randoms: Vec::with_capacity(count),
    };

    for _ in 0..count {
        cloud
            .targets
            .push(sample_silhouette(rng, &TREE_SEGMENTS, RadialPlacement::Volume));
        cloud.scatters.push(sample_in_sphere(rng, scatter_radius));
        cloud.randoms.push(rng.gen::<f32>());
    }

    cloud
}

/// Volume-uniform sample of a ball: uniform azimuth, `acos(2u - 1)` polar
/// angle and cube-root radius
pub fn sample_in_sphere<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let theta = rng.gen::<f32>() * std::f32::consts::TAU;
    let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
    let r = radius * rng.gen::<f32>().cbrt();

    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}
