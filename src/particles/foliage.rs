//! Morphing foliage point cloud
//!
//! The whole layer shares one `progress` scalar that is damped toward 1
//! (assembled) or 0 (scattered). Each point blends between its scatter and
//! target positions with the eased progress, then picks up a breathing
//! wobble near full assembly and a turbulence drift that fades out as the
//! tree comes together.

use crate::animation::{damp, ease, Easing, FrameTime};
use crate::config::TreeConfig;
use crate::geometry::{generate_cloud, PointCloud};
use crate::math::{Color, Vec3};

/// Points per foliage layer
pub const FOLIAGE_POINT_COUNT: usize = 15_000;
/// Radius of the scatter sphere
pub const FOLIAGE_SCATTER_RADIUS: f32 = 12.0;
/// Time constant of the progress damping
pub const PROGRESS_DAMPING: f32 = 2.0;

/// Eased weight above which the breathing wobble kicks in
const BREATHE_THRESHOLD: f32 = 0.8;
/// Base point size before distance attenuation
const BASE_POINT_SIZE: f32 = 25.0;

/// Uniform block consumed by the foliage shader
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoliageUniforms {
    pub time: f32,
    pub progress: f32,
    pub color: Color,
    pub alpha: f32,
}

/// One foliage layer: fixed color and opacity, shared progress
#[derive(Debug, Clone)]
pub struct FoliageLayer {
    cloud: Option<PointCloud>,
    point_count: usize,
    scatter_radius: f32,
    easing: Easing,
    progress: f32,
    time: f32,
    color: Color,
    opacity: f32,
}

impl FoliageLayer {
    pub fn new(color: Color, opacity: f32) -> Self {
        Self {
            cloud: None,
            point_count: FOLIAGE_POINT_COUNT,
            scatter_radius: FOLIAGE_SCATTER_RADIUS,
            easing: Easing::SmoothStep,
            progress: 0.0,
            time: 0.0,
            color,
            opacity,
        }
    }

    /// Override the point count (expected positive)
    pub fn with_point_count(mut self, count: usize) -> Self {
        self.point_count = count;
        self
    }

    /// Generate the fixed arrays. Repeated calls keep the existing layout.
    pub fn on_create(&mut self) {
        if self.cloud.is_none() {
            self.mount(generate_cloud(self.point_count, self.scatter_radius));
        }
    }

    /// Mount with a pre-built cloud
    pub fn mount(&mut self, cloud: PointCloud) {
        log::debug!("foliage layer {} mounted with {} points", self.color, cloud.len());
        self.point_count = cloud.len();
        self.cloud = Some(cloud);
    }

    /// Release the fixed arrays and reset the morph
    pub fn on_destroy(&mut self) {
        self.cloud = None;
        self.progress = 0.0;
        self.time = 0.0;
    }

    pub fn is_mounted(&self) -> bool {
        self.cloud.is_some()
    }

    pub fn cloud(&self) -> Option<&PointCloud> {
        self.cloud.as_ref()
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Color is an input re-read from the palette each frame
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Blend weight actually applied to positions
    pub fn eased_progress(&self) -> f32 {
        ease(self.progress, self.easing)
    }

    /// Damp progress toward the state selected by `is_assembled`
    pub fn update(&mut self, config: &TreeConfig, frame: FrameTime) {
        let target = if config.is_assembled { 1.0 } else { 0.0 };
        self.progress = damp(self.progress, target, PROGRESS_DAMPING, frame.delta);
        self.time = frame.elapsed;
    }

    pub fn uniforms(&self) -> FoliageUniforms {
        FoliageUniforms {
            time: self.time,
            progress: self.progress,
            color: self.color,
            alpha: self.opacity,
        }
    }

    /// Current position of every point (empty before mount)
    pub fn positions(&self) -> Vec<Vec3> {
        let Some(cloud) = &self.cloud else {
            return Vec::new();
        };
        let e = self.eased_progress();

        cloud
            .targets
            .iter()
            .zip(&cloud.scatters)
            .zip(&cloud.randoms)
            .map(|((target, scatter), &random)| {
                morph_position(*scatter, *target, random, e, self.time)
            })
            .collect()
    }
}

/// Plain blend between scatter (`e = 0`) and target (`e = 1`), in the same
/// weighted form as GLSL `mix` so both endpoints are exact
pub fn blend_position(scatter: Vec3, target: Vec3, e: f32) -> Vec3 {
    scatter * (1.0 - e) + target * e
}

/// Breathing displacement, only near full assembly
pub fn breathe_offset(pos: Vec3, e: f32, time: f32) -> Vec3 {
    if e <= BREATHE_THRESHOLD {
        return Vec3::ZERO;
    }
    let breathe = (time * 2.0 + pos.y * 2.0).sin() * 0.02;
    Vec3::new(breathe * pos.x, 0.0, breathe * pos.z)
}

/// Turbulent drift, scaled by `1 - e` so it is exactly zero when assembled
pub fn turbulence_offset(random: f32, e: f32, time: f32) -> Vec3 {
    if e >= 1.0 {
        return Vec3::ZERO;
    }
    let scatter_weight = 1.0 - e;
    Vec3::new(
        (time * 0.3 + random * 5.0).cos() * 0.2 * scatter_weight,
        (time * 0.5 + random * 10.0).sin() * 0.5 * scatter_weight,
        0.0,
    )
}

/// Full per-point morph: blend, then breathing, then turbulence
pub fn morph_position(scatter: Vec3, target: Vec3, random: f32, e: f32, time: f32) -> Vec3 {
    let mut pos = blend_position(scatter, target, e);
    pos += breathe_offset(pos, e, time);
    pos += turbulence_offset(random, e, time);
    pos
}

/// Rendered point size for a point `view_depth` units in front of the camera
pub fn point_size(e: f32, view_depth: f32) -> f32 {
    BASE_POINT_SIZE * (1.0 + e * 0.5) / view_depth.max(f32::EPSILON)
}
