//! Scene composition
//!
//! Owns every animated layer, threads the shared configuration through them
//! each frame and collects what the renderer needs into a [`FrameOutput`].

use rand::Rng;
use crate::animation::FrameTime;
use crate::config::TreeConfig;
use crate::geometry::{generate_cloud_with, generate_ornament_slots_with};
use crate::math::{Color, Euler, Mat4, Vec3};
use crate::ornaments::{OrnamentKind, OrnamentPopulation, Topper, ORNAMENT_SCATTER_RADIUS};
use crate::particles::foliage::FOLIAGE_SCATTER_RADIUS;
use crate::particles::{
    FoliageLayer, FoliageUniforms, SparkleField, SparkleParams, StarField, StarParams,
    FOLIAGE_POINT_COUNT,
};
use super::float::{FloatMotion, FloatParams};
use super::lighting::{LightingRig, PointLight, PostSettings};

const BODY_OPACITY: f32 = 0.9;
const GLOW_OPACITY: f32 = 0.4;

const GIFT_COUNT: usize = 30;
const GIFT_LAG: f32 = 1.5;
const BAUBLE_COUNT: usize = 60;
const BAUBLE_LAG: f32 = 3.0;

/// Slow cinematic spin of the whole tree, rad/s
const GROUP_SPIN: f32 = 0.05;

/// Instance buffer of one ornament population
#[derive(Debug, Clone, Copy)]
pub struct InstanceBatch<'a> {
    pub kind: OrnamentKind,
    pub color: Color,
    pub matrices: &'a [f32],
    /// The matrices changed since the last snapshot
    pub dirty: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct TopperState {
    pub transform: Mat4,
    pub emissive_intensity: f32,
    pub light: Option<PointLight>,
}

/// Everything the renderer reads for one frame
#[derive(Debug, Clone)]
pub struct FrameOutput<'a> {
    /// Float sway times group spin, applied to every tree layer
    pub group: Mat4,
    pub body: FoliageUniforms,
    pub glow: FoliageUniforms,
    pub gifts: InstanceBatch<'a>,
    pub baubles: InstanceBatch<'a>,
    pub topper: TopperState,
    /// Empty while particles are switched off
    pub sparkles: Vec<f32>,
    pub stars: &'a [f32],
    pub star_twinkle: f32,
    pub lighting: LightingRig,
    pub post: PostSettings,
}

pub struct SceneComposer {
    body: FoliageLayer,
    glow: FoliageLayer,
    gifts: OrnamentPopulation,
    baubles: OrnamentPopulation,
    topper: Topper,
    sparkles: SparkleField,
    stars: StarField,
    float: FloatMotion,
    lighting: LightingRig,
    foliage_points: usize,
    group_rotation_y: f32,
    elapsed: f32,
}

impl SceneComposer {
    pub fn new(config: &TreeConfig) -> Self {
        Self::with_rng(&mut rand::thread_rng(), config)
    }

    /// Build the layers; tree geometry is generated later by `on_create`
    pub fn with_rng<R: Rng + ?Sized>(rng: &mut R, config: &TreeConfig) -> Self {
        let palette = config.palette();
        let offset = rng.gen::<f32>() * 10_000.0;

        Self {
            body: FoliageLayer::new(palette.body, BODY_OPACITY),
            glow: FoliageLayer::new(palette.glow, GLOW_OPACITY),
            gifts: OrnamentPopulation::new(
                OrnamentKind::Box,
                GIFT_COUNT,
                GIFT_LAG,
                config.theme.gift_color(),
            ),
            baubles: OrnamentPopulation::new(
                OrnamentKind::Sphere,
                BAUBLE_COUNT,
                BAUBLE_LAG,
                palette.ornament,
            ),
            topper: Topper::new(),
            sparkles: SparkleField::generate_with(rng, SparkleParams::default(), palette.glow),
            stars: StarField::generate_with(rng, StarParams::default()),
            float: FloatMotion::with_offset(FloatParams::default(), offset),
            lighting: LightingRig::default(),
            foliage_points: FOLIAGE_POINT_COUNT,
            group_rotation_y: 0.0,
            elapsed: 0.0,
        }
    }

    /// Override the per-layer foliage point count (expected positive)
    pub fn with_foliage_points(mut self, count: usize) -> Self {
        self.foliage_points = count;
        self
    }

    pub fn on_create(&mut self) {
        self.on_create_with(&mut rand::thread_rng());
    }

    /// Generate all tree geometry. Each layer gets its own independent layout.
    pub fn on_create_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if !self.body.is_mounted() {
            self.body
                .mount(generate_cloud_with(rng, self.foliage_points, FOLIAGE_SCATTER_RADIUS));
        }
        if !self.glow.is_mounted() {
            self.glow
                .mount(generate_cloud_with(rng, self.foliage_points, FOLIAGE_SCATTER_RADIUS));
        }
        if self.gifts.is_empty() {
            self.gifts
                .mount(generate_ornament_slots_with(rng, GIFT_COUNT, ORNAMENT_SCATTER_RADIUS));
        }
        if self.baubles.is_empty() {
            self.baubles
                .mount(generate_ornament_slots_with(rng, BAUBLE_COUNT, ORNAMENT_SCATTER_RADIUS));
        }
        log::info!(
            "scene mounted: {} foliage points, {} ornaments",
            self.foliage_points * 2,
            self.gifts.len() + self.baubles.len()
        );
    }

    pub fn on_destroy(&mut self) {
        self.body.on_destroy();
        self.glow.on_destroy();
        self.gifts.on_destroy();
        self.baubles.on_destroy();
        self.topper = Topper::new();
        log::info!("scene unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.body.is_mounted()
    }

    /// Advance every layer by one frame. Colors are re-read from the palette
    /// so a theme switch lands within a single frame.
    pub fn update(&mut self, config: &TreeConfig, frame: FrameTime) {
        let palette = config.palette();
        self.body.set_color(palette.body);
        self.glow.set_color(palette.glow);
        self.gifts.set_color(config.theme.gift_color());
        self.baubles.set_color(palette.ornament);
        self.sparkles.set_color(palette.glow);
        self.sparkles.set_visible(config.show_particles);

        self.body.update(config, frame);
        self.glow.update(config, frame);
        self.gifts.update(config, frame);
        self.baubles.update(config, frame);
        self.topper.update(config, frame);
        self.stars.update(frame.delta);

        self.group_rotation_y = frame.elapsed * GROUP_SPIN;
        self.float.update(frame.elapsed, config.is_assembled);
        self.elapsed = frame.elapsed;
    }

    /// World transform of the tree group
    pub fn group_transform(&self) -> Mat4 {
        self.float
            .transform()
            .mul(&Mat4::compose(Vec3::ZERO, Euler::new(0.0, self.group_rotation_y, 0.0), Vec3::ONE))
    }

    pub fn group_rotation_y(&self) -> f32 {
        self.group_rotation_y
    }

    pub fn body(&self) -> &FoliageLayer {
        &self.body
    }

    pub fn glow(&self) -> &FoliageLayer {
        &self.glow
    }

    pub fn gifts(&self) -> &OrnamentPopulation {
        &self.gifts
    }

    pub fn baubles(&self) -> &OrnamentPopulation {
        &self.baubles
    }

    pub fn topper(&self) -> &Topper {
        &self.topper
    }

    pub fn sparkles(&self) -> &SparkleField {
        &self.sparkles
    }

    pub fn stars(&self) -> &StarField {
        &self.stars
    }

    /// Snapshot for the renderer. Clears the ornament dirty flags.
    pub fn output(&mut self, config: &TreeConfig) -> FrameOutput<'_> {
        let group = self.group_transform();
        let gifts_dirty = self.gifts.take_dirty();
        let baubles_dirty = self.baubles.take_dirty();

        FrameOutput {
            group,
            body: self.body.uniforms(),
            glow: self.glow.uniforms(),
            gifts: InstanceBatch {
                kind: self.gifts.kind(),
                color: self.gifts.color(),
                matrices: self.gifts.instance_matrices(),
                dirty: gifts_dirty,
            },
            baubles: InstanceBatch {
                kind: self.baubles.kind(),
                color: self.baubles.color(),
                matrices: self.baubles.instance_matrices(),
                dirty: baubles_dirty,
            },
            topper: TopperState {
                transform: self.topper.transform(),
                emissive_intensity: self.topper.emissive_intensity(),
                light: self.topper.light(),
            },
            sparkles: self.sparkles.particle_data(self.elapsed),
            stars: self.stars.particle_data(),
            star_twinkle: self.stars.twinkle(),
            lighting: self.lighting,
            post: PostSettings::for_config(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ControlAction, Theme, GIFT_RED};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn composer(config: &TreeConfig) -> SceneComposer {
        let mut rng = StdRng::seed_from_u64(21);
        let mut scene = SceneComposer::with_rng(&mut rng, config).with_foliage_points(200);
        scene.on_create_with(&mut rng);
        scene
    }

    #[test]
    fn test_mount_populates_layers() {
        let scene = composer(&TreeConfig::default());
        assert!(scene.is_mounted());
        assert_eq!(scene.body().cloud().map(|c| c.len()), Some(200));
        assert_eq!(scene.gifts().len(), 30);
        assert_eq!(scene.baubles().len(), 60);
        assert_eq!(scene.gifts().lag(), 1.5);
        assert_eq!(scene.baubles().lag(), 3.0);
    }

    #[test]
    fn test_theme_switch_recolors_without_moving() {
        let mut config = TreeConfig::default();
        let mut scene = composer(&config);
        scene.update(&config, FrameTime::new(1.0, 0.016));

        let progress = scene.body().progress();
        let positions = scene.body().positions();
        assert_eq!(scene.body().color().to_hex(), "#022c22");

        config.apply(ControlAction::SetTheme(Theme::Sapphire));
        scene.update(&config, FrameTime::new(1.0, 0.0));

        assert_eq!(scene.body().color().to_hex(), "#0f172a");
        assert_eq!(scene.glow().color().to_hex(), "#3b82f6");
        assert!((scene.body().progress() - progress).abs() < 1e-6);
        for (a, b) in scene.body().positions().iter().zip(&positions) {
            assert!(a.distance(b) < 1e-4);
        }
    }

    #[test]
    fn test_gift_color_follows_theme() {
        let mut config = TreeConfig::default();
        let mut scene = composer(&config);
        scene.update(&config, FrameTime::new(0.1, 0.1));
        assert_eq!(scene.gifts().color(), GIFT_RED);
        assert_eq!(scene.baubles().color().to_hex(), "#ffd700");

        config.apply(ControlAction::SetTheme(Theme::Ruby));
        scene.update(&config, FrameTime::new(0.2, 0.1));
        assert_eq!(scene.gifts().color().to_hex(), "#fbbf24");
        assert_eq!(scene.gifts().color(), scene.baubles().color());
    }

    #[test]
    fn test_sparkles_follow_particle_toggle() {
        let mut config = TreeConfig::default();
        let mut scene = composer(&config);
        scene.update(&config, FrameTime::new(0.1, 0.1));
        assert!(!scene.output(&config).sparkles.is_empty());

        config.apply(ControlAction::ToggleParticles);
        scene.update(&config, FrameTime::new(0.2, 0.1));
        assert!(!scene.sparkles().is_visible());
        assert!(scene.output(&config).sparkles.is_empty());
    }

    #[test]
    fn test_group_rotation_tracks_elapsed() {
        let config = TreeConfig::default();
        let mut scene = composer(&config);
        scene.update(&config, FrameTime::new(20.0, 0.016));
        assert!((scene.group_rotation_y() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_float_frozen_while_scattered() {
        let mut config = TreeConfig::default();
        let mut scene = composer(&config);
        config.is_assembled = false;

        scene.update(&config, FrameTime::new(1.0, 0.016));
        let a = scene.float.transform();
        scene.update(&config, FrameTime::new(2.0, 0.016));
        assert_eq!(scene.float.transform(), a);
    }

    #[test]
    fn test_dirty_flags_cleared_by_snapshot() {
        let config = TreeConfig::default();
        let mut scene = composer(&config);
        scene.update(&config, FrameTime::new(0.1, 0.1));

        let out = scene.output(&config);
        assert!(out.gifts.dirty && out.baubles.dirty);
        assert_eq!(out.gifts.matrices.len(), 30 * 16);

        let again = scene.output(&config);
        assert!(!again.gifts.dirty && !again.baubles.dirty);
    }

    #[test]
    fn test_topper_light_in_snapshot() {
        let mut config = TreeConfig::default();
        let mut scene = composer(&config);
        scene.update(&config, FrameTime::new(0.1, 0.1));
        assert!(scene.output(&config).topper.light.is_some());

        config.apply(ControlAction::ToggleLights);
        scene.update(&config, FrameTime::new(0.2, 0.1));
        let out = scene.output(&config);
        assert!(out.topper.light.is_none());
        assert_eq!(out.post.bloom.intensity, 0.4);
    }

    #[test]
    fn test_destroy_releases_geometry() {
        let config = TreeConfig::default();
        let mut scene = composer(&config);
        scene.on_destroy();
        assert!(!scene.is_mounted());
        assert!(scene.gifts().is_empty());
    }
}
