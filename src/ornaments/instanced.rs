//! Instanced ornament populations
//!
//! Unlike the foliage there is no shared progress: every instance chases its
//! own destination with a first-order approach, so the ornaments arrive one
//! by one instead of in lockstep.

use crate::animation::{approach, FrameTime};
use crate::config::TreeConfig;
use crate::geometry::{generate_ornament_slots, OrnamentSlot};
use crate::math::{Color, Euler, Mat4, Vec3};

/// Half-extent of the scatter cube
pub const ORNAMENT_SCATTER_RADIUS: f32 = 15.0;
/// Scale multiplier applied while scattered
const SCATTERED_SCALE: f32 = 0.8;
/// Spin rate while hanging on the tree
const ASSEMBLED_SPIN: f32 = 0.5;
/// Tilt amplitude while hanging on the tree
const ASSEMBLED_TILT: f32 = 0.1;

/// Mesh shape of a population
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrnamentKind {
    /// Gift box, edge 0.25
    Box,
    /// Bauble, radius 0.15
    Sphere,
}

/// One population of identically shaped, identically colored ornaments
#[derive(Debug, Clone)]
pub struct OrnamentPopulation {
    kind: OrnamentKind,
    count: usize,
    /// Approach rate; higher converges faster and reads as lighter
    lag: f32,
    color: Color,
    slots: Vec<OrnamentSlot>,
    positions: Vec<Vec3>,
    rotations: Vec<Euler>,
    scales: Vec<f32>,
    /// 16 floats per instance, column-major
    matrices: Vec<f32>,
    dirty: bool,
}

impl OrnamentPopulation {
    /// `count` and `lag` are expected positive
    pub fn new(kind: OrnamentKind, count: usize, lag: f32, color: Color) -> Self {
        Self {
            kind,
            count,
            lag,
            color,
            slots: Vec::new(),
            positions: Vec::new(),
            rotations: Vec::new(),
            scales: Vec::new(),
            matrices: Vec::new(),
            dirty: false,
        }
    }

    /// Generate slots once; repeated calls keep the existing layout
    pub fn on_create(&mut self) {
        if self.slots.is_empty() {
            self.mount(generate_ornament_slots(self.count, ORNAMENT_SCATTER_RADIUS));
        }
    }

    /// Mount with pre-built slots. Every instance starts at its scatter position.
    pub fn mount(&mut self, slots: Vec<OrnamentSlot>) {
        log::debug!("{:?} ornaments mounted: {} instances, lag {}", self.kind, slots.len(), self.lag);
        self.count = slots.len();
        self.positions = slots.iter().map(|s| s.scatter).collect();
        self.rotations = vec![Euler::default(); slots.len()];
        self.scales = slots.iter().map(|s| s.scale * SCATTERED_SCALE).collect();
        self.matrices = vec![0.0; slots.len() * 16];
        self.slots = slots;
        self.write_matrices();
    }

    pub fn on_destroy(&mut self) {
        self.slots.clear();
        self.positions.clear();
        self.rotations.clear();
        self.scales.clear();
        self.matrices.clear();
        self.dirty = false;
    }

    pub fn kind(&self) -> OrnamentKind {
        self.kind
    }

    pub fn lag(&self) -> f32 {
        self.lag
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn slots(&self) -> &[OrnamentSlot] {
        &self.slots
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn rotations(&self) -> &[Euler] {
        &self.rotations
    }

    pub fn scales(&self) -> &[f32] {
        &self.scales
    }

    /// Where instance `i` is heading under the given state
    pub fn destination(&self, i: usize, is_assembled: bool) -> Vec3 {
        let slot = &self.slots[i];
        if is_assembled {
            slot.target
        } else {
            slot.scatter
        }
    }

    pub fn update(&mut self, config: &TreeConfig, frame: FrameTime) {
        let assembled = config.is_assembled;
        let dt = frame.delta;

        for (i, slot) in self.slots.iter().enumerate() {
            let destination = if assembled { slot.target } else { slot.scatter };
            self.positions[i] = approach(self.positions[i], destination, dt, self.lag);

            let direction = if i % 2 == 0 { 1.0 } else { -1.0 };
            let rotation = &mut self.rotations[i];
            if assembled {
                rotation.y += dt * ASSEMBLED_SPIN * direction;
                rotation.x = (frame.elapsed + i as f32).sin() * ASSEMBLED_TILT;
            } else {
                rotation.x += dt * direction;
                rotation.z += dt * direction;
            }

            self.scales[i] = slot.scale * if assembled { 1.0 } else { SCATTERED_SCALE };
        }

        self.write_matrices();
        self.dirty = true;
    }

    fn write_matrices(&mut self) {
        for (i, chunk) in self.matrices.chunks_exact_mut(16).enumerate() {
            let m = Mat4::compose(self.positions[i], self.rotations[i], Vec3::splat(self.scales[i]));
            chunk.copy_from_slice(m.as_slice());
        }
    }

    /// Per-instance transforms, 16 floats each
    pub fn instance_matrices(&self) -> &[f32] {
        &self.matrices
    }

    /// True once after each update: the instance buffer must be re-uploaded
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::generate_ornament_slots_with;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn population(lag: f32) -> OrnamentPopulation {
        let mut rng = StdRng::seed_from_u64(5);
        let mut pop = OrnamentPopulation::new(OrnamentKind::Sphere, 0, lag, Color::WHITE);
        pop.mount(generate_ornament_slots_with(&mut rng, 12, ORNAMENT_SCATTER_RADIUS));
        pop
    }

    fn config(assembled: bool) -> TreeConfig {
        TreeConfig { is_assembled: assembled, ..Default::default() }
    }

    #[test]
    fn test_starts_scattered() {
        let pop = population(3.0);
        for (pos, slot) in pop.positions().iter().zip(pop.slots()) {
            assert_eq!(*pos, slot.scatter);
        }
    }

    #[test]
    fn test_converges_monotonically_without_overshoot() {
        let mut pop = population(1.5);
        let cfg = config(true);
        let dt = 1.0 / 60.0;
        let mut prev: Vec<f32> = (0..pop.len())
            .map(|i| pop.positions()[i].distance(&pop.destination(i, true)))
            .collect();

        for frame in 1..=900 {
            pop.update(&cfg, FrameTime::new(frame as f32 * dt, dt));
            for i in 0..pop.len() {
                let d = pop.positions()[i].distance(&pop.destination(i, true));
                assert!(d <= prev[i] + 1e-5, "instance {i} moved away");
                prev[i] = d;
            }
        }
        assert!(prev.iter().all(|&d| d < 1e-3), "not converged: {:?}", prev);
    }

    #[test]
    fn test_lighter_population_arrives_first() {
        let mut heavy = population(1.5);
        let mut light = population(3.0);
        let cfg = config(true);
        for frame in 1..=30 {
            let t = FrameTime::new(frame as f32 / 60.0, 1.0 / 60.0);
            heavy.update(&cfg, t);
            light.update(&cfg, t);
        }
        let remaining = |p: &OrnamentPopulation| {
            (0..p.len())
                .map(|i| p.positions()[i].distance(&p.destination(i, true)))
                .sum::<f32>()
        };
        assert!(remaining(&light) < remaining(&heavy));
    }

    #[test]
    fn test_flip_mid_flight_is_continuous() {
        let mut pop = population(3.0);
        let dt = 1.0 / 60.0;
        for frame in 1..=20 {
            pop.update(&config(true), FrameTime::new(frame as f32 * dt, dt));
        }
        let before: Vec<Vec3> = pop.positions().to_vec();
        pop.update(&config(false), FrameTime::new(21.0 * dt, dt));

        for (i, prev) in before.iter().enumerate() {
            let step = pop.positions()[i].distance(prev);
            let bound = dt * pop.lag() * prev.distance(&pop.destination(i, false));
            assert!(step <= bound + 1e-4, "instance {i} jumped {step} > {bound}");
        }
    }

    #[test]
    fn test_rotation_regimes() {
        let mut pop = population(3.0);
        pop.update(&config(false), FrameTime::new(0.1, 0.1));
        let r0 = pop.rotations()[0];
        let r1 = pop.rotations()[1];
        assert!((r0.x - 0.1).abs() < 1e-6 && (r0.z - 0.1).abs() < 1e-6);
        assert!((r1.x + 0.1).abs() < 1e-6 && (r1.z + 0.1).abs() < 1e-6);

        pop.update(&config(true), FrameTime::new(0.2, 0.1));
        let r0 = pop.rotations()[0];
        let r1 = pop.rotations()[1];
        assert!((r0.y - 0.05).abs() < 1e-6);
        assert!((r1.y + 0.05).abs() < 1e-6);
        assert!((r1.x - (0.2f32 + 1.0).sin() * 0.1).abs() < 1e-6);
        // Tumble angle on z is kept, not smoothed away
        assert!((r0.z - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_scale_switches_instantly() {
        let mut pop = population(3.0);
        pop.update(&config(true), FrameTime::new(0.016, 0.016));
        for (scale, slot) in pop.scales().iter().zip(pop.slots()) {
            assert_eq!(*scale, slot.scale);
        }
        pop.update(&config(false), FrameTime::new(0.032, 0.016));
        for (scale, slot) in pop.scales().iter().zip(pop.slots()) {
            assert!((*scale - slot.scale * 0.8).abs() < 1e-6);
        }
    }

    #[test]
    fn test_dirty_flag_set_once_per_update() {
        let mut pop = population(1.5);
        assert!(!pop.take_dirty());
        pop.update(&config(true), FrameTime::new(0.016, 0.016));
        assert!(pop.take_dirty());
        assert!(!pop.take_dirty());
    }

    #[test]
    fn test_matrices_carry_positions() {
        let mut pop = population(1.5);
        pop.update(&config(true), FrameTime::new(0.016, 0.016));
        let m = pop.instance_matrices();
        assert_eq!(m.len(), pop.len() * 16);
        let p = pop.positions()[3];
        assert_eq!(&m[3 * 16 + 12..3 * 16 + 15], &p.to_array());
    }

    #[test]
    fn test_huge_delta_never_overshoots() {
        let mut pop = population(3.0);
        pop.update(&config(true), FrameTime::new(10.0, 10.0));
        for i in 0..pop.len() {
            assert!(pop.positions()[i].distance(&pop.destination(i, true)) < 1e-4);
        }
    }

    #[test]
    fn test_lifecycle() {
        let mut pop = OrnamentPopulation::new(OrnamentKind::Box, 30, 1.5, Color::WHITE);
        assert!(pop.is_empty());
        pop.on_create();
        assert_eq!(pop.len(), 30);
        let slots = pop.slots().to_vec();
        pop.on_create();
        assert_eq!(pop.slots(), &slots[..]);
        pop.on_destroy();
        assert!(pop.is_empty() && pop.instance_matrices().is_empty());
    }
}
