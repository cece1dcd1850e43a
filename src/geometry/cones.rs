use rand::Rng;
use crate::math::Vec3;

/// Amount every target Y is shifted down so the tree sits around the origin
pub const TREE_Y_OFFSET: f32 = 1.5;

/// One frustum slice of the tree silhouette
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeSegment {
    pub base_y: f32,
    pub height: f32,
    pub radius_bottom: f32,
    pub radius_top: f32,
}

impl ConeSegment {
    pub const fn new(base_y: f32, height: f32, radius_bottom: f32, radius_top: f32) -> Self {
        Self { base_y, height, radius_bottom, radius_top }
    }

    /// Radius at a fraction `t` of the segment height
    pub fn radius_at(&self, t: f32) -> f32 {
        self.radius_bottom + (self.radius_top - self.radius_bottom) * t
    }
}

/// Overlapping tiers from the base up to the tip
pub const TREE_SEGMENTS: [ConeSegment; 4] = [
    ConeSegment::new(0.0, 1.5, 1.8, 1.0),
    ConeSegment::new(1.2, 1.5, 1.4, 0.6),
    ConeSegment::new(2.2, 1.5, 1.0, 0.2),
    ConeSegment::new(3.2, 1.2, 0.6, 0.0),
];

/// Tiers that may hold ornaments; the tip is left to the topper
pub const ORNAMENT_SEGMENTS: &[ConeSegment] = &[
    TREE_SEGMENTS[0],
    TREE_SEGMENTS[1],
    TREE_SEGMENTS[2],
];

/// Where a sample lands across the disk at its height
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadialPlacement {
    /// `sqrt(u) * r`: area-uniform fill of the whole disk
    Volume,
    /// Exactly on the rim of the disk
    Surface,
}

/// Sample a point of the silhouette, already shifted by [`TREE_Y_OFFSET`]
pub fn sample_silhouette<R: Rng + ?Sized>(
    rng: &mut R,
    segments: &[ConeSegment],
    placement: RadialPlacement,
) -> Vec3 {
    let segment = &segments[rng.gen_range(0..segments.len())];

    let h = rng.gen::<f32>();
    let y = segment.base_y + h * segment.height;
    let radius = segment.radius_at(h);

    let angle = rng.gen::<f32>() * std::f32::consts::TAU;
    let r = match placement {
        RadialPlacement::Volume => rng.gen::<f32>().sqrt() * radius,
        RadialPlacement::Surface => radius,
    };

    Vec3::new(angle.cos() * r, y - TREE_Y_OFFSET, angle.sin() * r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Widest tier radius at world height `y` (0 outside the silhouette)
    fn envelope_radius(segments: &[ConeSegment], y: f32) -> f32 {
        let local_y = y + TREE_Y_OFFSET;
        segments
            .iter()
            .filter(|s| local_y >= s.base_y - 1e-4 && local_y <= s.base_y + s.height + 1e-4)
            .map(|s| s.radius_at(((local_y - s.base_y) / s.height).clamp(0.0, 1.0)))
            .fold(0.0, f32::max)
    }

    #[test]
    fn test_radius_interpolates() {
        let s = TREE_SEGMENTS[0];
        assert_eq!(s.radius_at(0.0), 1.8);
        assert!((s.radius_at(1.0) - 1.0).abs() < 1e-6);
        assert!((s.radius_at(0.5) - 1.4).abs() < 1e-6);
    }

    #[test]
    fn test_samples_stay_inside_envelope() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2000 {
            let p = sample_silhouette(&mut rng, &TREE_SEGMENTS, RadialPlacement::Volume);
            let r = (p.x * p.x + p.z * p.z).sqrt();
            assert!(r <= envelope_radius(&TREE_SEGMENTS, p.y) + 1e-4);
            assert!(p.y >= -TREE_Y_OFFSET - 1e-4 && p.y <= 4.4 - TREE_Y_OFFSET + 1e-4);
        }
    }

    #[test]
    fn test_surface_samples_on_rim() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let p = sample_silhouette(&mut rng, ORNAMENT_SEGMENTS, RadialPlacement::Surface);
            let r = (p.x * p.x + p.z * p.z).sqrt();
            // Rim of whichever tier produced it, so at least the smallest tier radius at that height
            assert!(r <= envelope_radius(ORNAMENT_SEGMENTS, p.y) + 1e-4);
            assert!(r >= 0.2 - 1e-4);
        }
    }

    #[test]
    fn test_ornament_tiers_exclude_tip() {
        let top = ORNAMENT_SEGMENTS
            .iter()
            .map(|s| s.base_y + s.height)
            .fold(0.0, f32::max);
        assert!((top - 3.7).abs() < 1e-6);
        assert_eq!(ORNAMENT_SEGMENTS.len(), 3);
    }
}
