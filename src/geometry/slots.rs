use rand::Rng;
use crate::math::Vec3;
use super::cones::{sample_silhouette, RadialPlacement, ORNAMENT_SEGMENTS};

/// Fixed placement data for one ornament instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrnamentSlot {
    /// On the rim of one of the lower three tiers
    pub target: Vec3,
    /// Inside the cube `[-r, r]³`
    pub scatter: Vec3,
    /// Base scale in [0.5, 1.0)
    pub scale: f32,
}

/// Generate ornament slots with the thread-local (unseeded) generator.
///
/// `count` and `scatter_radius` are expected positive.
pub fn generate_ornament_slots(count: usize, scatter_radius: f32) -> Vec<OrnamentSlot> {
    generate_ornament_slots_with(&mut rand::thread_rng(), count, scatter_radius)
}

pub fn generate_ornament_slots_with<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    scatter_radius: f32,
) -> Vec<OrnamentSlot> {
    (0..count)
        .map(|_| {
            let target = sample_silhouette(rng, ORNAMENT_SEGMENTS, RadialPlacement::Surface);
            let scatter = Vec3::new(
                (rng.gen::<f32>() - 0.5) * scatter_radius * 2.0,
                (rng.gen::<f32>() - 0.5) * scatter_radius * 2.0,
                (rng.gen::<f32>() - 0.5) * scatter_radius * 2.0,
            );
            let scale = 0.5 + rng.gen::<f32>() * 0.5;

            OrnamentSlot { target, scatter, scale }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::cones::TREE_Y_OFFSET;

    #[test]
    fn test_thirty_slots_in_bounds() {
        let slots = generate_ornament_slots(30, 15.0);
        assert_eq!(slots.len(), 30);

        for slot in &slots {
            assert!(slot.scale >= 0.5 && slot.scale < 1.0, "scale {}", slot.scale);
            for c in slot.scatter.to_array() {
                assert!((-15.0..=15.0).contains(&c), "scatter component {c}");
            }
        }
    }

    #[test]
    fn test_targets_below_tip() {
        let slots = generate_ornament_slots(200, 15.0);
        // Third tier tops out at 3.7 before the vertical shift
        assert!(slots.iter().all(|s| s.target.y <= 3.7 - TREE_Y_OFFSET + 1e-4));
        assert!(slots.iter().all(|s| s.target.y >= -TREE_Y_OFFSET - 1e-4));
    }
}
