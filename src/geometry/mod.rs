//! Procedural layouts for the two morph endpoints
//!
//! Every layer gets a pair of position sets: where an element sits on the
//! assembled tree and where it floats in the scattered cloud.

pub mod cloud;
pub mod cones;
pub mod slots;

pub use cloud::{generate_cloud, generate_cloud_with, sample_in_sphere, PointCloud};
pub use cones::{ConeSegment, RadialPlacement, ORNAMENT_SEGMENTS, TREE_SEGMENTS, TREE_Y_OFFSET};
pub use slots::{generate_ornament_slots, generate_ornament_slots_with, OrnamentSlot};
