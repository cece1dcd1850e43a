//! Rigid ornaments: the instanced gift/bauble populations and the star topper

pub mod instanced;
pub mod topper;

pub use instanced::{OrnamentKind, OrnamentPopulation, ORNAMENT_SCATTER_RADIUS};
pub use topper::{pulse_scale, Topper, TOPPER_COLOR, TOPPER_RADIUS};
