//! Scene assembly: the composer plus the fixed stage around the tree

pub mod camera;
pub mod composer;
pub mod float;
pub mod lighting;

pub use camera::CameraRig;
pub use composer::{FrameOutput, InstanceBatch, SceneComposer, TopperState};
pub use float::{FloatMotion, FloatParams};
pub use lighting::{LightingRig, PointLight, PostSettings};
