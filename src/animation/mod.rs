//! Shared easing, convergence math and frame timing for the morph animators

mod clock;
mod damping;
mod easing;

pub use clock::{FrameClock, FrameTime};
pub use damping::{approach, approach_factor, clamp_frame_delta, damp, MAX_FRAME_DELTA};
pub use easing::{ease, smoothstep, Easing};
