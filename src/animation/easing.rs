//! Easing curves applied to blend progress

/// Easing function types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Easing {
    /// Linear interpolation
    Linear,
    /// Hermite `t²(3 - 2t)`; symmetric, flat at both ends
    #[default]
    SmoothStep,
}

/// Apply easing function to a value t, clamped to [0, 1]
pub fn ease(t: f32, easing: Easing) -> f32 {
    let t = t.clamp(0.0, 1.0);

    match easing {
        Easing::Linear => t,
        Easing::SmoothStep => t * t * (3.0 - 2.0 * t),
    }
}

/// Shorthand for [`Easing::SmoothStep`]
pub fn smoothstep(t: f32) -> f32 {
    ease(t, Easing::SmoothStep)
}
