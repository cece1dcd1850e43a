//! Fixed lighting and post-processing setup handed to the renderer

use crate::config::TreeConfig;
use crate::math::{Color, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub intensity: f32,
    /// Range beyond which the light contributes nothing (0 = unbounded)
    pub distance: f32,
    pub decay: f32,
    pub color: Color,
}

impl PointLight {
    /// Warm light carried by the topper star
    pub fn star() -> Self {
        Self {
            position: Vec3::ZERO,
            intensity: 3.0,
            distance: 6.0,
            decay: 2.0,
            color: Color::from_u32(0xFDB813),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    pub position: Vec3,
    /// Cone half-angle in radians
    pub angle: f32,
    pub penumbra: f32,
    pub intensity: f32,
    pub color: Color,
    pub cast_shadow: bool,
    pub shadow_bias: f32,
}

/// Key, fill and ambient lights of the stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingRig {
    pub ambient_intensity: f32,
    pub key: SpotLight,
    pub fill: PointLight,
}

impl Default for LightingRig {
    fn default() -> Self {
        Self {
            ambient_intensity: 0.2,
            key: SpotLight {
                position: Vec3::new(10.0, 10.0, 10.0),
                angle: 0.15,
                penumbra: 1.0,
                intensity: 1.5,
                color: Color::from_u32(0xfff8e7),
                cast_shadow: true,
                shadow_bias: -0.0001,
            },
            fill: PointLight {
                position: Vec3::new(-10.0, -10.0, -10.0),
                intensity: 0.5,
                distance: 0.0,
                decay: 2.0,
                color: Color::from_u32(0x064e3b),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomSettings {
    pub luminance_threshold: f32,
    pub radius: f32,
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VignetteSettings {
    pub offset: f32,
    pub darkness: f32,
}

/// Post stack: bloom, film grain, vignette
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostSettings {
    pub bloom: BloomSettings,
    pub noise_opacity: f32,
    pub vignette: VignetteSettings,
    pub exposure: f32,
    pub clear_color: Color,
}

impl PostSettings {
    /// Bloom is brighter with the lights on
    pub fn for_config(config: &TreeConfig) -> Self {
        Self {
            bloom: BloomSettings {
                luminance_threshold: 1.2,
                radius: 0.6,
                intensity: if config.lights_on { 1.5 } else { 0.4 },
            },
            noise_opacity: 0.05,
            vignette: VignetteSettings {
                offset: 0.1,
                darkness: 1.1,
            },
            exposure: 1.5,
            clear_color: Color::from_u32(0x050505),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bloom_follows_lights() {
        let mut config = TreeConfig::default();
        assert_eq!(PostSettings::for_config(&config).bloom.intensity, 1.5);
        config.lights_on = false;
        assert_eq!(PostSettings::for_config(&config).bloom.intensity, 0.4);
    }

    #[test]
    fn test_star_light() {
        let light = PointLight::star();
        assert_eq!(light.intensity, 3.0);
        assert_eq!(light.color.to_hex(), "#fdb813");
    }
}
