use glam::Vec3;

use crate::math::hex_to_rgb;

/// Fixed scene lights - none of them animate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Uniform fill
    Ambient { color: [f32; 3], intensity: f32 },
    /// Parallel rays shining from `position` toward the origin
    Directional {
        color: [f32; 3],
        intensity: f32,
        position: Vec3,
        cast_shadow: bool,
    },
    /// Omni light fading to zero at `range`
    Point {
        color: [f32; 3],
        intensity: f32,
        position: Vec3,
        range: f32,
    },
}

impl Light {
    /// Fill, key and accent lights
    pub fn default_rig() -> Vec<Light> {
        vec![
            Light::Ambient {
                color: hex_to_rgb(0x6b7280),
                intensity: 0.4,
            },
            Light::Directional {
                color: hex_to_rgb(0xffffff),
                intensity: 0.8,
                position: Vec3::new(5.0, 10.0, 5.0),
                cast_shadow: true,
            },
            Light::Point {
                color: hex_to_rgb(0x667eea),
                intensity: 1.0,
                position: Vec3::new(0.0, 5.0, 5.0),
                range: 100.0,
            },
        ]
    }

    pub fn casts_shadow(&self) -> bool {
        matches!(self, Light::Directional { cast_shadow: true, .. })
    }
}
