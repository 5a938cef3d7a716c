use glam::Vec3;

use crate::math::srgb_to_linear;
use crate::scenes::{Light, Mountain, MountainGeometry};

/// Mesh vertex for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }

    /// Interleave positions and normals
    pub fn from_geometry(geometry: &MountainGeometry) -> Vec<Vertex> {
        geometry
            .positions()
            .iter()
            .zip(geometry.normals())
            .map(|(p, n)| Vertex {
                position: p.to_array(),
                normal: n.to_array(),
            })
            .collect()
    }
}

/// Camera uniform buffer data for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 3],
    pub _pad: f32,
}

/// Per-mountain uniform: model matrix and material
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshUniform {
    pub model: [[f32; 4]; 4],
    /// rgb + opacity
    pub color: [f32; 4],
}

impl MeshUniform {
    pub fn from_mountain(mountain: &Mountain) -> Self {
        let [r, g, b] = mountain.material.color;
        Self {
            model: mountain.transform.matrix().to_cols_array_2d(),
            color: [r, g, b, mountain.material.opacity],
        }
    }
}

/// Light rig uniform. Colours are linear and premultiplied by intensity.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub light_view_proj: [[f32; 4]; 4],
    pub ambient: [f32; 4],
    /// xyz = direction toward the light
    pub key_direction: [f32; 4],
    pub key_color: [f32; 4],
    /// xyz = position, w = range
    pub point_position: [f32; 4],
    pub point_color: [f32; 4],
    /// x = texel size, y = depth bias, z = 1 when shadows are on
    pub shadow: [f32; 4],
}

impl LightUniform {
    /// Pack the first light of each kind; extras are ignored
    pub fn from_lights(lights: &[Light], light_view_proj: glam::Mat4, shadow_map_size: u32) -> Self {
        let scale = |c: [f32; 3], i: f32| {
            [
                srgb_to_linear(c[0]) * i,
                srgb_to_linear(c[1]) * i,
                srgb_to_linear(c[2]) * i,
                0.0,
            ]
        };
        let mut uniform = LightUniform {
            light_view_proj: light_view_proj.to_cols_array_2d(),
            ..Default::default()
        };

        let mut seen_ambient = false;
        let mut seen_key = false;
        let mut seen_point = false;
        for light in lights {
            match *light {
                Light::Ambient { color, intensity } if !seen_ambient => {
                    uniform.ambient = scale(color, intensity);
                    seen_ambient = true;
                }
                Light::Directional {
                    color,
                    intensity,
                    position,
                    cast_shadow,
                } if !seen_key => {
                    let dir = position.try_normalize().unwrap_or(Vec3::Y);
                    uniform.key_direction = [dir.x, dir.y, dir.z, 0.0];
                    uniform.key_color = scale(color, intensity);
                    uniform.shadow = [
                        1.0 / shadow_map_size.max(1) as f32,
                        0.002,
                        if cast_shadow { 1.0 } else { 0.0 },
                        0.0,
                    ];
                    seen_key = true;
                }
                Light::Point {
                    color,
                    intensity,
                    position,
                    range,
                } if !seen_point => {
                    uniform.point_position = [position.x, position.y, position.z, range];
                    uniform.point_color = scale(color, intensity);
                    seen_point = true;
                }
                _ => {}
            }
        }
        uniform
    }
}
