use std::f32::consts::{PI, TAU};

use glam::{EulerRot, Mat4, Vec3};
use rand::Rng;

/// Y coordinate of every silhouette's flat bottom edge
pub const BASE_Y: f32 = -2.0;
/// Resting tilt before the fall (radians)
pub const INITIAL_TILT: f32 = PI * 0.1;
/// Start heights are drawn from [SPAWN_HEIGHT, SPAWN_HEIGHT + SPAWN_SPREAD)
pub const SPAWN_HEIGHT: f32 = 10.0;
pub const SPAWN_SPREAD: f32 = 5.0;
pub const DEPTH_SPACING: f32 = 2.0;
const JITTER: f32 = 0.25;

/// Silhouette shape shared by all layers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SilhouetteParams {
    pub half_width: f32,
    pub segments: u32,
}

impl Default for SilhouetteParams {
    fn default() -> Self {
        Self {
            half_width: 10.0,
            segments: 50,
        }
    }
}

/// Peak amplitude grows with depth so far ranges look taller
pub fn amplitude(index: usize) -> f32 {
    3.0 + 0.5 * index as f32
}

/// Ridge height at `t` in [0, 1] before jitter: three sine harmonics
pub fn ridge_profile(t: f32, amplitude: f32) -> f32 {
    amplitude * (TAU * t).sin()
        + 0.3 * amplitude * (3.0 * TAU * t).sin()
        + 0.1 * amplitude * (7.0 * TAU * t).sin()
}

/// Indexed triangle mesh for one mountain layer
#[derive(Debug, Clone)]
pub struct MountainGeometry {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    indices: Vec<u32>,
}

impl MountainGeometry {
    /// Build the silhouette strip for layer `index`.
    ///
    /// Each of the `segments + 1` samples contributes a ridge vertex followed
    /// by a base vertex, so vertex `2i` is on the ridge and `2i + 1` on the base.
    pub fn generate<R: Rng>(index: usize, params: SilhouetteParams, rng: &mut R) -> Self {
        let segments = params.segments;
        let width = params.half_width * 2.0;
        let amp = amplitude(index);

        let positions: Vec<Vec3> = (0..=segments)
            .flat_map(|i| {
                let t = i as f32 / segments as f32;
                let x = t * width - params.half_width;
                let height = ridge_profile(t, amp) + rng.random_range(-JITTER..JITTER);
                [Vec3::new(x, height, 0.0), Vec3::new(x, BASE_Y, 0.0)]
            })
            .collect();

        let indices: Vec<u32> = (0..segments)
            .flat_map(|i| {
                let base = i * 2;
                [base, base + 2, base + 1, base + 1, base + 2, base + 3]
            })
            .collect();

        let normals = compute_vertex_normals(&positions, &indices);

        Self {
            positions,
            normals,
            indices,
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Highest ridge point
    pub fn peak(&self) -> f32 {
        self.positions
            .iter()
            .step_by(2)
            .map(|p| p.y)
            .fold(f32::NEG_INFINITY, f32::max)
    }
}

/// Area-weighted vertex normals: each face adds its unnormalised normal to its
/// three corners. Vertices whose contributions cancel fall back to +Z.
pub fn compute_vertex_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }

    normals
        .into_iter()
        .map(|n| {
            let n = n.normalize_or_zero();
            if n == Vec3::ZERO {
                Vec3::Z
            } else {
                n
            }
        })
        .collect()
}

/// Surface appearance - always alpha blended
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: [f32; 3],
    pub opacity: f32,
}

impl Material {
    /// Cyclic palette colour; opacity fades with depth.
    ///
    /// Not clamped: past index 8 the opacity goes negative.
    pub fn for_layer(index: usize, palette: &[[f32; 3]]) -> Self {
        let color = if palette.is_empty() {
            [0.5, 0.5, 0.5]
        } else {
            palette[index % palette.len()]
        };
        Self {
            color,
            opacity: 0.8 - 0.1 * index as f32,
        }
    }
}

/// Position plus XYZ Euler rotation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }
}

/// One depth layer of the range
#[derive(Debug, Clone)]
pub struct Mountain {
    pub index: usize,
    pub geometry: MountainGeometry,
    pub material: Material,
    pub transform: Transform,
}

impl Mountain {
    /// Generate layer `index`, parked above the view and tilted
    pub fn spawn<R: Rng>(
        index: usize,
        params: SilhouetteParams,
        palette: &[[f32; 3]],
        rng: &mut R,
    ) -> Self {
        let geometry = MountainGeometry::generate(index, params, rng);
        let start_y = SPAWN_HEIGHT + rng.random_range(0.0..SPAWN_SPREAD);

        Self {
            index,
            geometry,
            material: Material::for_layer(index, palette),
            transform: Transform {
                position: Vec3::new(0.0, start_y, -DEPTH_SPACING * index as f32),
                rotation: Vec3::new(INITIAL_TILT, 0.0, 0.0),
            },
        }
    }
}
