use glam::{Mat4, Quat, Vec3};

use crate::types::CameraUniform;

/// Perspective camera. Orientation only changes through `look_at`; moving
/// the position afterwards keeps the camera aimed the same way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    rotation: Quat,
    target: Vec3,
    fov_y_degrees: f32,
    aspect: f32,
    near: f32,
    far: f32,
}

impl PerspectiveCamera {
    pub fn new(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            target: Vec3::NEG_Z,
            fov_y_degrees,
            aspect,
            near,
            far,
        }
    }

    /// Aim at `target` from the current position, keeping +Y up
    pub fn look_at(&mut self, target: Vec3) {
        let world = Mat4::look_at_rh(self.position, target, Vec3::Y).inverse();
        let (_, rotation, _) = world.to_scale_rotation_translation();
        self.rotation = rotation.normalize();
        self.target = target;
    }

    /// Point most recently passed to `look_at`
    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn fov_y_degrees(&self) -> f32 {
        self.fov_y_degrees
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn to_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_projection().to_cols_array_2d(),
            position: self.position.to_array(),
            _pad: 0.0,
        }
    }
}
