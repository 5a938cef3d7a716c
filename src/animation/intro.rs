//! Keyframes for the intro: layers drop in with a bounce while the camera
//! glides down to its resting spot.

use std::f32::consts::PI;

use glam::Vec3;

use crate::camera::PerspectiveCamera;
use crate::core::staggered;
use crate::math::{ease_out_bounce, ease_out_quart};
use crate::scenes::Mountain;

pub const FALL_FROM: f32 = 10.0;
pub const FALL_DISTANCE: f32 = 12.0;
const TILT: f32 = PI * 0.1;
const WOBBLE: f32 = 0.02;

pub const CAMERA_START: Vec3 = Vec3::new(0.0, 15.0, 8.0);
pub const CAMERA_REST: Vec3 = Vec3::new(0.0, 5.0, 5.0);
pub const LOOK_TARGET: Vec3 = Vec3::new(0.0, -2.0, 0.0);

/// Progress of layer `index` once its start has been delayed by `stagger * index`
pub fn local_progress(progress: f32, index: usize, stagger: f32) -> f32 {
    staggered(progress, stagger * index as f32)
}

/// Height, tilt and wobble of layer `index` at the given point of the intro
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MountainPose {
    pub y: f32,
    pub rotation_x: f32,
    pub rotation_z: f32,
}

pub fn mountain_pose(index: usize, progress: f32, elapsed_ms: f64, stagger: f32) -> MountainPose {
    let eased = ease_out_bounce(local_progress(progress, index, stagger));
    let settle = 1.0 - eased;
    let phase = (elapsed_ms * 0.001 + index as f64).sin() as f32;

    MountainPose {
        y: FALL_FROM - eased * FALL_DISTANCE,
        rotation_x: TILT * settle,
        rotation_z: phase * WOBBLE * settle,
    }
}

/// Camera position for global `progress`; not staggered
pub fn camera_position(progress: f32) -> Vec3 {
    CAMERA_START.lerp(CAMERA_REST, ease_out_quart(progress))
}

pub fn apply(
    mountains: &mut [Mountain],
    camera: &mut PerspectiveCamera,
    progress: f32,
    elapsed_ms: f64,
    stagger: f32,
) {
    for mountain in mountains.iter_mut() {
        let pose = mountain_pose(mountain.index, progress, elapsed_ms, stagger);
        mountain.transform.position.y = pose.y;
        mountain.transform.rotation.x = pose.rotation_x;
        mountain.transform.rotation.z = pose.rotation_z;
    }

    camera.position = camera_position(progress);
    camera.look_at(LOOK_TARGET);
}
