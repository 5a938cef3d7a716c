//! Idle motion after the intro: slow float and a barely visible camera sway.

use crate::camera::PerspectiveCamera;
use crate::scenes::{Mountain, BASE_Y};

const TIME_SCALE: f64 = 5e-4;
const FLOAT: f64 = 0.1;
const SWAY_ROLL: f64 = 0.005;
const CAMERA_SWAY: f64 = 0.1;
const CAMERA_HEIGHT: f32 = 5.0;

/// Animation time for a wall-clock timestamp. Kept in f64: epoch-scale
/// milliseconds lose all sub-second precision in f32.
pub fn ambient_time(now_ms: f64) -> f64 {
    now_ms * TIME_SCALE
}

pub fn mountain_float(index: usize, time: f64) -> (f32, f32) {
    let i = index as f64;
    let y = BASE_Y + ((time + i).sin() * FLOAT) as f32;
    let roll = ((time * 0.5 + i).sin() * SWAY_ROLL) as f32;
    (y, roll)
}

pub fn camera_sway(time: f64) -> (f32, f32) {
    let x = ((time * 0.2).sin() * CAMERA_SWAY) as f32;
    let y = CAMERA_HEIGHT + ((time * 0.3).sin() * CAMERA_SWAY) as f32;
    (x, y)
}

/// Moves the camera without re-aiming it
pub fn apply(mountains: &mut [Mountain], camera: &mut PerspectiveCamera, now_ms: f64) {
    let time = ambient_time(now_ms);

    for mountain in mountains.iter_mut() {
        let (y, roll) = mountain_float(mountain.index, time);
        mountain.transform.position.y = y;
        mountain.transform.rotation.z = roll;
    }

    let (x, y) = camera_sway(time);
    camera.position.x = x;
    camera.position.y = y;
}
