use anyhow::Result;

use super::window::WindowDimensions;
use crate::camera::PerspectiveCamera;
use crate::scenes::Scene;

/// Rendering surface the animation draws into.
///
/// Implementations own every GPU resource they allocate and give all of it
/// back in `release`; after that, `render` must not draw.
pub trait RenderTarget {
    /// Draw one frame of the scene from the camera
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<()>;

    /// Match the drawable size to the viewport
    fn resize(&mut self, dimensions: WindowDimensions);

    /// Current drawable size
    fn dimensions(&self) -> WindowDimensions;

    /// Free all graphics resources
    fn release(&mut self);
}
