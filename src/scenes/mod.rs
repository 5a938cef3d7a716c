mod backdrop;
mod lights;
mod mountains;

pub use backdrop::{gradient_backdrop, Canvas, BACKDROP_SIZE};
pub use lights::Light;
pub use mountains::{
    amplitude, compute_vertex_normals, ridge_profile, Material, Mountain, MountainGeometry,
    SilhouetteParams, Transform, BASE_Y, DEPTH_SPACING, INITIAL_TILT, SPAWN_HEIGHT, SPAWN_SPREAD,
};

use rand::Rng;

use crate::config::AnimationConfig;

/// Ownership root for everything drawn: backdrop, mountain layers and lights
pub struct Scene {
    backdrop: Canvas,
    mountains: Vec<Mountain>,
    lights: Vec<Light>,
}

impl Scene {
    /// Generate the backdrop, `mountain_count` layers and the light rig
    pub fn build<R: Rng>(config: &AnimationConfig, rng: &mut R) -> Self {
        let (top, bottom) = config.backdrop_colors();
        let palette = config.palette_rgb();
        let params = SilhouetteParams {
            half_width: config.half_width,
            segments: config.segments,
        };

        let mountains: Vec<Mountain> = (0..config.mountain_count)
            .map(|index| Mountain::spawn(index, params, &palette, &mut *rng))
            .collect();

        for mountain in &mountains {
            log::debug!(
                "Mountain {}: z={} start_y={:.2} opacity={:.2} peak={:.2}",
                mountain.index,
                mountain.transform.position.z,
                mountain.transform.position.y,
                mountain.material.opacity,
                mountain.geometry.peak(),
            );
        }

        Self {
            backdrop: gradient_backdrop(top, bottom),
            mountains,
            lights: Light::default_rig(),
        }
    }

    pub fn backdrop(&self) -> &Canvas {
        &self.backdrop
    }

    /// Layers in index order, which is also back-to-front draw order
    pub fn mountains(&self) -> &[Mountain] {
        &self.mountains
    }

    pub fn mountains_mut(&mut self) -> &mut [Mountain] {
        &mut self.mountains
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Drop every mesh and material; returns how many layers were released
    pub fn release(&mut self) -> usize {
        let released = self.mountains.len();
        self.mountains = Vec::new();
        self.lights = Vec::new();
        self.backdrop = Canvas::new(0, 0);
        released
    }

    pub fn is_empty(&self) -> bool {
        self.mountains.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn scene(count: usize) -> Scene {
        let config = AnimationConfig {
            mountain_count: count,
            ..Default::default()
        };
        Scene::build(&config, &mut StdRng::seed_from_u64(11))
    }

    #[test]
    fn test_build_creates_every_layer() {
        let scene = scene(5);
        assert_eq!(scene.mountains().len(), 5);
        assert_eq!(scene.lights().len(), 3);
        assert_eq!(scene.backdrop().dimensions(), (BACKDROP_SIZE, BACKDROP_SIZE));
    }

    #[test]
    fn test_layers_recede_with_index() {
        let scene = scene(5);
        let depths: Vec<f32> = scene.mountains().iter().map(|m| m.transform.position.z).collect();
        assert_eq!(depths, vec![0.0, -2.0, -4.0, -6.0, -8.0]);
    }

    #[test]
    fn test_palette_cycles() {
        let scene = scene(7);
        let mountains = scene.mountains();
        assert_eq!(mountains[5].material.color, mountains[0].material.color);
        assert_eq!(mountains[6].material.color, mountains[1].material.color);
    }

    #[test]
    fn test_release_empties_scene() {
        let mut scene = scene(5);
        assert_eq!(scene.release(), 5);
        assert!(scene.is_empty());
        assert!(scene.lights().is_empty());
        assert_eq!(scene.release(), 0);
    }
}
