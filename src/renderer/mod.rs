mod mesh;
mod overlay;
mod pipelines;

pub use mesh::GpuMesh;
pub use overlay::HeroOverlay;
pub use pipelines::{DEPTH_FORMAT, SHADOW_MAP_SIZE};

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::camera::PerspectiveCamera;
use crate::core::{GpuContext, RenderTarget, WindowDimensions};
use crate::hero::HeroContent;
use crate::scenes::{Canvas, Light, Scene};
use crate::types::{CameraUniform, LightUniform};
use pipelines::Layouts;

/// Device pixels per logical pixel never exceed this
pub const MAX_PIXEL_RATIO: f64 = 2.0;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// Half extent of the key light's orthographic shadow frustum
const SHADOW_EXTENT: f32 = 20.0;
const SHADOW_NEAR: f32 = 0.1;
const SHADOW_FAR: f32 = 60.0;

/// View-projection of the first shadow-casting directional light, looking at
/// the origin. Identity when no light casts shadows.
pub fn light_view_projection(lights: &[Light]) -> Mat4 {
    let Some(position) = lights.iter().find_map(|light| match *light {
        Light::Directional {
            position,
            cast_shadow: true,
            ..
        } => Some(position),
        _ => None,
    }) else {
        return Mat4::IDENTITY;
    };

    // Avoid a degenerate basis when the light sits straight above
    let up = if position.normalize_or_zero().dot(Vec3::Y).abs() > 0.99 {
        Vec3::Z
    } else {
        Vec3::Y
    };
    let view = Mat4::look_at_rh(position, Vec3::ZERO, up);
    let proj = Mat4::orthographic_rh(
        -SHADOW_EXTENT,
        SHADOW_EXTENT,
        -SHADOW_EXTENT,
        SHADOW_EXTENT,
        SHADOW_NEAR,
        SHADOW_FAR,
    );
    proj * view
}

struct BackdropTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// wgpu render target for the mountain scene.
///
/// Per-scene GPU data (meshes, backdrop texture) is uploaded on the first
/// frame that sees the scene, then only uniforms change per frame.
pub struct MountainRenderer {
    gpu: GpuContext,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    dimensions: WindowDimensions,
    layouts: Layouts,
    backdrop_pipeline: wgpu::RenderPipeline,
    shadow_pipeline: wgpu::RenderPipeline,
    mountain_pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    light_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    shadow_bind_group: wgpu::BindGroup,
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    shadow_texture: wgpu::Texture,
    shadow_view: wgpu::TextureView,
    backdrop_sampler: wgpu::Sampler,
    backdrop: Option<BackdropTexture>,
    meshes: Vec<GpuMesh>,
    overlay: Option<HeroOverlay>,
    released: bool,
}

impl MountainRenderer {
    /// Bind to `window` and allocate every fixed GPU resource.
    /// Without `hero` no overlay pass is recorded.
    pub async fn new(
        window: Arc<Window>,
        dimensions: WindowDimensions,
        hero: Option<Rc<RefCell<HeroContent>>>,
    ) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;
        let gpu = GpuContext::new_with_surface(&instance, &surface).await?;

        let config = Self::create_surface_config(&surface, gpu.adapter(), dimensions)?;
        surface.configure(gpu.device(), &config);

        let device = gpu.device();
        let layouts = Layouts::new(device);
        let backdrop_pipeline = pipelines::create_backdrop_pipeline(device, &layouts, config.format);
        let shadow_pipeline = pipelines::create_shadow_pipeline(device, &layouts);
        let mountain_pipeline = pipelines::create_mountain_pipeline(device, &layouts, config.format);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[CameraUniform {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
                position: [0.0; 3],
                _pad: 0.0,
            }]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let light_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Light Buffer"),
            contents: bytemuck::cast_slice(&[LightUniform::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let (depth_texture, depth_view) = pipelines::create_depth_texture(
            device,
            "Depth Texture",
            config.width,
            config.height,
        );
        let (shadow_texture, shadow_view) =
            pipelines::create_depth_texture(device, "Shadow Map", SHADOW_MAP_SIZE, SHADOW_MAP_SIZE);

        let shadow_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Shadow Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });
        let backdrop_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Backdrop Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &layouts.scene,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: light_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&shadow_view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&shadow_sampler),
                },
            ],
        });
        let shadow_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Shadow Bind Group"),
            layout: &layouts.shadow,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: light_buffer.as_entire_binding(),
            }],
        });

        let pixels_per_point = window.scale_factor().min(MAX_PIXEL_RATIO) as f32;
        let overlay = hero.map(|hero| {
            HeroOverlay::new(window.clone(), device, config.format, hero, pixels_per_point)
        });

        log::info!(
            "Renderer ready: {}x{} {:?}, shadow map {}",
            config.width,
            config.height,
            config.format,
            SHADOW_MAP_SIZE
        );

        Ok(Self {
            gpu,
            surface,
            config,
            dimensions,
            layouts,
            backdrop_pipeline,
            shadow_pipeline,
            mountain_pipeline,
            camera_buffer,
            light_buffer,
            scene_bind_group,
            shadow_bind_group,
            depth_texture,
            depth_view,
            shadow_texture,
            shadow_view,
            backdrop_sampler,
            backdrop: None,
            meshes: Vec::new(),
            overlay,
            released: false,
        })
    }

    fn create_surface_config(
        surface: &wgpu::Surface,
        adapter: &wgpu::Adapter,
        dimensions: WindowDimensions,
    ) -> Result<wgpu::SurfaceConfiguration> {
        let caps = surface.get_capabilities(adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow!("surface reports no supported formats"))?;

        Ok(wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: dimensions.width.max(1),
            height: dimensions.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        })
    }

    /// Let the overlay see input first. Returns true if it consumed the event.
    pub fn handle_event(&mut self, event: &winit::event::WindowEvent) -> bool {
        match self.overlay.as_mut() {
            Some(overlay) => overlay.handle_event(event),
            None => false,
        }
    }

    /// Follow a DPI change; the drawable size arrives separately via `resize`
    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.set_pixels_per_point(scale_factor.min(MAX_PIXEL_RATIO) as f32);
        }
    }

    /// Number of mountain meshes resident on the GPU
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    fn upload_backdrop(&self, canvas: &Canvas) -> BackdropTexture {
        let device = self.gpu.device();
        let (width, height) = canvas.dimensions();
        let texture = device.create_texture_with_data(
            self.gpu.queue(),
            &wgpu::TextureDescriptor {
                label: Some("Backdrop Texture"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            canvas.pixels(),
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Backdrop Bind Group"),
            layout: &self.layouts.backdrop,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.backdrop_sampler),
                },
            ],
        });
        BackdropTexture {
            texture,
            bind_group,
        }
    }

    fn sync_scene(&mut self, scene: &Scene) {
        if self.backdrop.is_none() {
            self.backdrop = Some(self.upload_backdrop(scene.backdrop()));
        }
        if self.meshes.is_empty() && !scene.mountains().is_empty() {
            let device = self.gpu.device();
            self.meshes = scene
                .mountains()
                .iter()
                .map(|mountain| GpuMesh::upload(device, &self.layouts.mesh, mountain))
                .collect();
            log::debug!("Uploaded {} mountain meshes", self.meshes.len());
        }
    }

    fn write_uniforms(&self, scene: &Scene, camera: &PerspectiveCamera) {
        let queue = self.gpu.queue();
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera.to_uniform()]),
        );
        let lights = LightUniform::from_lights(
            scene.lights(),
            light_view_projection(scene.lights()),
            SHADOW_MAP_SIZE,
        );
        queue.write_buffer(&self.light_buffer, 0, bytemuck::cast_slice(&[lights]));

        for mesh in &self.meshes {
            if let Some(mountain) = scene.mountains().get(mesh.index) {
                mesh.update(queue, mountain);
            }
        }
    }

    fn encode_shadow_pass(&self, encoder: &mut wgpu::CommandEncoder, casts_shadow: bool) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Shadow Pass"),
            color_attachments: &[],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.shadow_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        if !casts_shadow {
            return;
        }
        pass.set_pipeline(&self.shadow_pipeline);
        pass.set_bind_group(0, &self.shadow_bind_group, &[]);
        for mesh in &self.meshes {
            mesh.draw(&mut pass);
        }
    }

    fn encode_main_pass(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Main Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        if let Some(backdrop) = &self.backdrop {
            pass.set_pipeline(&self.backdrop_pipeline);
            pass.set_bind_group(0, &backdrop.bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        // Higher index sits further back; blend far layers first
        pass.set_pipeline(&self.mountain_pipeline);
        pass.set_bind_group(0, &self.scene_bind_group, &[]);
        for mesh in self.meshes.iter().rev() {
            mesh.draw(&mut pass);
        }
    }
}

impl RenderTarget for MountainRenderer {
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<()> {
        if self.released || self.dimensions.is_empty() {
            return Ok(());
        }
        self.sync_scene(scene);
        self.write_uniforms(scene, camera);

        let output = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(self.gpu.device(), &self.config);
                return Ok(());
            }
            Err(e) => return Err(anyhow!("failed to acquire frame: {}", e)),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        let casts_shadow = scene.lights().iter().any(Light::casts_shadow);
        self.encode_shadow_pass(&mut encoder, casts_shadow);
        self.encode_main_pass(&mut encoder, &view);

        if let Some(overlay) = self.overlay.as_mut() {
            overlay.draw(
                self.gpu.device(),
                self.gpu.queue(),
                &mut encoder,
                &view,
                self.dimensions,
            );
        }

        self.gpu.queue().submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn resize(&mut self, dimensions: WindowDimensions) {
        if self.released || dimensions.is_empty() {
            return;
        }
        self.dimensions = dimensions;
        self.config.width = dimensions.width;
        self.config.height = dimensions.height;
        self.surface.configure(self.gpu.device(), &self.config);

        self.depth_texture.destroy();
        let (texture, view) = pipelines::create_depth_texture(
            self.gpu.device(),
            "Depth Texture",
            dimensions.width,
            dimensions.height,
        );
        self.depth_texture = texture;
        self.depth_view = view;
        log::debug!("Resized to {}x{}", dimensions.width, dimensions.height);
    }

    fn dimensions(&self) -> WindowDimensions {
        self.dimensions
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        for mesh in self.meshes.drain(..) {
            mesh.destroy();
        }
        if let Some(backdrop) = self.backdrop.take() {
            backdrop.texture.destroy();
        }
        self.depth_texture.destroy();
        self.shadow_texture.destroy();
        self.camera_buffer.destroy();
        self.light_buffer.destroy();
        self.overlay = None;
        log::debug!("Renderer resources released");
    }
}
