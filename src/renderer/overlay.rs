use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use wgpu::{CommandEncoder, Device, Queue, TextureFormat, TextureView};
use winit::window::Window;

use crate::core::{WallClock, WindowDimensions};
use crate::hero::HeroContent;

const TITLE_SIZE: f32 = 56.0;
const SUBTITLE_SIZE: f32 = 20.0;

/// Hero headline drawn with egui on top of the 3D frame
pub struct HeroOverlay {
    window: Arc<Window>,
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    hero: Rc<RefCell<HeroContent>>,
    clock: WallClock,
    pixels_per_point: f32,
}

impl HeroOverlay {
    pub fn new(
        window: Arc<Window>,
        device: &Device,
        format: TextureFormat,
        hero: Rc<RefCell<HeroContent>>,
        pixels_per_point: f32,
    ) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(pixels_per_point),
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(device, format, egui_wgpu::RendererOptions::default());

        Self {
            window,
            ctx,
            state,
            renderer,
            hero,
            clock: WallClock::new(),
            pixels_per_point,
        }
    }

    /// Forward a window event to egui. Returns true if egui consumed it.
    pub fn handle_event(&mut self, event: &winit::event::WindowEvent) -> bool {
        self.state.on_window_event(&self.window, event).consumed
    }

    pub fn set_pixels_per_point(&mut self, pixels_per_point: f32) {
        self.pixels_per_point = pixels_per_point;
    }

    pub fn draw(
        &mut self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        view: &TextureView,
        dimensions: WindowDimensions,
    ) {
        let ppp = self.pixels_per_point;
        let mut raw_input = self.state.take_egui_input(&self.window);
        // Lay out against the drawable, which may be smaller than the window
        raw_input.screen_rect = Some(egui::Rect::from_min_size(
            egui::Pos2::ZERO,
            egui::vec2(dimensions.width as f32 / ppp, dimensions.height as f32 / ppp),
        ));
        if let Some(viewport) = raw_input.viewports.get_mut(&egui::ViewportId::ROOT) {
            viewport.native_pixels_per_point = Some(ppp);
        }

        let style = self.hero.borrow().style_at(self.clock.now_ms());
        let (title, subtitle) = {
            let hero = self.hero.borrow();
            (hero.title.clone(), hero.subtitle.clone())
        };

        let full_output = self.ctx.run(raw_input, |ctx| {
            if style.opacity <= 0.0 {
                return;
            }
            let color = egui::Color32::WHITE.gamma_multiply(style.opacity);
            egui::Area::new(egui::Id::new("hero"))
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, style.offset_y))
                .interactable(false)
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.label(
                            egui::RichText::new(&title)
                                .size(TITLE_SIZE)
                                .strong()
                                .color(color),
                        );
                        ui.label(egui::RichText::new(&subtitle).size(SUBTITLE_SIZE).color(color));
                    });
                });
        });

        self.state
            .handle_platform_output(&self.window, full_output.platform_output);

        let tris = self.ctx.tessellate(full_output.shapes, ppp);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [dimensions.width, dimensions.height],
            pixels_per_point: ppp,
        };
        self.renderer
            .update_buffers(device, queue, encoder, &tris, &screen_descriptor);

        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Hero Overlay Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                })
                .forget_lifetime();
            self.renderer.render(&mut pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}
