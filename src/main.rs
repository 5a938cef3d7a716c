use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use mountain_intro::cli::Cli;
use mountain_intro::config::AnimationConfig;
use mountain_intro::core::{FpsCounter, WallClock, WindowDimensions};
use mountain_intro::hero::HeroContent;
use mountain_intro::renderer::{MountainRenderer, MAX_PIXEL_RATIO};
use mountain_intro::window::RedrawScheduler;
use mountain_intro::MountainIntro;

// === Constants ===

const FPS_UPDATE_INTERVAL: f32 = 1.0;
const INITIAL_WINDOW_WIDTH: u32 = 1280;
const INITIAL_WINDOW_HEIGHT: u32 = 720;

type Intro = MountainIntro<MountainRenderer, RedrawScheduler>;

// === Application ===

struct App {
    config: AnimationConfig,
    show_hero: bool,
    window: Option<Arc<Window>>,
    intro: Option<Intro>,
    clock: WallClock,
    fps: FpsCounter,
}

impl App {
    fn new(config: AnimationConfig, show_hero: bool) -> Self {
        Self {
            config,
            show_hero,
            window: None,
            intro: None,
            clock: WallClock::new(),
            fps: FpsCounter::new(FPS_UPDATE_INTERVAL),
        }
    }

    fn drawable_size(window: &Window) -> WindowDimensions {
        let size = window.inner_size();
        WindowDimensions::capped(size.width, size.height, window.scale_factor(), MAX_PIXEL_RATIO)
    }

    fn start(&self, window: Arc<Window>) -> Result<Intro> {
        let hero = Rc::new(RefCell::new(HeroContent::new(
            self.config.hero_title.clone(),
            self.config.hero_subtitle.clone(),
        )));
        let overlay = self.show_hero.then(|| hero.clone());

        let renderer = pollster::block_on(MountainRenderer::new(
            window.clone(),
            Self::drawable_size(&window),
            overlay,
        ))?;

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let intro = MountainIntro::new(
            &self.config,
            renderer,
            RedrawScheduler::new(window),
            &mut rng,
            self.clock.now_ms(),
        )?
        .on_complete(move |now_ms| hero.borrow_mut().reveal(now_ms));
        Ok(intro)
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(intro) = self.intro.as_mut() {
            intro.dispose();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title("Mountain Intro")
                .with_inner_size(winit::dpi::LogicalSize::new(
                    INITIAL_WINDOW_WIDTH,
                    INITIAL_WINDOW_HEIGHT,
                )),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        match self.start(window.clone()) {
            Ok(intro) => {
                self.window = Some(window);
                self.intro = Some(intro);
            }
            Err(e) => {
                log::error!("Failed to start animation: {:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui handle the event first
        if let Some(intro) = self.intro.as_mut() {
            if intro.target_mut().handle_event(&event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => self.shutdown(event_loop),
            WindowEvent::RedrawRequested => {
                let delta = self.clock.tick();
                if let Some(fps) = self.fps.record(delta) {
                    log::info!("FPS: {:.1}", fps);
                }

                if let Some(intro) = self.intro.as_mut() {
                    if intro.has_pending_frame() {
                        intro.tick(self.clock.now_ms());
                    }
                }
            }
            WindowEvent::Resized(_) => {
                if let (Some(intro), Some(window)) = (self.intro.as_mut(), &self.window) {
                    intro.resize(Self::drawable_size(window));
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let (Some(intro), Some(window)) = (self.intro.as_mut(), &self.window) {
                    intro.target_mut().set_scale_factor(scale_factor);
                    intro.resize(Self::drawable_size(window));
                }
            }
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AnimationConfig::resolve(&cli)?;
    log::info!(
        "Mountain Intro - {} layers over {} ms, Escape to quit",
        config.mountain_count,
        config.duration_ms
    );

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, !cli.no_ui);
    event_loop.run_app(&mut app)?;

    Ok(())
}
