pub mod ambient;
pub mod intro;

use anyhow::Result;
use rand::Rng;

use crate::camera::PerspectiveCamera;
use crate::config::{AnimationConfig, MAX_VISIBLE_MOUNTAINS};
use crate::core::{FrameHandle, FrameScheduler, RenderTarget, Timeline, WindowDimensions};
use crate::scenes::Scene;

pub const FOV_Y_DEGREES: f32 = 75.0;
pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 1000.0;

/// Which loop drives the next frame. Intro hands over to ambient exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Intro,
    Ambient,
}

/// What a call to `tick` did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tick {
    /// No frame was pending, or the controller is disposed
    Skipped,
    /// Intro frame drawn at this progress
    Intro(f32),
    /// Final intro frame drawn; ambient starts with the next frame
    Completed,
    Ambient,
}

type CompletionHook = Box<dyn FnOnce(f64)>;

/// Timed reveal animation controller.
///
/// Owns the scene, camera and render target. Frames are driven by the host:
/// every frame the controller asks for via its scheduler should be answered
/// with one call to [`MountainIntro::tick`].
pub struct MountainIntro<T: RenderTarget, S: FrameScheduler> {
    scene: Scene,
    camera: PerspectiveCamera,
    target: T,
    scheduler: S,
    timeline: Timeline,
    stagger: f32,
    phase: Phase,
    pending: Option<FrameHandle>,
    stopped: bool,
    on_complete: Option<CompletionHook>,
    frames: u64,
}

impl<T: RenderTarget, S: FrameScheduler> MountainIntro<T, S> {
    /// Build the scene and draw the first intro frame at `start_ms`.
    ///
    /// The render target must already be bound to its surface; a host without
    /// one should not construct the controller at all.
    pub fn new<R: Rng>(
        config: &AnimationConfig,
        target: T,
        scheduler: S,
        rng: &mut R,
        start_ms: f64,
    ) -> Result<Self> {
        config.validate()?;
        if config.mountain_count > MAX_VISIBLE_MOUNTAINS {
            log::warn!(
                "{} mountains requested; layers past {} get negative opacity",
                config.mountain_count,
                MAX_VISIBLE_MOUNTAINS
            );
        }

        let scene = Scene::build(config, rng);

        let mut camera =
            PerspectiveCamera::new(FOV_Y_DEGREES, target.dimensions().aspect(), NEAR, FAR);
        camera.position = intro::CAMERA_START;
        camera.look_at(glam::Vec3::ZERO);

        log::info!(
            "Mountain intro: {} layers, {} ms intro",
            scene.mountains().len(),
            config.duration_ms
        );

        let mut animation = Self {
            scene,
            camera,
            target,
            scheduler,
            timeline: Timeline::start(start_ms, config.duration_ms),
            stagger: config.stagger,
            phase: Phase::Intro,
            pending: None,
            stopped: false,
            on_complete: None,
            frames: 0,
        };
        animation.run_frame(start_ms);
        Ok(animation)
    }

    /// Register the one-shot action run when the intro finishes; it receives
    /// the timestamp of the final intro frame.
    pub fn on_complete(mut self, hook: impl FnOnce(f64) + 'static) -> Self {
        self.on_complete = Some(Box::new(hook));
        self
    }

    /// Answer a frame request. Does nothing unless a frame is pending.
    pub fn tick(&mut self, now_ms: f64) -> Tick {
        if self.stopped || self.pending.take().is_none() {
            return Tick::Skipped;
        }
        self.run_frame(now_ms)
    }

    fn run_frame(&mut self, now_ms: f64) -> Tick {
        match self.phase {
            Phase::Intro => {
                let progress = self.timeline.advance(now_ms);
                intro::apply(
                    self.scene.mountains_mut(),
                    &mut self.camera,
                    progress,
                    self.timeline.elapsed_ms(now_ms),
                    self.stagger,
                );
                self.render();

                if self.timeline.is_complete() {
                    self.complete(now_ms);
                    Tick::Completed
                } else {
                    self.schedule();
                    Tick::Intro(progress)
                }
            }
            Phase::Ambient => {
                ambient::apply(self.scene.mountains_mut(), &mut self.camera, now_ms);
                self.render();
                self.schedule();
                Tick::Ambient
            }
        }
    }

    fn complete(&mut self, now_ms: f64) {
        self.phase = Phase::Ambient;
        log::info!("Intro finished after {} frames", self.frames);
        if let Some(hook) = self.on_complete.take() {
            hook(now_ms);
        }
        self.schedule();
    }

    fn render(&mut self) {
        self.frames += 1;
        if let Err(e) = self.target.render(&self.scene, &self.camera) {
            log::error!("Render error: {:#}", e);
        }
    }

    fn schedule(&mut self) {
        self.pending = Some(self.scheduler.request_frame());
    }

    /// Keep projection and drawable size in step with the viewport.
    /// Ignored after disposal and for empty (minimised) windows.
    pub fn resize(&mut self, dimensions: WindowDimensions) {
        if self.stopped {
            return;
        }
        if dimensions.is_empty() {
            log::warn!("Ignoring resize to {}x{}", dimensions.width, dimensions.height);
            return;
        }
        self.camera.set_aspect(dimensions.aspect());
        self.target.resize(dimensions);
    }

    /// Stop animating and release every resource. Safe to call in either
    /// phase and more than once.
    pub fn dispose(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.on_complete = None;

        let released = self.scene.release();
        self.target.release();
        log::info!(
            "Mountain intro disposed in {:?} phase after {} frames ({} layers released)",
            self.phase,
            self.frames,
            released
        );
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn progress(&self) -> f32 {
        self.timeline.progress()
    }

    pub fn is_disposed(&self) -> bool {
        self.stopped
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending.is_some()
    }

    /// Frames drawn so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

impl<T: RenderTarget, S: FrameScheduler> Drop for MountainIntro<T, S> {
    fn drop(&mut self) {
        self.dispose();
    }
}
