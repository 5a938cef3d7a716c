use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

use mountain_intro::animation::{MountainIntro, Phase, Tick};
use mountain_intro::camera::PerspectiveCamera;
use mountain_intro::config::AnimationConfig;
use mountain_intro::core::{QueuedScheduler, RenderTarget, WindowDimensions};
use mountain_intro::scenes::Scene;

const EPS: f32 = 1e-4;

/// Everything the controller asked the target to do
#[derive(Debug, Default)]
struct TargetLog {
    renders: usize,
    /// Height of layer 0 and the camera at each render
    mountain0_y: Vec<f32>,
    camera_y: Vec<f32>,
    resizes: Vec<WindowDimensions>,
    releases: usize,
}

/// Recording render target - shares its log so it can be inspected after drop
struct MockTarget {
    log: Rc<RefCell<TargetLog>>,
    dimensions: WindowDimensions,
}

impl MockTarget {
    fn new() -> (Self, Rc<RefCell<TargetLog>>) {
        let log = Rc::new(RefCell::new(TargetLog::default()));
        (
            Self {
                log: log.clone(),
                dimensions: WindowDimensions::new(1280, 720),
            },
            log,
        )
    }
}

impl RenderTarget for MockTarget {
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<()> {
        let mut log = self.log.borrow_mut();
        log.renders += 1;
        if let Some(first) = scene.mountains().first() {
            log.mountain0_y.push(first.transform.position.y);
        }
        log.camera_y.push(camera.position.y);
        Ok(())
    }

    fn resize(&mut self, dimensions: WindowDimensions) {
        self.dimensions = dimensions;
        self.log.borrow_mut().resizes.push(dimensions);
    }

    fn dimensions(&self) -> WindowDimensions {
        self.dimensions
    }

    fn release(&mut self) {
        self.log.borrow_mut().releases += 1;
    }
}

/// Target whose every frame fails
struct FailingTarget;

impl RenderTarget for FailingTarget {
    fn render(&mut self, _scene: &Scene, _camera: &PerspectiveCamera) -> Result<()> {
        anyhow::bail!("device lost")
    }

    fn resize(&mut self, _dimensions: WindowDimensions) {}

    fn dimensions(&self) -> WindowDimensions {
        WindowDimensions::new(800, 600)
    }

    fn release(&mut self) {}
}

type Intro = MountainIntro<MockTarget, QueuedScheduler>;

fn start_at(start_ms: f64) -> (Intro, Rc<RefCell<TargetLog>>) {
    let (target, log) = MockTarget::new();
    let mut rng = StdRng::seed_from_u64(42);
    let intro = MountainIntro::new(
        &AnimationConfig::default(),
        target,
        QueuedScheduler::new(),
        &mut rng,
        start_ms,
    )
    .expect("default config is valid");
    (intro, log)
}

/// Fire the oldest requested frame, as a host would
fn step(intro: &mut Intro, now_ms: f64) -> Tick {
    intro.scheduler_mut().take_next();
    intro.tick(now_ms)
}

// ============================================================================
// Start
// ============================================================================

#[test]
fn test_first_frame_rendered_on_construction() {
    let (intro, log) = start_at(0.0);

    assert_eq!(log.borrow().renders, 1);
    assert_eq!(intro.phase(), Phase::Intro);
    assert_eq!(intro.progress(), 0.0);
    assert!(intro.has_pending_frame());
    assert_eq!(intro.scheduler().pending(), 1);
}

#[test]
fn test_zero_ms_scenario() {
    let (intro, log) = start_at(0.0);

    let first = &intro.scene().mountains()[0];
    assert!((first.transform.position.y - 10.0).abs() < EPS);
    assert!((intro.camera().position.y - 15.0).abs() < EPS);
    assert!((intro.camera().position.z - 8.0).abs() < EPS);
    assert!((log.borrow().mountain0_y[0] - 10.0).abs() < EPS);
    assert!((log.borrow().camera_y[0] - 15.0).abs() < EPS);
}

#[test]
fn test_invalid_config_rejected() {
    let (target, _log) = MockTarget::new();
    let config = AnimationConfig {
        mountain_count: 0,
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(1);
    let result = MountainIntro::new(&config, target, QueuedScheduler::new(), &mut rng, 0.0);
    assert!(result.is_err());
}

#[test]
fn test_camera_aspect_from_target() {
    let (intro, _log) = start_at(0.0);
    assert!((intro.camera().aspect() - 1280.0 / 720.0).abs() < EPS);
}

// ============================================================================
// Intro timeline
// ============================================================================

#[test]
fn test_progress_tracks_elapsed_time() {
    let (mut intro, _log) = start_at(1000.0);

    assert_eq!(step(&mut intro, 1500.0), Tick::Intro(0.25));
    assert_eq!(step(&mut intro, 2000.0), Tick::Intro(0.5));
}

#[test]
fn test_progress_monotone_and_clamped() {
    let (mut intro, _log) = start_at(0.0);

    step(&mut intro, 1000.0);
    assert_eq!(intro.progress(), 0.5);

    // A clock stepping backwards never rewinds the intro
    step(&mut intro, 400.0);
    assert_eq!(intro.progress(), 0.5);

    step(&mut intro, 1e9);
    assert_eq!(intro.progress(), 1.0);
}

#[test]
fn test_layers_start_in_index_order() {
    let (mut intro, _log) = start_at(0.0);

    // progress 0.05: layer 0 is falling, layer 1 has not started
    step(&mut intro, 100.0);
    let mountains = intro.scene().mountains();
    assert!(mountains[0].transform.position.y < 10.0);
    assert!((mountains[1].transform.position.y - 10.0).abs() < EPS);
    assert!((mountains[4].transform.position.y - 10.0).abs() < EPS);
}

#[test]
fn test_all_layers_land_at_full_progress() {
    let (mut intro, _log) = start_at(0.0);

    step(&mut intro, 2000.0);
    for mountain in intro.scene().mountains() {
        assert!(
            (mountain.transform.position.y + 2.0).abs() < EPS,
            "layer {} at {}",
            mountain.index,
            mountain.transform.position.y
        );
        assert!(mountain.transform.rotation.x.abs() < EPS);
        assert!(mountain.transform.rotation.z.abs() < EPS);
    }
}

#[test]
fn test_camera_settles_at_rest() {
    let (mut intro, _log) = start_at(0.0);

    step(&mut intro, 2000.0);
    let camera = intro.camera();
    assert!((camera.position.y - 5.0).abs() < EPS);
    assert!((camera.position.z - 5.0).abs() < EPS);
}

#[test]
fn test_each_tick_renders_once_and_reschedules() {
    let (mut intro, log) = start_at(0.0);

    for i in 1..=5 {
        assert_eq!(intro.scheduler().pending(), 1);
        step(&mut intro, i as f64 * 100.0);
        assert_eq!(log.borrow().renders, i + 1);
        assert_eq!(intro.scheduler().pending(), 1);
    }
}

// ============================================================================
// Completion and ambient loop
// ============================================================================

#[test]
fn test_two_second_scenario() {
    let (intro, _log) = start_at(0.0);
    let calls = Rc::new(RefCell::new(Vec::new()));
    let seen = calls.clone();
    let mut intro = intro.on_complete(move |now| seen.borrow_mut().push(now));

    assert_eq!(step(&mut intro, 1000.0), Tick::Intro(0.5));
    assert_eq!(step(&mut intro, 2000.0), Tick::Completed);

    assert_eq!(intro.progress(), 1.0);
    assert_eq!(intro.phase(), Phase::Ambient);
    assert_eq!(*calls.borrow(), vec![2000.0]);
    assert!(intro.has_pending_frame());
}

#[test]
fn test_completion_fires_once() {
    let calls = Rc::new(RefCell::new(0));
    let seen = calls.clone();
    let (intro, _log) = start_at(0.0);
    let mut intro = intro.on_complete(move |_| *seen.borrow_mut() += 1);

    step(&mut intro, 2500.0);
    for i in 0..10 {
        assert_eq!(step(&mut intro, 2600.0 + i as f64 * 16.0), Tick::Ambient);
    }
    assert_eq!(*calls.borrow(), 1);
    assert_eq!(intro.phase(), Phase::Ambient);
}

#[test]
fn test_completion_tick_draws_once() {
    let (mut intro, log) = start_at(0.0);

    step(&mut intro, 2000.0);
    assert_eq!(log.borrow().renders, 2);
    step(&mut intro, 2016.0);
    assert_eq!(log.borrow().renders, 3);
}

#[test]
fn test_ambient_floats_around_rest() {
    let (mut intro, _log) = start_at(0.0);
    step(&mut intro, 2000.0);

    for n in 0..50 {
        step(&mut intro, 2000.0 + n as f64 * 997.0);
        for mountain in intro.scene().mountains() {
            assert!((mountain.transform.position.y + 2.0).abs() <= 0.1 + EPS);
            assert!(mountain.transform.rotation.z.abs() <= 0.005 + EPS);
        }
        let camera = intro.camera();
        assert!(camera.position.x.abs() <= 0.1 + EPS);
        assert!((camera.position.y - 5.0).abs() <= 0.1 + EPS);
    }
}

#[test]
fn test_ambient_with_epoch_clock() {
    let start = 1_760_000_000_000.0;
    let (mut intro, _log) = start_at(start);

    step(&mut intro, start + 2000.0);
    assert_eq!(step(&mut intro, start + 2016.0), Tick::Ambient);
    let y = intro.scene().mountains()[0].transform.position.y;
    assert!(y.is_finite());
    assert!((y + 2.0).abs() <= 0.1 + EPS);
}

#[test]
fn test_render_errors_do_not_stop_animation() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut intro = MountainIntro::new(
        &AnimationConfig::default(),
        FailingTarget,
        QueuedScheduler::new(),
        &mut rng,
        0.0,
    )
    .unwrap();

    assert_eq!(intro.tick(1000.0), Tick::Intro(0.5));
    assert_eq!(intro.tick(2000.0), Tick::Completed);
    assert_eq!(intro.frames(), 3);
}

// ============================================================================
// Disposal
// ============================================================================

#[test]
fn test_dispose_during_intro() {
    let (mut intro, log) = start_at(0.0);

    step(&mut intro, 600.0);
    assert!((intro.progress() - 0.3).abs() < EPS);
    intro.dispose();

    let renders = log.borrow().renders;
    assert_eq!(step(&mut intro, 700.0), Tick::Skipped);
    assert_eq!(step(&mut intro, 5000.0), Tick::Skipped);
    assert_eq!(log.borrow().renders, renders);

    assert!(intro.is_disposed());
    assert!(!intro.has_pending_frame());
    assert_eq!(intro.scheduler().cancelled(), 1);
    assert_eq!(intro.scheduler().pending(), 0);
    assert!(intro.scene().is_empty());
    assert_eq!(log.borrow().releases, 1);
    assert_eq!(intro.phase(), Phase::Intro);
}

#[test]
fn test_dispose_during_ambient() {
    let calls = Rc::new(RefCell::new(0));
    let seen = calls.clone();
    let (intro, log) = start_at(0.0);
    let mut intro = intro.on_complete(move |_| *seen.borrow_mut() += 1);

    step(&mut intro, 2000.0);
    step(&mut intro, 2016.0);
    intro.dispose();

    let renders = log.borrow().renders;
    assert_eq!(step(&mut intro, 2032.0), Tick::Skipped);
    assert_eq!(log.borrow().renders, renders);
    assert_eq!(log.borrow().releases, 1);
    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn test_dispose_is_idempotent() {
    let (mut intro, log) = start_at(0.0);

    intro.dispose();
    intro.dispose();
    assert_eq!(log.borrow().releases, 1);
    assert_eq!(intro.scheduler().cancelled(), 1);
}

#[test]
fn test_dispose_before_completion_drops_hook() {
    let calls = Rc::new(RefCell::new(0));
    let seen = calls.clone();
    let (intro, _log) = start_at(0.0);
    let mut intro = intro.on_complete(move |_| *seen.borrow_mut() += 1);

    intro.dispose();
    step(&mut intro, 5000.0);
    assert_eq!(*calls.borrow(), 0);
}

#[test]
fn test_drop_disposes() {
    let (intro, log) = start_at(0.0);
    drop(intro);
    assert_eq!(log.borrow().releases, 1);
}

// ============================================================================
// Resize
// ============================================================================

#[test]
fn test_resize_updates_camera_and_target() {
    let (mut intro, log) = start_at(0.0);

    intro.resize(WindowDimensions::new(1000, 500));
    assert!((intro.camera().aspect() - 2.0).abs() < EPS);
    assert_eq!(log.borrow().resizes, vec![WindowDimensions::new(1000, 500)]);
}

#[test]
fn test_resize_to_empty_ignored() {
    let (mut intro, log) = start_at(0.0);
    let aspect = intro.camera().aspect();

    intro.resize(WindowDimensions::new(0, 500));
    assert_eq!(intro.camera().aspect(), aspect);
    assert!(log.borrow().resizes.is_empty());
}

#[test]
fn test_resize_after_dispose_is_noop() {
    let (mut intro, log) = start_at(0.0);
    let aspect = intro.camera().aspect();

    intro.dispose();
    intro.resize(WindowDimensions::new(400, 400));
    assert_eq!(intro.camera().aspect(), aspect);
    assert!(log.borrow().resizes.is_empty());
}
