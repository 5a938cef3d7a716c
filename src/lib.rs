pub mod animation;
pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod hero;
pub mod math;
pub mod renderer;
pub mod scenes;
pub mod types;
pub mod window;

pub use animation::{MountainIntro, Phase, Tick};
pub use config::AnimationConfig;
pub use crate::core::{FrameScheduler, QueuedScheduler, RenderTarget, WindowDimensions};
pub use scenes::Scene;
