pub mod clock;
pub mod frame;
pub mod gpu_context;
pub mod render_target;
pub mod timer;
pub mod window;

pub use clock::{FpsCounter, WallClock};
pub use frame::{FrameHandle, FrameScheduler, QueuedScheduler};
pub use gpu_context::GpuContext;
pub use render_target::RenderTarget;
pub use timer::{staggered, Timeline};
pub use window::WindowDimensions;
