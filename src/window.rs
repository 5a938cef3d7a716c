use std::sync::Arc;

use winit::window::Window as WinitWindow;

use crate::core::{FrameHandle, FrameScheduler};

/// Frame scheduler backed by winit redraw requests.
///
/// winit coalesces redraws and has no way to withdraw one, so a cancelled
/// handle is only remembered; the host should skip the tick through
/// `MountainIntro::tick`, which ignores frames nobody is waiting for.
pub struct RedrawScheduler {
    window: Arc<WinitWindow>,
    next_id: u64,
    last_cancelled: Option<FrameHandle>,
}

impl RedrawScheduler {
    pub fn new(window: Arc<WinitWindow>) -> Self {
        Self {
            window,
            next_id: 0,
            last_cancelled: None,
        }
    }

    pub fn last_cancelled(&self) -> Option<FrameHandle> {
        self.last_cancelled
    }
}

impl FrameScheduler for RedrawScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id);
        self.next_id += 1;
        self.window.request_redraw();
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        log::trace!("Cancelled frame {:?}", handle);
        self.last_cancelled = Some(handle);
    }
}
