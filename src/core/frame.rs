use std::collections::VecDeque;

/// Handle to a requested frame, used to cancel it before it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Per-frame scheduling primitive supplied by the host.
///
/// `request_frame` asks the host to deliver one more tick; the host calls back
/// into the animation when the display is ready. `cancel_frame` withdraws a
/// request that has not fired yet.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;

    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Scheduler that only queues requests - the caller decides when frames fire.
/// Used for deterministic stepping and headless runs.
#[derive(Debug, Default)]
pub struct QueuedScheduler {
    next_id: u64,
    pending: VecDeque<FrameHandle>,
    requested: u64,
    cancelled: u64,
}

impl QueuedScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop the oldest outstanding request
    pub fn take_next(&mut self) -> Option<FrameHandle> {
        self.pending.pop_front()
    }

    /// Number of requests waiting to fire
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Total requests ever made
    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Total requests withdrawn before firing
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for QueuedScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id);
        self.next_id += 1;
        self.requested += 1;
        self.pending.push_back(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.pending.len();
        self.pending.retain(|h| *h != handle);
        if self.pending.len() < before {
            self.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_unique() {
        let mut scheduler = QueuedScheduler::new();
        let a = scheduler.request_frame();
        let b = scheduler.request_frame();
        assert_ne!(a, b);
        assert_eq!(scheduler.pending(), 2);
        assert_eq!(scheduler.requested(), 2);
    }

    #[test]
    fn test_take_next_is_fifo() {
        let mut scheduler = QueuedScheduler::new();
        let a = scheduler.request_frame();
        let b = scheduler.request_frame();
        assert_eq!(scheduler.take_next(), Some(a));
        assert_eq!(scheduler.take_next(), Some(b));
        assert_eq!(scheduler.take_next(), None);
    }

    #[test]
    fn test_cancel_removes_pending() {
        let mut scheduler = QueuedScheduler::new();
        let a = scheduler.request_frame();
        scheduler.cancel_frame(a);
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.cancelled(), 1);
    }

    #[test]
    fn test_cancel_after_fire_is_ignored() {
        let mut scheduler = QueuedScheduler::new();
        let a = scheduler.request_frame();
        scheduler.take_next();
        scheduler.cancel_frame(a);
        assert_eq!(scheduler.cancelled(), 0);
    }
}
