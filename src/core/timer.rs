/// Wall-clock driven timeline - progress is derived from absolute timestamps
/// rather than accumulated deltas, so a slow host renders fewer, larger steps
/// but still finishes on time.
#[derive(Debug, Clone, Copy)]
pub struct Timeline {
    start_ms: f64,
    duration_ms: f64,
    progress: f32,
}

impl Timeline {
    /// Start a timeline at `start_ms` lasting `duration_ms`
    pub fn start(start_ms: f64, duration_ms: f64) -> Self {
        Self {
            start_ms,
            duration_ms,
            progress: 0.0,
        }
    }

    /// Advance to `now_ms` and return progress in [0, 1].
    /// Never moves backwards, even if the clock does.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let raw = (self.elapsed_ms(now_ms) / self.duration_ms).clamp(0.0, 1.0) as f32;
        self.progress = self.progress.max(raw);
        self.progress
    }

    /// Milliseconds since the timeline started (may be negative)
    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        now_ms - self.start_ms
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }
}

/// Stagger a global progress value by `delay`, remapping [delay, 1] onto [0, 1].
///
/// A delay of 1 or more leaves no room to animate; such items jump to 1 when
/// the global progress completes.
pub fn staggered(progress: f32, delay: f32) -> f32 {
    if delay >= 1.0 {
        return if progress >= 1.0 { 1.0 } else { 0.0 };
    }
    ((progress - delay) / (1.0 - delay)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeline_starts_at_zero() {
        let mut timeline = Timeline::start(1000.0, 2000.0);
        assert_eq!(timeline.advance(1000.0), 0.0);
        assert!(!timeline.is_complete());
    }

    #[test]
    fn timeline_reports_fraction() {
        let mut timeline = Timeline::start(0.0, 2000.0);
        assert_eq!(timeline.advance(500.0), 0.25);
        assert_eq!(timeline.advance(1000.0), 0.5);
    }

    #[test]
    fn timeline_clamps_at_one() {
        let mut timeline = Timeline::start(0.0, 2000.0);
        assert_eq!(timeline.advance(2000.0), 1.0);
        assert_eq!(timeline.advance(9000.0), 1.0);
        assert!(timeline.is_complete());
    }

    #[test]
    fn timeline_ignores_clock_going_backwards() {
        let mut timeline = Timeline::start(0.0, 2000.0);
        timeline.advance(1000.0);
        assert_eq!(timeline.advance(400.0), 0.5);
    }

    #[test]
    fn timeline_before_start_is_zero() {
        let mut timeline = Timeline::start(500.0, 2000.0);
        assert_eq!(timeline.advance(0.0), 0.0);
        assert_eq!(timeline.elapsed_ms(0.0), -500.0);
    }

    #[test]
    fn staggered_without_delay_is_identity() {
        for i in 0..=10 {
            let p = i as f32 / 10.0;
            assert_eq!(staggered(p, 0.0), p);
        }
    }

    #[test]
    fn staggered_waits_for_delay() {
        assert_eq!(staggered(0.05, 0.1), 0.0);
        assert_eq!(staggered(0.1, 0.1), 0.0);
        assert!(staggered(0.2, 0.1) > 0.0);
    }

    #[test]
    fn staggered_reaches_one_together() {
        for delay in [0.0, 0.1, 0.2, 0.3, 0.4, 0.9] {
            assert_eq!(staggered(1.0, delay), 1.0);
        }
    }

    #[test]
    fn staggered_full_delay_steps_at_completion() {
        assert_eq!(staggered(0.99, 1.0), 0.0);
        assert_eq!(staggered(1.0, 1.0), 1.0);
        assert_eq!(staggered(0.5, 1.3), 0.0);
    }
}
