//! Frame pacing for the compositor loop.
//!
//! Animation progress is sampled only when a frame is rendered, so the
//! platform loop must keep asking for frames while anything animates.
//! Timestamps come from the compositor clock, which lets a manual clock
//! pace frames the same way it paces animations.

use std::time::Duration;

/// Refresh pacing of the platform loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameTimingConfig {
    /// Minimum time between two frames (default: 16.67ms for 60Hz)
    pub target_interval: Duration,
}

impl Default for FrameTimingConfig {
    fn default() -> Self {
        Self::for_refresh_rate(60)
    }
}

impl FrameTimingConfig {
    pub fn for_refresh_rate(hz: u32) -> Self {
        Self {
            target_interval: Duration::from_nanos(1_000_000_000 / u64::from(hz.max(1))),
        }
    }

    /// Interval in whole milliseconds, never zero.
    fn interval_ms(&self) -> i64 {
        i64::try_from(self.target_interval.as_millis()).unwrap_or(i64::MAX).max(1)
    }
}

/// Redraw bookkeeping. Platform adapters should:
/// 1. Feed input through the compositor, which requests a redraw
/// 2. Render when `should_render()` says so
/// 3. Sleep for `time_until_next_frame()` otherwise
#[derive(Debug, Default)]
pub struct Runtime {
    config: FrameTimingConfig,
    needs_redraw: bool,
    last_frame_ms: Option<i64>,
    frame_count: u64,
    fps_window_start_ms: i64,
    fps_window_frames: u64,
    fps: f64,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_frame_timing(config: FrameTimingConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// At least one interval has passed since the last frame.
    pub fn frame_due(&self, now_ms: i64) -> bool {
        self.last_frame_ms
            .map_or(true, |last| now_ms - last >= self.config.interval_ms())
    }

    pub fn should_render(&self, now_ms: i64) -> bool {
        self.needs_redraw && self.frame_due(now_ms)
    }

    /// Record a frame at `now_ms` and return its number, starting at 1.
    pub fn begin_frame(&mut self, now_ms: i64) -> u64 {
        self.needs_redraw = false;
        self.frame_count += 1;
        self.last_frame_ms = Some(now_ms);

        if self.fps_window_frames == 0 {
            self.fps_window_start_ms = now_ms;
        }
        self.fps_window_frames += 1;
        let window_ms = now_ms - self.fps_window_start_ms;
        if window_ms >= 1000 {
            self.fps = (self.fps_window_frames - 1) as f64 * 1000.0 / window_ms as f64;
            self.fps_window_frames = 1;
            self.fps_window_start_ms = now_ms;
        }
        self.frame_count
    }

    pub fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Frames per second over the last full second of frames.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn time_until_next_frame(&self, now_ms: i64) -> Duration {
        let Some(last) = self.last_frame_ms else {
            return Duration::ZERO;
        };
        let remaining = (last + self.config.interval_ms() - now_ms).max(0);
        Duration::from_millis(remaining as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_timing_config() {
        let config = FrameTimingConfig::for_refresh_rate(120);
        assert!(config.target_interval < Duration::from_millis(10));
        let config = FrameTimingConfig::for_refresh_rate(0);
        assert_eq!(config.target_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_redraw_request_is_consumed_by_frame() {
        let mut runtime = Runtime::new();
        assert!(!runtime.should_render(0));

        runtime.request_redraw();
        assert!(runtime.should_render(0));
        assert_eq!(runtime.begin_frame(0), 1);
        assert!(!runtime.needs_redraw());
        assert_eq!(runtime.time_until_next_frame(4), Duration::from_millis(12));
    }

    #[test]
    fn test_frames_are_paced_by_interval() {
        let mut runtime = Runtime::new();
        runtime.begin_frame(100);
        runtime.request_redraw();
        assert!(!runtime.should_render(110));
        assert!(runtime.should_render(116));
    }

    #[test]
    fn test_fps_counts_frames_per_second() {
        let mut runtime = Runtime::new();
        for frame in 0..=50 {
            runtime.begin_frame(frame * 20);
        }
        assert_eq!(runtime.frame_count(), 51);
        assert_eq!(runtime.fps(), 50.0);
    }
}
