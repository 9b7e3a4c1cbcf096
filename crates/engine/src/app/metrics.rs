use std::time::{Duration, Instant};

/// Loop health over one reporting window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetricsSnapshot {
    pub fps: f32,
    pub tps: f32,
    pub frame_time_ms: f32,
    pub worst_frame_ms: f32,
    pub dropped_backlog_ms: u64,
}

#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    window_start: Instant,
    window: Duration,
    frames: u32,
    ticks: u32,
    total_frame_time: Duration,
    worst_frame_time: Duration,
    dropped_backlog: Duration,
}

impl MetricsAccumulator {
    pub(crate) fn new(window: Duration, now: Instant) -> Self {
        Self {
            window_start: now,
            window,
            frames: 0,
            ticks: 0,
            total_frame_time: Duration::ZERO,
            worst_frame_time: Duration::ZERO,
            dropped_backlog: Duration::ZERO,
        }
    }

    pub(crate) fn record_frame(&mut self, frame_dt: Duration) {
        self.frames = self.frames.saturating_add(1);
        self.total_frame_time = self.total_frame_time.saturating_add(frame_dt);
        self.worst_frame_time = self.worst_frame_time.max(frame_dt);
    }

    pub(crate) fn record_tick(&mut self) {
        self.ticks = self.ticks.saturating_add(1);
    }

    pub(crate) fn record_dropped_backlog(&mut self, dropped: Duration) {
        self.dropped_backlog = self.dropped_backlog.saturating_add(dropped);
    }

    /// Closes the window once it has run its length, returning its numbers
    /// and starting a fresh one at `now`.
    pub(crate) fn maybe_snapshot(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.window {
            return None;
        }

        let seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let average_frame = self
            .total_frame_time
            .checked_div(self.frames)
            .unwrap_or(Duration::ZERO);
        let snapshot = LoopMetricsSnapshot {
            fps: self.frames as f32 / seconds,
            tps: self.ticks as f32 / seconds,
            frame_time_ms: millis(average_frame),
            worst_frame_ms: millis(self.worst_frame_time),
            dropped_backlog_ms: self.dropped_backlog.as_millis() as u64,
        };

        *self = Self::new(self.window, now);
        Some(snapshot)
    }
}

fn millis(duration: Duration) -> f32 {
    duration.as_secs_f32() * 1000.0
}
