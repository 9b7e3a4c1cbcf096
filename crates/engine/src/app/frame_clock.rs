use std::time::{Duration, Instant};

/// Outcome of feeding one redraw's elapsed time into the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FrameAdvance {
    /// Unclamped time since the previous redraw.
    pub(crate) raw_dt: Duration,
    pub(crate) ticks: u32,
    /// Backlog thrown away because the tick cap was reached.
    pub(crate) dropped_backlog: Duration,
}

/// Fixed-rate tick scheduler. Wall-clock time accumulates between redraws
/// and is paid out in whole ticks, at most `max_ticks_per_frame` at a time.
#[derive(Debug)]
pub(crate) struct FrameClock {
    fixed_dt: Duration,
    max_frame_delta: Duration,
    max_ticks_per_frame: u32,
    accumulator: Duration,
    last_frame: Instant,
}

impl FrameClock {
    pub(crate) fn new(
        target_tps: u32,
        max_frame_delta: Duration,
        max_ticks_per_frame: u32,
        now: Instant,
    ) -> Self {
        Self {
            fixed_dt: Duration::from_secs_f64(1.0 / target_tps.max(1) as f64),
            max_frame_delta: non_zero_or(max_frame_delta, Duration::from_millis(250)),
            max_ticks_per_frame: max_ticks_per_frame.max(1),
            accumulator: Duration::ZERO,
            last_frame: now,
        }
    }

    pub(crate) fn max_frame_delta(&self) -> Duration {
        self.max_frame_delta
    }

    pub(crate) fn max_ticks_per_frame(&self) -> u32 {
        self.max_ticks_per_frame
    }

    pub(crate) fn advance(&mut self, now: Instant) -> FrameAdvance {
        let raw_dt = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.accumulator = self
            .accumulator
            .saturating_add(raw_dt.min(self.max_frame_delta));

        let mut ticks = 0u32;
        while self.accumulator >= self.fixed_dt && ticks < self.max_ticks_per_frame {
            self.accumulator -= self.fixed_dt;
            ticks += 1;
        }
        let dropped_backlog = if self.accumulator >= self.fixed_dt {
            std::mem::take(&mut self.accumulator)
        } else {
            Duration::ZERO
        };

        FrameAdvance {
            raw_dt,
            ticks,
            dropped_backlog,
        }
    }
}

/// Optional cap on presented frames per second. Zero means uncapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RenderPacer {
    frame_budget: Option<Duration>,
    last_present: Instant,
}

impl RenderPacer {
    pub(crate) fn new(max_render_fps: Option<u32>, now: Instant) -> Self {
        Self {
            frame_budget: max_render_fps
                .filter(|fps| *fps > 0)
                .map(|fps| Duration::from_secs_f64(1.0 / fps as f64)),
            last_present: now,
        }
    }

    /// How long to wait before presenting so the cap holds.
    pub(crate) fn wait_before_present(&self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.last_present);
        match self.frame_budget {
            Some(budget) if elapsed < budget => budget - elapsed,
            _ => Duration::ZERO,
        }
    }

    pub(crate) fn presented(&mut self, now: Instant) {
        self.last_present = now;
    }

    pub(crate) fn describe(&self) -> String {
        match self.frame_budget {
            Some(budget) => format!("{:.0}", 1.0 / budget.as_secs_f64()),
            None => "off".to_string(),
        }
    }
}

pub(crate) fn non_zero_or(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(tps: u32, max_ticks: u32) -> (FrameClock, Instant) {
        let start = Instant::now();
        (
            FrameClock::new(tps, Duration::from_millis(250), max_ticks, start),
            start,
        )
    }

    #[test]
    fn whole_ticks_are_paid_out_and_remainder_kept() {
        let (mut clock, start) = clock(50, 5);
        let first = clock.advance(start + Duration::from_millis(50));
        assert_eq!(first.ticks, 2);
        assert_eq!(first.dropped_backlog, Duration::ZERO);

        let second = clock.advance(start + Duration::from_millis(60));
        assert_eq!(second.ticks, 1);
        assert_eq!(second.raw_dt, Duration::from_millis(10));
    }

    #[test]
    fn tick_cap_drops_backlog() {
        let (mut clock, start) = clock(50, 3);
        let advance = clock.advance(start + Duration::from_millis(130));
        assert_eq!(advance.ticks, 3);
        assert_eq!(advance.dropped_backlog, Duration::from_millis(70));

        let next = clock.advance(start + Duration::from_millis(135));
        assert_eq!(next.ticks, 0);
    }

    #[test]
    fn long_stall_is_clamped_before_scheduling() {
        let (mut clock, start) = clock(50, 100);
        let advance = clock.advance(start + Duration::from_secs(3));
        assert_eq!(advance.raw_dt, Duration::from_secs(3));
        assert_eq!(advance.ticks, 12);
    }

    #[test]
    fn degenerate_config_is_normalized() {
        let clock = FrameClock::new(0, Duration::ZERO, 0, Instant::now());
        assert_eq!(clock.max_frame_delta(), Duration::from_millis(250));
        assert_eq!(clock.max_ticks_per_frame(), 1);
    }

    #[test]
    fn pacer_waits_out_remaining_budget() {
        let start = Instant::now();
        let pacer = RenderPacer::new(Some(50), start);
        assert_eq!(
            pacer.wait_before_present(start + Duration::from_millis(5)),
            Duration::from_millis(15)
        );
        assert_eq!(
            pacer.wait_before_present(start + Duration::from_millis(30)),
            Duration::ZERO
        );
        assert_eq!(pacer.describe(), "50");
    }

    #[test]
    fn zero_cap_disables_pacing() {
        let start = Instant::now();
        let pacer = RenderPacer::new(Some(0), start);
        assert_eq!(pacer.wait_before_present(start), Duration::ZERO);
        assert_eq!(pacer.describe(), "off");
    }
}
