use std::time::{Duration, Instant};

/// What one rendered frame owes the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FramePlan {
    pub(crate) ticks: u32,
    /// Backlog discarded because the per-frame tick cap was reached.
    pub(crate) dropped: Duration,
}

/// Fixed-timestep accumulator. Frame deltas go in clamped, whole ticks come
/// out, and any backlog beyond `max_ticks` is thrown away instead of
/// carried into the next frame.
#[derive(Debug)]
pub(crate) struct TickClock {
    step: Duration,
    max_frame_delta: Duration,
    max_ticks: u32,
    backlog: Duration,
    last_frame: Instant,
}

impl TickClock {
    pub(crate) fn new(
        target_tps: u32,
        max_frame_delta: Duration,
        max_ticks: u32,
        now: Instant,
    ) -> Self {
        Self {
            step: Duration::from_secs_f64(1.0 / target_tps.max(1) as f64),
            max_frame_delta: non_zero_or(max_frame_delta, Duration::from_millis(250)),
            max_ticks: max_ticks.max(1),
            backlog: Duration::ZERO,
            last_frame: now,
        }
    }

    /// Measures the frame that ended at `now` and plans its ticks. Returns the
    /// unclamped frame time alongside the plan.
    pub(crate) fn advance(&mut self, now: Instant) -> (Duration, FramePlan) {
        let frame_dt = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        (frame_dt, self.accumulate(frame_dt))
    }

    fn accumulate(&mut self, frame_dt: Duration) -> FramePlan {
        self.backlog = self.backlog.saturating_add(frame_dt.min(self.max_frame_delta));

        let mut ticks = 0u32;
        while self.backlog >= self.step && ticks < self.max_ticks {
            self.backlog -= self.step;
            ticks += 1;
        }

        let dropped = if self.backlog >= self.step {
            std::mem::take(&mut self.backlog)
        } else {
            Duration::ZERO
        };
        FramePlan { ticks, dropped }
    }
}

/// Optional presentation rate cap. A cap of zero means uncapped.
#[derive(Debug)]
pub(crate) struct FramePacer {
    min_frame_time: Option<Duration>,
    last_present: Instant,
}

impl FramePacer {
    pub(crate) fn new(max_fps: Option<u32>, now: Instant) -> Self {
        Self {
            min_frame_time: max_fps
                .filter(|fps| *fps > 0)
                .map(|fps| Duration::from_secs_f64(1.0 / fps as f64)),
            last_present: now,
        }
    }

    /// How long to sleep at `now` before presenting the next frame.
    pub(crate) fn wait_before_present(&self, now: Instant) -> Duration {
        let Some(min_frame_time) = self.min_frame_time else {
            return Duration::ZERO;
        };
        min_frame_time.saturating_sub(now.saturating_duration_since(self.last_present))
    }

    pub(crate) fn presented(&mut self, now: Instant) {
        self.last_present = now;
    }

    pub(crate) fn cap_label(&self) -> String {
        match self.min_frame_time {
            Some(frame_time) => format!("{:.0}", 1.0 / frame_time.as_secs_f64()),
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
