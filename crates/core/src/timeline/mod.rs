use crate::random::RandomSource;

/// Fraction of the interval by which a re-armed timer may deviate, in
/// either direction.
pub const DEFAULT_JITTER: f32 = 0.3;

/// Length of one full blink (open, closed, open again).
pub const BLINK_DURATION_MS: u64 = 200;

/// Millisecond deadline timer with optional jitter.
///
/// The first deadline is exactly one interval after [`IntervalTimer::start`];
/// later deadlines are jittered. An interval of zero disables the timer.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalTimer {
    interval_ms: u32,
    jitter: f32,
    deadline_ms: Option<u64>,
}

impl IntervalTimer {
    pub fn new(interval_ms: u32) -> Self {
        Self::with_jitter(interval_ms, DEFAULT_JITTER)
    }

    pub fn with_jitter(interval_ms: u32, jitter: f32) -> Self {
        Self {
            interval_ms,
            jitter: jitter.clamp(0.0, 0.95),
            deadline_ms: None,
        }
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub fn is_disabled(&self) -> bool {
        self.interval_ms == 0
    }

    pub fn deadline_ms(&self) -> Option<u64> {
        self.deadline_ms
    }

    /// Arms the first deadline relative to `now_ms`.
    pub fn start(&mut self, now_ms: u64) {
        self.deadline_ms = (!self.is_disabled()).then(|| now_ms + u64::from(self.interval_ms));
    }

    /// Changes the interval and re-arms from `now_ms`.
    pub fn set_interval(&mut self, interval_ms: u32, now_ms: u64) {
        self.interval_ms = interval_ms;
        self.start(now_ms);
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        matches!(self.deadline_ms, Some(deadline) if now_ms >= deadline)
    }

    /// Schedules the next deadline `interval * (1 ± jitter)` after `now_ms`,
    /// never less than 1 ms away.
    pub fn rearm(&mut self, now_ms: u64, rng: &mut impl RandomSource) {
        if self.is_disabled() {
            self.deadline_ms = None;
            return;
        }
        let factor = 1.0 + rng.next_range(-self.jitter, self.jitter);
        let delay = (self.interval_ms as f32 * factor).round().max(1.0) as u64;
        self.deadline_ms = Some(now_ms + delay);
    }
}

/// Triangular 1 → 0 → 1 eyelid curve.
///
/// Frames are sampled whenever the host ticks, so the first frame at or past
/// the midpoint is always drawn fully closed and the blink cannot finish
/// before that frame was shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkAnimation {
    started_ms: u64,
    duration_ms: u64,
    closed_shown: bool,
}

impl BlinkAnimation {
    pub fn new(started_ms: u64) -> Self {
        Self::with_duration(started_ms, BLINK_DURATION_MS)
    }

    pub fn with_duration(started_ms: u64, duration_ms: u64) -> Self {
        Self {
            started_ms,
            duration_ms: duration_ms.max(1),
            closed_shown: false,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn is_finished(&self, now_ms: u64) -> bool {
        self.closed_shown && now_ms.saturating_sub(self.started_ms) >= self.duration_ms
    }

    /// Openness for the frame drawn at `now_ms`.
    pub fn frame(&mut self, now_ms: u64) -> f32 {
        let elapsed = now_ms.saturating_sub(self.started_ms);
        if !self.closed_shown && elapsed.saturating_mul(2) >= self.duration_ms {
            self.closed_shown = true;
            return 0.0;
        }
        self.openness_at(now_ms)
    }

    /// Point on the curve at `now_ms`, ignoring which frames were drawn.
    pub fn openness_at(&self, now_ms: u64) -> f32 {
        let elapsed = now_ms.saturating_sub(self.started_ms);
        if elapsed >= self.duration_ms {
            return 1.0;
        }
        let phase = elapsed as f32 / self.duration_ms as f32;
        (1.0 - 2.0 * phase).abs()
    }
}

/// Blink length for a host ticking every `update_interval_ms`: long enough
/// that at least one tick lands between the opening and closing halves.
pub fn blink_duration_for(update_interval_ms: u32) -> u64 {
    BLINK_DURATION_MS.max(2 * u64::from(update_interval_ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::seeded;

    #[test]
    fn first_deadline_is_exact() {
        let mut timer = IntervalTimer::new(1000);
        timer.start(0);
        assert!(!timer.is_due(999));
        assert!(timer.is_due(1000));
    }

    #[test]
    fn rearm_stays_within_jitter() {
        let mut rng = seeded(3);
        let mut timer = IntervalTimer::new(1000);
        for _ in 0..500 {
            timer.rearm(5_000, &mut rng);
            let delay = timer.deadline_ms().unwrap() - 5_000;
            assert!((700..=1300).contains(&delay), "delay {delay}");
        }
    }

    #[test]
    fn zero_interval_never_fires() {
        let mut rng = seeded(3);
        let mut timer = IntervalTimer::new(0);
        timer.start(0);
        for now in 0..10_000 {
            assert!(!timer.is_due(now));
            timer.rearm(now, &mut rng);
        }
        assert_eq!(timer.deadline_ms(), None);
    }

    #[test]
    fn set_interval_rearms() {
        let mut timer = IntervalTimer::new(0);
        timer.start(0);
        timer.set_interval(500, 100);
        assert_eq!(timer.interval_ms(), 500);
        assert!(!timer.is_due(599));
        assert!(timer.is_due(600));
    }

    #[test]
    fn blink_closes_halfway() {
        let mut blink = BlinkAnimation::new(1000);
        let frames: Vec<f32> = (0..5).map(|i| blink.frame(1000 + i * 50)).collect();
        assert_eq!(frames, [1.0, 0.5, 0.0, 0.5, 1.0]);
        assert!(blink.is_finished(1200));
        assert_eq!(blink.openness_at(1050), 0.5);
    }

    #[test]
    fn late_frame_is_still_closed() {
        let mut blink = BlinkAnimation::new(0);
        assert_eq!(blink.frame(0), 1.0);
        assert!(!blink.is_finished(350));
        assert_eq!(blink.frame(350), 0.0);
        assert!(blink.is_finished(350));
        assert_eq!(blink.frame(400), 1.0);
    }

    #[test]
    fn blink_stretches_for_slow_hosts() {
        assert_eq!(blink_duration_for(50), BLINK_DURATION_MS);
        assert_eq!(blink_duration_for(100), BLINK_DURATION_MS);
        assert_eq!(blink_duration_for(250), 500);

        let mut blink = BlinkAnimation::with_duration(0, blink_duration_for(250));
        assert_eq!(blink.duration_ms(), 500);
        assert_eq!(blink.frame(0), 1.0);
        assert_eq!(blink.frame(250), 0.0);
        assert_eq!(blink.frame(500), 1.0);
        assert!(blink.is_finished(500));
    }
}
