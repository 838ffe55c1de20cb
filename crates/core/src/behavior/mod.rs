//! Timer driven behavior: blinking, glancing around and changing mood.

use serde::{Deserialize, Serialize};

use crate::expression::Gaze;
use crate::geometry::Side;
use crate::random::RandomSource;
use crate::timeline::{BlinkAnimation, IntervalTimer, BLINK_DURATION_MS};
use crate::{Emotion, EmotionWeights, Result};

/// Share of the remaining distance to the gaze target covered per tick.
const GAZE_EASING: f32 = 0.5;

/// Mutable state of a single eye.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyeState {
    /// 0 is fully closed, 1 fully open.
    pub openness: f32,
    pub gaze: Gaze,
    /// Replaces the shared emotion for this eye only.
    pub emotion_override: Option<Emotion>,
}

impl Default for EyeState {
    fn default() -> Self {
        Self {
            openness: 1.0,
            gaze: Gaze::FRONT,
            emotion_override: None,
        }
    }
}

impl EyeState {
    pub fn emotion(&self, shared: Emotion) -> Emotion {
        self.emotion_override.unwrap_or(shared)
    }
}

/// Everything that changes between frames.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FaceState {
    pub emotion: Emotion,
    pub gaze_target: Gaze,
    pub left: EyeState,
    pub right: EyeState,
}

impl FaceState {
    pub fn eye(&self, side: Side) -> &EyeState {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn eye_mut(&mut self, side: Side) -> &mut EyeState {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    fn set_openness(&mut self, openness: f32) {
        self.left.openness = openness;
        self.right.openness = openness;
    }
}

/// What happened during one scheduler tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickEvents {
    pub blink_started: bool,
    pub gaze_target: Option<Gaze>,
    /// Emotion drawn by the behavior timer, even if it equals the current one.
    pub emotion_selected: Option<Emotion>,
}

impl TickEvents {
    pub fn is_empty(&self) -> bool {
        !self.blink_started && self.gaze_target.is_none() && self.emotion_selected.is_none()
    }
}

/// Timing and selection parameters for [`BehaviorScheduler`].
#[derive(Debug, Clone, PartialEq)]
pub struct BehaviorSettings {
    pub random_behavior: bool,
    pub random_blink: bool,
    pub random_look: bool,
    pub blink_interval_ms: u32,
    pub look_interval_ms: u32,
    pub behavior_interval_ms: u32,
    pub blink_duration_ms: u64,
    pub weights: EmotionWeights,
}

impl Default for BehaviorSettings {
    fn default() -> Self {
        Self {
            random_behavior: true,
            random_blink: true,
            random_look: true,
            blink_interval_ms: 3000,
            look_interval_ms: 2000,
            behavior_interval_ms: 5000,
            blink_duration_ms: BLINK_DURATION_MS,
            weights: EmotionWeights::new(),
        }
    }
}

/// Advances the blink, look and behavior timers independently.
///
/// Due timers are always re-armed; the matching random flag only decides
/// whether firing has a visible effect.
#[derive(Debug, Clone)]
pub struct BehaviorScheduler {
    random_behavior: bool,
    random_blink: bool,
    random_look: bool,
    blink_timer: IntervalTimer,
    look_timer: IntervalTimer,
    behavior_timer: IntervalTimer,
    weights: EmotionWeights,
    blink_duration_ms: u64,
    blink: Option<BlinkAnimation>,
    blink_requested: bool,
}

impl BehaviorScheduler {
    /// Creates the scheduler with every timer armed relative to `now_ms`.
    pub fn new(settings: BehaviorSettings, now_ms: u64) -> Self {
        let mut scheduler = Self {
            random_behavior: settings.random_behavior,
            random_blink: settings.random_blink,
            random_look: settings.random_look,
            blink_timer: IntervalTimer::new(settings.blink_interval_ms),
            look_timer: IntervalTimer::new(settings.look_interval_ms),
            behavior_timer: IntervalTimer::new(settings.behavior_interval_ms),
            weights: settings.weights,
            blink_duration_ms: settings.blink_duration_ms,
            blink: None,
            blink_requested: false,
        };
        scheduler.blink_timer.start(now_ms);
        scheduler.look_timer.start(now_ms);
        scheduler.behavior_timer.start(now_ms);
        scheduler
    }

    pub fn tick(
        &mut self,
        now_ms: u64,
        state: &mut FaceState,
        rng: &mut impl RandomSource,
    ) -> TickEvents {
        let mut events = TickEvents::default();

        let mut blink_due = std::mem::take(&mut self.blink_requested);
        if self.blink_timer.is_due(now_ms) {
            self.blink_timer.rearm(now_ms, rng);
            blink_due |= self.random_blink;
        }
        if blink_due && self.blink.is_none() {
            self.blink = Some(BlinkAnimation::with_duration(now_ms, self.blink_duration_ms));
            events.blink_started = true;
            tracing::debug!(now_ms, "blink started");
        }

        if self.look_timer.is_due(now_ms) {
            self.look_timer.rearm(now_ms, rng);
            if self.random_look {
                let target = Gaze::new(rng.next_range(-1.0, 1.0), rng.next_range(-1.0, 1.0));
                state.gaze_target = target;
                events.gaze_target = Some(target);
                tracing::debug!(now_ms, x = target.x, y = target.y, "new gaze target");
            }
        }

        if self.behavior_timer.is_due(now_ms) {
            self.behavior_timer.rearm(now_ms, rng);
            if self.random_behavior {
                if let Some(emotion) = self.weights.sample(rng.next_unit()) {
                    if emotion != state.emotion {
                        tracing::debug!(now_ms, from = %state.emotion, to = %emotion, "emotion change");
                    }
                    state.emotion = emotion;
                    events.emotion_selected = Some(emotion);
                }
            }
        }

        let openness = match &mut self.blink {
            Some(blink) => blink.frame(now_ms),
            None => 1.0,
        };
        state.set_openness(openness);
        if self.blink.is_some_and(|blink| blink.is_finished(now_ms)) {
            self.blink = None;
        }

        let target = state.gaze_target;
        for side in Side::BOTH {
            let eye = state.eye_mut(side);
            eye.gaze = eye.gaze.approach(target, GAZE_EASING);
        }

        events
    }

    /// Starts a blink on the next tick unless one is already running.
    pub fn request_blink(&mut self) {
        self.blink_requested = true;
    }

    pub fn is_blinking(&self) -> bool {
        self.blink.is_some()
    }

    pub fn weights(&self) -> &EmotionWeights {
        &self.weights
    }

    pub fn set_emotion_weight(&mut self, emotion: Emotion, weight: f32) -> Result<()> {
        self.weights.set(emotion, weight)
    }

    pub fn set_random_behavior(&mut self, enabled: bool) {
        self.random_behavior = enabled;
    }

    pub fn set_random_blink(&mut self, enabled: bool) {
        self.random_blink = enabled;
    }

    pub fn set_random_look(&mut self, enabled: bool) {
        self.random_look = enabled;
    }

    pub fn set_blink_interval(&mut self, interval_ms: u32, now_ms: u64) {
        self.blink_timer.set_interval(interval_ms, now_ms);
    }

    pub fn set_look_interval(&mut self, interval_ms: u32, now_ms: u64) {
        self.look_timer.set_interval(interval_ms, now_ms);
    }

    pub fn set_behavior_interval(&mut self, interval_ms: u32, now_ms: u64) {
        self.behavior_timer.set_interval(interval_ms, now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::seeded;

    fn quiet() -> BehaviorSettings {
        BehaviorSettings {
            random_behavior: false,
            random_blink: false,
            random_look: false,
            ..BehaviorSettings::default()
        }
    }

    #[test]
    fn blink_runs_full_cycle() {
        let settings = BehaviorSettings {
            random_blink: true,
            blink_interval_ms: 1000,
            ..quiet()
        };
        let mut scheduler = BehaviorScheduler::new(settings, 0);
        let mut state = FaceState::default();
        let mut rng = seeded(11);

        let mut openness = Vec::new();
        let mut started = 0;
        for now in (50..=1300).step_by(50) {
            let events = scheduler.tick(now, &mut state, &mut rng);
            started += usize::from(events.blink_started);
            if now >= 1000 {
                openness.push(state.left.openness);
            }
        }
        assert_eq!(started, 1);
        assert_eq!(&openness[..5], &[1.0, 0.5, 0.0, 0.5, 1.0]);
        assert!(!scheduler.is_blinking());
        assert_eq!(state.left.openness, state.right.openness);
    }

    #[test]
    fn zero_look_interval_never_moves_gaze() {
        let settings = BehaviorSettings {
            random_look: true,
            look_interval_ms: 0,
            ..quiet()
        };
        let mut scheduler = BehaviorScheduler::new(settings, 0);
        let mut state = FaceState::default();
        let mut rng = seeded(5);

        for now in (0..2_000_000).step_by(50) {
            let events = scheduler.tick(now, &mut state, &mut rng);
            assert_eq!(events.gaze_target, None);
        }
        assert_eq!(state.left.gaze, Gaze::FRONT);
        assert_eq!(state.gaze_target, Gaze::FRONT);
    }

    #[test]
    fn look_timer_moves_eyes_towards_target() {
        let settings = BehaviorSettings {
            random_look: true,
            look_interval_ms: 100,
            ..quiet()
        };
        let mut scheduler = BehaviorScheduler::new(settings, 0);
        let mut state = FaceState::default();
        let mut rng = seeded(9);

        let events = scheduler.tick(100, &mut state, &mut rng);
        let target = events.gaze_target.expect("look timer fires at first deadline");
        assert!(target.x.abs() <= 1.0 && target.y.abs() <= 1.0);
        assert_eq!(state.left.gaze, Gaze::FRONT.approach(target, 0.5));
        assert_eq!(state.left.gaze, state.right.gaze);
    }

    #[test]
    fn all_zero_weights_keep_current_emotion() {
        let settings = BehaviorSettings {
            random_behavior: true,
            behavior_interval_ms: 10,
            ..quiet()
        };
        let mut scheduler = BehaviorScheduler::new(settings, 0);
        let mut state = FaceState {
            emotion: Emotion::Sad,
            ..FaceState::default()
        };
        let mut rng = seeded(2);

        for now in (10..10_000).step_by(10) {
            let events = scheduler.tick(now, &mut state, &mut rng);
            assert_eq!(events.emotion_selected, None);
        }
        assert_eq!(state.emotion, Emotion::Sad);
    }

    #[test]
    fn weighted_selection_converges_to_ratio() {
        let mut weights = EmotionWeights::new();
        weights.set(Emotion::Normal, 1.0).unwrap();
        weights.set(Emotion::Happy, 2.0).unwrap();
        weights.set(Emotion::Angry, 3.0).unwrap();
        let mut rng = seeded(42);

        let samples = 60_000;
        let mut counts = [0usize; Emotion::COUNT];
        for _ in 0..samples {
            let emotion = weights.sample(rng.next_unit()).unwrap();
            counts[emotion.index()] += 1;
        }
        let share = |emotion: Emotion| counts[emotion.index()] as f32 / samples as f32;
        assert!((share(Emotion::Normal) - 1.0 / 6.0).abs() < 0.01);
        assert!((share(Emotion::Happy) - 2.0 / 6.0).abs() < 0.01);
        assert!((share(Emotion::Angry) - 3.0 / 6.0).abs() < 0.01);
        assert_eq!(counts.iter().sum::<usize>(), samples);
    }

    #[test]
    fn manual_blink_ignores_random_flag() {
        let mut scheduler = BehaviorScheduler::new(quiet(), 0);
        let mut state = FaceState::default();
        let mut rng = seeded(1);

        scheduler.request_blink();
        let events = scheduler.tick(10, &mut state, &mut rng);
        assert!(events.blink_started);
        assert!(scheduler.is_blinking());

        // A second request mid-blink does not restart the animation.
        scheduler.request_blink();
        let events = scheduler.tick(60, &mut state, &mut rng);
        assert!(!events.blink_started);
        assert_eq!(state.left.openness, 0.5);
    }

    #[test]
    fn disabled_flags_still_rearm_timers() {
        let settings = BehaviorSettings {
            blink_interval_ms: 100,
            ..quiet()
        };
        let mut scheduler = BehaviorScheduler::new(settings, 0);
        let mut state = FaceState::default();
        let mut rng = seeded(4);

        for now in (100..1000).step_by(100) {
            assert!(scheduler.tick(now, &mut state, &mut rng).is_empty());
        }
        scheduler.set_random_blink(true);
        let fired = (1000..2000)
            .step_by(100)
            .any(|now| scheduler.tick(now, &mut state, &mut rng).blink_started);
        assert!(fired);
    }

    #[test]
    fn slow_ticks_still_close_the_eyes() {
        let settings = BehaviorSettings {
            random_blink: true,
            blink_interval_ms: 1000,
            blink_duration_ms: 500,
            ..quiet()
        };
        let mut scheduler = BehaviorScheduler::new(settings, 0);
        let mut state = FaceState::default();
        let mut rng = seeded(8);

        let mut openness = Vec::new();
        for now in (250..=1500).step_by(250) {
            scheduler.tick(now, &mut state, &mut rng);
            openness.push(state.left.openness);
        }
        assert_eq!(openness, [1.0, 1.0, 1.0, 1.0, 0.0, 1.0]);
        assert!(!scheduler.is_blinking());
    }

    #[test]
    fn runtime_weight_changes_are_validated() {
        let mut scheduler = BehaviorScheduler::new(quiet(), 0);
        scheduler.set_emotion_weight(Emotion::Glee, 1.5).unwrap();
        assert_eq!(scheduler.weights().get(Emotion::Glee), 1.5);

        assert!(scheduler.set_emotion_weight(Emotion::Glee, -0.5).is_err());
        assert!(scheduler.set_emotion_weight(Emotion::Sad, f32::NAN).is_err());
        assert_eq!(scheduler.weights().get(Emotion::Glee), 1.5);
        assert_eq!(scheduler.weights().total(), 1.5);
    }

    #[test]
    fn per_eye_override_wins() {
        let mut state = FaceState::default();
        state.right.emotion_override = Some(Emotion::Confused);
        assert_eq!(state.left.emotion(state.emotion), Emotion::Normal);
        assert_eq!(state.right.emotion(state.emotion), Emotion::Confused);
    }
}
