//! Host facing facade: owns the configuration, scheduler, renderer and face
//! state, and walks through the component lifecycle.

use std::time::Duration;

use rand::rngs::StdRng;

use crate::behavior::{BehaviorScheduler, FaceState, TickEvents};
use crate::display::DisplaySurface;
use crate::expression::Gaze;
use crate::geometry::{EyeLayout, Side};
use crate::random::{self, RandomSource};
use crate::render::Renderer;
use crate::{Emotion, EyesConfig, EyesError, Result};

/// Capability set a host framework drives a display component through.
pub trait Component {
    /// Validates `config` and binds the component to `display`.
    fn initialize<D: DisplaySurface>(
        &mut self,
        config: EyesConfig,
        display: &D,
        now_ms: u64,
    ) -> Result<()>;

    /// Runs one update cycle. The display is only borrowed for this call.
    fn tick<D: DisplaySurface>(&mut self, now_ms: u64, display: &mut D) -> Result<TickReport>;

    /// Releases all runtime state. Safe to call at any point between ticks.
    fn teardown(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentState {
    Uninitialized,
    Configured,
    Running,
    Stopped,
}

/// Outcome of one [`Component::tick`] call.
#[derive(Debug, Default)]
pub struct TickReport {
    /// The call arrived before the update interval elapsed; nothing ran.
    pub skipped: bool,
    pub events: TickEvents,
    /// Display failure during this tick. The next tick draws again.
    pub render_error: Option<EyesError>,
}

impl TickReport {
    fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }
}

#[derive(Debug)]
struct Runtime {
    config: EyesConfig,
    scheduler: BehaviorScheduler,
    renderer: Renderer,
    face: FaceState,
    last_update_ms: u64,
}

/// Animated eyes component.
#[derive(Debug)]
pub struct EyesComponent<R = StdRng> {
    state: ComponentState,
    rng: R,
    runtime: Option<Runtime>,
}

impl EyesComponent<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(random::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(random::seeded(seed))
    }
}

impl Default for EyesComponent<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource> EyesComponent<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            state: ComponentState::Uninitialized,
            rng,
            runtime: None,
        }
    }

    pub fn state(&self) -> ComponentState {
        self.state
    }

    pub fn config(&self) -> Option<&EyesConfig> {
        self.runtime.as_ref().map(|rt| &rt.config)
    }

    pub fn face(&self) -> Option<&FaceState> {
        self.runtime.as_ref().map(|rt| &rt.face)
    }

    pub fn layout(&self) -> Option<&EyeLayout> {
        self.runtime.as_ref().map(|rt| rt.renderer.layout())
    }

    /// Replaces the current emotion until the behavior timer picks another.
    pub fn set_emotion(&mut self, emotion: Emotion) -> Result<()> {
        self.runtime_mut()?.face.emotion = emotion;
        Ok(())
    }

    /// Gives one eye its own emotion; `None` returns it to the shared one.
    pub fn set_eye_emotion(&mut self, side: Side, emotion: Option<Emotion>) -> Result<()> {
        self.runtime_mut()?.face.eye_mut(side).emotion_override = emotion;
        Ok(())
    }

    pub fn set_emotion_weight(&mut self, emotion: Emotion, weight: f32) -> Result<()> {
        self.runtime_mut()?
            .scheduler
            .set_emotion_weight(emotion, weight)
    }

    pub fn look_at(&mut self, x: f32, y: f32) -> Result<()> {
        self.runtime_mut()?.face.gaze_target = Gaze::new(x, y);
        Ok(())
    }

    pub fn look_left(&mut self) -> Result<()> {
        self.look(Gaze::LEFT)
    }

    pub fn look_right(&mut self) -> Result<()> {
        self.look(Gaze::RIGHT)
    }

    pub fn look_front(&mut self) -> Result<()> {
        self.look(Gaze::FRONT)
    }

    pub fn look_top(&mut self) -> Result<()> {
        self.look(Gaze::TOP)
    }

    pub fn look_bottom(&mut self) -> Result<()> {
        self.look(Gaze::BOTTOM)
    }

    pub fn blink(&mut self) -> Result<()> {
        self.runtime_mut()?.scheduler.request_blink();
        Ok(())
    }

    pub fn set_random_behavior(&mut self, enabled: bool) -> Result<()> {
        self.runtime_mut()?.scheduler.set_random_behavior(enabled);
        Ok(())
    }

    pub fn set_random_blink(&mut self, enabled: bool) -> Result<()> {
        self.runtime_mut()?.scheduler.set_random_blink(enabled);
        Ok(())
    }

    pub fn set_random_look(&mut self, enabled: bool) -> Result<()> {
        self.runtime_mut()?.scheduler.set_random_look(enabled);
        Ok(())
    }

    pub fn set_blink_interval(&mut self, interval_ms: u32) -> Result<()> {
        let rt = self.runtime_mut()?;
        rt.scheduler.set_blink_interval(interval_ms, rt.last_update_ms);
        Ok(())
    }

    pub fn set_look_interval(&mut self, interval_ms: u32) -> Result<()> {
        let rt = self.runtime_mut()?;
        rt.scheduler.set_look_interval(interval_ms, rt.last_update_ms);
        Ok(())
    }

    pub fn set_behavior_interval(&mut self, interval_ms: u32) -> Result<()> {
        let rt = self.runtime_mut()?;
        rt.scheduler
            .set_behavior_interval(interval_ms, rt.last_update_ms);
        Ok(())
    }

    fn look(&mut self, gaze: Gaze) -> Result<()> {
        self.runtime_mut()?.face.gaze_target = gaze;
        Ok(())
    }

    fn runtime_mut(&mut self) -> Result<&mut Runtime> {
        match self.state {
            ComponentState::Configured | ComponentState::Running => self
                .runtime
                .as_mut()
                .ok_or_else(|| EyesError::state("component has no runtime")),
            other => Err(EyesError::state(format!(
                "controls are unavailable while {other:?}"
            ))),
        }
    }
}

impl<R: RandomSource> Component for EyesComponent<R> {
    fn initialize<D: DisplaySurface>(
        &mut self,
        config: EyesConfig,
        display: &D,
        now_ms: u64,
    ) -> Result<()> {
        if self.state != ComponentState::Uninitialized {
            return Err(EyesError::state(format!(
                "initialize called while {:?}",
                self.state
            )));
        }
        config.validate()?;

        let (width, height) = (display.width(), display.height());
        if (width, height) != (config.screen_width, config.screen_height) {
            tracing::warn!(
                configured = %format!("{}x{}", config.screen_width, config.screen_height),
                actual = %format!("{width}x{height}"),
                "display size differs from configuration, using the display's"
            );
        }
        let layout = EyeLayout::compute(width, height, config.eye_size, config.eye_distance)?;
        let scheduler = BehaviorScheduler::new(config.behavior_settings()?, now_ms);
        let renderer = Renderer::new(
            layout,
            Duration::from_millis(u64::from(config.update_interval)),
        );

        tracing::info!(
            display = config.display_id.as_deref().unwrap_or_default(),
            screen = %format!("{width}x{height}"),
            eye_size = config.eye_size,
            eye_distance = config.eye_distance,
            update_interval_ms = config.update_interval,
            "eyes component configured"
        );
        tracing::debug!(
            random_behavior = config.random_behavior,
            random_blink = config.random_blink,
            random_look = config.random_look,
            blink_interval_ms = config.blink_interval,
            look_interval_ms = config.look_interval,
            behavior_interval_ms = config.behavior_interval,
            "behavior settings"
        );

        self.runtime = Some(Runtime {
            config,
            scheduler,
            renderer,
            face: FaceState::default(),
            last_update_ms: now_ms,
        });
        self.state = ComponentState::Configured;
        Ok(())
    }

    fn tick<D: DisplaySurface>(&mut self, now_ms: u64, display: &mut D) -> Result<TickReport> {
        match self.state {
            ComponentState::Configured | ComponentState::Running => {}
            other => {
                return Err(EyesError::state(format!("tick called while {other:?}")));
            }
        }
        let rt = self
            .runtime
            .as_mut()
            .ok_or_else(|| EyesError::state("component has no runtime"))?;

        let interval = u64::from(rt.config.update_interval);
        if self.state == ComponentState::Running
            && now_ms >= rt.last_update_ms
            && now_ms - rt.last_update_ms < interval
        {
            return Ok(TickReport::skipped());
        }
        if self.state == ComponentState::Configured {
            self.state = ComponentState::Running;
            tracing::info!(now_ms, "eyes component running");
        }
        rt.last_update_ms = now_ms;

        let events = rt.scheduler.tick(now_ms, &mut rt.face, &mut self.rng);
        let render_error = match rt.renderer.render(&rt.face, display) {
            Ok(()) => None,
            Err(err) => {
                tracing::warn!(now_ms, error = %err, "frame not drawn");
                Some(err)
            }
        };

        Ok(TickReport {
            skipped: false,
            events,
            render_error,
        })
    }

    fn teardown(&mut self) {
        if self.state != ComponentState::Stopped {
            tracing::info!(from = ?self.state, "eyes component stopped");
        }
        self.runtime = None;
        self.state = ComponentState::Stopped;
    }
}
