//! Core library for the ESP Eyes animated display component.
//!
//! Two eyes are drawn on a small monochrome display and brought to life by
//! three independent timers: one blinks, one glances around and one switches
//! between weighted emotions. A host drives the [`EyesComponent`] through the
//! [`Component`] lifecycle (initialize, tick, teardown) and lends it a
//! [`DisplaySurface`] for the duration of each tick.

pub mod behavior;
pub mod component;
pub mod config;
pub mod display;
pub mod emotion;
pub mod error;
pub mod expression;
pub mod geometry;
pub mod random;
pub mod render;
pub mod timeline;

pub use behavior::{BehaviorScheduler, BehaviorSettings, EyeState, FaceState, TickEvents};
pub use component::{Component, ComponentState, EyesComponent, TickReport};
pub use config::{EmotionWeight, EyesConfig};
pub use display::{DisplaySurface, FrameBuffer};
pub use emotion::{Emotion, EmotionWeights};
pub use error::{EyesError, Result};
pub use expression::{ExpressionEngine, EyeShape, Gaze};
pub use geometry::{EyeLayout, Rect, Side};
pub use random::RandomSource;
pub use render::Renderer;
pub use timeline::{BlinkAnimation, IntervalTimer};
