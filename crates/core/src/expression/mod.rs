//! Pure mapping from emotion, openness and gaze to a drawable eye shape.
//!
//! Every emotion owns an [`ExpressionPreset`] describing how the eye body is
//! scaled and which parts of it the eyelids cover. Presets are written for
//! the left eye and mirrored for the right one.

use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, Side};
use crate::Emotion;

/// Normalised gaze direction. Both components lie in `[-1, 1]`; negative
/// `x` looks left, negative `y` looks up.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Gaze {
    pub x: f32,
    pub y: f32,
}

impl Gaze {
    pub const FRONT: Gaze = Gaze { x: 0.0, y: 0.0 };
    pub const LEFT: Gaze = Gaze { x: -1.0, y: 0.0 };
    pub const RIGHT: Gaze = Gaze { x: 1.0, y: 0.0 };
    pub const TOP: Gaze = Gaze { x: 0.0, y: -1.0 };
    pub const BOTTOM: Gaze = Gaze { x: 0.0, y: 1.0 };

    /// Builds a gaze, clamping into bounds. Non-finite components become 0.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: sanitize(x).clamp(-1.0, 1.0),
            y: sanitize(y).clamp(-1.0, 1.0),
        }
    }

    /// Moves `factor` of the way towards `target`, snapping once close.
    pub fn approach(self, target: Gaze, factor: f32) -> Gaze {
        let dx = target.x - self.x;
        let dy = target.y - self.y;
        if dx.abs() < 0.01 && dy.abs() < 0.01 {
            return target;
        }
        Gaze::new(self.x + dx * factor, self.y + dy * factor)
    }
}

fn sanitize(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Shape modifiers for one emotion, expressed as fractions so they scale
/// with the configured eye size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpressionPreset {
    /// Body width relative to the usable eye width.
    pub width: f32,
    /// Body height relative to the usable eye height.
    pub height: f32,
    /// Vertical shift relative to the eye region height; negative moves up.
    pub offset_y: f32,
    /// Share of the body covered by the top lid at the outer corner.
    pub lid_outer: f32,
    /// Share of the body covered by the top lid at the inner corner.
    pub lid_inner: f32,
    /// Height of the curved lower lid relative to the body height.
    pub lower_curve: f32,
    /// Corner radius relative to the shorter body side.
    pub radius: f32,
}

impl ExpressionPreset {
    const fn new(
        width: f32,
        height: f32,
        offset_y: f32,
        lid_outer: f32,
        lid_inner: f32,
        lower_curve: f32,
        radius: f32,
    ) -> Self {
        Self {
            width,
            height,
            offset_y,
            lid_outer,
            lid_inner,
            lower_curve,
            radius,
        }
    }

    pub fn for_emotion(emotion: Emotion) -> Self {
        use Emotion::*;
        //                  width height  off_y  outer  inner  curve  radius
        match emotion {
            Normal => Self::new(0.90, 0.90, 0.00, 0.00, 0.00, 0.00, 0.25),
            Happy => Self::new(0.90, 0.90, 0.00, 0.00, 0.00, 0.45, 0.25),
            Sad => Self::new(0.90, 0.80, 0.05, 0.45, 0.10, 0.00, 0.25),
            Angry => Self::new(0.90, 0.80, 0.00, 0.05, 0.50, 0.00, 0.20),
            Surprised => Self::new(1.00, 1.00, 0.00, 0.00, 0.00, 0.00, 0.50),
            Fearful => Self::new(0.80, 0.95, -0.05, 0.25, 0.10, 0.00, 0.30),
            Disgusted => Self::new(0.90, 0.60, 0.10, 0.10, 0.25, 0.20, 0.20),
            Glee => Self::new(0.95, 0.90, 0.00, 0.00, 0.00, 0.60, 0.30),
            Content => Self::new(0.90, 0.50, 0.15, 0.00, 0.00, 0.25, 0.25),
            Relaxed => Self::new(0.90, 0.45, 0.15, 0.15, 0.15, 0.00, 0.25),
            Focused => Self::new(0.95, 0.40, 0.00, 0.20, 0.30, 0.00, 0.15),
            Confused => Self::new(0.80, 0.80, -0.05, 0.00, 0.20, 0.00, 0.25),
            Frustrated => Self::new(0.90, 0.55, 0.10, 0.10, 0.40, 0.00, 0.20),
            Determined => Self::new(0.90, 0.60, 0.00, 0.00, 0.35, 0.00, 0.15),
            Concerned => Self::new(0.85, 0.75, 0.05, 0.35, 0.00, 0.00, 0.25),
            Expectant => Self::new(0.95, 1.00, -0.10, 0.00, 0.00, 0.00, 0.35),
            Joyful => Self::new(0.90, 0.85, -0.05, 0.00, 0.00, 0.50, 0.40),
            Loving => Self::new(0.85, 0.80, 0.00, 0.00, 0.00, 0.35, 0.50),
        }
    }
}

/// Straight top eyelid: everything above the line from
/// `(body.x, body.y + left_drop)` to `(body.right() - 1, body.y + right_drop)`
/// is erased.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LidCut {
    pub left_drop: u32,
    pub right_drop: u32,
}

/// Everything the renderer needs to draw one eye.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EyeShape {
    pub body: Rect,
    pub corner_radius: u32,
    pub top_lid: Option<LidCut>,
    /// Peak height of the curved lower lid, at the body's center column.
    pub bottom_curve: Option<u32>,
}

impl EyeShape {
    pub fn is_visible(&self) -> bool {
        !self.body.is_empty()
    }
}

/// Stateless shape builder.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionEngine;

impl ExpressionEngine {
    pub fn new() -> Self {
        Self
    }

    /// Computes the shape of the eye occupying `region`.
    ///
    /// `max_shift` is how far the gaze may move the body, in pixels. The
    /// returned body always lies inside `region`.
    pub fn shape(
        &self,
        region: Rect,
        max_shift: u32,
        side: Side,
        emotion: Emotion,
        openness: f32,
        gaze: Gaze,
    ) -> EyeShape {
        let preset = ExpressionPreset::for_emotion(emotion);
        let openness = sanitize(openness).clamp(0.0, 1.0);
        let gaze = Gaze::new(gaze.x, gaze.y);

        let shift = max_shift.min(region.width.min(region.height) / 2);
        let usable_w = region.width.saturating_sub(2 * shift).max(1);
        let usable_h = region.height.saturating_sub(2 * shift).max(1);

        let width = scale(usable_w, preset.width).max(1);
        let full_height = scale(usable_h, preset.height).max(1);
        let height = if openness <= 0.0 {
            0
        } else {
            scale(full_height, openness).max(1)
        };

        // Horizontal placement is computed from the outer edge so that both
        // eyes round the same way and stay exact mirror images.
        let outward = match side {
            Side::Left => gaze.x,
            Side::Right => -gaze.x,
        };
        let max_x = region.width.saturating_sub(width) as i32;
        let from_outer = place(
            (region.width as f32 - width as f32) / 2.0 + outward * shift as f32,
            max_x,
        );
        let x = match side {
            Side::Left => region.x + from_outer,
            Side::Right => region.right() - width as i32 - from_outer,
        };

        let max_y = region.height.saturating_sub(height) as i32;
        let from_top = place(
            (region.height as f32 - height as f32) / 2.0
                + preset.offset_y * region.height as f32
                + gaze.y * shift as f32,
            max_y,
        );
        let body = Rect::new(x, region.y + from_top, width, height);

        if body.is_empty() {
            return EyeShape {
                body,
                corner_radius: 0,
                top_lid: None,
                bottom_curve: None,
            };
        }

        let outer = scale(height, preset.lid_outer);
        let inner = scale(height, preset.lid_inner);
        let top_lid = (outer > 0 || inner > 0).then(|| match side {
            Side::Left => LidCut {
                left_drop: outer,
                right_drop: inner,
            },
            Side::Right => LidCut {
                left_drop: inner,
                right_drop: outer,
            },
        });

        let curve = scale(height, preset.lower_curve);
        let bottom_curve = (curve > 0).then_some(curve);

        let corner_radius = scale(width.min(height), preset.radius).min(width.min(height) / 2);

        EyeShape {
            body,
            corner_radius,
            top_lid,
            bottom_curve,
        }
    }
}

fn scale(value: u32, factor: f32) -> u32 {
    (value as f32 * factor).round().max(0.0) as u32
}

fn place(offset: f32, max: i32) -> i32 {
    (offset.round() as i32).clamp(0, max.max(0))
}
