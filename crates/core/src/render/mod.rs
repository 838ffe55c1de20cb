use std::time::{Duration, Instant};

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle, RoundedRectangle};

use crate::behavior::FaceState;
use crate::display::DisplaySurface;
use crate::expression::{EyeShape, ExpressionEngine};
use crate::geometry::{EyeLayout, Rect, Side};
use crate::Result;

/// Draws both eyes for the current [`FaceState`] and commits the frame.
#[derive(Debug, Clone)]
pub struct Renderer {
    layout: EyeLayout,
    engine: ExpressionEngine,
    frame_budget: Duration,
}

impl Renderer {
    pub fn new(layout: EyeLayout, frame_budget: Duration) -> Self {
        Self {
            layout,
            engine: ExpressionEngine::new(),
            frame_budget,
        }
    }

    pub fn layout(&self) -> &EyeLayout {
        &self.layout
    }

    /// Shapes for both eyes, left first.
    pub fn shapes(&self, state: &FaceState) -> [EyeShape; 2] {
        Side::BOTH.map(|side| {
            let eye = state.eye(side);
            self.engine.shape(
                self.layout.region(side),
                self.layout.max_gaze_shift,
                side,
                eye.emotion(state.emotion),
                eye.openness,
                eye.gaze,
            )
        })
    }

    /// Clears the surface, draws both eyes and flushes. The same state
    /// always produces the same frame.
    pub fn render<D: DisplaySurface>(&self, state: &FaceState, display: &mut D) -> Result<()> {
        let started = Instant::now();

        display.clear(BinaryColor::Off)?;
        for shape in self.shapes(state) {
            draw_eye(display, &shape)?;
        }
        display.flush()?;

        let elapsed = started.elapsed();
        if elapsed > self.frame_budget {
            tracing::warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                budget_ms = self.frame_budget.as_millis() as u64,
                "frame took longer than the update interval"
            );
        }
        Ok(())
    }
}

fn to_rectangle(rect: Rect) -> Rectangle {
    Rectangle::new(Point::new(rect.x, rect.y), Size::new(rect.width, rect.height))
}

fn draw_eye<D: DisplaySurface>(display: &mut D, shape: &EyeShape) -> Result<()> {
    if !shape.is_visible() {
        return Ok(());
    }
    let body = shape.body;
    let erase = PrimitiveStyle::with_fill(BinaryColor::Off);

    let radius = Size::new(shape.corner_radius, shape.corner_radius);
    RoundedRectangle::with_equal_corners(to_rectangle(body), radius)
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(display)?;

    // One column span per x keeps a mirrored lid pixel-identical.
    if let Some(lid) = shape.top_lid {
        let span = i64::from(body.width.saturating_sub(1)).max(1);
        for column in 0..body.width {
            let c = i64::from(column);
            let drop = (i64::from(lid.left_drop) * (span - c)
                + i64::from(lid.right_drop) * c
                + span / 2)
                / span;
            if drop > 0 {
                Rectangle::new(
                    Point::new(body.x + column as i32, body.y),
                    Size::new(1, drop as u32),
                )
                .into_styled(erase)
                .draw(display)?;
            }
        }
    }

    if let Some(curve) = shape.bottom_curve {
        let bottom = body.bottom() - 1;
        let half = body.width as f32 / 2.0;
        let (cx, _) = body.center();
        for row in 0..curve {
            let reach = half * (1.0 - row as f32 / curve as f32).sqrt();
            let start = (cx - reach).round() as i32;
            let end = (cx + reach).round() as i32;
            if end > start {
                let y = bottom - row as i32;
                Line::new(Point::new(start, y), Point::new(end - 1, y))
                    .into_styled(PrimitiveStyle::with_stroke(BinaryColor::Off, 1))
                    .draw(display)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::FrameBuffer;
    use crate::expression::Gaze;
    use crate::{Emotion, EyesError};

    fn renderer() -> Renderer {
        let layout = EyeLayout::compute(128, 64, 20, 4).unwrap();
        Renderer::new(layout, Duration::from_millis(50))
    }

    fn frame(state: &FaceState) -> FrameBuffer {
        let mut fb = FrameBuffer::new(128, 64);
        renderer().render(state, &mut fb).unwrap();
        fb
    }

    #[test]
    fn same_state_same_frame() {
        let mut state = FaceState::default();
        state.emotion = Emotion::Angry;
        state.left.openness = 0.6;
        state.left.gaze = Gaze::new(0.3, -0.4);
        state.right = state.left;

        let mut fb = FrameBuffer::new(128, 64);
        let renderer = renderer();
        renderer.render(&state, &mut fb).unwrap();
        let first = fb.pixels().to_vec();
        renderer.render(&state, &mut fb).unwrap();
        assert_eq!(first, fb.pixels());
        assert_eq!(fb.flushes(), 2);
    }

    #[test]
    fn eyes_stay_inside_their_regions() {
        for emotion in Emotion::ALL {
            let state = FaceState {
                emotion,
                ..FaceState::default()
            };
            let fb = frame(&state);
            let layout = *renderer().layout();
            assert!(fb.lit_count() > 0, "{emotion} drew nothing");
            for y in 0..64 {
                for x in 0..128 {
                    if fb.pixel(x, y) {
                        let inside = [layout.left, layout.right].iter().any(|r| {
                            x >= r.x && x < r.right() && y >= r.y && y < r.bottom()
                        });
                        assert!(inside, "{emotion} lit ({x}, {y}) outside the eyes");
                    }
                }
            }
        }
    }

    #[test]
    fn symmetric_state_draws_mirrored_eyes() {
        let state = FaceState {
            emotion: Emotion::Angry,
            ..FaceState::default()
        };
        let fb = frame(&state);
        let layout = *renderer().layout();
        for y in layout.left.y..layout.left.bottom() {
            for dx in 0..layout.left.width as i32 {
                let left = fb.pixel(layout.left.x + dx, y);
                let right = fb.pixel(layout.right.right() - 1 - dx, y);
                assert_eq!(left, right, "asymmetry at row {y}, column {dx}");
            }
        }
    }

    #[test]
    fn closed_eyes_leave_screen_blank() {
        let mut state = FaceState::default();
        state.left.openness = 0.0;
        state.right.openness = 0.0;
        assert_eq!(frame(&state).lit_count(), 0);
    }

    #[test]
    fn lids_remove_pixels() {
        let normal = frame(&FaceState::default()).lit_count();
        let angry = frame(&FaceState {
            emotion: Emotion::Angry,
            ..FaceState::default()
        })
        .lit_count();
        let happy = frame(&FaceState {
            emotion: Emotion::Happy,
            ..FaceState::default()
        })
        .lit_count();
        assert!(angry < normal);
        assert!(happy < normal);
    }

    #[test]
    fn flush_failure_propagates() {
        let mut fb = FrameBuffer::new(128, 64);
        fb.fail_next_flush();
        let err = renderer().render(&FaceState::default(), &mut fb).unwrap_err();
        assert!(matches!(err, EyesError::Render(_)));
    }
}
