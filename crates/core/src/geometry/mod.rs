use serde::{Deserialize, Serialize};

use crate::{EyesError, Result};

/// Axis aligned, half-open pixel rectangle: covers `x..x + width` and
/// `y..y + height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Which of the two eyes a shape belongs to. Expressions are mirrored
/// between sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];
}

/// Placement of both eyes on the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EyeLayout {
    pub screen: Rect,
    pub left: Rect,
    pub right: Rect,
    /// Largest distance, in pixels, the gaze may shift an eye body.
    pub max_gaze_shift: u32,
}

impl EyeLayout {
    /// Places two square eyes of side `eye_size`, `eye_distance` pixels
    /// apart, centered on the screen.
    ///
    /// Layouts that do not fit are rejected rather than clamped.
    pub fn compute(
        screen_width: u16,
        screen_height: u16,
        eye_size: u16,
        eye_distance: u16,
    ) -> Result<Self> {
        if screen_width == 0 || screen_height == 0 {
            return Err(EyesError::config(format!(
                "screen dimensions must be positive, got {screen_width}x{screen_height}"
            )));
        }
        if eye_size == 0 {
            return Err(EyesError::config("eye_size must be positive"));
        }

        let (width, height) = (u32::from(screen_width), u32::from(screen_height));
        let size = u32::from(eye_size);
        let span = 2 * size + u32::from(eye_distance);
        if span > width {
            return Err(EyesError::config(format!(
                "eyes need {span}px horizontally (2 x eye_size {size} + eye_distance {eye_distance}) \
                 but the screen is {width}px wide"
            )));
        }
        if size > height {
            return Err(EyesError::config(format!(
                "eye_size {size} exceeds screen height {height}"
            )));
        }

        let left_x = ((width - span) / 2) as i32;
        let y = ((height - size) / 2) as i32;
        let left = Rect::new(left_x, y, size, size);
        let right = Rect::new(left.right() + i32::from(eye_distance), y, size, size);

        Ok(Self {
            screen: Rect::new(0, 0, width, height),
            left,
            right,
            max_gaze_shift: (size / 5).max(1),
        })
    }

    pub fn region(&self, side: Side) -> Rect {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}
