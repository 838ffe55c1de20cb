//! Drawing surface abstraction and an in-memory monochrome implementation.
//!
//! Rasterisation is left to `embedded-graphics`: any monochrome
//! [`DrawTarget`] that can also commit a frame is a [`DisplaySurface`].

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::{EyesError, Result};

/// Monochrome draw target that knows how to push a finished frame to the
/// physical device.
pub trait DisplaySurface: DrawTarget<Color = BinaryColor, Error = EyesError> {
    /// Commits the frame to the physical device.
    fn flush(&mut self) -> Result<()>;

    fn width(&self) -> u16 {
        u16::try_from(self.bounding_box().size.width).unwrap_or(u16::MAX)
    }

    fn height(&self) -> u16 {
        u16::try_from(self.bounding_box().size.height).unwrap_or(u16::MAX)
    }
}

/// Frame buffer holding one [`BinaryColor`] per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    size: Size,
    pixels: Vec<BinaryColor>,
    flushes: u64,
    fail_next_flush: bool,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            size: Size::new(u32::from(width), u32::from(height)),
            pixels: vec![BinaryColor::Off; usize::from(width) * usize::from(height)],
            flushes: 0,
            fail_next_flush: false,
        }
    }

    pub fn pixel(&self, x: i32, y: i32) -> bool {
        self.index(Point::new(x, y))
            .is_some_and(|i| self.pixels[i].is_on())
    }

    pub fn pixels(&self) -> &[BinaryColor] {
        &self.pixels
    }

    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|p| p.is_on()).count()
    }

    /// Number of successful flushes so far.
    pub fn flushes(&self) -> u64 {
        self.flushes
    }

    /// Makes the next [`DisplaySurface::flush`] fail, as a disconnected
    /// panel would.
    pub fn fail_next_flush(&mut self) {
        self.fail_next_flush = true;
    }

    /// Renders the buffer as text, one line per row.
    pub fn to_ascii(&self, on: char, off: char) -> String {
        let width = (self.size.width as usize).max(1);
        let mut out = String::with_capacity(self.pixels.len() + self.pixels.len() / width);
        for row in self.pixels.chunks(width) {
            out.extend(row.iter().map(|p| if p.is_on() { on } else { off }));
            out.push('\n');
        }
        out
    }

    fn index(&self, point: Point) -> Option<usize> {
        let (x, y) = (usize::try_from(point.x).ok()?, usize::try_from(point.y).ok()?);
        let (width, height) = (self.size.width as usize, self.size.height as usize);
        (x < width && y < height).then(|| y * width + x)
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = EyesError;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<()>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(i) = self.index(point) {
                self.pixels[i] = color;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<()> {
        self.pixels.fill(color);
        Ok(())
    }
}

impl DisplaySurface for FrameBuffer {
    fn flush(&mut self) -> Result<()> {
        if std::mem::take(&mut self.fail_next_flush) {
            return Err(EyesError::render("frame buffer flush rejected"));
        }
        self.flushes += 1;
        Ok(())
    }
}
