//! Full-screen pixel frame for the 16x16 matrix

use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

/// Matrix width in pixels
pub const MATRIX_WIDTH: usize = 16;

/// Matrix height in pixels
pub const MATRIX_HEIGHT: usize = 16;

/// Total pixel count
pub const MATRIX_PIXELS: usize = MATRIX_WIDTH * MATRIX_HEIGHT;

/// Errors from rectangular block writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlockError {
    /// Block extends past the frame edge
    OutOfBounds,
    /// Pixel count does not match width × height
    LengthMismatch,
}

/// A 16x16 grid of RGB-565 colors, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelFrame {
    pixels: [Rgb565; MATRIX_PIXELS],
}

impl Default for PixelFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelFrame {
    /// Create an all-black frame
    pub const fn new() -> Self {
        Self::filled(Rgb565::BLACK)
    }

    /// Create a frame filled with one color
    pub const fn filled(color: Rgb565) -> Self {
        Self {
            pixels: [color; MATRIX_PIXELS],
        }
    }

    /// Set every pixel to black
    pub fn clear(&mut self) {
        self.fill(Rgb565::BLACK);
    }

    /// Set every pixel to `color`
    pub fn fill(&mut self, color: Rgb565) {
        self.pixels.fill(color);
    }

    const fn index(x: usize, y: usize) -> Option<usize> {
        if x < MATRIX_WIDTH && y < MATRIX_HEIGHT {
            Some(y * MATRIX_WIDTH + x)
        } else {
            None
        }
    }

    /// Color at (x, y), or `None` outside the frame
    pub fn get(&self, x: usize, y: usize) -> Option<Rgb565> {
        Self::index(x, y).map(|i| self.pixels[i])
    }

    /// Set the color at (x, y)
    ///
    /// Returns `false` (and writes nothing) outside the frame.
    pub fn set(&mut self, x: usize, y: usize, color: Rgb565) -> bool {
        match Self::index(x, y) {
            Some(i) => {
                self.pixels[i] = color;
                true
            }
            None => false,
        }
    }

    /// Copy a row-major block of pixels into the frame
    ///
    /// The whole block is validated first; on error the frame is untouched.
    pub fn write_block(
        &mut self,
        x: u8,
        y: u8,
        width: u8,
        height: u8,
        pixels: &[Rgb565],
    ) -> Result<(), BlockError> {
        let (x, y, w, h) = (x as usize, y as usize, width as usize, height as usize);
        if x + w > MATRIX_WIDTH || y + h > MATRIX_HEIGHT {
            return Err(BlockError::OutOfBounds);
        }
        if pixels.len() != w * h {
            return Err(BlockError::LengthMismatch);
        }
        if w == 0 {
            return Ok(());
        }

        for (row, src) in pixels.chunks_exact(w).enumerate() {
            let start = (y + row) * MATRIX_WIDTH + x;
            self.pixels[start..start + w].copy_from_slice(src);
        }
        Ok(())
    }

    /// Overwrite this frame with another, pixel for pixel
    pub fn copy_from(&mut self, other: &PixelFrame) {
        self.pixels.copy_from_slice(&other.pixels);
    }

    /// All pixels, row-major
    pub fn pixels(&self) -> &[Rgb565; MATRIX_PIXELS] {
        &self.pixels
    }

    /// Mutable access to all pixels, row-major
    pub fn pixels_mut(&mut self) -> &mut [Rgb565; MATRIX_PIXELS] {
        &mut self.pixels
    }

    /// Number of pixels that are not black
    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|&&c| c != Rgb565::BLACK).count()
    }
}

impl OriginDimensions for PixelFrame {
    fn size(&self) -> Size {
        Size::new(MATRIX_WIDTH as u32, MATRIX_HEIGHT as u32)
    }
}

impl DrawTarget for PixelFrame {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            // Clip anything drawn off the edge
            if let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) {
                self.set(x, y, color);
            }
        }
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PixelFrame {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "PixelFrame[{} lit]", self.lit_count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    #[test]
    fn test_new_frame_is_black() {
        let frame = PixelFrame::new();
        assert_eq!(frame.lit_count(), 0);
        assert_eq!(frame.get(15, 15), Some(Rgb565::BLACK));
        assert_eq!(frame.get(16, 0), None);
    }

    #[test]
    fn test_set_out_of_bounds_is_ignored() {
        let mut frame = PixelFrame::new();
        assert!(!frame.set(0, 16, Rgb565::RED));
        assert!(frame.set(3, 4, Rgb565::RED));
        assert_eq!(frame.lit_count(), 1);
        assert_eq!(frame.pixels()[4 * MATRIX_WIDTH + 3], Rgb565::RED);
    }

    #[test]
    fn test_write_block_row_major() {
        let mut frame = PixelFrame::new();
        let block = [Rgb565::RED, Rgb565::GREEN, Rgb565::BLUE, Rgb565::WHITE];
        frame.write_block(14, 2, 2, 2, &block).unwrap();

        assert_eq!(frame.get(14, 2), Some(Rgb565::RED));
        assert_eq!(frame.get(15, 2), Some(Rgb565::GREEN));
        assert_eq!(frame.get(14, 3), Some(Rgb565::BLUE));
        assert_eq!(frame.get(15, 3), Some(Rgb565::WHITE));
        assert_eq!(frame.lit_count(), 4);
    }

    #[test]
    fn test_write_block_rejects_without_partial_write() {
        let mut frame = PixelFrame::new();
        let block = [Rgb565::RED; 4];
        assert_eq!(
            frame.write_block(15, 0, 2, 2, &block),
            Err(BlockError::OutOfBounds)
        );
        assert_eq!(
            frame.write_block(0, 0, 2, 2, &block[..3]),
            Err(BlockError::LengthMismatch)
        );
        assert_eq!(frame.lit_count(), 0);
    }

    #[test]
    fn test_full_frame_block() {
        let mut frame = PixelFrame::new();
        let block = [Rgb565::CYAN; MATRIX_PIXELS];
        frame.write_block(0, 0, 16, 16, &block).unwrap();
        assert_eq!(frame, PixelFrame::filled(Rgb565::CYAN));
    }

    #[test]
    fn test_draw_target_clips() {
        let mut frame = PixelFrame::new();
        Rectangle::new(Point::new(-2, 14), Size::new(4, 4))
            .into_styled(PrimitiveStyle::with_fill(Rgb565::YELLOW))
            .draw(&mut frame)
            .unwrap();
        // Only the (0..2, 14..16) corner is on screen
        assert_eq!(frame.lit_count(), 4);
        assert_eq!(frame.get(1, 15), Some(Rgb565::YELLOW));
    }
}
