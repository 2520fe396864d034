//! 16x16 WS2812 matrix
//!
//! The strip snakes column by column starting at the top-left corner:
//! even columns run top to bottom, odd columns bottom to top.
//! Block writes land in an RGB-565 shadow buffer; `show` expands it to
//! 8-bit RGB, applies brightness and streams it to the strip.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use smart_leds::{brightness, RGB8};

use coverglow_core::matrix::{BlockError, PixelFrame, MATRIX_HEIGHT, MATRIX_PIXELS, MATRIX_WIDTH};
use coverglow_core::traits::PixelSink;

/// Something that can push a full frame of colors down the strip
#[allow(async_fn_in_trait)]
pub trait LedStrip {
    type Error;

    /// Write `colors` in strip order
    async fn write(&mut self, colors: &[RGB8; MATRIX_PIXELS]) -> Result<(), Self::Error>;
}

/// Matrix driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MatrixError<E> {
    /// Block write rejected
    Block(BlockError),
    /// Strip transfer failed
    Strip(E),
}

/// Strip index of logical pixel (x, y)
pub const fn zigzag_index(x: usize, y: usize) -> usize {
    let row = if x % 2 == 0 { y } else { MATRIX_HEIGHT - 1 - y };
    x * MATRIX_HEIGHT + row
}

/// Expand a 565 color to 8 bits per channel
fn expand(color: Rgb565) -> RGB8 {
    // Replicate high bits into the low bits so full scale maps to 255
    let r = color.r();
    let g = color.g();
    let b = color.b();
    RGB8::new((r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2))
}

/// WS2812 matrix sink
pub struct NeoMatrix<L> {
    strip: L,
    pending: PixelFrame,
    brightness: u8,
    out: [RGB8; MATRIX_PIXELS],
}

impl<L: LedStrip> NeoMatrix<L> {
    /// Create a blank matrix at full brightness
    pub fn new(strip: L) -> Self {
        Self {
            strip,
            pending: PixelFrame::new(),
            brightness: u8::MAX,
            out: [RGB8::default(); MATRIX_PIXELS],
        }
    }

    /// Pending (not yet shown) frame
    pub fn pending(&self) -> &PixelFrame {
        &self.pending
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Colors sent by the last `show`, in strip order
    pub fn last_output(&self) -> &[RGB8; MATRIX_PIXELS] {
        &self.out
    }

    pub fn strip(&self) -> &L {
        &self.strip
    }

    /// Build the strip-ordered, brightness-scaled output
    fn render(&mut self) {
        let mut ordered = [RGB8::default(); MATRIX_PIXELS];
        for y in 0..MATRIX_HEIGHT {
            for x in 0..MATRIX_WIDTH {
                let color = self.pending.pixels()[y * MATRIX_WIDTH + x];
                ordered[zigzag_index(x, y)] = expand(color);
            }
        }
        for (slot, color) in self
            .out
            .iter_mut()
            .zip(brightness(ordered.into_iter(), self.brightness))
        {
            *slot = color;
        }
    }
}

impl<L: LedStrip> PixelSink for NeoMatrix<L> {
    type Error = MatrixError<L::Error>;

    fn write_block(
        &mut self,
        x: u8,
        y: u8,
        width: u8,
        height: u8,
        pixels: &[Rgb565],
    ) -> Result<(), Self::Error> {
        self.pending
            .write_block(x, y, width, height, pixels)
            .map_err(MatrixError::Block)
    }

    async fn show(&mut self) -> Result<(), Self::Error> {
        self.render();
        self.strip.write(&self.out).await.map_err(MatrixError::Strip)
    }

    fn set_brightness(&mut self, brightness: u8) -> Result<(), Self::Error> {
        self.brightness = brightness;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.pending.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embassy_futures::block_on;

    #[derive(Default)]
    struct MockStrip {
        frames: Vec<[RGB8; MATRIX_PIXELS]>,
    }

    impl LedStrip for MockStrip {
        type Error = Infallible;

        async fn write(&mut self, colors: &[RGB8; MATRIX_PIXELS]) -> Result<(), Infallible> {
            self.frames.push(*colors);
            Ok(())
        }
    }

    #[test]
    fn test_zigzag_columns() {
        assert_eq!(zigzag_index(0, 0), 0);
        assert_eq!(zigzag_index(0, 15), 15);
        // Second column runs bottom to top
        assert_eq!(zigzag_index(1, 15), 16);
        assert_eq!(zigzag_index(1, 0), 31);
        assert_eq!(zigzag_index(2, 0), 32);
        assert_eq!(zigzag_index(15, 0), 255);
    }

    #[test]
    fn test_zigzag_is_a_permutation() {
        let mut seen = [false; MATRIX_PIXELS];
        for y in 0..MATRIX_HEIGHT {
            for x in 0..MATRIX_WIDTH {
                let i = zigzag_index(x, y);
                assert!(!seen[i]);
                seen[i] = true;
            }
        }
    }

    #[test]
    fn test_expand_full_scale() {
        assert_eq!(expand(Rgb565::WHITE), RGB8::new(255, 255, 255));
        assert_eq!(expand(Rgb565::BLACK), RGB8::new(0, 0, 0));
        assert_eq!(expand(Rgb565::RED), RGB8::new(255, 0, 0));
    }

    #[test]
    fn test_show_maps_pixels_and_scales() {
        let mut matrix = NeoMatrix::new(MockStrip::default());
        matrix.set_brightness(127).unwrap();
        matrix.write_block(1, 0, 1, 1, &[Rgb565::GREEN]).unwrap();
        block_on(matrix.show()).unwrap();

        let frame = &matrix.strip().frames[0];
        // (1, 0) sits at the far end of the second column
        assert_eq!(frame[31], RGB8::new(0, 127, 0));
        assert_eq!(frame.iter().filter(|c| **c != RGB8::default()).count(), 1);
    }

    #[test]
    fn test_nothing_sent_until_show() {
        let mut matrix = NeoMatrix::new(MockStrip::default());
        matrix.write_block(0, 0, 1, 1, &[Rgb565::BLUE]).unwrap();
        assert!(matrix.strip().frames.is_empty());

        matrix.clear().unwrap();
        block_on(matrix.show()).unwrap();
        assert!(matrix.strip().frames[0].iter().all(|c| *c == RGB8::default()));
    }

    #[test]
    fn test_block_error_surfaces() {
        let mut matrix = NeoMatrix::new(MockStrip::default());
        assert_eq!(
            matrix.write_block(15, 15, 2, 1, &[Rgb565::RED; 2]),
            Err(MatrixError::Block(BlockError::OutOfBounds))
        );
    }
}
