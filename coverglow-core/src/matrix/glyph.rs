//! 3x5 digit glyphs

use embedded_graphics::prelude::*;
use embedded_graphics::Pixel;

/// Glyph width in pixels
pub const GLYPH_WIDTH: u32 = 3;

/// Glyph height in pixels
pub const GLYPH_HEIGHT: u32 = 5;

/// Row bitmaps for 0-9; bit 2 is the leftmost column
const DIGITS: [[u8; GLYPH_HEIGHT as usize]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111], // 0
    [0b010, 0b110, 0b010, 0b010, 0b111], // 1
    [0b111, 0b001, 0b111, 0b100, 0b111], // 2
    [0b111, 0b001, 0b111, 0b001, 0b111], // 3
    [0b101, 0b101, 0b111, 0b001, 0b001], // 4
    [0b111, 0b100, 0b111, 0b001, 0b111], // 5
    [0b111, 0b100, 0b111, 0b101, 0b111], // 6
    [0b111, 0b001, 0b001, 0b001, 0b001], // 7
    [0b111, 0b101, 0b111, 0b101, 0b111], // 8
    [0b111, 0b101, 0b111, 0b001, 0b111], // 9
];

/// A decimal digit, 0-9
///
/// Out-of-range values cannot be constructed, so a glyph lookup can
/// never index past the bitmap table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Digit(u8);

impl Digit {
    /// Create a digit, or `None` if `value > 9`
    pub const fn new(value: u8) -> Option<Self> {
        if value < 10 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Split a two-digit number into (tens, ones)
    ///
    /// Values above 99 are clamped to 99.
    pub const fn pair(value: u8) -> (Self, Self) {
        let value = if value > 99 { 99 } else { value };
        (Self(value / 10), Self(value % 10))
    }

    /// Numeric value
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Whether the glyph has a pixel at (`col`, `row`)
    pub const fn is_set(self, col: u32, row: u32) -> bool {
        if col >= GLYPH_WIDTH || row >= GLYPH_HEIGHT {
            return false;
        }
        DIGITS[self.0 as usize][row as usize] & (1 << (GLYPH_WIDTH - 1 - col)) != 0
    }

    /// Lit pixels of the glyph, offset to `origin`
    pub fn pixels<C: PixelColor>(self, origin: Point, color: C) -> impl Iterator<Item = Pixel<C>> {
        (0..GLYPH_HEIGHT)
            .flat_map(|row| (0..GLYPH_WIDTH).map(move |col| (col, row)))
            .filter(move |&(col, row)| self.is_set(col, row))
            .map(move |(col, row)| Pixel(origin + Point::new(col as i32, row as i32), color))
    }
}

/// Draw one digit with its top-left corner at `origin`
pub fn draw_digit<D>(
    target: &mut D,
    digit: Digit,
    origin: Point,
    color: D::Color,
) -> Result<(), D::Error>
where
    D: DrawTarget,
{
    target.draw_iter(digit.pixels(origin, color))
}
