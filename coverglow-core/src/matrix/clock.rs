//! Clock face for the matrix
//!
//! Hours on the upper half, minutes on the lower half, two 3x5 digits
//! each. Rendering only writes into a draw target; pushing the result
//! to the LEDs is the transition engine's job.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use super::frame::PixelFrame;
use super::glyph::{draw_digit, Digit};
use crate::time::ClockReading;

/// Top-left corner of the hour digits
pub const HOURS_ORIGIN: Point = Point::new(4, 2);

/// Top-left corner of the minute digits
pub const MINUTES_ORIGIN: Point = Point::new(4, 9);

/// Horizontal distance from the tens digit to the ones digit
pub const DIGIT_ADVANCE: i32 = 5;

/// Draw a two-digit number with the tens digit at `origin`
///
/// Values above 99 are clamped.
pub fn draw_number<D>(
    target: &mut D,
    value: u8,
    origin: Point,
    color: D::Color,
) -> Result<(), D::Error>
where
    D: DrawTarget,
{
    let (tens, ones) = Digit::pair(value);
    draw_digit(target, tens, origin, color)?;
    draw_digit(target, ones, origin + Point::new(DIGIT_ADVANCE, 0), color)
}

/// Draw hours and minutes at their fixed positions
pub fn draw_time<D>(
    target: &mut D,
    reading: ClockReading,
    color: D::Color,
) -> Result<(), D::Error>
where
    D: DrawTarget,
{
    draw_number(target, reading.hours(), HOURS_ORIGIN, color)?;
    draw_number(target, reading.minutes(), MINUTES_ORIGIN, color)
}

/// Clock face renderer for a full matrix frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockRenderer<C> {
    color: C,
    last: Option<ClockReading>,
}

impl<C: PixelColor> ClockRenderer<C> {
    /// Create a renderer drawing in `color`
    pub const fn new(color: C) -> Self {
        Self { color, last: None }
    }

    /// Whether `reading` differs from the last rendered time
    pub fn needs_redraw(&self, reading: ClockReading) -> bool {
        self.last != Some(reading)
    }

    /// Forget the last rendered time so the next render always draws
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Reading shown by the last render
    pub fn last(&self) -> Option<ClockReading> {
        self.last
    }
}

impl ClockRenderer<Rgb565> {
    /// Clear `frame` and draw `reading` into it
    pub fn render(&mut self, frame: &mut PixelFrame, reading: ClockReading) {
        frame.clear();
        // Drawing into a PixelFrame cannot fail
        let _ = draw_time(frame, reading, self.color);
        self.last = Some(reading);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::glyph::{GLYPH_HEIGHT, GLYPH_WIDTH};

    /// True if (x, y) lies inside the glyph box whose corner is `origin`
    fn in_glyph(origin: Point, x: i32, y: i32) -> bool {
        x >= origin.x
            && x < origin.x + GLYPH_WIDTH as i32
            && y >= origin.y
            && y < origin.y + GLYPH_HEIGHT as i32
    }

    #[test]
    fn test_midnight_draws_four_zero_glyphs_only() {
        let mut frame = PixelFrame::new();
        draw_time(&mut frame, ClockReading::new(0, 0).unwrap(), Rgb565::WHITE).unwrap();

        let boxes = [
            HOURS_ORIGIN,
            HOURS_ORIGIN + Point::new(DIGIT_ADVANCE, 0),
            MINUTES_ORIGIN,
            MINUTES_ORIGIN + Point::new(DIGIT_ADVANCE, 0),
        ];
        let zero = Digit::new(0).unwrap();

        for y in 0..16 {
            for x in 0..16 {
                let lit = frame.get(x as usize, y as usize) == Some(Rgb565::WHITE);
                let expected = boxes.iter().any(|&o| {
                    in_glyph(o, x, y) && zero.is_set((x - o.x) as u32, (y - o.y) as u32)
                });
                assert_eq!(lit, expected, "pixel ({}, {})", x, y);
            }
        }
        assert_eq!(frame.lit_count(), 4 * 12);
    }

    #[test]
    fn test_hours_and_minutes_positions() {
        let mut frame = PixelFrame::new();
        draw_time(&mut frame, ClockReading::new(17, 42).unwrap(), Rgb565::GREEN).unwrap();

        // "1" has its top pixel in the middle column
        assert_eq!(frame.get(5, 2), Some(Rgb565::GREEN));
        assert_eq!(frame.get(4, 2), Some(Rgb565::BLACK));
        // "4" starts with both outer columns lit
        assert_eq!(frame.get(4, 9), Some(Rgb565::GREEN));
        assert_eq!(frame.get(5, 9), Some(Rgb565::BLACK));
        assert_eq!(frame.get(6, 9), Some(Rgb565::GREEN));
        // Nothing to the left of the digits
        for y in 0..16 {
            for x in 0..4 {
                assert_eq!(frame.get(x, y), Some(Rgb565::BLACK));
            }
        }
    }

    #[test]
    fn test_renderer_tracks_last_reading() {
        let mut renderer = ClockRenderer::new(Rgb565::WHITE);
        let mut frame = PixelFrame::filled(Rgb565::RED);
        let noon = ClockReading::new(12, 0).unwrap();

        assert!(renderer.needs_redraw(noon));
        renderer.render(&mut frame, noon);
        assert!(!renderer.needs_redraw(noon));
        assert!(renderer.needs_redraw(ClockReading::new(12, 1).unwrap()));

        // Previous content is cleared
        assert_eq!(frame.get(0, 0), Some(Rgb565::BLACK));

        renderer.invalidate();
        assert!(renderer.needs_redraw(noon));
    }
}
