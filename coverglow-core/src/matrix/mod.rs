//! Pixel matrix rendering
//!
//! Frame buffers, digit glyphs and the clock face for the 16x16 matrix.

pub mod clock;
pub mod frame;
pub mod glyph;

pub use clock::{draw_number, draw_time, ClockRenderer};
pub use frame::{BlockError, PixelFrame, MATRIX_HEIGHT, MATRIX_PIXELS, MATRIX_WIDTH};
pub use glyph::{draw_digit, Digit};
