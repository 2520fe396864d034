//! Output sink traits for the two physical displays

use embedded_graphics::pixelcolor::Rgb565;

/// Pixel matrix output
///
/// Block writes land in the sink's own buffer; nothing reaches the
/// LEDs until [`show`](PixelSink::show) is awaited.
#[allow(async_fn_in_trait)]
pub trait PixelSink {
    /// Error type for sink operations
    type Error;

    /// Write a rectangular block of pixels
    ///
    /// `pixels` is row-major and must hold exactly `width * height` entries.
    fn write_block(
        &mut self,
        x: u8,
        y: u8,
        width: u8,
        height: u8,
        pixels: &[Rgb565],
    ) -> Result<(), Self::Error>;

    /// Flush all pending pixel writes to the device
    async fn show(&mut self) -> Result<(), Self::Error>;

    /// Set global brightness (0 = off, 255 = full)
    fn set_brightness(&mut self, brightness: u8) -> Result<(), Self::Error>;

    /// Clear the pending pixel buffer to black
    fn clear(&mut self) -> Result<(), Self::Error>;
}

/// Character display output
///
/// Two rows of sixteen ASCII columns on the reference hardware.
pub trait CharacterSink {
    /// Error type for sink operations
    type Error;

    /// Move the cursor
    ///
    /// - `column`: Column number (0-15)
    /// - `row`: Row number (0-1)
    fn set_cursor(&mut self, column: u8, row: u8) -> Result<(), Self::Error>;

    /// Print text at the cursor position
    fn print(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Clear the entire display and home the cursor
    fn clear(&mut self) -> Result<(), Self::Error>;
}
