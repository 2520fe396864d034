//! WS2812 strip on PIO0
//!
//! Adapts the embassy-rp PIO WS2812 program to the `LedStrip` trait used
//! by the NeoMatrix driver.

use core::convert::Infallible;

use embassy_rp::peripherals::PIO0;
use embassy_rp::pio_programs::ws2812::PioWs2812;
use smart_leds::RGB8;

use coverglow_core::matrix::MATRIX_PIXELS;
use coverglow_drivers::matrix::LedStrip;

/// 256-pixel strip on state machine 0
pub struct PioStrip {
    ws2812: PioWs2812<'static, PIO0, 0, MATRIX_PIXELS>,
}

impl PioStrip {
    pub fn new(ws2812: PioWs2812<'static, PIO0, 0, MATRIX_PIXELS>) -> Self {
        Self { ws2812 }
    }
}

impl LedStrip for PioStrip {
    type Error = Infallible;

    async fn write(&mut self, colors: &[RGB8; MATRIX_PIXELS]) -> Result<(), Self::Error> {
        self.ws2812.write(colors).await;
        Ok(())
    }
}
