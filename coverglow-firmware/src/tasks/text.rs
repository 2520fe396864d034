//! LCD refresh task
//!
//! Ticks both scrolling lines at the configured rate and rewrites the
//! 16x2 display.

use defmt::*;
use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::{Delay, Duration, Ticker};

use coverglow_drivers::lcd::Hd44780;

use crate::channels::TEXT;

/// LCD behind the PCF8574 backpack on I2C0
pub type Lcd = Hd44780<I2c<'static, I2C0, Blocking>, Delay>;

/// Text task - refreshes the character display every `refresh_ms`
#[embassy_executor::task]
pub async fn text_task(mut lcd: Lcd, refresh_ms: u32) {
    info!("Text task started ({}ms refresh)", refresh_ms);

    if let Err(e) = lcd.init() {
        error!("LCD init failed: {:?}", e);
    }

    let mut ticker = Ticker::every(Duration::from_millis(refresh_ms as u64));
    let mut failing = false;

    loop {
        ticker.next().await;

        let result = TEXT.lock().await.refresh(&mut lcd);
        match result {
            Ok(()) if failing => {
                info!("LCD recovered");
                failing = false;
            }
            Ok(()) => {}
            Err(e) => {
                // Log once per outage, not every tick
                if !failing {
                    warn!("LCD refresh failed: {:?}", e);
                    failing = true;
                }
            }
        }
    }
}
