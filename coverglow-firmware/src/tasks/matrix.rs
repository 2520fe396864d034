//! LED matrix task
//!
//! Crossfades to each completed cover image. When playback is stopped
//! and the wall clock is known, the clock face takes over the matrix.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Delay, Duration, Timer};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use coverglow_core::config::{ClockConfig, MatrixConfig};
use coverglow_core::matrix::ClockRenderer;
use coverglow_core::traits::{ClockSource, PixelSink};
use coverglow_core::transition::ColorTransitionEngine;
use coverglow_drivers::matrix::NeoMatrix;

use crate::channels::{playback, FRAME_READY, STAGING};
use crate::clock::UptimeClock;
use crate::strip::PioStrip;

/// 16x16 matrix on the PIO strip
pub type Matrix = NeoMatrix<PioStrip>;

/// How often the clock face is checked for a new minute
const CLOCK_POLL: Duration = Duration::from_secs(1);

/// What the matrix is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
enum Face {
    Cover,
    Clock,
}

/// Matrix task - owns the LEDs and the crossfade engine
#[embassy_executor::task]
pub async fn matrix_task(mut matrix: Matrix, config: MatrixConfig, clock_config: ClockConfig) {
    info!("Matrix task started");

    if let Err(e) = matrix.set_brightness(config.brightness) {
        warn!("Failed to set brightness: {:?}", e);
    }
    if let Err(e) = matrix.clear() {
        warn!("Failed to clear matrix: {:?}", e);
    }
    if let Err(e) = matrix.show().await {
        warn!("Failed to blank matrix: {:?}", e);
    }

    let mut engine = ColorTransitionEngine::new(config.timing());
    let mut renderer = ClockRenderer::new(Rgb565::WHITE);
    let mut clock = UptimeClock;
    let mut face = Face::Cover;

    loop {
        let idle = !playback().playing && clock_config.show_when_idle;

        match select(FRAME_READY.wait(), Timer::after(CLOCK_POLL)).await {
            Either::First(()) => {
                // A new cover while the clock is up waits for playback
                if face == Face::Clock && idle {
                    debug!("Cover staged behind clock face");
                    continue;
                }
                show_cover(&mut engine, &mut matrix).await;
                face = Face::Cover;
            }
            Either::Second(()) => {
                if face == Face::Clock && !idle {
                    show_cover(&mut engine, &mut matrix).await;
                    face = Face::Cover;
                    continue;
                }
                if !idle {
                    continue;
                }
                let Some(reading) = clock.now() else {
                    continue;
                };
                if face == Face::Cover || renderer.needs_redraw(reading) {
                    renderer.render(engine.target_mut(), reading);
                    debug!("Clock {:02}:{:02}", reading.hours(), reading.minutes());
                    crossfade(&mut engine, &mut matrix).await;
                    face = Face::Clock;
                }
            }
        }
    }
}

/// Crossfade from what is shown to the staged cover
async fn show_cover(engine: &mut ColorTransitionEngine, matrix: &mut Matrix) {
    {
        let staging = STAGING.lock().await;
        engine.target_mut().copy_from(&staging);
    }
    crossfade(engine, matrix).await;
}

/// Run a sweep to the engine's current target
///
/// A sweep interrupted by a strip error is resumed rather than restarted.
async fn crossfade(engine: &mut ColorTransitionEngine, matrix: &mut Matrix) {
    if engine.trigger() {
        trace!("Crossfade: {} steps", engine.timing().steps());
    }
    if let Err(e) = engine.sweep(matrix, &mut Delay).await {
        warn!("Crossfade aborted: {:?}", e);
    }
}
