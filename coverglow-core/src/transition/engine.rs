//! Crossfade engine
//!
//! Owns the mirror (what the matrix currently shows) and the target
//! (the most recently decoded frame). A trigger snapshots the target as
//! the sweep destination; the sweep presents `steps` interpolated frames,
//! one per step interval, then commits that snapshot. Writes to the target
//! during a sweep wait for the next trigger.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_hal_async::delay::DelayNs;

use super::hue::HsvColor;
use super::state::{TransitionEvent, TransitionState};
use crate::matrix::{BlockError, PixelFrame, MATRIX_HEIGHT, MATRIX_PIXELS, MATRIX_WIDTH};
use crate::traits::PixelSink;

/// Sweep duration and step interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransitionTiming {
    /// Total sweep duration (ms)
    pub duration_ms: u32,
    /// Delay between steps (ms)
    pub step_ms: u32,
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            duration_ms: 1000,
            step_ms: 50,
        }
    }
}

impl TransitionTiming {
    /// Number of interpolation steps
    ///
    /// A zero step interval yields zero steps, meaning "commit at once".
    pub fn steps(&self) -> u16 {
        if self.step_ms == 0 {
            return 0;
        }
        (self.duration_ms / self.step_ms).min(u16::MAX as u32) as u16
    }
}

/// Result of one [`ColorTransitionEngine::advance`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Progress {
    /// Nothing to do
    Idle,
    /// Step `step` of `steps` was presented
    Presented { step: u16, steps: u16 },
    /// Target committed and pushed
    Committed,
}

/// Two-frame HSV crossfade engine
#[derive(Debug, Clone)]
pub struct ColorTransitionEngine {
    mirror: PixelFrame,
    target: PixelFrame,
    /// Target as it was when the active sweep was triggered
    destination: PixelFrame,
    /// Mirror and destination in HSV, converted once per sweep
    from_hsv: [HsvColor; MATRIX_PIXELS],
    to_hsv: [HsvColor; MATRIX_PIXELS],
    state: TransitionState,
    timing: TransitionTiming,
}

impl ColorTransitionEngine {
    /// Create an engine with both frames black
    pub const fn new(timing: TransitionTiming) -> Self {
        Self {
            mirror: PixelFrame::new(),
            target: PixelFrame::new(),
            destination: PixelFrame::new(),
            from_hsv: [HsvColor::BLACK; MATRIX_PIXELS],
            to_hsv: [HsvColor::BLACK; MATRIX_PIXELS],
            state: TransitionState::Idle,
            timing,
        }
    }

    /// Frame last committed to the sink
    pub fn mirror(&self) -> &PixelFrame {
        &self.mirror
    }

    /// Frame the next sweep fades to
    pub fn target(&self) -> &PixelFrame {
        &self.target
    }

    /// Frame the active sweep converges to
    pub fn destination(&self) -> &PixelFrame {
        &self.destination
    }

    /// Mutable access to the target frame
    pub fn target_mut(&mut self) -> &mut PixelFrame {
        &mut self.target
    }

    /// Write a decoded block into the target frame
    pub fn write_block(
        &mut self,
        x: u8,
        y: u8,
        width: u8,
        height: u8,
        pixels: &[Rgb565],
    ) -> Result<(), BlockError> {
        self.target.write_block(x, y, width, height, pixels)
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn timing(&self) -> TransitionTiming {
        self.timing
    }

    /// Change timing for sweeps started after this call
    pub fn set_timing(&mut self, timing: TransitionTiming) {
        self.timing = timing;
    }

    /// Start a sweep toward the current target
    ///
    /// Returns `false` if a sweep is already underway. The running sweep
    /// keeps its destination; the target keeps whatever was written and a
    /// later trigger picks it up.
    pub fn trigger(&mut self) -> bool {
        if self.state.is_active() {
            return false;
        }
        let steps = self.timing.steps();
        self.destination.copy_from(&self.target);
        if steps > 0 {
            for (hsv, &color) in self.from_hsv.iter_mut().zip(self.mirror.pixels()) {
                *hsv = HsvColor::from_rgb565(color);
            }
            for (hsv, &color) in self.to_hsv.iter_mut().zip(self.destination.pixels()) {
                *hsv = HsvColor::from_rgb565(color);
            }
        }
        self.state = self.state.transition(TransitionEvent::FrameReady { steps });
        true
    }

    /// Blend of mirror and destination at `step / steps`
    ///
    /// Only meaningful after a successful [`trigger`](Self::trigger).
    pub fn interpolated_frame(&self, step: u16, steps: u16, out: &mut PixelFrame) {
        let fraction = if steps == 0 {
            1.0
        } else {
            step as f32 / steps as f32
        };
        for (i, pixel) in out.pixels_mut().iter_mut().enumerate() {
            *pixel = self.from_hsv[i].blend(self.to_hsv[i], fraction).to_rgb565();
        }
    }

    /// Present the next frame of an active sweep
    ///
    /// On sink error the state and mirror are left as they were, so the
    /// same step is retried on the next call.
    pub async fn advance<S: PixelSink>(&mut self, sink: &mut S) -> Result<Progress, S::Error> {
        match self.state {
            TransitionState::Idle => Ok(Progress::Idle),
            TransitionState::Sweeping { step, steps } => {
                let mut frame = PixelFrame::new();
                self.interpolated_frame(step, steps, &mut frame);
                present(sink, &frame).await?;
                self.state = self.state.transition(TransitionEvent::StepPresented);
                Ok(Progress::Presented { step, steps })
            }
            TransitionState::Committed => {
                // Mirror must only ever hold what the sink actually shows
                present(sink, &self.destination).await?;
                self.mirror.copy_from(&self.destination);
                self.state = self.state.transition(TransitionEvent::Finished);
                Ok(Progress::Committed)
            }
        }
    }

    /// Run the active sweep to completion
    ///
    /// Waits one step interval after every presented step. Returns at once
    /// when no sweep is active.
    pub async fn sweep<S, D>(&mut self, sink: &mut S, delay: &mut D) -> Result<(), S::Error>
    where
        S: PixelSink,
        D: DelayNs,
    {
        loop {
            match self.advance(sink).await? {
                Progress::Presented { .. } => delay.delay_ms(self.timing.step_ms).await,
                Progress::Committed | Progress::Idle => return Ok(()),
            }
        }
    }

    /// Push the mirror to the sink unchanged
    pub async fn redraw<S: PixelSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        present(sink, &self.mirror).await
    }
}

async fn present<S: PixelSink>(sink: &mut S, frame: &PixelFrame) -> Result<(), S::Error> {
    sink.write_block(
        0,
        0,
        MATRIX_WIDTH as u8,
        MATRIX_HEIGHT as u8,
        frame.pixels(),
    )?;
    sink.show().await
}
