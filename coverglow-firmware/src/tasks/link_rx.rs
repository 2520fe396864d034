//! Host link UART receive task
//!
//! Decodes frames from the host and applies them: text goes to the LCD
//! lines, image blocks to the staging frame, time to the wall clock.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_io_async::Read;
use heapless::Vec;

use coverglow_core::text::{LineId, PlaybackStatus, StatusLine, StatusUpdate};
use coverglow_core::time::ClockReading;
use coverglow_protocol::{BoardReply, Frame, FrameDecoder, HostMessage, ImageBlock, MAX_BLOCK_PIXELS};

use crate::channels::{playback, FRAME_READY, PLAYBACK, REPLIES, STAGING, TEXT};
use crate::clock;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Link state that outlives a single frame
#[derive(Default)]
struct LinkState {
    /// Second LCD line: host text or progress bar
    status_line: StatusLine,
}

/// Link RX task - receives and applies host messages
#[embassy_executor::task]
pub async fn link_rx_task(mut rx: BufferedUartRx) {
    info!("Link RX task started");

    let mut decoder = FrameDecoder::new();
    let mut state = LinkState::default();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) => {
                trace!("RX: {} bytes", n);
                for &byte in &buf[..n] {
                    match decoder.push(byte) {
                        Ok(Some(frame)) => handle_frame(&frame, &mut state).await,
                        Ok(None) => {}
                        Err(e) => warn!("Frame error: {:?}", e),
                    }
                }
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
                decoder.reset();
            }
        }
    }
}

async fn handle_frame(frame: &Frame, state: &mut LinkState) {
    let message = match HostMessage::from_frame(frame) {
        Ok(message) => message,
        Err(e) => {
            warn!("Bad message: {:?}", e);
            return;
        }
    };

    match message {
        HostMessage::SetLine { row, scroll, text } => {
            let Some(line) = LineId::from_row(row) else {
                return;
            };
            if line == LineId::Second {
                let update = state.status_line.host_text(text, playback());
                apply_status(update, scroll).await;
            } else if TEXT.lock().await.set_text(line, text, scroll) {
                debug!("Line {} <- {=str} (scroll={})", row, text, scroll);
            }
            reply(BoardReply::Ack(message.kind()));
        }
        HostMessage::ImageBlock(block) => stage_block(&block).await,
        HostMessage::ImageDone => {
            debug!("Cover image complete");
            FRAME_READY.signal(());
            reply(BoardReply::Ack(message.kind()));
        }
        HostMessage::SetTime { hours, minutes } => {
            if let Some(utc) = ClockReading::new(hours, minutes) {
                clock::seed(utc);
                info!("Clock set to {:02}:{:02} UTC", hours, minutes);
            }
            reply(BoardReply::Ack(message.kind()));
        }
        HostMessage::Playback {
            playing,
            progress_ms,
            duration_ms,
        } => {
            let status = PlaybackStatus {
                playing,
                progress_ms,
                duration_ms,
            };
            PLAYBACK.lock(|cell| cell.set(status));
            apply_status(state.status_line.playback(status), false).await;
            reply(BoardReply::Ack(message.kind()));
        }
        HostMessage::Ping => reply(BoardReply::Pong),
    }
}

/// Copy one block of the incoming cover into the staging frame
async fn stage_block(block: &ImageBlock<'_>) {
    let pixels: Vec<Rgb565, MAX_BLOCK_PIXELS> = block
        .pixels()
        .map(|raw| Rgb565::from(RawU16::new(raw)))
        .collect();

    let result = STAGING
        .lock()
        .await
        .write_block(block.x, block.y, block.width, block.height, &pixels);
    if let Err(e) = result {
        warn!(
            "Image block {}x{} at ({}, {}) rejected: {:?}",
            block.width, block.height, block.x, block.y, e
        );
    }
}

/// Write host text or the progress bar to the second line
async fn apply_status(update: StatusUpdate<'_>, scroll: bool) {
    let changed = match &update {
        StatusUpdate::Keep => false,
        StatusUpdate::Text(text) => TEXT.lock().await.set_text(LineId::Second, text, scroll),
        StatusUpdate::Bar(bar) => TEXT.lock().await.set_text(LineId::Second, bar, false),
    };
    if changed {
        trace!("Status line updated");
    }
}

fn reply(reply: BoardReply) {
    if REPLIES.try_send(reply).is_err() {
        warn!("Reply queue full, dropping {:?}", reply);
    }
}
