//! Inter-task communication
//!
//! Static channels, signals and shared state used between Embassy tasks.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;

use coverglow_core::matrix::PixelFrame;
use coverglow_core::text::{PlaybackStatus, TextDisplayDriver};
use coverglow_core::time::WallClock;
use coverglow_protocol::BoardReply;

/// Channel capacity for replies to the host
const REPLY_CHANNEL_SIZE: usize = 8;

/// Both LCD lines; the link task writes text, the text task ticks
pub static TEXT: Mutex<CriticalSectionRawMutex, TextDisplayDriver> =
    Mutex::new(TextDisplayDriver::new());

/// Cover image being assembled from incoming blocks
pub static STAGING: Mutex<CriticalSectionRawMutex, PixelFrame> = Mutex::new(PixelFrame::new());

/// Signal that STAGING holds a complete image
///
/// Signals raised while a crossfade runs collapse into one; the matrix
/// task picks up whatever STAGING holds when it next looks.
pub static FRAME_READY: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Player state (updated by the link task)
pub static PLAYBACK: BlockingMutex<CriticalSectionRawMutex, Cell<PlaybackStatus>> =
    BlockingMutex::new(Cell::new(PlaybackStatus::stopped()));

/// Software wall clock seeded by SetTime messages
///
/// The UTC offset is filled in from config at boot.
pub static WALL_CLOCK: BlockingMutex<CriticalSectionRawMutex, Cell<WallClock>> =
    BlockingMutex::new(Cell::new(WallClock::new(0)));

/// Replies queued for the host
pub static REPLIES: Channel<CriticalSectionRawMutex, BoardReply, REPLY_CHANNEL_SIZE> =
    Channel::new();

/// Current player state
pub fn playback() -> PlaybackStatus {
    PLAYBACK.lock(|state| state.get())
}
