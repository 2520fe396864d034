//! Playback progress bar

use heapless::String;

use super::line::WINDOW_WIDTH;

/// Filled cell
const FILLED: char = '=';

/// Empty cell
const EMPTY: char = '-';

/// Elapsed share of the track in whole percent (0-100)
///
/// A zero duration reports no progress.
pub fn progress_percent(progress_ms: u32, duration_ms: u32) -> u8 {
    if duration_ms == 0 {
        return 0;
    }
    let pct = progress_ms as u64 * 100 / duration_ms as u64;
    pct.min(100) as u8
}

/// Render a full-width progress bar such as `"======----------"`
pub fn progress_bar(progress_ms: u32, duration_ms: u32) -> String<WINDOW_WIDTH> {
    let filled = if duration_ms == 0 {
        0
    } else {
        let cells = progress_ms as u64 * WINDOW_WIDTH as u64 / duration_ms as u64;
        (cells as usize).min(WINDOW_WIDTH)
    };

    let mut bar = String::new();
    for i in 0..WINDOW_WIDTH {
        // Capacity is exactly WINDOW_WIDTH
        let _ = bar.push(if i < filled { FILLED } else { EMPTY });
    }
    bar
}

/// Player state reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlaybackStatus {
    pub playing: bool,
    pub progress_ms: u32,
    pub duration_ms: u32,
}

impl PlaybackStatus {
    /// Nothing playing
    pub const fn stopped() -> Self {
        Self {
            playing: false,
            progress_ms: 0,
            duration_ms: 0,
        }
    }

    /// Progress bar while playing, blank otherwise
    pub fn bar(&self) -> String<WINDOW_WIDTH> {
        if self.playing {
            progress_bar(self.progress_ms, self.duration_ms)
        } else {
            String::new()
        }
    }
}

/// New content for the status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate<'a> {
    /// Leave the line as it is
    Keep,
    /// Host text
    Text(&'a str),
    /// Progress bar (blank while paused)
    Bar(String<WINDOW_WIDTH>),
}

/// Arbitrates the status line between host text and the progress bar
///
/// The bar owns the line while the host's latest text for it is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusLine {
    showing_bar: bool,
}

impl StatusLine {
    pub const fn new() -> Self {
        Self { showing_bar: false }
    }

    /// Whether the progress bar owns the line
    pub fn showing_bar(&self) -> bool {
        self.showing_bar
    }

    /// Host sent text for the line
    ///
    /// Repeated empty text while the bar is up leaves the bar alone.
    pub fn host_text<'a>(&mut self, text: &'a str, status: PlaybackStatus) -> StatusUpdate<'a> {
        if !text.is_empty() {
            self.showing_bar = false;
            return StatusUpdate::Text(text);
        }
        if self.showing_bar {
            return StatusUpdate::Keep;
        }
        self.showing_bar = true;
        StatusUpdate::Bar(status.bar())
    }

    /// Host sent new playback state
    pub fn playback(&self, status: PlaybackStatus) -> StatusUpdate<'static> {
        if self.showing_bar {
            StatusUpdate::Bar(status.bar())
        } else {
            StatusUpdate::Keep
        }
    }
}
