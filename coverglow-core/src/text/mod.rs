//! Character display text
//!
//! Two scrolling lines rendered to a 16x2 character sink, plus the
//! playback progress bar helper.

pub mod driver;
pub mod line;
pub mod progress;

pub use driver::{LineId, TextDisplayDriver, DISPLAY_ROWS};
pub use line::{ScrollingLineBuffer, Window, MAX_TEXT_LEN, SCROLL_GAP, WINDOW_WIDTH};
pub use progress::{
    progress_bar, progress_percent, PlaybackStatus, StatusLine, StatusUpdate,
};
