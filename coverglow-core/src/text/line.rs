//! Scrolling text line
//!
//! One line of the character display. Text longer than the window crawls
//! leftward one cell per tick, followed by a short blank gap before it
//! re-enters from the right edge.

use heapless::{String, Vec};

/// Visible characters per line
pub const WINDOW_WIDTH: usize = 16;

/// Maximum stored text length in characters (longer input is truncated)
pub const MAX_TEXT_LEN: usize = 127;

/// Byte capacity for `MAX_TEXT_LEN` characters of UTF-8
const MAX_TEXT_BYTES: usize = MAX_TEXT_LEN * 4;

/// Blank cells appended after the text before it repeats
pub const SCROLL_GAP: usize = 4;

/// Cell written for characters the display cannot show
const REPLACEMENT: u8 = b'?';

/// Blank cell
const BLANK: u8 = b' ';

/// Fixed-width visible window, always space padded and NUL terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    cells: [u8; WINDOW_WIDTH + 1],
}

impl Default for Window {
    fn default() -> Self {
        Self::blank()
    }
}

impl Window {
    /// An all-blank window
    pub const fn blank() -> Self {
        let mut cells = [BLANK; WINDOW_WIDTH + 1];
        cells[WINDOW_WIDTH] = 0;
        Self { cells }
    }

    /// Visible cells as a string slice (always `WINDOW_WIDTH` long)
    pub fn as_str(&self) -> &str {
        // Cells only ever hold printable ASCII
        core::str::from_utf8(&self.cells[..WINDOW_WIDTH]).unwrap_or("")
    }

    /// Visible cells as bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.cells[..WINDOW_WIDTH]
    }

    /// Visible cells followed by the NUL terminator
    pub fn as_bytes_with_nul(&self) -> &[u8; WINDOW_WIDTH + 1] {
        &self.cells
    }

    fn fill(&mut self, cell: u8) {
        self.cells[..WINDOW_WIDTH].fill(cell);
    }

    /// Left-align `text`, truncating or padding with spaces
    fn fill_from(&mut self, text: &[u8]) {
        let len = text.len().min(WINDOW_WIDTH);
        self.cells[..len].copy_from_slice(&text[..len]);
        self.cells[len..WINDOW_WIDTH].fill(BLANK);
    }

    /// Shift every cell one position toward the front and append `cell`
    fn push_back(&mut self, cell: u8) {
        self.cells.copy_within(1..WINDOW_WIDTH, 0);
        self.cells[WINDOW_WIDTH - 1] = cell;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Window {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "[{}]", self.as_str());
    }
}

/// Text as received, truncated to `MAX_TEXT_LEN` characters
type LineText = String<MAX_TEXT_BYTES>;

/// Display cells: printable ASCII, one per character
type LineCells = Vec<u8, MAX_TEXT_LEN>;

fn truncated(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars().take(MAX_TEXT_LEN)
}

/// Convert text into display cells
///
/// Printable ASCII passes through; anything else becomes `?`.
fn to_cells(text: &str) -> LineCells {
    text.chars()
        .map(|c| {
            if c.is_ascii_graphic() || c == ' ' {
                c as u8
            } else {
                REPLACEMENT
            }
        })
        .collect()
}

impl Default for ScrollingLineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Scroll state and visible window for one display line
#[derive(Debug, Clone)]
pub struct ScrollingLineBuffer {
    /// Current text, compared verbatim on update
    text: LineText,
    /// Current text converted to display cells
    source: LineCells,
    /// What is physically shown
    window: Window,
    /// Index of the next source cell to append at the trailing edge
    offset: usize,
    /// Marquee mode
    scroll_enabled: bool,
}

impl ScrollingLineBuffer {
    /// Create an empty, non-scrolling line
    pub const fn new() -> Self {
        Self {
            text: String::new(),
            source: Vec::new(),
            window: Window::blank(),
            offset: 0,
            scroll_enabled: false,
        }
    }

    /// Replace the line text
    ///
    /// Resubmitting identical text is a no-op, so callers may push the
    /// same content every tick without restarting the scroll. Any other
    /// text resets the scroll position and blanks the window.
    ///
    /// Returns `true` if the line changed.
    pub fn set_text(&mut self, text: &str, scroll: bool) -> bool {
        if truncated(text).eq(self.text.chars()) {
            return false;
        }

        self.text.clear();
        for c in truncated(text) {
            // At most MAX_TEXT_LEN chars of up to 4 bytes each
            let _ = self.text.push(c);
        }
        self.source = to_cells(&self.text);
        self.offset = 0;
        self.scroll_enabled = scroll;
        self.window.fill(BLANK);
        true
    }

    /// Advance one refresh tick and return the window to display
    pub fn tick(&mut self) -> &Window {
        if !self.scroll_enabled {
            self.window.fill_from(&self.source);
            return &self.window;
        }

        let cell = self.source.get(self.offset).copied().unwrap_or(BLANK);
        self.window.push_back(cell);

        if self.offset + 1 > self.source.len() + SCROLL_GAP {
            self.offset = 0;
        } else {
            self.offset += 1;
        }

        &self.window
    }

    /// Window as of the last tick
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Current text, truncated to `MAX_TEXT_LEN` characters
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Index of the next source cell to scroll in
    pub fn scroll_offset(&self) -> usize {
        self.offset
    }

    /// Whether the line scrolls
    pub fn scroll_enabled(&self) -> bool {
        self.scroll_enabled
    }

    /// Number of ticks before the scroll offset returns to zero
    pub fn scroll_period(&self) -> usize {
        self.source.len() + SCROLL_GAP + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ticks(line: &mut ScrollingLineBuffer, n: usize) -> Window {
        for _ in 0..n {
            line.tick();
        }
        *line.window()
    }

    #[test]
    fn test_new_line_is_blank() {
        let mut line = ScrollingLineBuffer::new();
        assert_eq!(line.tick().as_str(), "                ");
        assert_eq!(line.window().as_bytes_with_nul()[WINDOW_WIDTH], 0);
    }

    #[test]
    fn test_static_line_truncates_and_pads() {
        let mut line = ScrollingLineBuffer::new();
        line.set_text("Hi", false);
        assert_eq!(line.tick().as_str(), "Hi              ");

        line.set_text("This line is far too long", false);
        assert_eq!(line.tick().as_str(), "This line is far");
    }

    #[test]
    fn test_static_tick_does_not_move_offset() {
        let mut line = ScrollingLineBuffer::new();
        line.set_text("Static text here, long", false);
        let first = *line.tick();
        for _ in 0..40 {
            assert_eq!(*line.tick(), first);
            assert_eq!(line.scroll_offset(), 0);
        }
    }

    #[test]
    fn test_identical_text_keeps_scroll_position() {
        let mut line = ScrollingLineBuffer::new();
        assert!(line.set_text("Artist - Song", true));
        ticks(&mut line, 5);
        let window = *line.window();

        assert!(!line.set_text("Artist - Song", true));
        assert_eq!(line.scroll_offset(), 5);
        assert_eq!(*line.window(), window);
    }

    #[test]
    fn test_new_text_resets_and_blanks() {
        let mut line = ScrollingLineBuffer::new();
        line.set_text("Artist - Song", true);
        ticks(&mut line, 7);

        assert!(line.set_text("Other - Track", true));
        assert_eq!(line.scroll_offset(), 0);
        assert_eq!(*line.window(), Window::blank());
    }

    #[test]
    fn test_marquee_scenario() {
        let mut line = ScrollingLineBuffer::new();
        line.set_text("Artist - Song", true);

        assert_eq!(line.tick().as_str(), "               A");
        assert_eq!(ticks(&mut line, 12).as_str(), "   Artist - Song");
        assert_eq!(ticks(&mut line, 3).as_str(), "Artist - Song   ");
        // Tick 17: the text starts sliding off, tail gap follows
        assert_eq!(line.tick().as_str(), "rtist - Song    ");
    }

    #[test]
    fn test_text_reenters_after_gap() {
        let mut line = ScrollingLineBuffer::new();
        line.set_text("ab", true);

        // Offsets 0..=6: "a", "b", then five blanks, then wrap
        let expected = [b'a', b'b', b' ', b' ', b' ', b' ', b' ', b'a', b'b'];
        for &cell in &expected {
            assert_eq!(line.tick().as_bytes()[WINDOW_WIDTH - 1], cell);
        }
    }

    #[test]
    fn test_empty_scrolling_line_stays_blank() {
        let mut line = ScrollingLineBuffer::new();
        line.set_text("", true);
        line.set_text("x", true);
        line.set_text("", true);
        for _ in 0..20 {
            assert_eq!(*line.tick(), Window::blank());
            assert!(line.scroll_offset() <= SCROLL_GAP);
        }
    }

    #[test]
    fn test_full_width_text_still_advances() {
        let mut line = ScrollingLineBuffer::new();
        line.set_text("0123456789ABCDEF", true);
        assert_eq!(ticks(&mut line, 16).as_str(), "0123456789ABCDEF");
        assert_eq!(line.scroll_offset(), 16);
        ticks(&mut line, 5);
        assert_eq!(line.scroll_offset(), 0);
    }

    #[test]
    fn test_oversized_text_truncated_and_stable() {
        let long: heapless::String<200> = core::iter::repeat('x').take(200).collect();
        let mut line = ScrollingLineBuffer::new();
        assert!(line.set_text(&long, true));
        assert_eq!(line.text().len(), MAX_TEXT_LEN);

        ticks(&mut line, 3);
        assert!(!line.set_text(&long, true));
        assert_eq!(line.scroll_offset(), 3);
    }

    #[test]
    fn test_non_ascii_replaced() {
        let mut line = ScrollingLineBuffer::new();
        line.set_text("Björk", false);
        assert_eq!(line.tick().as_str(), "Bj?rk           ");
        assert_eq!(line.text(), "Björk");
    }

    #[test]
    fn test_texts_with_same_cells_are_distinct() {
        let mut line = ScrollingLineBuffer::new();
        line.set_text("Björk - Jóga", true);
        ticks(&mut line, 6);

        // Both render as "Bj?rk - J?ga" but are different titles
        assert!(line.set_text("Bjørk - Jøga", true));
        assert_eq!(line.scroll_offset(), 0);
        assert_eq!(*line.window(), Window::blank());
        assert!(!line.set_text("Bjørk - Jøga", true));
    }

    #[test]
    fn test_truncation_counts_characters() {
        let long: heapless::String<400> = core::iter::repeat('é').take(150).collect();
        let mut line = ScrollingLineBuffer::new();
        line.set_text(&long, false);
        assert_eq!(line.text().chars().count(), MAX_TEXT_LEN);

        // Differences past the limit are invisible
        let mut longer = long.clone();
        longer.push('x').unwrap();
        assert!(!line.set_text(&longer, false));
    }

    proptest! {
        #[test]
        fn prop_window_is_always_full_width(text in "[ -~]{0,160}", scroll in any::<bool>(), n in 0usize..300) {
            let mut line = ScrollingLineBuffer::new();
            line.set_text(&text, scroll);
            for _ in 0..n {
                let window = line.tick();
                prop_assert_eq!(window.as_str().len(), WINDOW_WIDTH);
                prop_assert_eq!(window.as_bytes_with_nul()[WINDOW_WIDTH], 0);
            }
        }

        #[test]
        fn prop_scroll_is_cyclic(text in "[ -~]{0,127}") {
            let mut line = ScrollingLineBuffer::new();
            line.set_text(&text, true);
            let period = line.scroll_period();

            // Once a full window has been emitted the marquee repeats exactly
            let warmup = WINDOW_WIDTH.div_ceil(period) * period;
            ticks(&mut line, warmup);
            prop_assert_eq!(line.scroll_offset(), 0);
            let start = *line.window();

            ticks(&mut line, period);
            prop_assert_eq!(line.scroll_offset(), 0);
            prop_assert_eq!(*line.window(), start);
        }

        #[test]
        fn prop_static_tick_is_stable(text in "[ -~]{0,127}", n in 1usize..50) {
            let mut line = ScrollingLineBuffer::new();
            line.set_text(&text, false);
            let first = *line.tick();
            for _ in 0..n {
                prop_assert_eq!(*line.tick(), first);
            }
        }
    }
}
