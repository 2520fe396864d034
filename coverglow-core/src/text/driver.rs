//! Two-line text display driver

use super::line::{ScrollingLineBuffer, Window};
use crate::traits::CharacterSink;

/// Number of character rows
pub const DISPLAY_ROWS: usize = 2;

/// Display line selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineId {
    /// Top row
    First,
    /// Bottom row
    Second,
}

impl LineId {
    /// Both lines, top to bottom
    pub const ALL: [LineId; DISPLAY_ROWS] = [LineId::First, LineId::Second];

    /// Display row number
    pub const fn row(self) -> u8 {
        match self {
            LineId::First => 0,
            LineId::Second => 1,
        }
    }

    /// Line for a row number
    pub const fn from_row(row: u8) -> Option<Self> {
        match row {
            0 => Some(LineId::First),
            1 => Some(LineId::Second),
            _ => None,
        }
    }

    const fn index(self) -> usize {
        self.row() as usize
    }
}

impl Default for TextDisplayDriver {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns both lines and pushes them to a character sink each refresh
#[derive(Debug, Clone)]
pub struct TextDisplayDriver {
    lines: [ScrollingLineBuffer; DISPLAY_ROWS],
}

impl TextDisplayDriver {
    /// Create a driver with two empty lines
    pub const fn new() -> Self {
        Self {
            lines: [ScrollingLineBuffer::new(), ScrollingLineBuffer::new()],
        }
    }

    /// Update the text of one line (see [`ScrollingLineBuffer::set_text`])
    pub fn set_text(&mut self, line: LineId, text: &str, scroll: bool) -> bool {
        self.lines[line.index()].set_text(text, scroll)
    }

    /// Access a line
    pub fn line(&self, line: LineId) -> &ScrollingLineBuffer {
        &self.lines[line.index()]
    }

    /// Tick both lines and write them to rows 0 and 1
    ///
    /// Every row is rewritten in full, so the sink never needs clearing
    /// between refreshes. On a sink error the remaining rows are skipped;
    /// line state has already advanced for this tick.
    pub fn refresh<S: CharacterSink>(&mut self, sink: &mut S) -> Result<(), S::Error> {
        for id in LineId::ALL {
            let window: Window = *self.lines[id.index()].tick();
            sink.set_cursor(0, id.row())?;
            sink.print(window.as_str())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::{String, Vec};

    #[derive(Debug, PartialEq, Eq)]
    enum Op {
        Cursor(u8, u8),
        Print(String<16>),
        Clear,
    }

    #[derive(Default)]
    struct MockLcd {
        ops: Vec<Op, 32>,
        fail_print: bool,
    }

    impl CharacterSink for MockLcd {
        type Error = ();

        fn set_cursor(&mut self, column: u8, row: u8) -> Result<(), ()> {
            self.ops.push(Op::Cursor(column, row)).map_err(|_| ())
        }

        fn print(&mut self, text: &str) -> Result<(), ()> {
            if self.fail_print {
                return Err(());
            }
            let mut s = String::new();
            s.push_str(text).map_err(|_| ())?;
            self.ops.push(Op::Print(s)).map_err(|_| ())
        }

        fn clear(&mut self) -> Result<(), ()> {
            self.ops.push(Op::Clear).map_err(|_| ())
        }
    }

    fn text(s: &str) -> String<16> {
        let mut out = String::new();
        out.push_str(s).unwrap();
        out
    }

    #[test]
    fn test_refresh_writes_both_rows() {
        let mut driver = TextDisplayDriver::new();
        driver.set_text(LineId::First, "Now Playing", false);
        driver.set_text(LineId::Second, "Artist - Song", true);

        let mut lcd = MockLcd::default();
        driver.refresh(&mut lcd).unwrap();

        assert_eq!(
            lcd.ops.as_slice(),
            &[
                Op::Cursor(0, 0),
                Op::Print(text("Now Playing     ")),
                Op::Cursor(0, 1),
                Op::Print(text("               A")),
            ]
        );
    }

    #[test]
    fn test_lines_are_independent() {
        let mut driver = TextDisplayDriver::new();
        driver.set_text(LineId::First, "scrolling top", true);
        driver.set_text(LineId::Second, "fixed", false);

        let mut lcd = MockLcd::default();
        for _ in 0..10 {
            lcd.ops.clear();
            driver.refresh(&mut lcd).unwrap();
        }

        assert_eq!(driver.line(LineId::First).scroll_offset(), 10);
        assert_eq!(driver.line(LineId::Second).scroll_offset(), 0);
        assert_eq!(lcd.ops[3], Op::Print(text("fixed           ")));
    }

    #[test]
    fn test_sink_error_propagates() {
        let mut driver = TextDisplayDriver::new();
        let mut lcd = MockLcd {
            fail_print: true,
            ..Default::default()
        };
        assert_eq!(driver.refresh(&mut lcd), Err(()));
        assert_eq!(lcd.ops.as_slice(), &[Op::Cursor(0, 0)]);
    }

    #[test]
    fn test_line_id_rows() {
        assert_eq!(LineId::from_row(0), Some(LineId::First));
        assert_eq!(LineId::from_row(1), Some(LineId::Second));
        assert_eq!(LineId::from_row(2), None);
        assert_eq!(LineId::Second.row(), 1);
    }
}
