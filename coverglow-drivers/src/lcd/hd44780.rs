//! HD44780 character LCD over a PCF8574 I2C backpack
//!
//! The backpack exposes the LCD in 4-bit mode. Each I2C byte drives the
//! expander pins directly:
//!
//! | Bit | Signal            |
//! |-----|-------------------|
//! | 0   | RS (0=cmd, 1=data)|
//! | 1   | RW (always write) |
//! | 2   | EN                |
//! | 3   | Backlight         |
//! | 4-7 | D4-D7             |
//!
//! A byte is sent as two nibbles, each latched by an EN high→low pulse.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use coverglow_core::traits::CharacterSink;

/// Expander pin masks
mod pin {
    pub const RS: u8 = 0x01;
    pub const EN: u8 = 0x04;
    pub const BACKLIGHT: u8 = 0x08;
}

/// Controller instructions
pub mod cmd {
    pub const CLEAR: u8 = 0x01;
    pub const ENTRY_MODE_INCREMENT: u8 = 0x06;
    pub const DISPLAY_ON: u8 = 0x0C;
    pub const FUNCTION_4BIT_2LINE: u8 = 0x28;
    pub const SET_DDRAM: u8 = 0x80;
}

/// Visible columns
pub const COLUMNS: u8 = 16;

/// Visible rows
pub const ROWS: u8 = 2;

/// DDRAM address of each row start
const ROW_OFFSETS: [u8; ROWS as usize] = [0x00, 0x40];

/// Typical instruction execution time (µs)
const EXEC_US: u32 = 50;

/// Clear and home execution time (µs)
const CLEAR_US: u32 = 2000;

/// LCD driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LcdError<E> {
    /// I2C transfer failed
    I2c(E),
    /// Cursor position outside the 16x2 grid
    OutOfRange,
}

/// HD44780 behind a PCF8574
pub struct Hd44780<I, D> {
    i2c: I,
    delay: D,
    address: u8,
    backlight: u8,
}

impl<I: I2c, D: DelayNs> Hd44780<I, D> {
    /// Create a driver; call [`init`](Self::init) before use
    pub fn new(i2c: I, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            backlight: pin::BACKLIGHT,
        }
    }

    /// Run the 4-bit power-on sequence and clear the screen
    pub fn init(&mut self) -> Result<(), LcdError<I::Error>> {
        // Power-up wait
        self.delay.delay_ms(50);

        // Three 8-bit "function set" nibbles force a known state,
        // then one more switches to 4-bit mode
        for wait_us in [4500, 4500, 150] {
            self.write_nibble(0x30, 0)?;
            self.delay.delay_us(wait_us);
        }
        self.write_nibble(0x20, 0)?;
        self.delay.delay_us(EXEC_US);

        self.command(cmd::FUNCTION_4BIT_2LINE)?;
        self.command(cmd::DISPLAY_ON)?;
        self.command(cmd::ENTRY_MODE_INCREMENT)?;
        CharacterSink::clear(self)
    }

    /// Turn the backlight on or off
    pub fn set_backlight(&mut self, on: bool) -> Result<(), LcdError<I::Error>> {
        self.backlight = if on { pin::BACKLIGHT } else { 0 };
        self.i2c
            .write(self.address, &[self.backlight])
            .map_err(LcdError::I2c)
    }

    /// Release the bus and delay
    pub fn release(self) -> (I, D) {
        (self.i2c, self.delay)
    }

    /// Send an instruction byte
    pub fn command(&mut self, byte: u8) -> Result<(), LcdError<I::Error>> {
        self.write_byte(byte, 0)?;
        self.delay.delay_us(EXEC_US);
        Ok(())
    }

    fn write_data(&mut self, byte: u8) -> Result<(), LcdError<I::Error>> {
        self.write_byte(byte, pin::RS)
    }

    /// Both nibbles with their EN pulses in one I2C transfer
    fn write_byte(&mut self, byte: u8, mode: u8) -> Result<(), LcdError<I::Error>> {
        let flags = mode | self.backlight;
        let high = (byte & 0xF0) | flags;
        let low = (byte << 4) | flags;
        self.i2c
            .write(self.address, &[high | pin::EN, high, low | pin::EN, low])
            .map_err(LcdError::I2c)
    }

    fn write_nibble(&mut self, nibble: u8, mode: u8) -> Result<(), LcdError<I::Error>> {
        let bits = (nibble & 0xF0) | mode | self.backlight;
        self.i2c
            .write(self.address, &[bits | pin::EN, bits])
            .map_err(LcdError::I2c)
    }
}

impl<I: I2c, D: DelayNs> CharacterSink for Hd44780<I, D> {
    type Error = LcdError<I::Error>;

    fn set_cursor(&mut self, column: u8, row: u8) -> Result<(), Self::Error> {
        if column >= COLUMNS || row >= ROWS {
            return Err(LcdError::OutOfRange);
        }
        self.command(cmd::SET_DDRAM | (ROW_OFFSETS[row as usize] + column))
    }

    fn print(&mut self, text: &str) -> Result<(), Self::Error> {
        for byte in text.bytes() {
            self.write_data(byte)?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.write_byte(cmd::CLEAR, 0)?;
        self.delay.delay_us(CLEAR_US);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};

    /// Mock I2C bus recording every written byte
    #[derive(Default)]
    struct MockI2c {
        writes: Vec<(u8, Vec<u8>)>,
        fail: bool,
    }

    impl ErrorType for MockI2c {
        type Error = ErrorKind;
    }

    impl I2c for MockI2c {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            for op in operations {
                if let Operation::Write(bytes) = op {
                    self.writes.push((address, bytes.to_vec()));
                }
            }
            Ok(())
        }
    }

    /// Mock delay accumulating requested time
    #[derive(Default)]
    struct MockDelay {
        total_ns: u64,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += ns as u64;
        }
    }

    fn lcd() -> Hd44780<MockI2c, MockDelay> {
        Hd44780::new(MockI2c::default(), MockDelay::default(), 0x27)
    }

    fn bytes(lcd: &Hd44780<MockI2c, MockDelay>) -> Vec<u8> {
        lcd.i2c
            .writes
            .iter()
            .flat_map(|(_, b)| b.iter().copied())
            .collect()
    }

    #[test]
    fn test_set_cursor_second_row() {
        let mut lcd = lcd();
        lcd.set_cursor(3, 1).unwrap();
        // 0x80 | 0x43 = 0xC3, backlight on
        assert_eq!(bytes(&lcd), vec![0xCC, 0xC8, 0x3C, 0x38]);
        assert_eq!(lcd.i2c.writes[0].0, 0x27);
    }

    #[test]
    fn test_print_sets_rs() {
        let mut lcd = lcd();
        lcd.print("A").unwrap();
        // 'A' = 0x41
        assert_eq!(bytes(&lcd), vec![0x4D, 0x49, 0x1D, 0x19]);
    }

    #[test]
    fn test_cursor_out_of_range() {
        let mut lcd = lcd();
        assert_eq!(lcd.set_cursor(16, 0), Err(LcdError::OutOfRange));
        assert_eq!(lcd.set_cursor(0, 2), Err(LcdError::OutOfRange));
        assert!(lcd.i2c.writes.is_empty());
    }

    #[test]
    fn test_init_sequence() {
        let mut lcd = lcd();
        lcd.init().unwrap();
        let writes = &lcd.i2c.writes;

        // Four single nibbles, then function set, display on, entry mode, clear
        assert_eq!(writes.len(), 8);
        assert_eq!(writes[0].1, vec![0x3C, 0x38]);
        assert_eq!(writes[3].1, vec![0x2C, 0x28]);
        assert_eq!(writes[4].1, vec![0x2C, 0x28, 0x8C, 0x88]);
        assert_eq!(writes[7].1, vec![0x0C, 0x08, 0x1C, 0x18]);
        assert!(lcd.delay.total_ns >= 50_000_000);
    }

    #[test]
    fn test_backlight_off_clears_bit() {
        let mut lcd = lcd();
        lcd.set_backlight(false).unwrap();
        lcd.print(" ").unwrap();
        // ' ' = 0x20
        assert_eq!(bytes(&lcd), vec![0x00, 0x25, 0x21, 0x05, 0x01]);
    }

    #[test]
    fn test_bus_error_propagates() {
        let mut lcd = lcd();
        lcd.i2c.fail = true;
        assert_eq!(lcd.print("x"), Err(LcdError::I2c(ErrorKind::Other)));
    }
}
