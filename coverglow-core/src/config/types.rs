//! Configuration type definitions

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::transition::TransitionTiming;

/// Largest accepted UTC offset magnitude (minutes)
pub const MAX_UTC_OFFSET_MIN: i16 = 14 * 60;

/// Pixel matrix settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MatrixConfig {
    /// Global LED brightness (0-255)
    pub brightness: u8,
    /// Crossfade duration (ms)
    pub transition_ms: u32,
    /// Crossfade step interval (ms); 0 disables crossfades
    pub step_ms: u32,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            brightness: 32,
            transition_ms: 1000,
            step_ms: 50,
        }
    }
}

impl MatrixConfig {
    /// Transition timing for the crossfade engine
    pub fn timing(&self) -> TransitionTiming {
        TransitionTiming {
            duration_ms: self.transition_ms,
            step_ms: self.step_ms,
        }
    }
}

/// Character LCD settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LcdConfig {
    /// 7-bit I2C address of the backpack
    pub address: u8,
    /// Text refresh period (ms)
    pub refresh_ms: u32,
}

impl Default for LcdConfig {
    fn default() -> Self {
        Self {
            address: 0x27,
            refresh_ms: 400,
        }
    }
}

/// Idle clock settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClockConfig {
    /// Local time offset from UTC (minutes)
    pub utc_offset_min: i16,
    /// Show the clock on the matrix when nothing is playing
    pub show_when_idle: bool,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            utc_offset_min: 0,
            show_when_idle: true,
        }
    }
}

/// Host link UART settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LinkConfig {
    pub baudrate: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self { baudrate: 115_200 }
    }
}

/// Invalid configuration values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValidationError {
    /// LCD address outside the 7-bit range
    LcdAddress,
    /// LCD refresh period of zero
    RefreshPeriod,
    /// UTC offset beyond +/-14 hours
    UtcOffset,
    /// Zero baud rate
    Baudrate,
}

/// Complete display configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DisplayConfig {
    pub matrix: MatrixConfig,
    pub lcd: LcdConfig,
    pub clock: ClockConfig,
    pub link: LinkConfig,
}

impl DisplayConfig {
    /// Check value ranges the parser cannot express
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.lcd.address > 0x7F {
            return Err(ValidationError::LcdAddress);
        }
        if self.lcd.refresh_ms == 0 {
            return Err(ValidationError::RefreshPeriod);
        }
        if self.clock.utc_offset_min.unsigned_abs() > MAX_UTC_OFFSET_MIN as u16 {
            return Err(ValidationError::UtcOffset);
        }
        if self.link.baudrate == 0 {
            return Err(ValidationError::Baudrate);
        }
        Ok(())
    }
}
