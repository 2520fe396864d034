//! Wall-clock readings
//!
//! The board has no network time source of its own. The host link sends
//! the current time, and [`WallClock`] carries it forward with the
//! monotonic uptime counter until the next update arrives.

/// Minutes in a day
const MINUTES_PER_DAY: u32 = 24 * 60;

/// Milliseconds in a minute
const MS_PER_MINUTE: u64 = 60_000;

/// Hour and minute of the local time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockReading {
    hours: u8,
    minutes: u8,
}

impl ClockReading {
    /// Create a reading, rejecting out-of-range values
    pub const fn new(hours: u8, minutes: u8) -> Option<Self> {
        if hours < 24 && minutes < 60 {
            Some(Self { hours, minutes })
        } else {
            None
        }
    }

    /// Build a reading from minutes since midnight (wraps at 24h)
    pub const fn from_minute_of_day(minute_of_day: u32) -> Self {
        let m = minute_of_day % MINUTES_PER_DAY;
        Self {
            hours: (m / 60) as u8,
            minutes: (m % 60) as u8,
        }
    }

    /// Hours (0-23)
    pub const fn hours(&self) -> u8 {
        self.hours
    }

    /// Minutes (0-59)
    pub const fn minutes(&self) -> u8 {
        self.minutes
    }

    /// Minutes since midnight
    pub const fn minute_of_day(&self) -> u32 {
        self.hours as u32 * 60 + self.minutes as u32
    }
}

/// Software clock seeded from an external time reading
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WallClock {
    /// UTC offset applied to readings, in minutes
    utc_offset_min: i16,
    /// (UTC reading, uptime in ms when it was received)
    seed: Option<(ClockReading, u64)>,
}

impl WallClock {
    /// Create an unset clock
    pub const fn new(utc_offset_min: i16) -> Self {
        Self {
            utc_offset_min,
            seed: None,
        }
    }

    /// Record a UTC reading received at `uptime_ms`
    pub fn set(&mut self, utc: ClockReading, uptime_ms: u64) {
        self.seed = Some((utc, uptime_ms));
    }

    /// Whether the clock has been set
    pub fn is_set(&self) -> bool {
        self.seed.is_some()
    }

    /// Local time at `uptime_ms`, or `None` if never set
    pub fn reading_at(&self, uptime_ms: u64) -> Option<ClockReading> {
        let (utc, seeded_at) = self.seed?;
        let elapsed_min = (uptime_ms.saturating_sub(seeded_at) / MS_PER_MINUTE) % MINUTES_PER_DAY as u64;

        let local = utc.minute_of_day() as i64
            + elapsed_min as i64
            + self.utc_offset_min as i64;
        let local = local.rem_euclid(MINUTES_PER_DAY as i64) as u32;

        Some(ClockReading::from_minute_of_day(local))
    }
}
