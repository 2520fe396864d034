//! Wall-clock source trait

use crate::time::ClockReading;

/// Source of the current local time
///
/// Implementations may be backed by an RTC, a network-synced software
/// clock, or a fixed value in tests.
pub trait ClockSource {
    /// Current hour and minute, or `None` if the time is not yet known
    fn now(&mut self) -> Option<ClockReading>;
}
