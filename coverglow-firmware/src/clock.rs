//! Wall clock on top of the embassy monotonic timer

use embassy_time::Instant;

use coverglow_core::time::{ClockReading, WallClock};
use coverglow_core::traits::ClockSource;

use crate::channels::WALL_CLOCK;

/// Reset the wall clock with the configured UTC offset
pub fn init(utc_offset_min: i16) {
    WALL_CLOCK.lock(|clock| clock.set(WallClock::new(utc_offset_min)));
}

/// Seed the wall clock with a UTC reading taken now
pub fn seed(utc: ClockReading) {
    let now_ms = Instant::now().as_millis();
    WALL_CLOCK.lock(|cell| {
        let mut clock = cell.get();
        clock.set(utc, now_ms);
        cell.set(clock);
    });
}

/// Local time derived from the last seed and elapsed uptime
pub struct UptimeClock;

impl ClockSource for UptimeClock {
    fn now(&mut self) -> Option<ClockReading> {
        let now_ms = Instant::now().as_millis();
        WALL_CLOCK.lock(|clock| clock.get().reading_at(now_ms))
    }
}
