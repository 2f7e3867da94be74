//! Hosted timer backend on `std::time`.
//!
//! The process is the "machine": the boot clock starts at the first query,
//! the tick counter is derived from it at [`TICK_HZ`] starting from
//! [`INITIAL_TICKS`], and the wall clock is `SystemTime`.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use spin::Once;

use super::{TimeHal, INITIAL_TICKS, TICK_HZ};
use crate::convert::ns_to_ticks_at;
use crate::timespec::Timespec;
use crate::units::{Nsecs, Ticks, Usecs32};

static STD_HAL: StdHal = StdHal::new();

/// Timer backend for hosted builds.
#[derive(Debug)]
pub struct StdHal {
    boot: Once<Instant>,
}

impl StdHal {
    pub const fn new() -> Self {
        Self { boot: Once::new() }
    }

    /// The instance behind [`super::active`].
    #[inline]
    pub fn global() -> &'static StdHal {
        &STD_HAL
    }

    #[inline]
    fn boot_instant(&self) -> Instant {
        *self.boot.call_once(Instant::now)
    }
}

impl Default for StdHal {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeHal for StdHal {
    fn tick_hz(&self) -> u32 {
        TICK_HZ
    }

    fn tick_count(&self) -> Ticks {
        let elapsed = ns_to_ticks_at(self.boot_time_ns(), TICK_HZ);
        INITIAL_TICKS.wrapping_add(elapsed as Ticks)
    }

    fn real_time(&self) -> Timespec {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(since) => Timespec::new(since.as_secs() as i64, since.subsec_nanos() as i64),
            // Host clock set before 1970.
            Err(err) => {
                let before = err.duration();
                Timespec::new(-(before.as_secs() as i64), -(before.subsec_nanos() as i64))
                    .normalize()
            }
        }
    }

    fn boot_time_ns(&self) -> Nsecs {
        let elapsed = self.boot_instant().elapsed().as_nanos();
        elapsed.min(Nsecs::MAX as u128) as Nsecs
    }

    fn busy_delay_us(&self, usecs: Usecs32) {
        let start = Instant::now();
        let wait = Duration::from_micros(usecs as u64);
        while start.elapsed() < wait {
            core::hint::spin_loop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boot_clock_monotonic() {
        let hal = StdHal::new();
        let mut last = hal.boot_time_ns();
        for _ in 0..1000 {
            let now = hal.boot_time_ns();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn test_tick_count_starts_near_initial() {
        let hal = StdHal::new();
        let ticks = hal.tick_count();
        // A fresh instance was just anchored; well under a minute has passed.
        assert!(ticks.wrapping_sub(INITIAL_TICKS) < (60 * TICK_HZ) as Ticks);
    }

    #[test]
    fn test_wall_clock_after_2020() {
        let hal = StdHal::new();
        // 2020-01-01T00:00:00Z
        assert!(hal.real_time().sec > 1_577_836_800);
    }

    #[test]
    fn test_busy_delay_lower_bound() {
        let hal = StdHal::new();
        let start = Instant::now();
        hal.busy_delay_us(2000);
        assert!(start.elapsed() >= Duration::from_micros(2000));
    }
}
