//! Time queries, conversions and busy-waits over a host timer.
//!
//! [`Clock`] wraps any [`TimeHal`] and carries no state of its own. The
//! crate-root functions are a `Clock` over [`crate::hal::active`]; tests and
//! callers that need a specific host build their own:
//!
//! ```ignore
//! use osk::time::Clock;
//! use osk::hal::SimHal;
//!
//! let sim = SimHal::new(1000);
//! let clock = Clock::new(&sim);
//! let deadline = clock.ticks_later(250);
//! ```
//!
//! Tick counts and nanosecond readings are separate domains, as are the two
//! nanosecond clocks: never subtract a wall-clock reading from a boot-clock
//! one.

use log::trace;

use crate::convert::{ms_to_ticks_at, ticks_to_ms_at};
use crate::hal::TimeHal;
use crate::ticks::TickCounter;
use crate::timespec::Timespec;
use crate::units::{
    Msecs, Nsecs, Ticks, Ticks32, Usecs32, NSEC_PER_MSEC, NSEC_PER_USEC, USEC_PER_MSEC,
};

/// Busy-waits longer than this are traced; they should be rare.
const LONG_BUSY_WAIT_US: Usecs32 = USEC_PER_MSEC as Usecs32;

/// The time layer bound to one host timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Clock<H> {
    hal: H,
}

impl<H: TimeHal> Clock<H> {
    pub const fn new(hal: H) -> Self {
        Self { hal }
    }

    /// The host timer underneath.
    pub fn hal(&self) -> &H {
        &self.hal
    }

    /// Tick counter frequency in Hz.
    #[inline]
    pub fn tick_hz(&self) -> u32 {
        self.hal.tick_hz()
    }

    // ───────────────────────────────────────────────────────────────────────
    // Tick counter
    // ───────────────────────────────────────────────────────────────────────

    /// Current tick counter snapshot.
    #[inline]
    pub fn tick_count(&self) -> Ticks {
        self.hal.tick_count()
    }

    /// Low 32 bits of the tick counter.
    #[inline]
    pub fn tick_count32(&self) -> Ticks32 {
        self.hal.tick_count() as Ticks32
    }

    /// Milliseconds to ticks, rounded up.
    #[inline]
    pub fn ms_to_ticks(&self, ms: Msecs) -> Ticks {
        ms_to_ticks_at(ms, self.hal.tick_hz())
    }

    /// Ticks to milliseconds, rounded up, saturating.
    #[inline]
    pub fn ticks_to_ms(&self, ticks: Ticks) -> Msecs {
        ticks_to_ms_at(ticks, self.hal.tick_hz())
    }

    /// Tick value at least `ms` from now. Compare against it with
    /// [`Clock::has_expired`].
    ///
    /// The snapshot may be up to one tick stale, so one extra tick is added.
    #[inline]
    pub fn ticks_later(&self, ms: Msecs) -> Ticks {
        self.tick_count()
            .wrapping_add(self.ms_to_ticks(ms))
            .wrapping_add(1)
    }

    /// Whether the counter has reached `deadline`.
    #[inline]
    pub fn has_expired(&self, deadline: Ticks) -> bool {
        self.tick_count().time_after_eq(deadline)
    }

    /// Milliseconds elapsed since the `start` snapshot.
    #[inline]
    pub fn ticks_to_ms_since(&self, start: Ticks) -> Msecs {
        self.ticks_to_ms(self.tick_count().ticks_since(start))
    }

    // ───────────────────────────────────────────────────────────────────────
    // Delays
    // ───────────────────────────────────────────────────────────────────────

    /// Spin for at least `usecs` microseconds. Never yields, cannot be
    /// cancelled. Only for short waits where sleeping is not an option.
    pub fn busy_delay_us(&self, usecs: Usecs32) {
        if usecs > LONG_BUSY_WAIT_US {
            trace!("[OSK] busy-wait {} us", usecs);
        }
        self.hal.busy_delay_us(usecs)
    }

    // ───────────────────────────────────────────────────────────────────────
    // Nanosecond clocks
    // ───────────────────────────────────────────────────────────────────────

    /// Wall-clock nanoseconds since the Unix epoch. May jump; not for
    /// measuring intervals.
    #[inline]
    pub fn time_get_ns(&self) -> Nsecs {
        self.hal.real_time().to_ns_u64()
    }

    /// Wall clock as seconds + nanoseconds.
    #[inline]
    pub fn time_get_timespec(&self) -> Timespec {
        self.hal.real_time()
    }

    /// Nanoseconds since boot. Monotonic within a boot, meaningless across
    /// boots.
    #[inline]
    pub fn boot_time_get_ns(&self) -> Nsecs {
        self.hal.boot_time_ns()
    }

    /// Boot clock in 32bit microseconds. Wraps after ~71 minutes.
    #[inline]
    pub fn boot_time_get_us32(&self) -> Usecs32 {
        (self.boot_time_get_ns() / NSEC_PER_USEC) as Usecs32
    }

    /// Boot clock in 32bit milliseconds. Wraps after ~49 days.
    #[inline]
    pub fn boot_time_get_ms32(&self) -> Msecs {
        (self.boot_time_get_ns() / NSEC_PER_MSEC) as Msecs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::SimHal;
    use crate::units::NSEC_PER_SEC;

    #[test]
    fn test_1000hz_scenario() {
        let sim = SimHal::new(1000);
        let clock = Clock::new(&sim);

        assert_eq!(clock.ms_to_ticks(250), 250);
        assert_eq!(clock.ticks_to_ms(250), 250);

        let start = clock.tick_count();
        let deadline = start.wrapping_add(clock.ms_to_ticks(250));
        assert!(!clock.has_expired(deadline));

        sim.advance_ms(250);
        assert!(clock.tick_count().time_after_eq(deadline));
        assert!(clock.has_expired(deadline));
        assert_eq!(clock.ticks_to_ms_since(start), 250);
    }

    #[test]
    fn test_deadline_across_wrap() {
        let sim = SimHal::new(250);
        sim.set_tick_offset(Ticks::MAX - 3);
        let clock = Clock::new(&sim);

        let deadline = clock.ticks_later(40); // 10 ticks + 1
        assert!(deadline < clock.tick_count());
        assert!(!clock.has_expired(deadline));

        sim.advance_ms(40);
        assert!(!clock.has_expired(deadline));
        sim.advance_ms(4);
        assert!(clock.has_expired(deadline));
    }

    #[test]
    fn test_deadline_taken_late_in_a_tick_is_not_early() {
        // 4 ms per tick; snapshot 0.1 ms before the counter moves.
        let sim = SimHal::new(250);
        let clock = Clock::new(&sim);
        sim.advance_ns(3_900_000);
        let start_ns = clock.boot_time_get_ns();
        let deadline = clock.ticks_later(4);

        sim.advance_ns(100_000);
        assert!(!clock.has_expired(deadline));

        sim.advance_ns(3_900_000);
        assert_eq!(clock.boot_time_get_ns() - start_ns, 4 * NSEC_PER_MSEC);
        assert!(!clock.has_expired(deadline));

        sim.advance_ns(100_000);
        assert!(clock.has_expired(deadline));
    }

    #[test]
    fn test_wall_jump_does_not_touch_boot_clock() {
        let sim = SimHal::new(1000);
        sim.set_wall_clock_ns(1_700_000_000 * NSEC_PER_SEC as i64);
        let clock = Clock::new(&sim);

        sim.advance_ms(10);
        let wall_before = clock.time_get_ns();
        let boot_before = clock.boot_time_get_ns();

        sim.step_wall_clock_ns(-3600 * NSEC_PER_SEC as i64);
        sim.advance_ms(10);

        assert!(clock.time_get_ns() < wall_before);
        assert_eq!(clock.boot_time_get_ns(), boot_before + 10 * NSEC_PER_MSEC);
    }

    #[test]
    fn test_wall_clock_before_epoch_reads_zero() {
        let sim = SimHal::new(1000);
        sim.set_wall_clock_ns(-5);
        let clock = Clock::new(&sim);
        assert_eq!(clock.time_get_ns(), 0);
        assert_eq!(clock.time_get_timespec().to_ns(), -5);
    }

    #[test]
    fn test_busy_delay_moves_sim_clock() {
        let sim = SimHal::new(1000);
        let clock = Clock::new(&sim);
        clock.busy_delay_us(0);
        assert_eq!(clock.boot_time_get_ns(), 0);
        clock.busy_delay_us(100_000);
        assert_eq!(clock.boot_time_get_ns(), 100 * NSEC_PER_MSEC);
    }

    #[test]
    fn test_truncated_boot_clocks() {
        let sim = SimHal::new(1000);
        let clock = Clock::new(&sim);
        sim.advance_ns(3 * NSEC_PER_SEC + 1_500);
        assert_eq!(clock.boot_time_get_us32(), 3_000_001);
        assert_eq!(clock.boot_time_get_ms32(), 3_000);
    }

    #[test]
    fn test_tick_count32_is_low_word() {
        let sim = SimHal::new(1000);
        sim.set_tick_offset(0x1_0000_0005u64 as Ticks);
        let clock = Clock::new(&sim);
        assert_eq!(clock.tick_count32(), 5);
    }
}
