//! Simulated host timer.
//!
//! Time only moves when the caller moves it. Used by the crate's own tests
//! and, behind the `sim` feature, by driver tests that need deadlines,
//! wraparound or wall-clock steps on demand.
//!
//! ```ignore
//! let sim = SimHal::new(1000);
//! let clock = Clock::new(&sim);
//!
//! let deadline = clock.ticks_later(250);
//! sim.advance_ms(250);
//! assert!(clock.has_expired(deadline));
//! ```

use core::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use super::TimeHal;
use crate::convert::ns_to_ticks_at;
use crate::timespec::Timespec;
use crate::units::{Msecs, Nsecs, Ticks, Usecs32, NSEC_PER_MSEC, NSEC_PER_USEC};

/// Host timer whose clocks are advanced by hand.
///
/// The wall clock is the boot clock plus an offset, so advancing time moves
/// both and stepping the wall clock leaves the boot clock alone.
#[derive(Debug)]
pub struct SimHal {
    hz: u32,
    boot_ns: AtomicU64,
    wall_offset_ns: AtomicI64,
    tick_offset: AtomicU64,
}

impl SimHal {
    /// Fresh host at boot: all clocks and the tick counter read zero.
    pub const fn new(hz: u32) -> Self {
        Self {
            hz,
            boot_ns: AtomicU64::new(0),
            wall_offset_ns: AtomicI64::new(0),
            tick_offset: AtomicU64::new(0),
        }
    }

    /// Move both clocks forward by `ns`.
    pub fn advance_ns(&self, ns: Nsecs) {
        self.boot_ns.fetch_add(ns, Ordering::SeqCst);
    }

    /// Move both clocks forward by `ms`.
    pub fn advance_ms(&self, ms: Msecs) {
        self.advance_ns(ms as Nsecs * NSEC_PER_MSEC);
    }

    /// Set the wall clock to `ns` after the epoch.
    pub fn set_wall_clock_ns(&self, ns: i64) {
        let boot = self.boot_ns.load(Ordering::SeqCst) as i64;
        self.wall_offset_ns.store(ns.wrapping_sub(boot), Ordering::SeqCst);
    }

    /// Step the wall clock, forward or backward. The boot clock is untouched.
    pub fn step_wall_clock_ns(&self, delta: i64) {
        self.wall_offset_ns.fetch_add(delta, Ordering::SeqCst);
    }

    /// Start the tick counter from `ticks` instead of zero.
    pub fn set_tick_offset(&self, ticks: Ticks) {
        self.tick_offset.store(ticks as u64, Ordering::SeqCst);
    }
}

impl TimeHal for SimHal {
    fn tick_hz(&self) -> u32 {
        self.hz
    }

    fn tick_count(&self) -> Ticks {
        let elapsed = ns_to_ticks_at(self.boot_ns.load(Ordering::SeqCst), self.hz);
        (self.tick_offset.load(Ordering::SeqCst) as Ticks).wrapping_add(elapsed as Ticks)
    }

    fn real_time(&self) -> Timespec {
        let boot = self.boot_ns.load(Ordering::SeqCst) as i64;
        let offset = self.wall_offset_ns.load(Ordering::SeqCst);
        Timespec::from_ns_signed(boot.saturating_add(offset))
    }

    fn boot_time_ns(&self) -> Nsecs {
        self.boot_ns.load(Ordering::SeqCst)
    }

    fn busy_delay_us(&self, usecs: Usecs32) {
        self.advance_ns(usecs as Nsecs * NSEC_PER_USEC);
    }
}
