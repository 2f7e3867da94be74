//! GPU Driver OS Services: Time
//!
//! The driver's only window onto host time. Job deadlines, watchdogs and
//! power-management delays go through here and never touch a host timer
//! API directly.
//!
//! # Architecture
//!
//! ```text
//! driver code (scheduler, watchdog, PM)
//!        │  free functions below / time::Clock
//!        ▼
//!   osk::time     ticks, conversion, delays, ns clocks (no state)
//!        │  hal::TimeHal
//!        ▼
//!   hal backend   picked at build time: TscHal | StdHal   (SimHal in tests)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! // Arm a 250 ms job timeout
//! let deadline = osk::ticks_later(250);
//!
//! // ... later, from the watchdog
//! if osk::time_after_eq(osk::tick_count(), deadline) {
//!     // job timed out
//! }
//!
//! // Short settle delay inside a critical section
//! osk::busy_delay_us(10);
//!
//! // Timestamps
//! let wall = osk::time_get_ns();         // may jump
//! let since_boot = osk::boot_time_get_ns(); // monotonic
//! ```
//!
//! # Bare metal
//!
//! With the `tsc` feature the platform layer must hand over the calibrated
//! TSC frequency before the first query:
//!
//! ```ignore
//! use osk::hal::{self, TscConfig};
//!
//! hal::active().init(TscConfig { tsc_hz, wall_epoch_ns })?;
//! ```
//!
//! # What This Crate Does NOT Do
//!
//! - Clock sources or counter calibration
//! - High-resolution timers or timer callbacks
//! - Sleeping or yielding waits

#![cfg_attr(not(any(feature = "std", test)), no_std)]

pub mod convert;
pub mod error;
pub mod hal;
pub mod ticks;
pub mod time;
pub mod timespec;
pub mod units;

use hal::ActiveHal;
use time::Clock;

// ═══════════════════════════════════════════════════════════════════════════
// RE-EXPORTS
// ═══════════════════════════════════════════════════════════════════════════

pub use error::{OskError, Result};
pub use hal::{TimeHal, INITIAL_TICKS, TICK_HZ};
pub use ticks::{time_after, time_after_eq, time_before, time_before_eq, TickCounter};
pub use timespec::Timespec;
pub use units::{
    Msecs, Nsecs, Ticks, Ticks32, Usecs, Usecs32, MSEC_PER_SEC, NSEC_PER_MSEC, NSEC_PER_SEC,
    NSEC_PER_USEC, USEC_PER_MSEC, USEC_PER_SEC,
};

// ═══════════════════════════════════════════════════════════════════════════
// TIME LAYER ON THE ACTIVE HOST
// ═══════════════════════════════════════════════════════════════════════════

#[inline]
fn clock() -> Clock<&'static ActiveHal> {
    Clock::new(hal::active())
}

/// Converts milliseconds to ticks, rounded up.
#[inline]
pub fn ms_to_ticks(ms: Msecs) -> Ticks {
    clock().ms_to_ticks(ms)
}

/// Converts ticks to milliseconds, rounded up and saturating.
#[inline]
pub fn ticks_to_ms(ticks: Ticks) -> Msecs {
    clock().ticks_to_ms(ticks)
}

/// Returns the current tick counter.
#[inline]
pub fn tick_count() -> Ticks {
    clock().tick_count()
}

/// Returns the low 32 bits of the tick counter.
#[inline]
pub fn tick_count32() -> Ticks32 {
    clock().tick_count32()
}

/// Returns a tick value at least `ms` from now.
#[inline]
pub fn ticks_later(ms: Msecs) -> Ticks {
    clock().ticks_later(ms)
}

/// Returns true once the tick counter has reached `deadline`.
#[inline]
pub fn has_expired(deadline: Ticks) -> bool {
    clock().has_expired(deadline)
}

/// Spins for at least `usecs` microseconds without yielding.
#[inline]
pub fn busy_delay_us(usecs: Usecs32) {
    clock().busy_delay_us(usecs)
}

/// Returns wall-clock nanoseconds since the Unix epoch. May jump.
#[inline]
pub fn time_get_ns() -> Nsecs {
    clock().time_get_ns()
}

/// Returns the nanoseconds elapsed since boot.
#[inline]
pub fn boot_time_get_ns() -> Nsecs {
    clock().boot_time_get_ns()
}
