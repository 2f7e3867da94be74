//! Host timer abstraction.
//!
//! The time layer needs four things from whatever it runs on: a wrapping
//! tick counter and its frequency, a wall clock, a boot-relative clock and
//! a busy-wait. [`TimeHal`] is that contract. Exactly one backend is bound
//! at build time as [`ActiveHal`]; nothing above this module names a
//! backend directly.
//!
//! # Backends
//!
//! | Feature | Backend | Notes |
//! |---------|---------|-------|
//! | `tsc`   | [`TscHal`] | x86_64 bare metal, needs `TscHal::init` |
//! | `std`   | [`StdHal`] | hosted, `std::time` |
//! | `sim` / tests | [`SimHal`] | simulated, caller drives time |
//!
//! `tsc` wins when both `tsc` and `std` are enabled.
//!
//! # Usage
//!
//! ```ignore
//! use osk::hal::{self, TimeHal};
//!
//! let hz = hal::active().tick_hz();
//! let now = hal::active().tick_count();
//! ```

use crate::timespec::Timespec;
use crate::units::{Nsecs, Ticks, Usecs32};

#[cfg(any(test, feature = "sim"))]
pub mod sim;
#[cfg(feature = "std")]
pub mod std_hal;
#[cfg(all(feature = "tsc", target_arch = "x86_64"))]
pub mod tsc;

#[cfg(any(test, feature = "sim"))]
pub use sim::SimHal;
#[cfg(feature = "std")]
pub use std_hal::StdHal;
#[cfg(all(feature = "tsc", target_arch = "x86_64"))]
pub use tsc::{TscConfig, TscHal};

// ═══════════════════════════════════════════════════════════════════════════
// TICK FREQUENCY
// ═══════════════════════════════════════════════════════════════════════════

/// Tick frequency of the hosted and bare-metal backends. 250 unless an
/// `hz-*` feature says otherwise.
#[cfg(feature = "hz-1000")]
pub const TICK_HZ: u32 = 1000;
#[cfg(all(feature = "hz-300", not(feature = "hz-1000")))]
pub const TICK_HZ: u32 = 300;
#[cfg(all(feature = "hz-250", not(any(feature = "hz-300", feature = "hz-1000"))))]
pub const TICK_HZ: u32 = 250;
#[cfg(all(
    feature = "hz-100",
    not(any(feature = "hz-250", feature = "hz-300", feature = "hz-1000"))
))]
pub const TICK_HZ: u32 = 100;
#[cfg(not(any(
    feature = "hz-100",
    feature = "hz-250",
    feature = "hz-300",
    feature = "hz-1000"
)))]
pub const TICK_HZ: u32 = 250;

/// Tick counter value at boot. Chosen so the low 32 bits wrap five minutes
/// in, which flushes out comparisons that skip [`crate::ticks`].
pub const INITIAL_TICKS: Ticks = 0u32.wrapping_sub(300 * TICK_HZ) as Ticks;

// ═══════════════════════════════════════════════════════════════════════════
// TRAIT
// ═══════════════════════════════════════════════════════════════════════════

/// What the host timer facility must provide.
///
/// All methods are infallible. A host that cannot answer is broken beyond
/// what this layer can report; backends panic in that case.
pub trait TimeHal: Sync {
    /// Tick counter frequency in Hz.
    fn tick_hz(&self) -> u32;

    /// Current tick counter snapshot. Wraps modulo the width of [`Ticks`].
    fn tick_count(&self) -> Ticks;

    /// Wall-clock time. May jump when the host clock is adjusted.
    fn real_time(&self) -> Timespec;

    /// Nanoseconds since boot. Never decreases within a boot.
    fn boot_time_ns(&self) -> Nsecs;

    /// Spin for at least `usecs` microseconds without yielding.
    fn busy_delay_us(&self, usecs: Usecs32);
}

impl<H: TimeHal + ?Sized> TimeHal for &H {
    #[inline]
    fn tick_hz(&self) -> u32 {
        (**self).tick_hz()
    }

    #[inline]
    fn tick_count(&self) -> Ticks {
        (**self).tick_count()
    }

    #[inline]
    fn real_time(&self) -> Timespec {
        (**self).real_time()
    }

    #[inline]
    fn boot_time_ns(&self) -> Nsecs {
        (**self).boot_time_ns()
    }

    #[inline]
    fn busy_delay_us(&self, usecs: Usecs32) {
        (**self).busy_delay_us(usecs)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// BUILD-TIME SELECTION
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(all(feature = "tsc", not(target_arch = "x86_64")))]
compile_error!("the `tsc` timer backend is only available on x86_64");

#[cfg(not(any(feature = "std", feature = "tsc")))]
compile_error!("no timer backend selected: enable the `std` or `tsc` feature");

/// The backend this build talks to.
#[cfg(all(feature = "tsc", target_arch = "x86_64"))]
pub type ActiveHal = TscHal;

/// The backend this build talks to.
#[cfg(all(feature = "std", not(feature = "tsc")))]
pub type ActiveHal = StdHal;

/// The process-wide instance of [`ActiveHal`].
#[cfg(all(feature = "tsc", target_arch = "x86_64"))]
#[inline]
pub fn active() -> &'static ActiveHal {
    TscHal::global()
}

/// The process-wide instance of [`ActiveHal`].
#[cfg(all(feature = "std", not(feature = "tsc")))]
#[inline]
pub fn active() -> &'static ActiveHal {
    StdHal::global()
}
