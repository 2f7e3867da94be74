//! Time units shared by the driver.
//!
//! Plain aliases, not newtypes: callers do arithmetic on them all the time
//! and the host hands them over as raw integers anyway.

/// One unit of the host tick counter. `HZ` ticks make one second.
///
/// Machine word wide, so it wraps on 32-bit hosts far sooner than on 64-bit
/// ones. Compare with [`crate::ticks`], never with `>`.
pub type Ticks = core::ffi::c_ulong;

/// Ticks, but with a fixed width of 32bit.
pub type Ticks32 = u32;

/// The millisecond time unit.
pub type Msecs = u32;

/// The microseconds time unit.
pub type Usecs = u64;

/// The microseconds time unit with a fixed width of 32bit.
///
/// Busy-wait requests use this.
pub type Usecs32 = u32;

/// The nanosecond time unit.
pub type Nsecs = u64;

/// Milliseconds per second.
pub const MSEC_PER_SEC: Msecs = 1000;

/// Microseconds per millisecond.
pub const USEC_PER_MSEC: Usecs = 1000;

/// Microseconds per second.
pub const USEC_PER_SEC: Usecs = 1_000_000;

/// Nanoseconds per microsecond.
pub const NSEC_PER_USEC: Nsecs = 1000;

/// Nanoseconds per millisecond.
pub const NSEC_PER_MSEC: Nsecs = 1_000_000;

/// Nanoseconds per second.
pub const NSEC_PER_SEC: Nsecs = 1_000_000_000;
