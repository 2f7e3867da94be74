//! Tick <-> time unit conversion at a given tick frequency.
//!
//! Every backend reports its frequency through [`crate::hal::TimeHal::tick_hz`]
//! and every conversion goes through here, so both directions always use the
//! same constant.
//!
//! Durations round **up**: `ms_to_ticks_at` never asks for fewer ticks than
//! the duration spans, and `ticks_to_ms_at` never under-reports a wait.
//! Counter readings (`ns_to_ticks_at`) round down, since a tick is only
//! counted once it has fully elapsed. That makes a snapshot up to one tick
//! stale; [`crate::time::Clock::ticks_later`] pads deadlines for it.
//!
//! Intermediates are 128-bit, so nothing overflows before the final clamp.

use log::warn;

use crate::units::{Msecs, Nsecs, Ticks, MSEC_PER_SEC, NSEC_PER_SEC};

/// Largest delta that can be added to a tick snapshot and still compare
/// correctly against it.
pub const MAX_TICK_OFFSET: Ticks = (Ticks::MAX >> 1) - 1;

#[inline]
fn clamp_offset(ticks: u128) -> Ticks {
    if ticks > MAX_TICK_OFFSET as u128 {
        warn!("[OSK] tick delta {} clamped to {}", ticks, MAX_TICK_OFFSET);
        MAX_TICK_OFFSET
    } else {
        ticks as Ticks
    }
}

/// Milliseconds to ticks, rounded up, clamped to [`MAX_TICK_OFFSET`].
pub fn ms_to_ticks_at(ms: Msecs, hz: u32) -> Ticks {
    if hz == 0 {
        return MAX_TICK_OFFSET;
    }
    clamp_offset((ms as u128 * hz as u128).div_ceil(MSEC_PER_SEC as u128))
}

/// Ticks to milliseconds, rounded up, saturating at `u32::MAX`.
pub fn ticks_to_ms_at(ticks: Ticks, hz: u32) -> Msecs {
    if hz == 0 {
        return Msecs::MAX;
    }
    let ms = (ticks as u128 * MSEC_PER_SEC as u128).div_ceil(hz as u128);
    if ms > Msecs::MAX as u128 {
        warn!("[OSK] {} ticks saturate a 32-bit millisecond count", ticks);
        Msecs::MAX
    } else {
        ms as Msecs
    }
}

/// Whole ticks elapsed in `ns`, rounded down. Used to derive a counter
/// reading from a nanosecond clock; the caller truncates to [`Ticks`].
///
/// The result wraps modulo 2^64, like the counter it feeds.
pub fn ns_to_ticks_at(ns: Nsecs, hz: u32) -> u64 {
    let ticks = ns as u128 * hz as u128 / NSEC_PER_SEC as u128;
    (ticks & u64::MAX as u128) as u64
}
