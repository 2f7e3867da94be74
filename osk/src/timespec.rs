//! Seconds + nanoseconds wall-clock value.
//!
//! Seconds are always 64-bit, on every target. Backends that read a split
//! clock hand one of these over; the layer flattens it to nanoseconds.

use crate::units::{Nsecs, NSEC_PER_SEC};

const NSEC_PER_SEC_I64: i64 = NSEC_PER_SEC as i64;

/// A point on the wall clock, relative to the Unix epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Timespec {
    pub sec: i64,
    pub nsec: i64,
}

impl Timespec {
    /// The epoch itself.
    pub const ZERO: Self = Self { sec: 0, nsec: 0 };

    pub const fn new(sec: i64, nsec: i64) -> Self {
        Self { sec, nsec }
    }

    /// Split an unsigned nanosecond count.
    pub const fn from_ns(ns: Nsecs) -> Self {
        Self {
            sec: (ns / NSEC_PER_SEC) as i64,
            nsec: (ns % NSEC_PER_SEC) as i64,
        }
    }

    /// Split a signed nanosecond count. Times before the epoch keep `nsec`
    /// in `[0, NSEC_PER_SEC)` and carry the sign in `sec`.
    pub const fn from_ns_signed(ns: i64) -> Self {
        Self {
            sec: ns.div_euclid(NSEC_PER_SEC_I64),
            nsec: ns.rem_euclid(NSEC_PER_SEC_I64),
        }
    }

    /// Fold `nsec` into `[0, NSEC_PER_SEC)`, carrying into `sec`.
    pub fn normalize(self) -> Self {
        Self {
            sec: self.sec.saturating_add(self.nsec.div_euclid(NSEC_PER_SEC_I64)),
            nsec: self.nsec.rem_euclid(NSEC_PER_SEC_I64),
        }
    }

    /// Signed nanoseconds since the epoch, saturating.
    pub fn to_ns(&self) -> i64 {
        self.sec
            .saturating_mul(NSEC_PER_SEC_I64)
            .saturating_add(self.nsec)
    }

    /// Nanoseconds since the epoch. Times before it read as 0.
    pub fn to_ns_u64(&self) -> Nsecs {
        self.to_ns().max(0) as Nsecs
    }
}
