//! Wraparound-safe ordering on tick counters.
//!
//! A tick counter is a fixed-width integer that rolls over from `MAX` to 0.
//! Two snapshots are ordered by their modular distance: subtract with
//! wrapping, reinterpret the result as the signed type of the same width,
//! test the sign.
//!
//! # Precondition
//!
//! The real time between the two snapshots must be less than half the
//! counter range. Past that the wrap direction is ambiguous and the answer
//! is whatever the sign test yields. Nothing here tries to detect it.
//!
//! ```text
//!   b = MAX        a = 0
//!   ─────┼──wrap──┼─────▶   a.wrapping_sub(b) = 1  →  +1  →  a is after b
//! ```

use crate::units::Ticks;

// ═══════════════════════════════════════════════════════════════════════════
// TRAIT
// ═══════════════════════════════════════════════════════════════════════════

/// Ordering predicates on a wrapping counter of any width.
pub trait TickCounter: Copy {
    /// Wrapping distance from `earlier` to `self`.
    fn ticks_since(self, earlier: Self) -> Self;

    /// `self` is strictly later than `other`.
    fn time_after(self, other: Self) -> bool;

    /// `self` is at or later than `other`.
    fn time_after_eq(self, other: Self) -> bool;

    /// `self` is strictly earlier than `other`.
    #[inline]
    fn time_before(self, other: Self) -> bool {
        other.time_after(self)
    }

    /// `self` is at or earlier than `other`.
    #[inline]
    fn time_before_eq(self, other: Self) -> bool {
        other.time_after_eq(self)
    }

    /// `lo <= self <= hi` in wrapping order.
    #[inline]
    fn time_in_range(self, lo: Self, hi: Self) -> bool {
        self.time_after_eq(lo) && self.time_before_eq(hi)
    }
}

macro_rules! impl_tick_counter {
    ($($unsigned:ty => $signed:ty),* $(,)?) => {$(
        impl TickCounter for $unsigned {
            #[inline]
            fn ticks_since(self, earlier: Self) -> Self {
                self.wrapping_sub(earlier)
            }

            #[inline]
            fn time_after(self, other: Self) -> bool {
                (other.wrapping_sub(self) as $signed) < 0
            }

            #[inline]
            fn time_after_eq(self, other: Self) -> bool {
                (self.wrapping_sub(other) as $signed) >= 0
            }
        }
    )*};
}

impl_tick_counter! {
    u16 => i16,
    u32 => i32,
    u64 => i64,
    usize => isize,
}

// ═══════════════════════════════════════════════════════════════════════════
// FREE FUNCTIONS (host tick width)
// ═══════════════════════════════════════════════════════════════════════════

/// Returns true if `a` is at or after `b`, tolerating one wrap.
#[inline]
pub fn time_after_eq(a: Ticks, b: Ticks) -> bool {
    a.time_after_eq(b)
}

/// Returns true if `a` is strictly after `b`.
#[inline]
pub fn time_after(a: Ticks, b: Ticks) -> bool {
    a.time_after(b)
}

/// Returns true if `a` is strictly before `b`.
#[inline]
pub fn time_before(a: Ticks, b: Ticks) -> bool {
    a.time_before(b)
}

/// Returns true if `a` is at or before `b`.
#[inline]
pub fn time_before_eq(a: Ticks, b: Ticks) -> bool {
    a.time_before_eq(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflexive() {
        for b in [0 as Ticks, 1, 42, Ticks::MAX / 2, Ticks::MAX / 2 + 1, Ticks::MAX] {
            assert!(time_after_eq(b, b));
            assert!(time_before_eq(b, b));
            assert!(!time_after(b, b));
            assert!(!time_before(b, b));
        }
    }

    #[test]
    fn test_matches_integer_order_without_wrap() {
        let pairs: [(Ticks, Ticks); 5] = [(10, 5), (5, 10), (0, 0), (1000, 999), (7, 70_000)];
        for (a, b) in pairs {
            assert_eq!(time_after_eq(a, b), a >= b, "a={} b={}", a, b);
            assert_eq!(time_after(a, b), a > b, "a={} b={}", a, b);
        }
    }

    #[test]
    fn test_single_wrap() {
        assert!(time_after_eq(0, Ticks::MAX));
        assert!(time_after(0, Ticks::MAX));
        assert!(time_before(Ticks::MAX, 0));
        assert!(!time_after_eq(Ticks::MAX, 0));

        let b = Ticks::MAX - 10;
        let a = b.wrapping_add(100);
        assert!(time_after(a, b));
        assert_eq!(a.ticks_since(b), 100);
    }

    #[test]
    fn test_every_width() {
        assert!(0u16.time_after_eq(u16::MAX));
        assert!(0u32.time_after_eq(u32::MAX));
        assert!(0u64.time_after_eq(u64::MAX));
        assert!(0usize.time_after_eq(usize::MAX));

        assert!(!u16::MAX.time_after(0));
        assert!(5u32.time_before(u32::MAX.wrapping_add(10)));
    }

    #[test]
    fn test_half_range_edge() {
        // Just under half the range apart still orders correctly.
        let b = 0u32;
        let a = u32::MAX / 2;
        assert!(a.time_after(b));
        assert!(b.time_before(a));
    }

    #[test]
    fn test_in_range() {
        let lo: u32 = u32::MAX - 5;
        let hi: u32 = 5;
        assert!(0u32.time_in_range(lo, hi));
        assert!(lo.time_in_range(lo, hi));
        assert!(hi.time_in_range(lo, hi));
        assert!(!6u32.time_in_range(lo, hi));
        assert!(!(u32::MAX - 6).time_in_range(lo, hi));
    }
}
