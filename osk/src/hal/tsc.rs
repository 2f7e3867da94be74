//! Bare-metal timer backend on the TSC (Time Stamp Counter).
//!
//! # Bring-up
//! The platform layer calibrates the TSC (PIT or firmware stall) and hands
//! the frequency over through [`TscHal::init`], together with the wall-clock
//! time at that moment. This backend never calibrates on its own.
//!
//! # Clocks
//! - boot clock: raw TSC scaled to ns. The TSC resets to 0 at power-on.
//! - tick counter: boot clock at [`TICK_HZ`], starting from [`INITIAL_TICKS`].
//! - wall clock: handed-over epoch plus TSC time since `init`.
//!
//! # Safety
//! TSC reads are always safe. Requires invariant TSC (verify via CPUID at boot).

use core::arch::asm;

use log::{info, warn};
use spin::Once;

use super::{TimeHal, INITIAL_TICKS, TICK_HZ};
use crate::convert::ns_to_ticks_at;
use crate::error::{OskError, Result};
use crate::timespec::Timespec;
use crate::units::{Nsecs, Ticks, Usecs32, NSEC_PER_SEC, USEC_PER_SEC};

/// Slowest TSC we accept (1 MHz).
pub const TSC_HZ_MIN: u64 = 1_000_000;
/// Fastest TSC we accept (10 GHz).
pub const TSC_HZ_MAX: u64 = 10_000_000_000;

static TSC_HAL: TscHal = TscHal::new();

/// Read TSC (non-serializing).
///
/// Fast but may be reordered with surrounding instructions. Fine for
/// interval timing where exact ordering isn't critical.
#[inline]
pub fn read_tsc() -> u64 {
    let lo: u32;
    let hi: u32;
    unsafe {
        asm!(
            "rdtsc",
            out("eax") lo,
            out("edx") hi,
            options(nomem, nostack, preserves_flags)
        );
    }
    ((hi as u64) << 32) | lo as u64
}

/// Calibration handed over by platform bring-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TscConfig {
    /// Measured TSC frequency in Hz.
    pub tsc_hz: u64,
    /// Wall-clock time at the moment of `init`, ns since the Unix epoch.
    pub wall_epoch_ns: Nsecs,
}

#[derive(Debug)]
struct Calibration {
    config: TscConfig,
    init_tsc: u64,
}

/// Timer backend for bare-metal x86_64.
#[derive(Debug)]
pub struct TscHal {
    calibration: Once<Calibration>,
}

impl TscHal {
    pub const fn new() -> Self {
        Self {
            calibration: Once::new(),
        }
    }

    /// The instance behind [`super::active`].
    #[inline]
    pub fn global() -> &'static TscHal {
        &TSC_HAL
    }

    /// Store the calibration. Call once during platform bring-up.
    ///
    /// Repeating the call with the same config is a no-op.
    ///
    /// # Errors
    ///
    /// - `InvalidFrequency` if `tsc_hz` is outside `TSC_HZ_MIN..=TSC_HZ_MAX`
    /// - `AlreadyInitialized` if a different config is already stored
    pub fn init(&self, config: TscConfig) -> Result<()> {
        if !(TSC_HZ_MIN..=TSC_HZ_MAX).contains(&config.tsc_hz) {
            return Err(OskError::InvalidFrequency(config.tsc_hz));
        }

        let mut fresh = false;
        let stored = self.calibration.call_once(|| {
            fresh = true;
            Calibration {
                config,
                init_tsc: read_tsc(),
            }
        });

        if fresh {
            info!(
                "[OSK] TSC: {} Hz ({} MHz), wall epoch {} ns, tick {} Hz",
                config.tsc_hz,
                config.tsc_hz / 1_000_000,
                config.wall_epoch_ns,
                TICK_HZ
            );
            Ok(())
        } else if stored.config == config {
            Ok(())
        } else {
            warn!(
                "[OSK] TSC re-init rejected: have {} Hz, got {} Hz",
                stored.config.tsc_hz, config.tsc_hz
            );
            Err(OskError::AlreadyInitialized)
        }
    }

    /// The stored calibration.
    pub fn calibration(&self) -> Result<TscConfig> {
        self.calibration
            .get()
            .map(|c| c.config)
            .ok_or(OskError::NotInitialized)
    }

    pub fn is_initialized(&self) -> bool {
        self.calibration.is_completed()
    }

    #[inline]
    fn calibrated(&self) -> &Calibration {
        self.calibration
            .get()
            .expect("TscHal: timer queried before TscHal::init")
    }

    #[inline]
    fn cycles_to_ns(cycles: u64, tsc_hz: u64) -> Nsecs {
        (cycles as u128 * NSEC_PER_SEC as u128 / tsc_hz as u128) as Nsecs
    }
}

impl Default for TscHal {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeHal for TscHal {
    fn tick_hz(&self) -> u32 {
        TICK_HZ
    }

    fn tick_count(&self) -> Ticks {
        let elapsed = ns_to_ticks_at(self.boot_time_ns(), TICK_HZ);
        INITIAL_TICKS.wrapping_add(elapsed as Ticks)
    }

    fn real_time(&self) -> Timespec {
        let cal = self.calibrated();
        let since_init = read_tsc().wrapping_sub(cal.init_tsc);
        let ns = cal
            .config
            .wall_epoch_ns
            .saturating_add(Self::cycles_to_ns(since_init, cal.config.tsc_hz));
        Timespec::from_ns(ns)
    }

    fn boot_time_ns(&self) -> Nsecs {
        Self::cycles_to_ns(read_tsc(), self.calibrated().config.tsc_hz)
    }

    fn busy_delay_us(&self, usecs: Usecs32) {
        let tsc_hz = self.calibrated().config.tsc_hz as u128;
        let cycles = (usecs as u128 * tsc_hz).div_ceil(USEC_PER_SEC as u128) as u64;
        let start = read_tsc();
        while read_tsc().wrapping_sub(start) < cycles {
            core::hint::spin_loop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticks::TickCounter;
    use std::time::{Duration, Instant};

    const CONFIG: TscConfig = TscConfig {
        tsc_hz: 2_000_000_000,
        wall_epoch_ns: 1_700_000_000 * NSEC_PER_SEC,
    };

    #[test]
    fn test_rejects_bad_frequency() {
        let hal = TscHal::new();
        let zero = TscConfig { tsc_hz: 0, ..CONFIG };
        assert_eq!(hal.init(zero), Err(OskError::InvalidFrequency(0)));
        assert!(!hal.is_initialized());
        assert_eq!(hal.calibration(), Err(OskError::NotInitialized));
    }

    #[test]
    fn test_init_idempotent() {
        let hal = TscHal::new();
        assert_eq!(hal.init(CONFIG), Ok(()));
        assert_eq!(hal.init(CONFIG), Ok(()));
        assert_eq!(hal.calibration(), Ok(CONFIG));

        let other = TscConfig { tsc_hz: 3_000_000_000, ..CONFIG };
        assert_eq!(hal.init(other), Err(OskError::AlreadyInitialized));
    }

    #[test]
    fn test_tsc_advances() {
        let a = read_tsc();
        let b = read_tsc();
        assert!(b.wrapping_sub(a) < u64::MAX / 2);
    }

    #[test]
    fn test_wall_clock_from_epoch() {
        let hal = TscHal::new();
        hal.init(CONFIG).unwrap();
        assert!(hal.real_time().to_ns_u64() >= CONFIG.wall_epoch_ns);
    }

    /// Measures the real TSC rate against `Instant` and overstates it by 10%,
    /// so delays computed from it can only come out long.
    fn measured_config() -> TscConfig {
        let start = Instant::now();
        let tsc_start = read_tsc();
        while start.elapsed() < Duration::from_millis(20) {
            core::hint::spin_loop();
        }
        let cycles = read_tsc().wrapping_sub(tsc_start) as u128;
        let ns = start.elapsed().as_nanos();
        let hz = (cycles * NSEC_PER_SEC as u128 / ns) as u64;
        TscConfig {
            tsc_hz: (hz + hz / 10).clamp(TSC_HZ_MIN, TSC_HZ_MAX),
            ..CONFIG
        }
    }

    #[test]
    fn test_busy_delay_lower_bound() {
        let hal = TscHal::new();
        hal.init(measured_config()).unwrap();
        for usecs in [0u32, 1, 1000] {
            let start = Instant::now();
            hal.busy_delay_us(usecs);
            let waited = start.elapsed();
            assert!(
                waited >= Duration::from_micros(usecs as u64),
                "asked {} us, waited {:?}",
                usecs,
                waited
            );
        }
    }

    #[test]
    fn test_boot_clock_monotonic() {
        let hal = TscHal::new();
        hal.init(CONFIG).unwrap();
        let mut last = hal.boot_time_ns();
        for _ in 0..1000 {
            let now = hal.boot_time_ns();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn test_tick_count_starts_at_initial_ticks() {
        let hal = TscHal::new();
        hal.init(CONFIG).unwrap();
        let ticks = hal.tick_count();
        assert!(ticks.time_after_eq(INITIAL_TICKS));
        assert!(hal.tick_count().time_after_eq(ticks));
    }

    #[test]
    fn test_cycles_to_ns() {
        assert_eq!(TscHal::cycles_to_ns(2_000_000_000, 2_000_000_000), NSEC_PER_SEC);
        assert_eq!(TscHal::cycles_to_ns(2, 2_000_000_000), 1);
    }
}
