//! Time layer error types
//!
//! Only backend bring-up can fail. The time queries themselves never do.

use core::fmt;

pub type Result<T> = core::result::Result<T, OskError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OskError {
    /// Counter frequency is zero or outside the plausible range (Hz).
    InvalidFrequency(u64),
    /// Backend was already brought up with different parameters.
    AlreadyInitialized,
    /// Backend queried for calibration before bring-up.
    NotInitialized,
}

impl fmt::Display for OskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFrequency(hz) => write!(f, "Invalid counter frequency: {} Hz", hz),
            Self::AlreadyInitialized => write!(f, "Timer backend already initialized"),
            Self::NotInitialized => write!(f, "Timer backend not initialized"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for OskError {}
