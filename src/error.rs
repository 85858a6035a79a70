//! Errors that can occur when using the MS5803 device.
//!
//! This module provides an error type that encapsulates all possible errors that can occur during communication with the MS5803.
//! It is generic over the underlying bus error type.

use core::fmt::{Debug, Display, Formatter};

/// This represents all possible errors that can occur when using the MS5803 device.
///
/// None of these are retried by the driver. A caller that wants to survive a bus glitch can
/// simply call [`Ms5803::initialize`](crate::Ms5803::initialize) again.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ms5803Error<BusError> {
    /// An error has occurred in the I2C driver
    Bus(BusError),

    /// Every PROM word read back as zero.
    ///
    /// An all-zero PROM passes the checksum, so it is reported separately. Usually means nothing
    /// answered on the configured address; check wiring and the CSB pin.
    NoSensorDetected,

    /// The CRC-4 stored in the low nibble of PROM word 7 does not match the one computed over the PROM.
    ChecksumMismatch {
        stored: u8,
        computed: u8,
    },

    /// A measurement was requested before [`Ms5803::initialize`](crate::Ms5803::initialize) succeeded.
    NotInitialized,
}

impl<BusError: Debug> Display for Ms5803Error<BusError> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Ms5803Error::Bus(e) => write!(f, "bus error: {:?}", e),
            Ms5803Error::NoSensorDetected => f.write_str("no sensor detected, PROM is all zeros"),
            Ms5803Error::ChecksumMismatch { stored, computed } => {
                write!(f, "PROM checksum mismatch: stored {:#x}, computed {:#x}", stored, computed)
            }
            Ms5803Error::NotInitialized => f.write_str("sensor has not been initialized"),
        }
    }
}

impl<BusError: Debug> core::error::Error for Ms5803Error<BusError> {}
