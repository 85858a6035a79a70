//! Platform agnostic driver for the MS5803 family of pressure sensors (02BA, 05BA and 14BA)
//! built on [`embedded_hal`].
//!
//! The driver reads and validates the factory calibration PROM, triggers the pressure and
//! temperature conversions and applies the datasheet's fixed-point compensation, giving
//! temperature in hundredths of a degree Celsius and pressure in hundredths of a millibar.
//!
//! Other members of the family (01BA, 30BA) use different constants and are not supported.
#![no_std]

#[cfg(test)]
extern crate std;

// This must go first so the logging macros are visible in the other modules.
mod fmt;

pub mod bus;
pub mod calibration;
pub mod command;
pub mod compensation;
pub mod config;
pub mod error;
mod ms5803;
#[cfg(test)]
mod testing;

pub use crate::calibration::CalibrationData;
pub use crate::command::Channel;
pub use crate::compensation::Reading;
pub use crate::error::Ms5803Error;
pub use crate::ms5803::{Ms5803, Ms5803I2c, Ms5803Result};
