//! ### Command set
//!
//! The MS5803 has no register map. Every transaction starts with a single command byte:
//! - Reset, which reloads the PROM into the internal register
//! - PROM read, one of eight 16-bit words at 0xA0, 0xA2, ... 0xAE
//! - Conversion start (D1 pressure or D2 temperature) at one of five oversampling ratios
//! - ADC read, which returns the 24-bit result of the last conversion
#![doc(alias = "CMD")]
use crate::config::Oversampling;

/// Number of 16-bit words in the PROM.
pub const PROM_WORDS: usize = 8;

const RESET: u8 = 0x1E;
const ADC_READ: u8 = 0x00;
const ADC_CONVERT: u8 = 0x40;
const PROM_READ: u8 = 0xA0;

/// Which quantity the ADC should sample.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// D1, the uncompensated pressure
    Pressure,
    /// D2, the uncompensated temperature
    Temperature,
}

impl Channel {
    fn command_bits(self) -> u8 {
        match self {
            Channel::Pressure => 0x00,
            Channel::Temperature => 0x10,
        }
    }
}

/// A command byte sent to the sensor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Reloads the calibration PROM. The sensor needs a few milliseconds before it answers again.
    Reset,

    /// Selects PROM word `n` (0..=7) for the following 2 byte read. Indices wrap at 8.
    PromRead(u8),

    /// Starts a conversion on `channel`.
    Convert {
        channel: Channel,
        oversampling: Oversampling,
    },

    /// Selects the conversion result for the following 3 byte read.
    ///
    /// Reading before the conversion has finished returns 0.
    AdcRead,
}

impl From<Command> for u8 {
    fn from(command: Command) -> Self {
        match command {
            Command::Reset => RESET,
            Command::PromRead(index) => PROM_READ | ((index & 0x07) << 1),
            Command::Convert { channel, oversampling } => {
                ADC_CONVERT | channel.command_bits() | oversampling.command_bits()
            }
            Command::AdcRead => ADC_READ,
        }
    }
}
