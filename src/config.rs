//! Driver configuration.
//!
//! Everything here is fixed when the driver is constructed. The three knobs are the pressure
//! range of the part ([`Version`]), the state of the CSB pin which selects the I2C address
//! ([`CsbPinState`]) and the ADC oversampling ratio ([`Oversampling`]).
//!
//! Untyped numbers (as found in a config file or a CLI) can be turned into these types with
//! [`TryFrom`], which rejects anything the driver does not support.

use embedded_hal::i2c::SevenBitAddress;

/// Returned by the [`TryFrom`] impls in this module when a raw value does not map to a
/// supported setting.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnexpectedValue<T>(pub T);

/// Pressure range variant of the MS5803.
///
/// The variant selects the scale factors and second order correction applied during
/// compensation. Only the 2, 5 and 14 bar parts are supported; the 01BA and 30BA parts use
/// different constants.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Version {
    /// MS5803-02BA
    Bar2,
    /// MS5803-05BA
    Bar5,
    /// MS5803-14BA
    Bar14,
}

impl Version {
    /// Full scale range in bar.
    pub fn bar(self) -> u8 {
        match self {
            Version::Bar2 => 2,
            Version::Bar5 => 5,
            Version::Bar14 => 14,
        }
    }
}

impl TryFrom<u8> for Version {
    type Error = UnexpectedValue<u8>;

    fn try_from(bar: u8) -> Result<Self, Self::Error> {
        match bar {
            2 => Ok(Version::Bar2),
            5 => Ok(Version::Bar5),
            14 => Ok(Version::Bar14),
            other => Err(UnexpectedValue(other)),
        }
    }
}

/// This enum should reflect the physical state of the CSB pin. The address bit is the
/// complement of CSB, so a high pin gives 0x76 and a low pin gives 0x77.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CsbPinState {
    /// CSB is pulled high by connection to VDD
    High,
    /// CSB is pulled low by connection to GND
    Low,
}

impl From<CsbPinState> for SevenBitAddress {
    fn from(csb: CsbPinState) -> Self {
        match csb {
            CsbPinState::High => 0x76,
            CsbPinState::Low => 0x77,
        }
    }
}

impl TryFrom<SevenBitAddress> for CsbPinState {
    type Error = UnexpectedValue<u8>;

    fn try_from(address: SevenBitAddress) -> Result<Self, Self::Error> {
        match address {
            0x76 => Ok(CsbPinState::High),
            0x77 => Ok(CsbPinState::Low),
            other => Err(UnexpectedValue(other)),
        }
    }
}

/// ADC oversampling ratio. Higher ratios lower the noise floor at the cost of a longer
/// conversion.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Oversampling {
    Osr256,
    Osr512,
    Osr1024,
    Osr2048,
    Osr4096,
}

impl Oversampling {
    /// All supported ratios, lowest first.
    pub const ALL: [Oversampling; 5] = [
        Oversampling::Osr256,
        Oversampling::Osr512,
        Oversampling::Osr1024,
        Oversampling::Osr2048,
        Oversampling::Osr4096,
    ];

    /// The number of samples averaged per conversion.
    pub fn ratio(self) -> u16 {
        match self {
            Oversampling::Osr256 => 256,
            Oversampling::Osr512 => 512,
            Oversampling::Osr1024 => 1024,
            Oversampling::Osr2048 => 2048,
            Oversampling::Osr4096 => 4096,
        }
    }

    /// Bits OR-ed into the conversion command to select this ratio.
    pub(crate) fn command_bits(self) -> u8 {
        match self {
            Oversampling::Osr256 => 0x00,
            Oversampling::Osr512 => 0x02,
            Oversampling::Osr1024 => 0x04,
            Oversampling::Osr2048 => 0x06,
            Oversampling::Osr4096 => 0x08,
        }
    }

    /// How long to wait between starting a conversion and reading the result.
    ///
    /// The datasheet lists maximum conversion times of 0.6, 1.17, 2.28, 4.54 and 9.04 ms. These
    /// are rounded up to whole milliseconds; reading early returns an incomplete result.
    pub fn conversion_time_ms(self) -> u32 {
        match self {
            Oversampling::Osr256 => 1,
            Oversampling::Osr512 => 3,
            Oversampling::Osr1024 => 4,
            Oversampling::Osr2048 => 6,
            Oversampling::Osr4096 => 10,
        }
    }
}

impl TryFrom<u16> for Oversampling {
    type Error = UnexpectedValue<u16>;

    fn try_from(ratio: u16) -> Result<Self, Self::Error> {
        match ratio {
            256 => Ok(Oversampling::Osr256),
            512 => Ok(Oversampling::Osr512),
            1024 => Ok(Oversampling::Osr1024),
            2048 => Ok(Oversampling::Osr2048),
            4096 => Ok(Oversampling::Osr4096),
            other => Err(UnexpectedValue(other)),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Configuration {
    pub(crate) version: Version,
    pub(crate) csb_pin_state: CsbPinState,
    pub(crate) oversampling: Oversampling,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            version: Version::Bar14,
            csb_pin_state: CsbPinState::High,
            oversampling: Oversampling::Osr512,
        }
    }
}

impl Configuration {
    pub fn new(version: Version, csb_pin_state: CsbPinState, oversampling: Oversampling) -> Self {
        Self { version, csb_pin_state, oversampling }
    }

    /// Selects the pressure range of the attached part.
    ///
    /// Using the wrong variant does not fail, it silently produces wrong readings.
    pub fn version(mut self, version: Version) -> Self {
        self.version = version;

        self
    }

    pub fn csb_pin_state(mut self, csb_pin_state: CsbPinState) -> Self {
        self.csb_pin_state = csb_pin_state;

        self
    }

    pub fn oversampling(mut self, oversampling: Oversampling) -> Self {
        self.oversampling = oversampling;

        self
    }

    pub fn get_version(&self) -> Version { self.version }

    pub fn get_oversampling(&self) -> Oversampling { self.oversampling }

    /// The I2C address implied by the CSB pin.
    pub fn address(&self) -> SevenBitAddress { self.csb_pin_state.into() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_firmware_defaults() {
        let config = Configuration::default();
        assert_eq!(Version::Bar14, config.get_version());
        assert_eq!(Oversampling::Osr512, config.get_oversampling());
        assert_eq!(0x76, config.address());
    }

    #[test]
    fn builder_overrides_fields() {
        let config = Configuration::default()
            .version(Version::Bar2)
            .csb_pin_state(CsbPinState::Low)
            .oversampling(Oversampling::Osr4096);

        assert_eq!(Configuration::new(Version::Bar2, CsbPinState::Low, Oversampling::Osr4096), config);
        assert_eq!(0x77, config.address());
    }

    #[test]
    fn version_try_from() {
        assert_eq!(Ok(Version::Bar2), Version::try_from(2));
        assert_eq!(Ok(Version::Bar5), Version::try_from(5));
        assert_eq!(Ok(Version::Bar14), Version::try_from(14));
        assert_eq!(Err(UnexpectedValue(30)), Version::try_from(30));
        assert_eq!(Err(UnexpectedValue(1)), Version::try_from(1));
    }

    #[test]
    fn csb_pin_state_try_from() {
        assert_eq!(Ok(CsbPinState::High), CsbPinState::try_from(0x76));
        assert_eq!(Ok(CsbPinState::Low), CsbPinState::try_from(0x77));
        assert_eq!(Err(UnexpectedValue(0x40)), CsbPinState::try_from(0x40));
    }

    #[test]
    fn oversampling_try_from() {
        for osr in Oversampling::ALL {
            assert_eq!(Ok(osr), Oversampling::try_from(osr.ratio()));
        }
        assert_eq!(Err(UnexpectedValue(8192)), Oversampling::try_from(8192));
        assert_eq!(Err(UnexpectedValue(0)), Oversampling::try_from(0));
    }

    #[test]
    fn conversion_time_increases_with_oversampling() {
        assert_eq!(1, Oversampling::Osr256.conversion_time_ms());
        assert_eq!(10, Oversampling::Osr4096.conversion_time_ms());

        for pair in Oversampling::ALL.windows(2) {
            assert!(pair[0].conversion_time_ms() < pair[1].conversion_time_ms());
        }
    }
}
