use crate::bus::{Bus, I2c};
use crate::calibration::CalibrationData;
use crate::command::{Channel, Command};
use crate::compensation::{self, Reading};
use crate::config::{Configuration, Oversampling};
use crate::error::Ms5803Error;
use embedded_hal::delay::DelayNs;

/// Type alias for a Ms5803 chip communicating over I2C
pub type Ms5803I2c<T, D> = Ms5803<I2c<T>, D>;

/// Type alias used to simplify return types throughout the driver
pub type Ms5803Result<T, BusError> = Result<T, Ms5803Error<BusError>>;

/// Time the sensor needs to reload its PROM after a reset.
const RESET_SETTLE_MS: u32 = 10;

/// Main Ms5803 driver struct
///
/// Each instance owns its bus handle, calibration and last sample, so several sensors (for
/// example one on each address) can be driven side by side. An instance is not meant to be
/// shared between threads without external locking.
pub struct Ms5803<B, D> {
    bus: B,
    delay: D,
    config: Configuration,
    calibration: Option<CalibrationData>,
    raw_pressure: u32,
    raw_temperature: u32,
    reading: Reading,
}

impl<T, D> Ms5803I2c<T, D>
where
    T: embedded_hal::i2c::I2c,
    D: DelayNs,
{
    /// Constructs a new Ms5803 driver instance that communicates over I2C, at the address given
    /// by the CSB pin state in `config`.
    ///
    /// No bus traffic happens until [`Ms5803::initialize`] is called.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use embedded_hal::delay::DelayNs;
    /// # use embedded_hal::i2c::I2c;
    /// # use ms5803_rs::Ms5803Result;
    ///  use ms5803_rs::Ms5803;
    ///  use ms5803_rs::config::{Configuration, CsbPinState, Oversampling, Version};
    /// # fn demo<I: I2c, D: DelayNs>(i2c: I, delay: D) -> Ms5803Result<(), I::Error> {
    ///
    ///  let mut sensor = Ms5803::new_i2c(
    ///     i2c,
    ///     delay,
    ///     Configuration::default()
    ///         .version(Version::Bar5)
    ///         .csb_pin_state(CsbPinState::Low)
    ///         .oversampling(Oversampling::Osr4096),
    ///  );
    ///  sensor.initialize()?;
    ///  let reading = sensor.read_sensor()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new_i2c(i2c: T, delay: D, config: Configuration) -> Self {
        Self::new(I2c::new(i2c, config.address()), delay, config)
    }
}

impl<B, D> Ms5803<B, D>
where
    B: Bus,
    D: DelayNs,
{
    pub fn new(bus: B, delay: D, config: Configuration) -> Self {
        Ms5803 {
            bus,
            delay,
            config,
            calibration: None,
            raw_pressure: 0,
            raw_temperature: 0,
            reading: Reading::new(0, 0),
        }
    }

    /// Sends the reset command and waits for the PROM to be reloaded.
    pub fn reset(&mut self) -> Ms5803Result<(), B::Error> {
        trace!("Resetting sensor");
        self.bus.write_command(Command::Reset)
            .map_err(Ms5803Error::Bus)?;
        self.delay.delay_ms(RESET_SETTLE_MS);

        Ok(())
    }

    /// Resets the sensor, reads the calibration PROM and validates it.
    ///
    /// Fails with [`Ms5803Error::NoSensorDetected`] if the PROM reads back as all zeros, and with
    /// [`Ms5803Error::ChecksumMismatch`] if its CRC does not match. On any failure the driver is
    /// left uninitialized, even if an earlier call had succeeded.
    pub fn initialize(&mut self) -> Ms5803Result<(), B::Error> {
        debug!(
            "Initializing MS5803-{}BA, OSR {}",
            self.config.version.bar(),
            self.config.oversampling.ratio()
        );
        self.calibration = None;

        self.reset()?;
        let calibration = CalibrationData::read(&mut self.bus)?;
        calibration.validate::<B::Error>()?;

        self.calibration = Some(calibration);

        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.calibration.is_some()
    }

    /// Runs a single ADC conversion and returns the raw 24-bit result.
    ///
    /// Blocks for the conversion time of `oversampling`, see [`Oversampling::conversion_time_ms`].
    /// The result is not range checked.
    pub fn convert(&mut self, channel: Channel, oversampling: Oversampling) -> Ms5803Result<u32, B::Error> {
        self.bus.write_command(Command::Convert { channel, oversampling })
            .map_err(Ms5803Error::Bus)?;
        self.delay.delay_ms(oversampling.conversion_time_ms());

        let mut buf = [0u8; 3];
        self.bus.write_command(Command::AdcRead)
            .map_err(Ms5803Error::Bus)?;
        self.bus.read_bytes(&mut buf)
            .map_err(Ms5803Error::Bus)?;

        let value = u32::from_be_bytes([0, buf[0], buf[1], buf[2]]);
        trace!("ADC {} = {}", channel, value);

        Ok(value)
    }

    /// Samples pressure (D1) then temperature (D2) at the configured oversampling and compensates them.
    ///
    /// The reading is returned and also kept for [`temperature`](Self::temperature) and
    /// [`pressure`](Self::pressure). Blocks for two conversion times.
    pub fn read_sensor(&mut self) -> Ms5803Result<Reading, B::Error> {
        let calibration = self.calibration.ok_or(Ms5803Error::NotInitialized)?;
        let oversampling = self.config.oversampling;

        let d1 = self.convert(Channel::Pressure, oversampling)?;
        let d2 = self.convert(Channel::Temperature, oversampling)?;

        let reading = compensation::compensate(d1, d2, &calibration, self.config.version);
        debug!("T = {}, P = {}", reading.temperature(), reading.pressure());

        self.raw_pressure = d1;
        self.raw_temperature = d2;
        self.reading = reading;

        Ok(reading)
    }

    /// Last temperature in hundredths of a degree Celsius, narrowed to 16 bits.
    pub fn temperature(&self) -> i16 {
        self.reading.temperature() as i16
    }

    /// Last pressure in hundredths of a millibar. A negative result wraps.
    pub fn pressure(&self) -> u32 {
        self.reading.pressure() as u32
    }

    /// Last full reading.
    pub fn reading(&self) -> Reading {
        self.reading
    }

    /// Last raw pressure sample (D1)
    pub fn raw_pressure(&self) -> u32 {
        self.raw_pressure
    }

    /// Last raw temperature sample (D2)
    pub fn raw_temperature(&self) -> u32 {
        self.raw_temperature
    }

    /// The validated PROM, if [`initialize`](Self::initialize) has succeeded.
    pub fn calibration(&self) -> Option<&CalibrationData> {
        self.calibration.as_ref()
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Destroys the driver and hands back the bus and delay.
    pub fn release(self) -> (B, D) {
        (self.bus, self.delay)
    }
}
