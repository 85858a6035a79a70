use embedded_hal::i2c::SevenBitAddress;

use crate::command::Command;

/// Transport used by the driver to talk to the sensor.
///
/// Every exchange with the MS5803 is a one byte command followed, for PROM and ADC reads, by a
/// separate read of a fixed number of bytes. Implementations own the addressing; the driver only
/// sees commands and bytes.
pub trait Bus {
    type Error;

    /// Sends a single command byte.
    fn write_command(&mut self, command: Command) -> Result<(), Self::Error>;

    /// Reads exactly `data.len()` bytes from the sensor.
    fn read_bytes(&mut self, data: &mut [u8]) -> Result<(), Self::Error>;
}

pub struct I2c<I2cType> {
    i2c: I2cType,
    address: SevenBitAddress,
}

impl<I2cType> I2c<I2cType>
where
    I2cType: embedded_hal::i2c::I2c,
{
    pub fn new(i2c: I2cType, address: SevenBitAddress) -> Self {
        Self { i2c, address }
    }

    pub fn address(&self) -> SevenBitAddress { self.address }

    /// Returns the underlying I2C bus.
    pub fn release(self) -> I2cType {
        self.i2c
    }
}

impl<I2cType> Bus for I2c<I2cType>
where
    I2cType: embedded_hal::i2c::I2c,
{
    type Error = <I2cType as embedded_hal::i2c::ErrorType>::Error;

    fn write_command(&mut self, command: Command) -> Result<(), Self::Error> {
        self.i2c.write(self.address, &[command.into()])?;

        Ok(())
    }

    fn read_bytes(&mut self, data: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.read(self.address, data)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Channel;
    use crate::config::Oversampling;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
    use std::vec;

    #[test]
    fn write_command_sends_single_byte() {
        let expectations = [
            I2cTransaction::write(0x76, vec![0x1E]),
            I2cTransaction::write(0x76, vec![0x58]),
        ];
        let mut bus = I2c::new(I2cMock::new(&expectations), 0x76);

        bus.write_command(Command::Reset).unwrap();
        bus.write_command(Command::Convert {
            channel: Channel::Temperature,
            oversampling: Oversampling::Osr4096,
        }).unwrap();

        bus.release().done();
    }

    #[test]
    fn read_bytes_uses_configured_address() {
        let expectations = [I2cTransaction::read(0x77, vec![0x12, 0x34, 0x56])];
        let mut bus = I2c::new(I2cMock::new(&expectations), 0x77);

        let mut buffer = [0u8; 3];
        bus.read_bytes(&mut buffer).unwrap();
        assert_eq!([0x12, 0x34, 0x56], buffer);

        bus.release().done();
    }

    #[test]
    fn bus_errors_are_passed_through() {
        let expectations = [I2cTransaction::write(0x76, vec![0x00]).with_error(ErrorKind::Other)];
        let mut bus = I2c::new(I2cMock::new(&expectations), 0x76);

        assert_eq!(Err(ErrorKind::Other), bus.write_command(Command::AdcRead));

        bus.release().done();
    }
}
