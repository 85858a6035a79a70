use crate::bus::Bus;
use crate::command::{Command, PROM_WORDS};
use crate::error::Ms5803Error;
use crate::Ms5803Result;

/// The factory calibration words read from the sensor PROM.
///
/// | Word | Contents                                          |
/// |------|---------------------------------------------------|
/// | 0    | Factory data and setup                            |
/// | 1    | C1, pressure sensitivity (SENS_T1)                |
/// | 2    | C2, pressure offset (OFF_T1)                      |
/// | 3    | C3, temperature coefficient of pressure sensitivity (TCS) |
/// | 4    | C4, temperature coefficient of pressure offset (TCO) |
/// | 5    | C5, reference temperature (T_REF)                 |
/// | 6    | C6, temperature coefficient of the temperature (TEMPSENS) |
/// | 7    | Serial code, CRC-4 in bits 0..4                   |
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationData {
    words: [u16; PROM_WORDS],
}

impl CalibrationData {
    pub fn new(words: [u16; PROM_WORDS]) -> Self {
        Self { words }
    }

    /// Reads all eight PROM words. No validation is done here, see [`CalibrationData::validate`].
    pub fn read<B: Bus>(bus: &mut B) -> Ms5803Result<Self, B::Error> {
        let mut words = [0u16; PROM_WORDS];

        for (index, word) in words.iter_mut().enumerate() {
            let mut buf = [0u8; 2];
            bus.write_command(Command::PromRead(index as u8))
                .map_err(Ms5803Error::Bus)?;
            bus.read_bytes(&mut buf)
                .map_err(Ms5803Error::Bus)?;

            *word = u16::from_be_bytes(buf);
            trace!("PROM word {} = {}", index, *word);
        }

        Ok(Self { words })
    }

    pub fn words(&self) -> &[u16; PROM_WORDS] { &self.words }

    pub fn pressure_sensitivity(&self) -> u16 { self.words[1] }

    pub fn pressure_offset(&self) -> u16 { self.words[2] }

    pub fn temp_coef_pressure_sensitivity(&self) -> u16 { self.words[3] }

    pub fn temp_coef_pressure_offset(&self) -> u16 { self.words[4] }

    pub fn reference_temperature(&self) -> u16 { self.words[5] }

    pub fn temp_coef_temperature(&self) -> u16 { self.words[6] }

    /// The checksum programmed at the factory.
    pub fn stored_crc(&self) -> u8 {
        (self.words[7] & 0x000F) as u8
    }

    /// The checksum computed over the words as read.
    pub fn computed_crc(&self) -> u8 {
        crc4(&self.words)
    }

    /// Checks that a sensor actually answered and that the PROM checksum matches.
    ///
    /// The all-zero check comes first: zeros give a matching CRC of 0.
    pub fn validate<E>(&self) -> Ms5803Result<(), E> {
        if self.words.iter().all(|&word| word == 0) {
            warn!("PROM is all zeros, no sensor detected");
            return Err(Ms5803Error::NoSensorDetected);
        }

        let stored = self.stored_crc();
        let computed = self.computed_crc();
        debug!("PROM CRC stored {} computed {}", stored, computed);

        if stored != computed {
            warn!("PROM checksum mismatch");
            return Err(Ms5803Error::ChecksumMismatch { stored, computed });
        }

        Ok(())
    }
}

/// CRC-4 over the PROM, as described in application note AN520.
///
/// The 16 bytes are fed MSB first, high byte of each word first, with the low byte of word 7
/// (which holds the CRC itself) treated as zero. Polynomial 0x3000 on a 16 bit remainder; the
/// result is the top nibble.
pub fn crc4(prom: &[u16; PROM_WORDS]) -> u8 {
    let mut n_rem: u16 = 0;

    let mut words = *prom;
    words[7] &= 0xFF00;

    for word in words {
        for byte in word.to_be_bytes() {
            n_rem ^= byte as u16;
            for _ in 0..8 {
                if (n_rem & 0x8000) != 0 {
                    n_rem = (n_rem << 1) ^ 0x3000;
                } else {
                    n_rem <<= 1;
                }
            }
        }
    }

    ((n_rem >> 12) & 0x000F) as u8
}
