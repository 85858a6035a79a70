use crate::bus::Bus;
use crate::command::{Channel, Command, PROM_WORDS};
use embedded_hal::delay::DelayNs;
use heapless::Vec;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FakeBusError;

/// Plays the sensor side of the protocol from scripted PROM words and ADC results, and records
/// every command byte it is sent.
pub struct FakeBus {
    prom: [u16; PROM_WORDS],
    pressure: u32,
    temperature: u32,
    selected: Option<Command>,
    converted: Option<Channel>,
    fail_on: Option<u8>,
    commands: Vec<u8, 64>,
}

impl FakeBus {
    pub fn new() -> Self {
        FakeBus {
            prom: [0u16; PROM_WORDS],
            pressure: 0,
            temperature: 0,
            selected: None,
            converted: None,
            fail_on: None,
            commands: Vec::new(),
        }
    }

    pub fn with_prom(mut self, prom: [u16; PROM_WORDS]) -> Self {
        self.prom = prom;
        self
    }

    pub fn with_adc(mut self, pressure: u32, temperature: u32) -> Self {
        self.pressure = pressure;
        self.temperature = temperature;
        self
    }

    /// Makes every write of `command` fail.
    pub fn failing_on(mut self, command: Command) -> Self {
        self.fail_on = Some(command.into());
        self
    }

    pub fn commands(&self) -> &[u8] {
        &self.commands
    }
}

impl Bus for FakeBus {
    type Error = FakeBusError;

    fn write_command(&mut self, command: Command) -> Result<(), Self::Error> {
        let byte: u8 = command.into();
        if self.fail_on == Some(byte) {
            return Err(FakeBusError);
        }

        self.commands.push(byte).unwrap();
        match command {
            Command::Convert { channel, .. } => self.converted = Some(channel),
            Command::Reset => self.converted = None,
            _ => {}
        }
        self.selected = Some(command);

        Ok(())
    }

    fn read_bytes(&mut self, data: &mut [u8]) -> Result<(), Self::Error> {
        match self.selected {
            Some(Command::PromRead(index)) => {
                data.copy_from_slice(&self.prom[index as usize].to_be_bytes());
            }
            Some(Command::AdcRead) => {
                let value = match self.converted.take() {
                    Some(Channel::Pressure) => self.pressure,
                    Some(Channel::Temperature) => self.temperature,
                    None => 0,
                };
                data.copy_from_slice(&value.to_be_bytes()[1..]);
            }
            other => panic!("Read of {} bytes after {:?}", data.len(), other),
        }

        Ok(())
    }
}

/// Records requested waits in milliseconds.
pub struct FakeDelay {
    waits_ms: Vec<u32, 16>,
}

impl FakeDelay {
    pub fn new() -> Self {
        FakeDelay { waits_ms: Vec::new() }
    }

    pub fn waits_ms(&self) -> &[u32] {
        &self.waits_ms
    }
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.waits_ms.push(ns.div_ceil(1_000_000)).unwrap();
    }

    fn delay_ms(&mut self, ms: u32) {
        self.waits_ms.push(ms).unwrap();
    }
}
