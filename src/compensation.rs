//! Fixed-point compensation of raw ADC samples.
//!
//! This follows the integer algorithm from the MS5803 datasheets: a first order temperature from
//! D2 and the PROM, a second order correction that depends on the part and on the temperature
//! range, and finally the temperature compensated pressure from D1.
//!
//! Everything that can leave 32 bits is done in `i64`. The two narrowing steps of the reference
//! algorithm (first order T and T2 to 32 bits) are kept as explicit `as i32` casts so results
//! match the vendor code bit for bit.
use crate::calibration::CalibrationData;
use crate::config::Version;

const POW_2_31: i64 = 1 << 31;
const POW_2_33: i64 = 1 << 33;
const POW_2_37: i64 = 1 << 37;

/// A compensated sample.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    temperature: i32,
    pressure: i32,
}

impl Reading {
    pub fn new(temperature: i32, pressure: i32) -> Self {
        Self { temperature, pressure }
    }

    /// Temperature in hundredths of a degree Celsius, i.e. 2000 is 20.00 °C.
    pub fn temperature(&self) -> i32 { self.temperature }

    /// Pressure in hundredths of a millibar (pascal), for every variant.
    ///
    /// The 14 bar formula natively yields tenths of a millibar and is scaled by 10 so all three
    /// variants share a unit.
    pub fn pressure(&self) -> i32 { self.pressure }

    pub fn temperature_celsius(&self) -> f32 {
        self.temperature as f32 / 100.0
    }

    pub fn pressure_mbar(&self) -> f32 {
        self.pressure as f32 / 100.0
    }

    #[cfg(feature = "uom")]
    pub fn into_uom(self) -> (uom::si::f32::ThermodynamicTemperature, uom::si::f32::Pressure) {
        use uom::si::pressure::pascal;
        use uom::si::thermodynamic_temperature::degree_celsius;
        (
            uom::si::f32::ThermodynamicTemperature::new::<degree_celsius>(self.temperature_celsius()),
            uom::si::f32::Pressure::new::<pascal>(self.pressure as f32),
        )
    }
}

/// The second order correction terms, subtracted from T, OFF and SENS respectively.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SecondOrder {
    pub t2: i64,
    pub off2: i64,
    pub sens2: i64,
}

/// Intermediate values of one compensation run. Mostly useful for diagnostics and tests; most
/// callers want [`compensate`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Compensation {
    /// Difference between the actual and the reference temperature
    pub dt: i64,
    /// First order temperature, before the second order correction
    pub first_order_temperature: i32,
    pub second_order: SecondOrder,
    /// Offset at actual temperature, second order correction applied
    pub offset: i64,
    /// Sensitivity at actual temperature, second order correction applied
    pub sensitivity: i64,
    pub reading: Reading,
}

/// Returns dT and the first order temperature for raw temperature `d2`.
pub fn first_order_temperature(d2: u32, calibration: &CalibrationData) -> (i64, i32) {
    let dt = d2 as i64 - calibration.reference_temperature() as i64 * 256;
    let temperature = (2000 + (dt * calibration.temp_coef_temperature() as i64) / 8_388_608) as i32;

    (dt, temperature)
}

/// Second order correction for first order temperature `temperature` (centi-degrees) and `dt`.
///
/// Below 20 °C every variant applies its low temperature formula. At or above 20 °C only the
/// 14 bar part is corrected. Below -15 °C the 2 and 14 bar parts add a further term.
pub fn second_order(version: Version, temperature: i32, dt: i64) -> SecondOrder {
    let t = temperature as i64;
    let dt_sq = dt * dt;

    let mut correction = if temperature < 2000 {
        let low = (t - 2000) * (t - 2000);
        match version {
            Version::Bar14 => SecondOrder {
                t2: narrow(3 * dt_sq / POW_2_33),
                off2: 3 * low / 2,
                sens2: 5 * low / 8,
            },
            Version::Bar5 => SecondOrder {
                t2: narrow(3 * dt_sq / POW_2_33),
                off2: 3 * low / 8,
                sens2: 7 * low / 8,
            },
            Version::Bar2 => SecondOrder {
                t2: narrow(dt_sq / POW_2_31),
                off2: 61 * low / 16,
                sens2: 2 * low,
            },
        }
    } else {
        match version {
            Version::Bar14 => SecondOrder {
                t2: narrow(7 * dt_sq / POW_2_37),
                off2: (t - 2000) * (t - 2000) / 16,
                sens2: 0,
            },
            Version::Bar5 | Version::Bar2 => SecondOrder::default(),
        }
    };

    if temperature < -1500 {
        let very_low = (t + 1500) * (t + 1500);
        match version {
            Version::Bar14 => {
                correction.off2 += 7 * very_low;
                correction.sens2 += 4 * very_low;
            }
            Version::Bar5 => {}
            Version::Bar2 => {
                correction.off2 += 20 * very_low;
                correction.sens2 += 12 * very_low;
            }
        }
    }

    correction
}

/// Offset and sensitivity at actual temperature, before the second order correction.
pub fn offset_and_sensitivity(version: Version, calibration: &CalibrationData, dt: i64) -> (i64, i64) {
    let c1 = calibration.pressure_sensitivity() as i64;
    let c2 = calibration.pressure_offset() as i64;
    let c3 = calibration.temp_coef_pressure_sensitivity() as i64;
    let c4 = calibration.temp_coef_pressure_offset() as i64;

    match version {
        Version::Bar14 => (c2 * 65_536 + (c4 * dt) / 128, c1 * 32_768 + (c3 * dt) / 256),
        Version::Bar5 => (c2 * 262_144 + (c4 * dt) / 32, c1 * 131_072 + (c3 * dt) / 128),
        Version::Bar2 => (c2 * 131_072 + (c4 * dt) / 64, c1 * 65_536 + (c3 * dt) / 128),
    }
}

/// Runs the whole pipeline and keeps the intermediate values.
pub fn compensate_detailed(d1: u32, d2: u32, calibration: &CalibrationData, version: Version) -> Compensation {
    let (dt, first_order_temperature) = first_order_temperature(d2, calibration);
    let second_order = second_order(version, first_order_temperature, dt);
    let (offset, sensitivity) = offset_and_sensitivity(version, calibration, dt);

    let temperature = (first_order_temperature as i64 - second_order.t2) as i32;
    let offset = offset - second_order.off2;
    let sensitivity = sensitivity - second_order.sens2;

    let pressure = ((d1 as i64 * sensitivity) / 2_097_152 - offset) / 32_768;
    let pressure = match version {
        Version::Bar14 => pressure * 10,
        Version::Bar5 | Version::Bar2 => pressure,
    };

    Compensation {
        dt,
        first_order_temperature,
        second_order,
        offset,
        sensitivity,
        reading: Reading::new(temperature, pressure as i32),
    }
}

/// Converts raw pressure `d1` and raw temperature `d2` into a compensated [`Reading`].
///
/// Pure function of its inputs.
pub fn compensate(d1: u32, d2: u32, calibration: &CalibrationData, version: Version) -> Reading {
    compensate_detailed(d1, d2, calibration, version).reading
}

/// Truncates to 32 bits and sign extends back, as the reference algorithm stores T2 in an `int32_t`.
fn narrow(value: i64) -> i64 {
    value as i32 as i64
}
