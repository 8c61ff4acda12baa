//! Sensor readings to celsius, fahrenheit and percent relative humidity.
//!
//! These functions are used by the methods on [`Temperature`] and
//! [`Humidity`] but are provided here should you need to use them on
//! readings obtained some other way.
//!
//! Every function expects a reading with the two status bits already
//! cleared (see [`clear_status_bits`]). The formulas are those in section
//! 6 of the SHT20 datasheet, which divide by 2^16 rather than 2^16 - 1.
//!
//! The conversions in the root of this module work with and return `f32`s.
//! If you prefer to work with fixed- rather than floating-point numbers,
//! use the `fixed` feature and the [`fixed_point`] submodule.
//!
//! [`Temperature`]: crate::common::Temperature
//! [`Humidity`]: crate::common::Humidity

/// The two least significant bits of each reading carry status information
/// (bit 1 is set for humidity readings) and must be zeroed before conversion.
pub const STATUS_BITS_MASK: u16 = 0b1111_1111_1111_1100;

/// Clear the status bits of a raw reading.
pub const fn clear_status_bits(reading: u16) -> u16 {
    reading & STATUS_BITS_MASK
}

/// Convert the raw humidity reading to percent relative humidity.
///
/// Unlike the SHT4x, the value is not clamped. Readings near the boundaries
/// may produce slightly negative or above-100 values.
pub fn humidity_reading_to_percent_rh(reading: u16) -> f32 {
    let s_rh: f32 = reading.into();
    -6.0 + 125.0 * (s_rh / 65_536.0)
}

/// Convert the raw temperature reading to celsius.
pub fn temperature_reading_to_celsius(reading: u16) -> f32 {
    let s_t: f32 = reading.into();
    -46.85 + 175.72 * (s_t / 65_536.0)
}

/// Convert a celsius value to fahrenheit.
///
/// The sensor only reports celsius, so fahrenheit is always derived.
pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    celsius * 1.8 + 32.0
}

/// Convert the raw temperature reading to fahrenheit.
pub fn temperature_reading_to_fahrenheit(reading: u16) -> f32 {
    celsius_to_fahrenheit(temperature_reading_to_celsius(reading))
}

/// Fixed-point numeric conversions from sensor readings.
///
/// The functions in this module are the same as those in the parent
/// `conversions` module, except that they operate with fixed-point numbers.
///
/// A reading divided by 2^16 is exactly representable as a `U0F16` (the
/// reading's bits become the fractional bits), so the only rounding
/// happens in the datasheet coefficients themselves.
#[cfg(feature = "fixed")]
pub mod fixed_point {
    use fixed::types::{I16F16, U0F16};

    /// Convert the raw humidity reading to percent relative humidity.
    pub fn humidity_reading_to_percent_rh(reading: u16) -> I16F16 {
        let fraction = I16F16::from_num(U0F16::from_bits(reading));
        I16F16::from_num(-6) + I16F16::from_num(125) * fraction
    }

    /// Convert the raw temperature reading to celsius.
    pub fn temperature_reading_to_celsius(reading: u16) -> I16F16 {
        let fraction = I16F16::from_num(U0F16::from_bits(reading));
        I16F16::from_num(-46.85) + I16F16::from_num(175.72) * fraction
    }

    /// Convert the raw temperature reading to fahrenheit.
    pub fn temperature_reading_to_fahrenheit(reading: u16) -> I16F16 {
        temperature_reading_to_celsius(reading) * I16F16::from_num(1.8) + I16F16::from_num(32)
    }
}
