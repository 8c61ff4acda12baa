//! Commands, register model and measurement types shared by the blocking
//! and async drivers. Nothing in this module touches the bus.

use crate::conversions;
use crate::crc::validate_crc;
use crate::error::Error;

/// Fixed I2C address of the SHT20.
pub const DEFAULT_ADDRESS: u8 = 0x40;

/// Wait after a no-hold trigger before attempting to read.
pub(crate) const NO_HOLD_WAIT_US: u32 = 20;
/// The datasheet guarantees a soft reset completes in under 15ms.
pub(crate) const SOFT_RESET_WAIT_MS: u32 = 15;

/// One-byte I2C commands understood by the sensor (table 6 of the datasheet).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    TriggerTemperatureHold,
    TriggerHumidityHold,
    TriggerTemperatureNoHold,
    TriggerHumidityNoHold,
    WriteUserRegister,
    ReadUserRegister,
    SoftReset,
}

impl Command {
    /// I2C command byte.
    pub fn command_byte(&self) -> u8 {
        match self {
            Command::TriggerTemperatureHold => 0xE3,
            Command::TriggerHumidityHold => 0xE5,
            Command::TriggerTemperatureNoHold => 0xF3,
            Command::TriggerHumidityNoHold => 0xF5,
            Command::WriteUserRegister => 0xE6,
            Command::ReadUserRegister => 0xE7,
            Command::SoftReset => 0xFE,
        }
    }
}

/// Whether the sensor holds the bus while a measurement is in progress.
///
/// In hold master mode the sensor stretches the clock until the measurement
/// is ready, so no delay is needed but the bus is blocked in the meantime.
/// In no hold mode the bus is released and the driver waits before reading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HoldMode {
    HoldMaster,
    #[default]
    NoHold,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub hold_mode: HoldMode,
    /// Read the checksum byte the sensor sends after each measurement and
    /// verify it. When false only the two data bytes are read.
    pub should_validate_crc: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hold_mode: HoldMode::NoHold,
            should_validate_crc: false,
        }
    }
}

/// The two quantities the sensor can measure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MeasurementKind {
    Temperature,
    Humidity,
}

impl MeasurementKind {
    /// Trigger command for this kind of measurement in the given mode.
    pub fn command(&self, hold_mode: HoldMode) -> Command {
        match (self, hold_mode) {
            (MeasurementKind::Temperature, HoldMode::HoldMaster) => Command::TriggerTemperatureHold,
            (MeasurementKind::Temperature, HoldMode::NoHold) => Command::TriggerTemperatureNoHold,
            (MeasurementKind::Humidity, HoldMode::HoldMaster) => Command::TriggerHumidityHold,
            (MeasurementKind::Humidity, HoldMode::NoHold) => Command::TriggerHumidityNoHold,
        }
    }
}

impl core::fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MeasurementKind::Temperature => f.write_str("temperature"),
            MeasurementKind::Humidity => f.write_str("humidity"),
        }
    }
}

/// Measurement resolution, selected by bits 7 and 0 of the user register.
///
/// Variants are named for the humidity and temperature bit widths. Lower
/// resolutions complete faster (table 7 of the datasheet).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    /// 12-bit humidity, 14-bit temperature. The power-on default.
    Rh12T14,
    /// 8-bit humidity, 12-bit temperature.
    Rh8T12,
    /// 10-bit humidity, 13-bit temperature.
    Rh10T13,
    /// 11-bit humidity, 11-bit temperature.
    Rh11T11,
}

impl Resolution {
    const BIT_7: u8 = 0b1000_0000;
    const BIT_0: u8 = 0b0000_0001;

    /// Two-bit code for this resolution, written as `(bit 7, bit 0)`.
    pub const fn code(&self) -> u8 {
        match self {
            Resolution::Rh12T14 => 0b00,
            Resolution::Rh8T12 => 0b01,
            Resolution::Rh10T13 => 0b10,
            Resolution::Rh11T11 => 0b11,
        }
    }

    /// Resolution for a two-bit `(bit 7, bit 0)` code, if the code is known.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0b00 => Some(Resolution::Rh12T14),
            0b01 => Some(Resolution::Rh8T12),
            0b10 => Some(Resolution::Rh10T13),
            0b11 => Some(Resolution::Rh11T11),
            _ => None,
        }
    }

    /// The code spread across bits 7 and 0 of the register byte.
    pub const fn register_bits(&self) -> u8 {
        let code = self.code();
        let high = if code & 0b10 != 0 { Self::BIT_7 } else { 0 };
        let low = if code & 0b01 != 0 { Self::BIT_0 } else { 0 };
        high | low
    }

    /// Extract the resolution from a register byte. The two bits are not
    /// adjacent, so each is read separately and recombined.
    pub const fn from_register_bits(byte: u8) -> Option<Self> {
        let high = if byte & Self::BIT_7 != 0 { 0b10 } else { 0 };
        let low = if byte & Self::BIT_0 != 0 { 0b01 } else { 0 };
        Self::from_code(high | low)
    }

    /// Bit width of humidity readings at this resolution.
    pub const fn humidity_bits(&self) -> u8 {
        match self {
            Resolution::Rh12T14 => 12,
            Resolution::Rh8T12 => 8,
            Resolution::Rh10T13 => 10,
            Resolution::Rh11T11 => 11,
        }
    }

    /// Bit width of temperature readings at this resolution.
    pub const fn temperature_bits(&self) -> u8 {
        match self {
            Resolution::Rh12T14 => 14,
            Resolution::Rh8T12 => 12,
            Resolution::Rh10T13 => 13,
            Resolution::Rh11T11 => 11,
        }
    }
}

/// Snapshot of the sensor's 8-bit user register.
///
/// Bits 3 to 5 are reserved. Their default values may change without
/// notice, so they must be written back exactly as read. The `with_*`
/// methods return a new register and only ever change their own bits,
/// which makes a read-modify-write with the result safe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UserRegister(u8);

impl UserRegister {
    pub const DISABLE_OTP_RELOAD: u8 = 0x02;
    pub const ENABLE_ON_CHIP_HEATER: u8 = 0x04;
    pub const END_OF_BATTERY: u8 = 0x40;
    pub const RESOLUTION: u8 = 0x81;
    pub const RESERVED: u8 = 0x38;

    pub const fn from_byte(byte: u8) -> Self {
        Self(byte)
    }

    /// The full register byte, reserved bits included.
    pub const fn raw(&self) -> u8 {
        self.0
    }

    /// OTP reload disabled (set by default). Use a soft reset instead of
    /// OTP reload.
    pub const fn is_otp_reload_disabled(&self) -> bool {
        self.0 & Self::DISABLE_OTP_RELOAD != 0
    }

    /// The on-chip heater adds roughly 0.5 to 1.5°C and is meant for
    /// functionality diagnosis.
    pub const fn is_on_chip_heater_enabled(&self) -> bool {
        self.0 & Self::ENABLE_ON_CHIP_HEATER != 0
    }

    /// Set when the supply falls below 2.25V. Updated after each measurement.
    pub const fn is_end_of_battery(&self) -> bool {
        self.0 & Self::END_OF_BATTERY != 0
    }

    /// Current resolution, or `None` if bits 7 and 0 match no known mode.
    pub const fn resolution(&self) -> Option<Resolution> {
        Resolution::from_register_bits(self.0)
    }

    pub const fn with_resolution(self, resolution: Resolution) -> Self {
        Self((self.0 & !Self::RESOLUTION) | resolution.register_bits())
    }

    pub const fn with_on_chip_heater(self, enabled: bool) -> Self {
        self.with_flag(Self::ENABLE_ON_CHIP_HEATER, enabled)
    }

    pub const fn with_end_of_battery_alert(self, enabled: bool) -> Self {
        self.with_flag(Self::END_OF_BATTERY, enabled)
    }

    const fn with_flag(self, mask: u8, enabled: bool) -> Self {
        let cleared = self.0 & !mask;
        if enabled {
            Self(cleared | mask)
        } else {
            Self(cleared)
        }
    }
}

impl From<u8> for UserRegister {
    fn from(value: u8) -> Self {
        Self::from_byte(value)
    }
}

impl From<UserRegister> for u8 {
    fn from(value: UserRegister) -> Self {
        value.raw()
    }
}

/// A temperature reading with its status bits cleared.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Temperature {
    raw: u16,
}

impl Temperature {
    /// Decode the two bytes sent by the sensor, most significant first.
    pub fn from_bytes(bytes: [u8; 2]) -> Self {
        Self::from_raw(u16::from_be_bytes(bytes))
    }

    /// The status bits are cleared here, so any reading is accepted.
    pub const fn from_raw(reading: u16) -> Self {
        Self {
            raw: conversions::clear_status_bits(reading),
        }
    }

    pub const fn raw(&self) -> u16 {
        self.raw
    }

    pub fn celsius(&self) -> f32 {
        conversions::temperature_reading_to_celsius(self.raw)
    }

    pub fn fahrenheit(&self) -> f32 {
        conversions::celsius_to_fahrenheit(self.celsius())
    }

    #[cfg(feature = "fixed")]
    pub fn celsius_fixed_point(&self) -> fixed::types::I16F16 {
        conversions::fixed_point::temperature_reading_to_celsius(self.raw)
    }

    #[cfg(feature = "fixed")]
    pub fn fahrenheit_fixed_point(&self) -> fixed::types::I16F16 {
        conversions::fixed_point::temperature_reading_to_fahrenheit(self.raw)
    }
}

/// A relative humidity reading with its status bits cleared.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Humidity {
    raw: u16,
}

impl Humidity {
    /// Decode the two bytes sent by the sensor, most significant first.
    pub fn from_bytes(bytes: [u8; 2]) -> Self {
        Self::from_raw(u16::from_be_bytes(bytes))
    }

    pub const fn from_raw(reading: u16) -> Self {
        Self {
            raw: conversions::clear_status_bits(reading),
        }
    }

    pub const fn raw(&self) -> u16 {
        self.raw
    }

    pub fn percent(&self) -> f32 {
        conversions::humidity_reading_to_percent_rh(self.raw)
    }

    #[cfg(feature = "fixed")]
    pub fn percent_fixed_point(&self) -> fixed::types::I16F16 {
        conversions::fixed_point::humidity_reading_to_percent_rh(self.raw)
    }
}

/// Temperature and humidity taken one after the other.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    pub temperature: Temperature,
    pub humidity: Humidity,
}

/// Bytes read after a trigger command. The checksum byte is only read
/// when validation is enabled, so the buffer is sliced to `len` bytes.
pub(crate) struct ReadBuffer {
    bytes: [u8; 3],
    len: usize,
}

impl ReadBuffer {
    pub(crate) fn new(should_validate_crc: bool) -> Self {
        Self {
            bytes: [0u8; 3],
            len: if should_validate_crc { 3 } else { 2 },
        }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes[..self.len]
    }

    /// The two data bytes, after checking the CRC if one was read.
    pub(crate) fn try_get_bytes<I>(&self, kind: MeasurementKind) -> Result<[u8; 2], Error<I>>
    where
        I: embedded_hal::i2c::Error,
    {
        if self.len == 3 && validate_crc(self.bytes).is_err() {
            return Err(Error::CrcValidationFailed(kind));
        }
        Ok([self.bytes[0], self.bytes[1]])
    }
}
