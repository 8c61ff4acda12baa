use crate::common::MeasurementKind;

#[derive(Debug)]
pub enum Error<I2cError>
where
    I2cError: embedded_hal::i2c::Error,
{
    /// The checksum byte sent after a measurement did not match its two
    /// data bytes. Only returned when checksum validation is enabled.
    CrcValidationFailed(MeasurementKind),
    /// Error from the underlying I2C bus, passed through unchanged.
    I2c(I2cError),
}

impl<I2cError> From<I2cError> for Error<I2cError>
where
    I2cError: embedded_hal::i2c::Error,
{
    fn from(value: I2cError) -> Self {
        Error::I2c(value)
    }
}

impl<I2cError> core::fmt::Display for Error<I2cError>
where
    I2cError: embedded_hal::i2c::Error,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::CrcValidationFailed(kind) => {
                write!(f, "CRC validation failed for {kind} bytes")
            }
            Error::I2c(e) => write!(f, "Received I2C error: {:?}", e),
        }
    }
}

impl<I> core::error::Error for Error<I> where I: embedded_hal::i2c::Error {}
