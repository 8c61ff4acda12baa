use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{I2c, SevenBitAddress};

use crate::common::{
    Command, Config, DEFAULT_ADDRESS, HoldMode, Humidity, Measurement, MeasurementKind,
    NO_HOLD_WAIT_US, ReadBuffer, Resolution, SOFT_RESET_WAIT_MS, Temperature, UserRegister,
};
use crate::error::Error;
use crate::utils::{debug, trace};

/// Blocking SHT20 driver.
///
/// Every method takes `&mut self` and runs to completion before returning.
/// The `set_*`/`enable_*` methods read, modify and write back the user
/// register in separate transactions, so if the sensor is shared the caller
/// must serialize access around them.
pub struct SHT2x<I: I2c> {
    i2c: I,
    pub address: SevenBitAddress,
    pub config: Config,
}

impl<I: I2c> SHT2x<I> {
    pub fn new(i2c: I, config: Config) -> Self {
        Self {
            i2c,
            address: DEFAULT_ADDRESS,
            config,
        }
    }

    pub fn destroy(self) -> I {
        self.i2c
    }

    /// Probe the sensor's address. Any bus error is reported as `false`.
    pub fn is_reachable(&mut self) -> bool {
        let reachable = self.i2c.write(self.address, &[]).is_ok();
        debug!("probe {=u8:#x}: {=bool}", self.address, reachable);
        reachable
    }

    pub fn temperature(&mut self, delay: impl DelayNs) -> Result<Temperature, Error<I::Error>> {
        let bytes = self.read_measurement(delay, MeasurementKind::Temperature)?;
        Ok(Temperature::from_bytes(bytes))
    }

    pub fn humidity(&mut self, delay: impl DelayNs) -> Result<Humidity, Error<I::Error>> {
        let bytes = self.read_measurement(delay, MeasurementKind::Humidity)?;
        Ok(Humidity::from_bytes(bytes))
    }

    /// Measure temperature, then humidity.
    pub fn measure(&mut self, mut delay: impl DelayNs) -> Result<Measurement, Error<I::Error>> {
        let temperature = self.temperature(&mut delay)?;
        let humidity = self.humidity(&mut delay)?;
        Ok(Measurement {
            temperature,
            humidity,
        })
    }

    pub fn user_register(&mut self) -> Result<UserRegister, Error<I::Error>> {
        let mut buf = [0u8; 1];
        self.write_command(Command::ReadUserRegister)?;
        self.i2c.read(self.address, &mut buf)?;
        trace!("read user register {=u8:#x}", buf[0]);
        Ok(UserRegister::from_byte(buf[0]))
    }

    /// Write the whole register byte, reserved bits included. Start from a
    /// register read from the sensor rather than one built from scratch.
    pub fn write_user_register(&mut self, register: UserRegister) -> Result<(), Error<I::Error>> {
        let command = Command::WriteUserRegister.command_byte();
        trace!("write user register {=u8:#x}", register.raw());
        self.i2c.write(self.address, &[command, register.raw()])?;
        Ok(())
    }

    pub fn set_resolution(
        &mut self,
        resolution: Resolution,
    ) -> Result<UserRegister, Error<I::Error>> {
        let register = self.user_register()?.with_resolution(resolution);
        self.write_user_register(register)?;
        Ok(register)
    }

    pub fn enable_heater(&mut self, enabled: bool) -> Result<UserRegister, Error<I::Error>> {
        let register = self.user_register()?.with_on_chip_heater(enabled);
        self.write_user_register(register)?;
        Ok(register)
    }

    pub fn set_end_of_battery_alert(
        &mut self,
        enabled: bool,
    ) -> Result<UserRegister, Error<I::Error>> {
        let register = self.user_register()?.with_end_of_battery_alert(enabled);
        self.write_user_register(register)?;
        Ok(register)
    }

    /// Restart the sensor with its default settings, except for the heater
    /// bit which is kept. Blocks for 15ms.
    pub fn soft_reset(&mut self, mut delay: impl DelayNs) -> Result<(), Error<I::Error>> {
        self.write_command(Command::SoftReset)?;
        delay.delay_ms(SOFT_RESET_WAIT_MS);
        debug!("soft reset complete");
        Ok(())
    }

    fn write_command(&mut self, command: Command) -> Result<(), Error<I::Error>> {
        trace!("command {}", command);
        self.i2c.write(self.address, &[command.command_byte()])?;
        Ok(())
    }

    fn read_measurement(
        &mut self,
        mut delay: impl DelayNs,
        kind: MeasurementKind,
    ) -> Result<[u8; 2], Error<I::Error>> {
        let hold_mode = self.config.hold_mode;
        let mut buffer = ReadBuffer::new(self.config.should_validate_crc);

        self.write_command(kind.command(hold_mode))?;
        if hold_mode == HoldMode::NoHold {
            delay.delay_us(NO_HOLD_WAIT_US);
        }
        self.i2c.read(self.address, buffer.as_mut_slice())?;

        buffer.try_get_bytes(kind)
    }
}
