use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::common::{
    Command, Config, DEFAULT_ADDRESS, HoldMode, Humidity, Measurement, MeasurementKind,
    NO_HOLD_WAIT_US, ReadBuffer, Resolution, SOFT_RESET_WAIT_MS, Temperature, UserRegister,
};
use crate::error::Error;
use crate::utils::{debug, trace};

/// Async SHT20 driver. Same sequencing as [`crate::blocking::SHT2x`], with
/// the bus and delays awaited.
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

    pub async fn is_reachable(&mut self) -> bool {
        let reachable = self.i2c.write(self.address, &[]).await.is_ok();
        debug!("probe {=u8:#x}: {=bool}", self.address, reachable);
        reachable
    }

    pub async fn temperature(
        &mut self,
        delay: impl DelayNs,
    ) -> Result<Temperature, Error<I::Error>> {
        let bytes = self
            .read_measurement(delay, MeasurementKind::Temperature)
            .await?;
        Ok(Temperature::from_bytes(bytes))
    }

    pub async fn humidity(&mut self, delay: impl DelayNs) -> Result<Humidity, Error<I::Error>> {
        let bytes = self
            .read_measurement(delay, MeasurementKind::Humidity)
            .await?;
        Ok(Humidity::from_bytes(bytes))
    }

    pub async fn measure(
        &mut self,
        mut delay: impl DelayNs,
    ) -> Result<Measurement, Error<I::Error>> {
        let temperature = self.temperature(&mut delay).await?;
        let humidity = self.humidity(&mut delay).await?;
        Ok(Measurement {
            temperature,
            humidity,
        })
    }

    pub async fn user_register(&mut self) -> Result<UserRegister, Error<I::Error>> {
        let mut buf = [0u8; 1];
        self.write_command(Command::ReadUserRegister).await?;
        self.i2c.read(self.address, &mut buf).await?;
        trace!("read user register {=u8:#x}", buf[0]);
        Ok(UserRegister::from_byte(buf[0]))
    }

    pub async fn write_user_register(
        &mut self,
        register: UserRegister,
    ) -> Result<(), Error<I::Error>> {
        let command = Command::WriteUserRegister.command_byte();
        trace!("write user register {=u8:#x}", register.raw());
        self.i2c
            .write(self.address, &[command, register.raw()])
            .await?;
        Ok(())
    }

    pub async fn set_resolution(
        &mut self,
        resolution: Resolution,
    ) -> Result<UserRegister, Error<I::Error>> {
        let register = self.user_register().await?.with_resolution(resolution);
        self.write_user_register(register).await?;
        Ok(register)
    }

    pub async fn enable_heater(&mut self, enabled: bool) -> Result<UserRegister, Error<I::Error>> {
        let register = self.user_register().await?.with_on_chip_heater(enabled);
        self.write_user_register(register).await?;
        Ok(register)
    }

    pub async fn set_end_of_battery_alert(
        &mut self,
        enabled: bool,
    ) -> Result<UserRegister, Error<I::Error>> {
        let register = self
            .user_register()
            .await?
            .with_end_of_battery_alert(enabled);
        self.write_user_register(register).await?;
        Ok(register)
    }

    pub async fn soft_reset(&mut self, mut delay: impl DelayNs) -> Result<(), Error<I::Error>> {
        self.write_command(Command::SoftReset).await?;
        delay.delay_ms(SOFT_RESET_WAIT_MS).await;
        debug!("soft reset complete");
        Ok(())
    }

    async fn write_command(&mut self, command: Command) -> Result<(), Error<I::Error>> {
        trace!("command {}", command);
        self.i2c
            .write(self.address, &[command.command_byte()])
            .await?;
        Ok(())
    }

    async fn read_measurement(
        &mut self,
        mut delay: impl DelayNs,
        kind: MeasurementKind,
    ) -> Result<[u8; 2], Error<I::Error>> {
        let hold_mode = self.config.hold_mode;
        let mut buffer = ReadBuffer::new(self.config.should_validate_crc);

        self.write_command(kind.command(hold_mode)).await?;
        if hold_mode == HoldMode::NoHold {
            delay.delay_us(NO_HOLD_WAIT_US).await;
        }
        self.i2c
            .read(self.address, buffer.as_mut_slice())
            .await?;

        buffer.try_get_bytes(kind)
    }
}
