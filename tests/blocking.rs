use embedded_hal::i2c::ErrorKind;
use embedded_hal_mock::eh1::delay::{CheckedDelay, NoopDelay, Transaction as DelayTransaction};
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};
use sht2x_rjw::blocking::SHT2x;
use sht2x_rjw::common::{Config, HoldMode, MeasurementKind, Resolution, UserRegister};
use sht2x_rjw::error::Error;

const ADDR: u8 = 0x40;

fn finish(sensor: SHT2x<I2cMock>) {
    let mut i2c = sensor.destroy();
    i2c.done();
}

#[test]
fn temperature_no_hold() -> anyhow::Result<()> {
    let expectations = [
        Transaction::write(ADDR, vec![0xF3]),
        Transaction::read(ADDR, vec![0x65, 0x1C]),
    ];
    let mut sensor = SHT2x::new(I2cMock::new(&expectations), Config::default());

    let temperature = sensor.temperature(NoopDelay::new())?;
    assert_eq!(temperature.raw(), 0x651C);
    assert!((temperature.celsius() - 22.552).abs() < 0.01);
    assert!((temperature.fahrenheit() - 72.594).abs() < 0.01);

    finish(sensor);
    Ok(())
}

#[test]
fn humidity_masks_status_bits() -> anyhow::Result<()> {
    let expectations = [
        Transaction::write(ADDR, vec![0xF5]),
        Transaction::read(ADDR, vec![0x7C, 0x82]),
    ];
    let mut sensor = SHT2x::new(I2cMock::new(&expectations), Config::default());

    let humidity = sensor.humidity(NoopDelay::new())?;
    assert_eq!(humidity.raw(), 0x7C80);
    assert!((humidity.percent() - 54.791).abs() < 0.01);

    finish(sensor);
    Ok(())
}

#[test]
fn measure_reads_temperature_then_humidity() -> anyhow::Result<()> {
    let expectations = [
        Transaction::write(ADDR, vec![0xF3]),
        Transaction::read(ADDR, vec![0x65, 0x1C]),
        Transaction::write(ADDR, vec![0xF5]),
        Transaction::read(ADDR, vec![0x7C, 0x80]),
    ];
    let mut sensor = SHT2x::new(I2cMock::new(&expectations), Config::default());

    let measurement = sensor.measure(NoopDelay::new())?;
    assert_eq!(measurement.temperature.raw(), 0x651C);
    assert_eq!(measurement.humidity.raw(), 0x7C80);

    finish(sensor);
    Ok(())
}

#[test]
fn hold_master_commands() -> anyhow::Result<()> {
    let expectations = [
        Transaction::write(ADDR, vec![0xE3]),
        Transaction::read(ADDR, vec![0x65, 0x1C]),
        Transaction::write(ADDR, vec![0xE5]),
        Transaction::read(ADDR, vec![0x7C, 0x80]),
    ];
    let config = Config {
        hold_mode: HoldMode::HoldMaster,
        ..Default::default()
    };
    let mut sensor = SHT2x::new(I2cMock::new(&expectations), config);

    sensor.measure(NoopDelay::new())?;

    finish(sensor);
    Ok(())
}

#[test]
fn checksum_validated_when_enabled() -> anyhow::Result<()> {
    let expectations = [
        Transaction::write(ADDR, vec![0xF3]),
        Transaction::read(ADDR, vec![0x68, 0x3A, 0x7C]),
        Transaction::write(ADDR, vec![0xF5]),
        Transaction::read(ADDR, vec![0x4E, 0x85, 0x00]),
    ];
    let config = Config {
        should_validate_crc: true,
        ..Default::default()
    };
    let mut sensor = SHT2x::new(I2cMock::new(&expectations), config);

    let temperature = sensor.temperature(NoopDelay::new())?;
    assert_eq!(temperature.raw(), 0x6838);

    let result = sensor.humidity(NoopDelay::new());
    assert!(matches!(
        result,
        Err(Error::CrcValidationFailed(MeasurementKind::Humidity))
    ));

    finish(sensor);
    Ok(())
}

#[test]
fn read_user_register() -> anyhow::Result<()> {
    let expectations = [
        Transaction::write(ADDR, vec![0xE7]),
        Transaction::read(ADDR, vec![0x02]),
    ];
    let mut sensor = SHT2x::new(I2cMock::new(&expectations), Config::default());

    let register = sensor.user_register()?;
    assert!(register.is_otp_reload_disabled());
    assert!(!register.is_on_chip_heater_enabled());
    assert!(!register.is_end_of_battery());
    assert_eq!(register.resolution(), Some(Resolution::Rh12T14));

    finish(sensor);
    Ok(())
}

#[test]
fn write_user_register_sends_opcode_and_payload() -> anyhow::Result<()> {
    let expectations = [Transaction::write(ADDR, vec![0xE6, 0x3B])];
    let mut sensor = SHT2x::new(I2cMock::new(&expectations), Config::default());

    sensor.write_user_register(UserRegister::from_byte(0x3B))?;

    finish(sensor);
    Ok(())
}

#[test]
fn set_resolution_preserves_reserved_bits() -> anyhow::Result<()> {
    let expectations = [
        Transaction::write(ADDR, vec![0xE7]),
        Transaction::read(ADDR, vec![0x3A]),
        Transaction::write(ADDR, vec![0xE6, 0xBB]),
    ];
    let mut sensor = SHT2x::new(I2cMock::new(&expectations), Config::default());

    let written = sensor.set_resolution(Resolution::Rh11T11)?;
    assert_eq!(written.raw(), 0xBB);

    finish(sensor);
    Ok(())
}

#[test]
fn heater_and_battery_alert_read_modify_write() -> anyhow::Result<()> {
    let expectations = [
        Transaction::write(ADDR, vec![0xE7]),
        Transaction::read(ADDR, vec![0x3A]),
        Transaction::write(ADDR, vec![0xE6, 0x3E]),
        Transaction::write(ADDR, vec![0xE7]),
        Transaction::read(ADDR, vec![0x3E]),
        Transaction::write(ADDR, vec![0xE6, 0x3E]),
        Transaction::write(ADDR, vec![0xE7]),
        Transaction::read(ADDR, vec![0x7E]),
        Transaction::write(ADDR, vec![0xE6, 0x3E]),
    ];
    let mut sensor = SHT2x::new(I2cMock::new(&expectations), Config::default());

    sensor.enable_heater(true)?;
    sensor.enable_heater(true)?;
    sensor.set_end_of_battery_alert(false)?;

    finish(sensor);
    Ok(())
}

#[test]
fn soft_reset_reads_nothing() -> anyhow::Result<()> {
    let expectations = [Transaction::write(ADDR, vec![0xFE])];
    let mut sensor = SHT2x::new(I2cMock::new(&expectations), Config::default());

    sensor.soft_reset(NoopDelay::new())?;

    finish(sensor);
    Ok(())
}

#[test]
fn bus_errors_propagate() {
    let expectations = [Transaction::write(ADDR, vec![0xF3]).with_error(ErrorKind::Other)];
    let mut sensor = SHT2x::new(I2cMock::new(&expectations), Config::default());

    let result = sensor.temperature(NoopDelay::new());
    assert!(matches!(result, Err(Error::I2c(ErrorKind::Other))));

    finish(sensor);
}

#[test]
fn failed_register_read_aborts_write() {
    let expectations = [
        Transaction::write(ADDR, vec![0xE7]),
        Transaction::read(ADDR, vec![0x00]).with_error(ErrorKind::Other),
    ];
    let mut sensor = SHT2x::new(I2cMock::new(&expectations), Config::default());

    assert!(sensor.set_resolution(Resolution::Rh8T12).is_err());

    finish(sensor);
}

#[test]
fn reachability_swallows_errors() {
    let expectations = [
        Transaction::write(ADDR, vec![]),
        Transaction::write(ADDR, vec![]).with_error(ErrorKind::NoAcknowledge(
            embedded_hal::i2c::NoAcknowledgeSource::Address,
        )),
    ];
    let mut sensor = SHT2x::new(I2cMock::new(&expectations), Config::default());

    assert!(sensor.is_reachable());
    assert!(!sensor.is_reachable());

    finish(sensor);
}

#[test]
fn no_hold_waits_before_each_read() -> anyhow::Result<()> {
    let expectations = [
        Transaction::write(ADDR, vec![0xF3]),
        Transaction::read(ADDR, vec![0x65, 0x1C]),
        Transaction::write(ADDR, vec![0xF5]),
        Transaction::read(ADDR, vec![0x7C, 0x80]),
    ];
    let mut delay = CheckedDelay::new(&[
        DelayTransaction::blocking_delay_us(20),
        DelayTransaction::blocking_delay_us(20),
    ]);
    let mut sensor = SHT2x::new(I2cMock::new(&expectations), Config::default());

    sensor.temperature(&mut delay)?;
    sensor.humidity(&mut delay)?;

    delay.done();
    finish(sensor);
    Ok(())
}

#[test]
fn hold_master_does_not_wait() -> anyhow::Result<()> {
    let expectations = [
        Transaction::write(ADDR, vec![0xE3]),
        Transaction::read(ADDR, vec![0x65, 0x1C]),
    ];
    let mut delay = CheckedDelay::new(&[]);
    let config = Config {
        hold_mode: HoldMode::HoldMaster,
        ..Default::default()
    };
    let mut sensor = SHT2x::new(I2cMock::new(&expectations), config);

    sensor.temperature(&mut delay)?;

    delay.done();
    finish(sensor);
    Ok(())
}

#[test]
fn soft_reset_waits_15ms() -> anyhow::Result<()> {
    let expectations = [Transaction::write(ADDR, vec![0xFE])];
    let mut delay = CheckedDelay::new(&[DelayTransaction::blocking_delay_ms(15)]);
    let mut sensor = SHT2x::new(I2cMock::new(&expectations), Config::default());

    sensor.soft_reset(&mut delay)?;

    delay.done();
    finish(sensor);
    Ok(())
}
