//! Driver for the PCF8563 real-time clock.
//!
//! # Status register cache
//!
//! The driver keeps the last known values of control/status 1 and 2. They
//! are refreshed by [`Pcf8563::read_time`], and [`Pcf8563::alarm_enabled`] /
//! [`Pcf8563::alarm_active`] test the cached copy without touching the bus.
//!
//! The alarm operations are read-modify-writes of control/status 2. With the
//! default [`StatusRefresh::ReadBeforeWrite`] policy the driver reads the
//! register from the device first, so a flag the device raised since the last
//! read is not lost. [`StatusRefresh::Cached`] modifies the cached byte
//! directly, saving a bus transaction.

use chrono::NaiveDateTime;
use embedded_hal::i2c::I2c;
use heapless::String;

use crate::alarm::Alarm;
use crate::datetime::{DateReading, DateStyle, Pcf8563DateTime, TimeReading, TimeStyle};
use crate::registers::{ClockOut, RegAddr, Status1, Status2};
use crate::Error;

/// Default 7-bit I2C address of the PCF8563.
pub const RTC_ADDRESS: u8 = 0x51;

/// How alarm read-modify-writes obtain the control/status 2 base value.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusRefresh {
    /// Read control/status 2 from the device before every modification
    #[default]
    ReadBeforeWrite,
    /// Modify the last cached control/status 2 value
    Cached,
}

/// Driver configuration.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Status register refresh policy for alarm operations
    pub status_refresh: StatusRefresh,
}

/// PCF8563 Real-Time Clock driver.
pub struct Pcf8563<I2C: I2c> {
    i2c: I2C,
    address: u8,
    config: Config,
    status1: Status1,
    status2: Status2,
    voltage_low: bool,
}

impl<I2C: I2c> Pcf8563<I2C> {
    /// Creates a new PCF8563 driver instance with the default [`Config`].
    ///
    /// # Arguments
    /// * `i2c` - The I2C bus implementation
    /// * `address` - The I2C address of the device (typically [`RTC_ADDRESS`])
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self::with_config(i2c, address, Config::default())
    }

    /// Creates a new PCF8563 driver instance with the given configuration.
    pub fn with_config(i2c: I2C, address: u8, config: Config) -> Self {
        Self {
            i2c,
            address,
            config,
            status1: Status1::default(),
            status2: Status2::default(),
            voltage_low: false,
        }
    }

    /// Replaces the driver configuration.
    pub fn configure(&mut self, config: &Config) {
        debug!("PCF8563: configure {:?}", config);
        self.config = *config;
    }

    /// Releases the I2C bus.
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Last known control/status 1 value.
    pub fn status1(&self) -> Status1 {
        self.status1
    }

    /// Last known control/status 2 value.
    pub fn status2(&self) -> Status2 {
        self.status2
    }

    fn write_registers(&mut self, reg: RegAddr, data: &[u8]) -> Result<(), Error<I2C::Error>> {
        // largest burst is init: 15 registers plus the register address
        let mut frame = [0u8; 16];
        frame[0] = reg as u8;
        frame[1..=data.len()].copy_from_slice(data);
        self.i2c.write(self.address, &frame[..=data.len()])?;
        Ok(())
    }

    fn read_registers(&mut self, reg: RegAddr, buf: &mut [u8]) -> Result<(), Error<I2C::Error>> {
        self.i2c.write_read(self.address, &[reg as u8], buf)?;
        Ok(())
    }

    /// Initializes the clock: clears both status registers, sets the date
    /// and time, disables all alarm fields, CLKOUT and the timer, all in a
    /// single burst.
    ///
    /// # Errors
    ///
    /// [`Error::DateTime`] if `datetime` cannot be stored, before any bus
    /// activity.
    pub fn init(&mut self, datetime: &NaiveDateTime) -> Result<(), Error<I2C::Error>> {
        let raw = Pcf8563DateTime::from_datetime(datetime).map_err(Error::DateTime)?;
        let clock: [u8; 7] = (&raw).into();
        let alarm = Alarm::disabled().to_registers();

        let mut data = [0u8; 15];
        data[2..9].copy_from_slice(&clock);
        data[9..13].copy_from_slice(&alarm);
        data[13] = ClockOut::Disabled.into();
        debug!("PCF8563: init {:?}", data);
        self.write_registers(RegAddr::ControlStatus1, &data)?;

        self.status1 = Status1::default();
        self.status2 = Status2::default();
        self.voltage_low = false;
        Ok(())
    }

    /// Writes zero to both control/status registers.
    pub fn clear_status(&mut self) -> Result<(), Error<I2C::Error>> {
        self.write_registers(RegAddr::ControlStatus1, &[0, 0])?;
        self.status1 = Status1::default();
        self.status2 = Status2::default();
        Ok(())
    }

    /// Reads the status registers and the time of day in one burst.
    ///
    /// Updates the cached status registers. On a bus error the cache is left
    /// untouched.
    pub fn read_time(&mut self) -> Result<TimeReading, Error<I2C::Error>> {
        let mut data = [0u8; 5];
        self.read_registers(RegAddr::ControlStatus1, &mut data)?;
        self.status1 = Status1::from(data[0]);
        self.status2 = Status2::from(data[1]);
        let time = TimeReading::from_registers([data[2], data[3], data[4]]);
        debug!(
            "PCF8563: status1={:#x} status2={:#x} time={:?}",
            data[0], data[1], time
        );
        Ok(time)
    }

    /// Reads the date registers.
    pub fn read_date(&mut self) -> Result<DateReading, Error<I2C::Error>> {
        let mut data = [0u8; 4];
        self.read_registers(RegAddr::Days, &mut data)?;
        let date = DateReading::from_registers(data);
        debug!("PCF8563: date={:?}", date);
        Ok(date)
    }

    /// Reads the time and renders it in `style`.
    pub fn format_time(&mut self, style: TimeStyle) -> Result<String<8>, Error<I2C::Error>> {
        Ok(self.read_time()?.format(style))
    }

    /// Reads the date and renders it in `style`.
    pub fn format_date(&mut self, style: DateStyle) -> Result<String<10>, Error<I2C::Error>> {
        Ok(self.read_date()?.format(style))
    }

    /// Gets the current date and time from the device.
    ///
    /// Also records the seconds register's VL flag, see
    /// [`clock_integrity_lost`](Self::clock_integrity_lost).
    pub fn datetime(&mut self) -> Result<NaiveDateTime, Error<I2C::Error>> {
        let mut data = [0u8; 7];
        self.read_registers(RegAddr::VlSeconds, &mut data)?;
        let raw = Pcf8563DateTime::from(data);
        self.voltage_low = raw.voltage_low;
        raw.into_datetime().map_err(Error::DateTime)
    }

    /// Sets the current date and time on the device.
    ///
    /// Years 1900-1999 set the century bit; 2000-2099 clear it.
    pub fn set_datetime(&mut self, datetime: &NaiveDateTime) -> Result<(), Error<I2C::Error>> {
        let raw = Pcf8563DateTime::from_datetime(datetime).map_err(Error::DateTime)?;
        let data: [u8; 7] = (&raw).into();
        self.write_registers(RegAddr::VlSeconds, &data)?;
        self.voltage_low = false;
        Ok(())
    }

    /// Whether the most recent [`datetime`](Self::datetime) read reported
    /// that the clock may have lost time (VL flag).
    pub fn clock_integrity_lost(&self) -> bool {
        self.voltage_low
    }

    /// Sets the CLKOUT square-wave output.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if `frequency` is not one of the
    /// [`ClockOut`] register values; nothing is sent.
    pub fn set_squarewave(&mut self, frequency: u8) -> Result<(), Error<I2C::Error>> {
        let clock_out = ClockOut::try_from(frequency).map_err(|e| {
            warn!("PCF8563: invalid CLKOUT value {:?}", e);
            Error::InvalidParameter
        })?;
        debug!("PCF8563: CLKOUT {:?}", clock_out);
        self.write_registers(RegAddr::ClkoutControl, &[clock_out.into()])
    }

    /// Returns the control/status 2 value alarm operations start from.
    fn status2_base(&mut self) -> Result<Status2, Error<I2C::Error>> {
        if self.config.status_refresh == StatusRefresh::ReadBeforeWrite {
            let mut data = [0u8];
            self.read_registers(RegAddr::ControlStatus2, &mut data)?;
            self.status2 = Status2::from(data[0]);
        }
        Ok(self.status2)
    }

    fn update_status2(&mut self, apply: fn(&mut Status2)) -> Result<(), Error<I2C::Error>> {
        let mut status2 = self.status2_base()?;
        apply(&mut status2);
        debug!("PCF8563: status2 <- {:#x}", u8::from(status2));
        self.write_registers(RegAddr::ControlStatus2, &[status2.into()])?;
        self.status2 = status2;
        Ok(())
    }

    /// Clears the alarm flag and enables the alarm interrupt.
    pub fn enable_alarm(&mut self) -> Result<(), Error<I2C::Error>> {
        self.update_status2(Status2::enable_alarm)
    }

    /// Clears the alarm flag and disables the alarm interrupt.
    pub fn clear_alarm(&mut self) -> Result<(), Error<I2C::Error>> {
        self.update_status2(Status2::clear_alarm)
    }

    /// Clears the alarm flag, leaving the alarm interrupt setting unchanged.
    pub fn reset_alarm(&mut self) -> Result<(), Error<I2C::Error>> {
        self.update_status2(Status2::reset_alarm)
    }

    /// Sets the alarm from raw field values.
    ///
    /// Values outside a field's range (minute 0-59, hour 0-23, day 1-31,
    /// weekday 0-6), such as [`NO_ALARM`](crate::NO_ALARM), disable that field.
    pub fn set_alarm(
        &mut self,
        minute: u8,
        hour: u8,
        day: u8,
        weekday: u8,
    ) -> Result<(), Error<I2C::Error>> {
        self.set_alarm_fields(&Alarm::new(minute, hour, day, weekday))
    }

    /// Sets the alarm.
    ///
    /// Enables the alarm interrupt (clearing the alarm flag) first, and writes
    /// the four alarm registers only if that succeeded.
    pub fn set_alarm_fields(&mut self, alarm: &Alarm) -> Result<(), Error<I2C::Error>> {
        let data = alarm.to_registers();
        self.enable_alarm()?;
        debug!("PCF8563: alarm {:?}", alarm);
        self.write_registers(RegAddr::MinuteAlarm, &data)
    }

    /// Reads the alarm registers.
    pub fn get_alarm(&mut self) -> Result<Alarm, Error<I2C::Error>> {
        let mut data = [0u8; 4];
        self.read_registers(RegAddr::MinuteAlarm, &mut data)?;
        Ok(Alarm::from_registers(data))
    }

    /// Whether the alarm interrupt is enabled, per the cached status.
    pub fn alarm_enabled(&self) -> bool {
        self.status2.alarm_interrupt_enable()
    }

    /// Whether the alarm has fired, per the cached status.
    pub fn alarm_active(&self) -> bool {
        self.status2.alarm_flag()
    }
}

#[cfg(test)]
mod tests {
    extern crate alloc;
    use super::*;
    use crate::alarm::{AlarmField, NO_ALARM};
    use crate::datetime::DateTimeError;
    use alloc::vec;
    use chrono::{Datelike, NaiveDate, Timelike};
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};

    const DEVICE_ADDRESS: u8 = RTC_ADDRESS;

    fn cached_config() -> Config {
        Config {
            status_refresh: StatusRefresh::Cached,
        }
    }

    #[test]
    fn test_read_time() {
        let mut i2c = I2cMock::new(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::ControlStatus1 as u8],
            vec![0x00, 0x00, 0x12, 0x34, 0x21],
        )]);
        let mut dev = Pcf8563::new(&mut i2c, DEVICE_ADDRESS);

        let time = dev.read_time().unwrap();
        assert_eq!(
            time,
            TimeReading {
                hour: 21,
                minute: 34,
                second: 12
            }
        );
        i2c.done();
    }

    #[test]
    fn test_read_time_caches_status() {
        let mut i2c = I2cMock::new(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::ControlStatus1 as u8],
            vec![0x20, 0x0a, 0x00, 0x00, 0x00],
        )]);
        let mut dev = Pcf8563::new(&mut i2c, DEVICE_ADDRESS);

        dev.read_time().unwrap();
        assert!(dev.status1().stop());
        assert!(dev.alarm_enabled());
        assert!(dev.alarm_active());
        i2c.done();
    }

    #[test]
    fn test_read_time_error_keeps_cache() {
        let mut i2c = I2cMock::new(&[
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::ControlStatus1 as u8],
                vec![0x00, 0x0a, 0x00, 0x00, 0x00],
            ),
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::ControlStatus1 as u8],
                vec![0x00, 0x00, 0x00, 0x00, 0x00],
            )
            .with_error(ErrorKind::Other),
        ]);
        let mut dev = Pcf8563::new(&mut i2c, DEVICE_ADDRESS);

        dev.read_time().unwrap();
        let result = dev.read_time();
        assert_eq!(result, Err(Error::I2c(ErrorKind::Other)));
        assert!(dev.alarm_enabled());
        assert!(dev.alarm_active());
        i2c.done();
    }

    #[test]
    fn test_read_date() {
        let mut i2c = I2cMock::new(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::Days as u8],
            vec![0x04, 0x05, 0x07, 0x25],
        )]);
        let mut dev = Pcf8563::new(&mut i2c, DEVICE_ADDRESS);

        let date = dev.read_date().unwrap();
        assert_eq!(date.day, 4);
        assert_eq!(date.weekday, 5);
        assert_eq!(date.month, 7);
        assert_eq!(date.year, 25);
        assert!(!date.century);
        i2c.done();
    }

    #[test]
    fn test_read_date_error() {
        let mut i2c = I2cMock::new(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::Days as u8],
            vec![0, 0, 0, 0],
        )
        .with_error(ErrorKind::Other)]);
        let mut dev = Pcf8563::new(&mut i2c, DEVICE_ADDRESS);

        assert_eq!(dev.read_date(), Err(Error::I2c(ErrorKind::Other)));
        i2c.done();
    }

    #[test]
    fn test_format_time_and_date() {
        let mut i2c = I2cMock::new(&[
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::ControlStatus1 as u8],
                vec![0x00, 0x00, 0x03, 0x05, 0x09],
            ),
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::Days as u8],
                vec![0x04, 0x05, 0x87, 0x25],
            ),
        ]);
        let mut dev = Pcf8563::new(&mut i2c, DEVICE_ADDRESS);

        assert_eq!(dev.format_time(TimeStyle::Hms).unwrap().as_str(), "09:05:03");
        assert_eq!(dev.format_date(DateStyle::Us).unwrap().as_str(), "07/04/1925");
        i2c.done();
    }

    #[test]
    fn test_set_alarm_cached() {
        let mut i2c = I2cMock::new(&[
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ControlStatus2 as u8, 0x02]),
            I2cTrans::write(
                DEVICE_ADDRESS,
                vec![RegAddr::MinuteAlarm as u8, 0x01, 0x02, 0x03, 0x04],
            ),
        ]);
        let mut dev = Pcf8563::with_config(&mut i2c, DEVICE_ADDRESS, cached_config());

        dev.set_alarm(1, 2, 3, 4).unwrap();
        assert!(dev.alarm_enabled());
        assert!(!dev.alarm_active());
        i2c.done();
    }

    #[test]
    fn test_set_alarm_reads_status_first() {
        let mut i2c = I2cMock::new(&[
            // device has the alarm flag and timer interrupt set
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::ControlStatus2 as u8],
                vec![0x09],
            ),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ControlStatus2 as u8, 0x03]),
            I2cTrans::write(
                DEVICE_ADDRESS,
                vec![RegAddr::MinuteAlarm as u8, 0x30, 0x06, 0x80, 0x80],
            ),
        ]);
        let mut dev = Pcf8563::new(&mut i2c, DEVICE_ADDRESS);

        dev.set_alarm(30, 6, NO_ALARM, NO_ALARM).unwrap();
        i2c.done();
    }

    #[test]
    fn test_set_alarm_stops_when_status_write_fails() {
        let mut i2c = I2cMock::new(&[I2cTrans::write(
            DEVICE_ADDRESS,
            vec![RegAddr::ControlStatus2 as u8, 0x02],
        )
        .with_error(ErrorKind::Other)]);
        let mut dev = Pcf8563::with_config(&mut i2c, DEVICE_ADDRESS, cached_config());

        let result = dev.set_alarm(1, 2, 3, 4);
        assert_eq!(result, Err(Error::I2c(ErrorKind::Other)));
        assert!(!dev.alarm_enabled());
        i2c.done();
    }

    #[test]
    fn test_set_alarm_out_of_range_fields_disabled() {
        let mut i2c = I2cMock::new(&[
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ControlStatus2 as u8, 0x02]),
            I2cTrans::write(
                DEVICE_ADDRESS,
                vec![RegAddr::MinuteAlarm as u8, 0x80, 0x80, 0x80, 0x80],
            ),
        ]);
        let mut dev = Pcf8563::with_config(&mut i2c, DEVICE_ADDRESS, cached_config());

        dev.set_alarm(60, 24, 0, 7).unwrap();
        i2c.done();
    }

    #[test]
    fn test_get_alarm() {
        let mut i2c = I2cMock::new(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::MinuteAlarm as u8],
            vec![0x45, 0x80, 0x31, 0x86],
        )]);
        let mut dev = Pcf8563::new(&mut i2c, DEVICE_ADDRESS);

        let alarm = dev.get_alarm().unwrap();
        assert_eq!(alarm.minute, AlarmField::Active(45));
        assert_eq!(alarm.hour, AlarmField::Disabled);
        assert_eq!(alarm.day, AlarmField::Active(31));
        assert_eq!(alarm.weekday, AlarmField::Disabled);
        assert_eq!(u8::from(alarm.hour), NO_ALARM);
        i2c.done();
    }

    #[test]
    fn test_clear_alarm_from_any_state() {
        for raw in [0x00u8, 0x02, 0x08, 0x0a] {
            let mut i2c = I2cMock::new(&[
                I2cTrans::write_read(
                    DEVICE_ADDRESS,
                    vec![RegAddr::ControlStatus2 as u8],
                    vec![raw],
                ),
                I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ControlStatus2 as u8, 0x00]),
            ]);
            let mut dev = Pcf8563::new(&mut i2c, DEVICE_ADDRESS);

            dev.clear_alarm().unwrap();
            assert!(!dev.alarm_enabled());
            assert!(!dev.alarm_active());
            i2c.done();
        }
    }

    #[test]
    fn test_reset_alarm_keeps_enable() {
        let mut i2c = I2cMock::new(&[
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::ControlStatus2 as u8],
                vec![0x0a],
            ),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ControlStatus2 as u8, 0x02]),
        ]);
        let mut dev = Pcf8563::new(&mut i2c, DEVICE_ADDRESS);

        dev.reset_alarm().unwrap();
        assert!(dev.alarm_enabled());
        assert!(!dev.alarm_active());
        i2c.done();
    }

    #[test]
    fn test_cached_policy_uses_last_read_status() {
        let mut i2c = I2cMock::new(&[
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::ControlStatus1 as u8],
                vec![0x00, 0x0b, 0x00, 0x00, 0x00],
            ),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ControlStatus2 as u8, 0x03]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ControlStatus2 as u8, 0x01]),
        ]);
        let mut dev = Pcf8563::with_config(&mut i2c, DEVICE_ADDRESS, cached_config());

        dev.read_time().unwrap();
        dev.reset_alarm().unwrap();
        dev.clear_alarm().unwrap();
        i2c.done();
    }

    #[test]
    fn test_configure_switches_policy() {
        let mut i2c = I2cMock::new(&[
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ControlStatus2 as u8, 0x02]),
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::ControlStatus2 as u8],
                vec![0x0a],
            ),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ControlStatus2 as u8, 0x00]),
        ]);
        let mut dev = Pcf8563::with_config(&mut i2c, DEVICE_ADDRESS, cached_config());

        dev.enable_alarm().unwrap();
        dev.configure(&Config::default());
        dev.clear_alarm().unwrap();
        i2c.done();
    }

    #[test]
    fn test_set_squarewave() {
        let mut i2c = I2cMock::new(&[
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ClkoutControl as u8, 0x81]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ClkoutControl as u8, 0x00]),
        ]);
        let mut dev = Pcf8563::new(&mut i2c, DEVICE_ADDRESS);

        dev.set_squarewave(ClockOut::Hz1024.into()).unwrap();
        dev.set_squarewave(0b0000_0000).unwrap();
        i2c.done();
    }

    #[test]
    fn test_set_squarewave_rejects_unknown_value() {
        let mut i2c = I2cMock::new(&[]);
        let mut dev = Pcf8563::new(&mut i2c, DEVICE_ADDRESS);

        assert_eq!(dev.set_squarewave(0x42), Err(Error::InvalidParameter));
        assert_eq!(dev.set_squarewave(0x84), Err(Error::InvalidParameter));
        i2c.done();
    }

    #[test]
    fn test_init() {
        let dt = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let mut i2c = I2cMock::new(&[I2cTrans::write(
            DEVICE_ADDRESS,
            vec![
                RegAddr::ControlStatus1 as u8,
                0x00, // status1
                0x00, // status2
                0x00, // seconds
                0x00, // minutes
                0x12, // hours
                0x01, // days
                0x03, // weekday (Wednesday)
                0x01, // month
                0x25, // year
                0x80, // minute alarm
                0x80, // hour alarm
                0x80, // day alarm
                0x80, // weekday alarm
                0x00, // CLKOUT
                0x00, // timer control
            ],
        )]);
        let mut dev = Pcf8563::new(&mut i2c, DEVICE_ADDRESS);

        dev.init(&dt).unwrap();
        assert!(!dev.alarm_enabled());
        i2c.done();
    }

    #[test]
    fn test_clear_status() {
        let mut i2c = I2cMock::new(&[
            I2cTrans::write_read(
                DEVICE_ADDRESS,
                vec![RegAddr::ControlStatus1 as u8],
                vec![0x00, 0x0a, 0x00, 0x00, 0x00],
            ),
            I2cTrans::write(
                DEVICE_ADDRESS,
                vec![RegAddr::ControlStatus1 as u8, 0x00, 0x00],
            ),
        ]);
        let mut dev = Pcf8563::new(&mut i2c, DEVICE_ADDRESS);

        dev.read_time().unwrap();
        dev.clear_status().unwrap();
        assert!(!dev.alarm_enabled());
        assert!(!dev.alarm_active());
        i2c.done();
    }

    #[test]
    fn test_datetime() {
        let mut i2c = I2cMock::new(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::VlSeconds as u8],
            vec![0x80, 0x30, 0x15, 0x14, 0x04, 0x03, 0x24],
        )]);
        let mut dev = Pcf8563::new(&mut i2c, DEVICE_ADDRESS);

        let dt = dev.datetime().unwrap();
        assert_eq!(dt.hour(), 15);
        assert_eq!(dt.minute(), 30);
        assert_eq!(dt.second(), 0);
        assert_eq!(dt.day(), 14);
        assert_eq!(dt.month(), 3);
        assert_eq!(dt.year(), 2024);
        assert!(dev.clock_integrity_lost());
        i2c.done();
    }

    #[test]
    fn test_datetime_invalid_registers() {
        let mut i2c = I2cMock::new(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::VlSeconds as u8],
            vec![0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x24],
        )]);
        let mut dev = Pcf8563::new(&mut i2c, DEVICE_ADDRESS);

        assert_eq!(
            dev.datetime(),
            Err(Error::DateTime(DateTimeError::InvalidDateTime))
        );
        i2c.done();
    }

    #[test]
    fn test_set_datetime_nineteenth_century_bit() {
        let dt = NaiveDate::from_ymd_opt(1999, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 58)
            .unwrap();
        let mut i2c = I2cMock::new(&[I2cTrans::write(
            DEVICE_ADDRESS,
            vec![
                RegAddr::VlSeconds as u8,
                0x58,
                0x59,
                0x23,
                0x31,
                0x05, // Friday
                0x92, // century bit + December
                0x99,
            ],
        )]);
        let mut dev = Pcf8563::new(&mut i2c, DEVICE_ADDRESS);

        dev.set_datetime(&dt).unwrap();
        i2c.done();
    }

    #[test]
    fn test_set_datetime_out_of_range_is_not_sent() {
        let dt = NaiveDate::from_ymd_opt(2100, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut i2c = I2cMock::new(&[]);
        let mut dev = Pcf8563::new(&mut i2c, DEVICE_ADDRESS);

        assert_eq!(
            dev.set_datetime(&dt),
            Err(Error::DateTime(DateTimeError::YearOutOfRange))
        );
        i2c.done();
    }
}
