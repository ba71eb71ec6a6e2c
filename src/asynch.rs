//! Async versions of the drivers.
//!
//! These mirror [`crate::Eeprom24`], [`crate::Pcf8563`] and [`crate::Pcf8574`]
//! over the `embedded-hal-async` traits and share their validation, packing
//! and status-cache rules. Only available with the `async` feature.
//!
//! # Example
//!
//! ```rust,ignore
//! use i2c_peripherals::asynch::{Eeprom24, Pcf8563};
//! use i2c_peripherals::{EEPROM_ADDRESS, RTC_ADDRESS};
//!
//! let mut rtc = Pcf8563::new(i2c, RTC_ADDRESS);
//! let time = rtc.read_time().await?;
//!
//! let mut eeprom = Eeprom24::new(other_i2c, EEPROM_ADDRESS);
//! eeprom.write_paged(0x3c, b"log entry", &mut delay).await?;
//! ```

use chrono::NaiveDateTime;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use heapless::String;

use crate::alarm::Alarm;
use crate::datetime::{DateReading, DateStyle, Pcf8563DateTime, TimeReading, TimeStyle};
use crate::eeprom::{write_frame, PageSpan, WRITE_CYCLE_MS};
use crate::expander::pin_mask;
use crate::registers::{ClockOut, RegAddr, Status1, Status2};
use crate::rtc::{Config, StatusRefresh};
use crate::Error;

/// 24LC-family EEPROM async driver.
pub struct Eeprom24<I2C: I2c> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Eeprom24<I2C> {
    /// Creates a new EEPROM async driver instance.
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Releases the I2C bus.
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Writes `data` starting at `address` in a single transaction.
    ///
    /// See [`crate::Eeprom24::write`] for the page rules.
    pub async fn write(&mut self, address: u16, data: &[u8]) -> Result<(), Error<I2C::Error>> {
        let (frame, len) = write_frame::<I2C::Error>(address, data)?;
        debug!("EEPROM: write {} bytes at {:#x}", data.len(), address);
        self.i2c.write(self.address, &frame[..len]).await?;
        Ok(())
    }

    /// Reads `buf.len()` bytes starting at `address`.
    pub async fn read(&mut self, address: u16, buf: &mut [u8]) -> Result<(), Error<I2C::Error>> {
        debug!("EEPROM: read {} bytes at {:#x}", buf.len(), address);
        self.i2c
            .write_read(self.address, &address.to_be_bytes(), buf)
            .await?;
        Ok(())
    }

    /// Writes `data` starting at `address`, splitting it at page boundaries
    /// and waiting out the write cycle after each page.
    pub async fn write_paged<D: DelayNs>(
        &mut self,
        address: u16,
        data: &[u8],
        delay: &mut D,
    ) -> Result<(), Error<I2C::Error>> {
        let mut written = 0;
        for span in PageSpan::split(address, data.len()) {
            self.write(span.start, &data[written..written + span.len])
                .await?;
            written += span.len;
            delay.delay_ms(WRITE_CYCLE_MS).await;
        }
        Ok(())
    }
}

/// PCF8563 Real-Time Clock async driver.
pub struct Pcf8563<I2C: I2c> {
    i2c: I2C,
    address: u8,
    config: Config,
    status1: Status1,
    status2: Status2,
    voltage_low: bool,
}

impl<I2C: I2c> Pcf8563<I2C> {
    /// Creates a new PCF8563 async driver instance with the default [`Config`].
    ///
    /// # Arguments
    /// * `i2c` - The async I2C bus implementation
    /// * `address` - The I2C address of the device (typically [`crate::RTC_ADDRESS`])
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self::with_config(i2c, address, Config::default())
    }

    /// Creates a new PCF8563 async driver instance with the given configuration.
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

    pub fn status1(&self) -> Status1 {
        self.status1
    }

    pub fn status2(&self) -> Status2 {
        self.status2
    }

    async fn write_registers(
        &mut self,
        reg: RegAddr,
        data: &[u8],
    ) -> Result<(), Error<I2C::Error>> {
        let mut frame = [0u8; 16];
        frame[0] = reg as u8;
        frame[1..=data.len()].copy_from_slice(data);
        self.i2c.write(self.address, &frame[..=data.len()]).await?;
        Ok(())
    }

    async fn read_registers(
        &mut self,
        reg: RegAddr,
        buf: &mut [u8],
    ) -> Result<(), Error<I2C::Error>> {
        self.i2c.write_read(self.address, &[reg as u8], buf).await?;
        Ok(())
    }

    /// Initializes the clock in a single burst. See [`crate::Pcf8563::init`].
    pub async fn init(&mut self, datetime: &NaiveDateTime) -> Result<(), Error<I2C::Error>> {
        let raw = Pcf8563DateTime::from_datetime(datetime).map_err(Error::DateTime)?;
        let clock: [u8; 7] = (&raw).into();
        let alarm = Alarm::disabled().to_registers();

        let mut data = [0u8; 15];
        data[2..9].copy_from_slice(&clock);
        data[9..13].copy_from_slice(&alarm);
        data[13] = ClockOut::Disabled.into();
        debug!("PCF8563: init {:?}", data);
        self.write_registers(RegAddr::ControlStatus1, &data).await?;

        self.status1 = Status1::default();
        self.status2 = Status2::default();
        self.voltage_low = false;
        Ok(())
    }

    /// Writes zero to both control/status registers.
    pub async fn clear_status(&mut self) -> Result<(), Error<I2C::Error>> {
        self.write_registers(RegAddr::ControlStatus1, &[0, 0])
            .await?;
        self.status1 = Status1::default();
        self.status2 = Status2::default();
        Ok(())
    }

    /// Reads the status registers and the time of day in one burst,
    /// refreshing the cached status on success.
    pub async fn read_time(&mut self) -> Result<TimeReading, Error<I2C::Error>> {
        let mut data = [0u8; 5];
        self.read_registers(RegAddr::ControlStatus1, &mut data)
            .await?;
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
    pub async fn read_date(&mut self) -> Result<DateReading, Error<I2C::Error>> {
        let mut data = [0u8; 4];
        self.read_registers(RegAddr::Days, &mut data).await?;
        Ok(DateReading::from_registers(data))
    }

    pub async fn format_time(&mut self, style: TimeStyle) -> Result<String<8>, Error<I2C::Error>> {
        Ok(self.read_time().await?.format(style))
    }

    pub async fn format_date(
        &mut self,
        style: DateStyle,
    ) -> Result<String<10>, Error<I2C::Error>> {
        Ok(self.read_date().await?.format(style))
    }

    /// Gets the current date and time from the device.
    pub async fn datetime(&mut self) -> Result<NaiveDateTime, Error<I2C::Error>> {
        let mut data = [0u8; 7];
        self.read_registers(RegAddr::VlSeconds, &mut data).await?;
        let raw = Pcf8563DateTime::from(data);
        self.voltage_low = raw.voltage_low;
        raw.into_datetime().map_err(Error::DateTime)
    }

    /// Sets the current date and time on the device.
    pub async fn set_datetime(
        &mut self,
        datetime: &NaiveDateTime,
    ) -> Result<(), Error<I2C::Error>> {
        let raw = Pcf8563DateTime::from_datetime(datetime).map_err(Error::DateTime)?;
        let data: [u8; 7] = (&raw).into();
        self.write_registers(RegAddr::VlSeconds, &data).await?;
        self.voltage_low = false;
        Ok(())
    }

    /// Whether the most recent datetime read reported the VL flag.
    pub fn clock_integrity_lost(&self) -> bool {
        self.voltage_low
    }

    /// Sets the CLKOUT square-wave output; unknown values are rejected with
    /// [`Error::InvalidParameter`] before any bus activity.
    pub async fn set_squarewave(&mut self, frequency: u8) -> Result<(), Error<I2C::Error>> {
        let clock_out = ClockOut::try_from(frequency).map_err(|e| {
            warn!("PCF8563: invalid CLKOUT value {:?}", e);
            Error::InvalidParameter
        })?;
        self.write_registers(RegAddr::ClkoutControl, &[clock_out.into()])
            .await
    }

    async fn status2_base(&mut self) -> Result<Status2, Error<I2C::Error>> {
        if self.config.status_refresh == StatusRefresh::ReadBeforeWrite {
            let mut data = [0u8];
            self.read_registers(RegAddr::ControlStatus2, &mut data)
                .await?;
            self.status2 = Status2::from(data[0]);
        }
        Ok(self.status2)
    }

    async fn update_status2(&mut self, apply: fn(&mut Status2)) -> Result<(), Error<I2C::Error>> {
        let mut status2 = self.status2_base().await?;
        apply(&mut status2);
        debug!("PCF8563: status2 <- {:#x}", u8::from(status2));
        self.write_registers(RegAddr::ControlStatus2, &[status2.into()])
            .await?;
        self.status2 = status2;
        Ok(())
    }

    pub async fn enable_alarm(&mut self) -> Result<(), Error<I2C::Error>> {
        self.update_status2(Status2::enable_alarm).await
    }

    pub async fn clear_alarm(&mut self) -> Result<(), Error<I2C::Error>> {
        self.update_status2(Status2::clear_alarm).await
    }

    pub async fn reset_alarm(&mut self) -> Result<(), Error<I2C::Error>> {
        self.update_status2(Status2::reset_alarm).await
    }

    /// Sets the alarm from raw field values; out-of-range values disable
    /// their field.
    pub async fn set_alarm(
        &mut self,
        minute: u8,
        hour: u8,
        day: u8,
        weekday: u8,
    ) -> Result<(), Error<I2C::Error>> {
        self.set_alarm_fields(&Alarm::new(minute, hour, day, weekday))
            .await
    }

    /// Enables the alarm interrupt, then writes the alarm registers.
    pub async fn set_alarm_fields(&mut self, alarm: &Alarm) -> Result<(), Error<I2C::Error>> {
        let data = alarm.to_registers();
        self.enable_alarm().await?;
        self.write_registers(RegAddr::MinuteAlarm, &data).await
    }

    pub async fn get_alarm(&mut self) -> Result<Alarm, Error<I2C::Error>> {
        let mut data = [0u8; 4];
        self.read_registers(RegAddr::MinuteAlarm, &mut data).await?;
        Ok(Alarm::from_registers(data))
    }

    pub fn alarm_enabled(&self) -> bool {
        self.status2.alarm_interrupt_enable()
    }

    pub fn alarm_active(&self) -> bool {
        self.status2.alarm_flag()
    }
}

/// PCF8574 port expander async driver.
pub struct Pcf8574<I2C: I2c> {
    i2c: I2C,
    address: u8,
    pins: u8,
}

impl<I2C: I2c> Pcf8574<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            pins: 0,
        }
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    pub fn pins(&self) -> u8 {
        self.pins
    }

    pub fn set_pins(&mut self, pins: u8) {
        self.pins = pins;
    }

    pub fn set_all_pins(&mut self) {
        self.pins = 0xff;
    }

    pub fn clear_all_pins(&mut self) {
        self.pins = 0x00;
    }

    pub fn set_pin(&mut self, pin: u8) -> Result<(), Error<I2C::Error>> {
        self.pins |= pin_mask::<I2C::Error>(pin)?;
        Ok(())
    }

    pub fn clear_pin(&mut self, pin: u8) -> Result<(), Error<I2C::Error>> {
        self.pins &= !pin_mask::<I2C::Error>(pin)?;
        Ok(())
    }

    pub fn is_pin_set(&self, pin: u8) -> Result<bool, Error<I2C::Error>> {
        Ok(self.pins & pin_mask::<I2C::Error>(pin)? != 0)
    }

    /// Writes the cached pin byte to the device.
    pub async fn write_pins(&mut self) -> Result<(), Error<I2C::Error>> {
        debug!("PCF8574: write {:#x}", self.pins);
        self.i2c.write(self.address, &[self.pins]).await?;
        Ok(())
    }

    /// Reads the pin levels into the cache; the cache is kept on error.
    pub async fn read_pins(&mut self) -> Result<u8, Error<I2C::Error>> {
        let mut data = [0u8];
        self.i2c.read(self.address, &mut data).await?;
        self.pins = data[0];
        Ok(self.pins)
    }
}
