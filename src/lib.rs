//! Platform-agnostic drivers for three simple I2C peripherals.
//!
//! - [`Eeprom24`]: a 24LC-family EEPROM with 64-byte pages. Writes that would
//!   run past the end of a page are rejected before touching the bus, since
//!   the device would silently wrap them inside the page.
//! - [`Pcf8563`]: the PCF8563 real-time clock. Reads and writes its BCD
//!   time/date registers, renders them in several text styles, and manages
//!   the alarm registers and the alarm flags in control/status 2.
//! - [`Pcf8574`]: the PCF8574 8-bit port expander, driven through a cached
//!   pin byte.
//!
//! All drivers are built on the `embedded-hal` 1.0 `I2c` trait. Enable the
//! `async` feature for `embedded-hal-async` versions in [`asynch`].
//!
//! # Example
//!
//! ```rust,ignore
//! use i2c_peripherals::{DateStyle, Pcf8563, TimeStyle, NO_ALARM, RTC_ADDRESS};
//!
//! let mut rtc = Pcf8563::new(i2c, RTC_ADDRESS);
//! let time = rtc.read_time()?;
//! let date = rtc.read_date()?;
//! println!("{} {}", time.format(TimeStyle::Hm), date.format(DateStyle::Us));
//!
//! // alarm at 06:30 on any day
//! rtc.set_alarm(30, 6, NO_ALARM, NO_ALARM)?;
//! ```
//!
//! # Features
//!
//! - `async`: async drivers over `embedded-hal-async`
//! - `log`: debug logging through the `log` crate
//! - `defmt`: debug logging and `defmt::Format` impls through `defmt`

#![no_std]

// Logging macros resolve to defmt, then log, then nothing.
macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::debug!($($arg)*);
        #[cfg(all(feature = "log", not(feature = "defmt")))]
        log::debug!($($arg)*);
        #[cfg(not(any(feature = "log", feature = "defmt")))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

macro_rules! warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::warn!($($arg)*);
        #[cfg(all(feature = "log", not(feature = "defmt")))]
        log::warn!($($arg)*);
        #[cfg(not(any(feature = "log", feature = "defmt")))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

macro_rules! error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::error!($($arg)*);
        #[cfg(all(feature = "log", not(feature = "defmt")))]
        log::error!($($arg)*);
        #[cfg(not(any(feature = "log", feature = "defmt")))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

pub mod alarm;
#[cfg(feature = "async")]
pub mod asynch;
pub mod datetime;
pub mod eeprom;
pub mod expander;
pub mod registers;
pub mod rtc;

pub use alarm::{pack_alarm_field, Alarm, AlarmField, NO_ALARM};
pub use datetime::{
    decode_bcd, encode_bcd, DateReading, DateStyle, DateTimeError, TimeReading, TimeStyle,
};
pub use eeprom::{Eeprom24, PageError, PageSpan, EEPROM_ADDRESS, MAX_PAYLOAD, PAGE_SIZE};
pub use expander::{Pcf8574, EXPANDER_ADDRESS, EXPANDER_ADDRESS_HIGH, EXPANDER_ADDRESS_LOW};
pub use registers::{ClockOut, RegAddr, Status1, Status2};
pub use rtc::{Config, Pcf8563, StatusRefresh, RTC_ADDRESS};

/// Errors returned by every driver in this crate.
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<I2CE> {
    /// The bus reported an error; passed through unchanged and never retried
    I2c(I2CE),
    /// An EEPROM write starting inside a page would cross the page boundary
    UnalignedOverflow,
    /// An EEPROM write is larger than a single page transfer
    PayloadTooLarge,
    /// An argument is outside the set the device accepts
    InvalidParameter,
    /// Date/time conversion error
    DateTime(DateTimeError),
}

impl<I2CE> From<I2CE> for Error<I2CE> {
    fn from(e: I2CE) -> Self {
        Error::I2c(e)
    }
}

impl<I2CE> Error<I2CE> {
    pub(crate) fn from_page_error(e: PageError) -> Self {
        match e {
            PageError::UnalignedOverflow => Error::UnalignedOverflow,
            PageError::PayloadTooLarge => Error::PayloadTooLarge,
        }
    }
}
