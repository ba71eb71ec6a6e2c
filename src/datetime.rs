//! BCD codec and date/time readings for the PCF8563 RTC.
//!
//! This module converts between the PCF8563's packed BCD registers and the
//! logical [`TimeReading`] and [`DateReading`] values, renders them as text in
//! the supported styles, and bridges to chrono's `NaiveDateTime`.
//!
//! # Register Model
//!
//! The PCF8563 stores date and time in 7 consecutive registers starting at
//! `0x02`: Seconds, Minutes, Hours, Days, Weekdays, Century/Months, Years.
//! Only the low bits of most registers hold BCD data; the rest are control or
//! unused bits that are masked off before decoding.
//!
//! # Century
//!
//! The century bit selects between exactly two centuries: set means 19xx,
//! clear means 20xx. This is a fixed rule, not a rolling window.

use core::fmt::{self, Write};

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use heapless::String;

use crate::registers::{CenturyMonths, Seconds};

const SECONDS_MASK: u8 = 0x7f;
const MINUTES_MASK: u8 = 0x7f;
const HOURS_MASK: u8 = 0x3f;
const DAYS_MASK: u8 = 0x3f;
const WEEKDAYS_MASK: u8 = 0x07;
const MONTHS_MASK: u8 = 0x1f;

/// Decodes a packed BCD byte: the high nibble is tens, the low nibble ones.
pub fn decode_bcd(value: u8) -> u8 {
    (value >> 4) * 10 + (value & 0x0f)
}

/// Encodes a value in `0..=99` as packed BCD.
///
/// Larger values do not fit two digits; callers range-check first.
pub fn encode_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

/// Errors that can occur during PCF8563 date/time conversion.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DateTimeError {
    /// The decoded registers do not form a valid calendar date or time
    InvalidDateTime,
    /// The year is outside the 1900-2099 span the century bit can express
    YearOutOfRange,
}

/// Time style for [`TimeReading::format`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeStyle {
    /// `HH:MM:SS`
    Hms = 0x01,
    /// `HH:MM`
    Hm = 0x02,
}

impl From<u8> for TimeStyle {
    /// Unrecognized style values fall back to [`TimeStyle::Hms`].
    fn from(v: u8) -> Self {
        match v {
            0x02 => TimeStyle::Hm,
            _ => TimeStyle::Hms,
        }
    }
}

/// Date style for [`DateReading::format`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DateStyle {
    /// `DD-MM-YYYY`
    World = 0x01,
    /// `YYYY-MM-DD`
    Asia = 0x02,
    /// `MM/DD/YYYY`
    Us = 0x04,
}

impl From<u8> for DateStyle {
    /// Unrecognized style values fall back to [`DateStyle::World`].
    fn from(v: u8) -> Self {
        match v {
            0x02 => DateStyle::Asia,
            0x04 => DateStyle::Us,
            _ => DateStyle::World,
        }
    }
}

/// Time of day decoded from the seconds, minutes and hours registers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeReading {
    /// Hour (0-23)
    pub hour: u8,
    /// Minute (0-59)
    pub minute: u8,
    /// Second (0-59)
    pub second: u8,
}

impl TimeReading {
    /// Decodes the seconds, minutes and hours registers, in device order.
    pub fn from_registers(data: [u8; 3]) -> Self {
        Self {
            second: decode_bcd(data[0] & SECONDS_MASK),
            minute: decode_bcd(data[1] & MINUTES_MASK),
            hour: decode_bcd(data[2] & HOURS_MASK),
        }
    }

    /// Encodes into the seconds, minutes and hours registers.
    ///
    /// The VL bit is written clear.
    pub fn to_registers(&self) -> [u8; 3] {
        [
            encode_bcd(self.second),
            encode_bcd(self.minute),
            encode_bcd(self.hour),
        ]
    }

    /// Renders the time with two zero-padded digits per field.
    pub fn format(&self, style: TimeStyle) -> String<8> {
        let mut out = String::new();
        push_pair(&mut out, self.hour);
        push_char(&mut out, ':');
        push_pair(&mut out, self.minute);
        if style == TimeStyle::Hms {
            push_char(&mut out, ':');
            push_pair(&mut out, self.second);
        }
        out
    }

    /// Converts to a chrono `NaiveTime`.
    ///
    /// # Errors
    ///
    /// Returns [`DateTimeError::InvalidDateTime`] if any field is out of range.
    pub fn to_naive_time(&self) -> Result<NaiveTime, DateTimeError> {
        NaiveTime::from_hms_opt(
            u32::from(self.hour),
            u32::from(self.minute),
            u32::from(self.second),
        )
        .ok_or(DateTimeError::InvalidDateTime)
    }
}

impl From<&NaiveTime> for TimeReading {
    fn from(time: &NaiveTime) -> Self {
        // chrono bounds these well below u8::MAX
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
            second: time.second() as u8,
        }
    }
}

impl fmt::Display for TimeReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(TimeStyle::Hms))
    }
}

/// Calendar date decoded from the days, weekdays, month and years registers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DateReading {
    /// Day of month (1-31)
    pub day: u8,
    /// Day of week (0-6, 0 = Sunday)
    pub weekday: u8,
    /// Month (1-12)
    pub month: u8,
    /// Year within the century (0-99)
    pub year: u8,
    /// Century flag: set means 19xx, clear means 20xx
    pub century: bool,
}

impl DateReading {
    /// Decodes the days, weekdays, century/months and years registers, in
    /// device order.
    pub fn from_registers(data: [u8; 4]) -> Self {
        let century_month = CenturyMonths::from(data[2]);
        Self {
            day: decode_bcd(data[0] & DAYS_MASK),
            weekday: decode_bcd(data[1] & WEEKDAYS_MASK),
            century: century_month.century(),
            month: decode_bcd(data[2] & MONTHS_MASK),
            year: decode_bcd(data[3]),
        }
    }

    /// Encodes into the days, weekdays, century/months and years registers.
    pub fn to_registers(&self) -> [u8; 4] {
        let mut century_month = CenturyMonths::from(encode_bcd(self.month));
        century_month.set_century(self.century);
        [
            encode_bcd(self.day),
            encode_bcd(self.weekday),
            u8::from(century_month),
            encode_bcd(self.year),
        ]
    }

    /// The two leading digits of the rendered year.
    pub fn century_prefix(&self) -> &'static str {
        if self.century {
            "19"
        } else {
            "20"
        }
    }

    /// The full four-digit year.
    pub fn full_year(&self) -> u16 {
        let base = if self.century { 1900 } else { 2000 };
        base + u16::from(self.year)
    }

    /// Renders the date with a four-digit year.
    pub fn format(&self, style: DateStyle) -> String<10> {
        let mut out = String::new();
        match style {
            DateStyle::Asia => {
                self.push_year(&mut out);
                push_char(&mut out, '-');
                push_pair(&mut out, self.month);
                push_char(&mut out, '-');
                push_pair(&mut out, self.day);
            }
            DateStyle::Us => {
                push_pair(&mut out, self.month);
                push_char(&mut out, '/');
                push_pair(&mut out, self.day);
                push_char(&mut out, '/');
                self.push_year(&mut out);
            }
            DateStyle::World => {
                push_pair(&mut out, self.day);
                push_char(&mut out, '-');
                push_pair(&mut out, self.month);
                push_char(&mut out, '-');
                self.push_year(&mut out);
            }
        }
        out
    }

    fn push_year(&self, out: &mut String<10>) {
        // fits: the buffer is sized for the longest style
        let _ = out.push_str(self.century_prefix());
        push_pair(out, self.year);
    }

    /// Converts to a chrono `NaiveDate`.
    ///
    /// # Errors
    ///
    /// Returns [`DateTimeError::InvalidDateTime`] if the registers do not
    /// describe a real calendar day.
    pub fn to_naive_date(&self) -> Result<NaiveDate, DateTimeError> {
        NaiveDate::from_ymd_opt(
            i32::from(self.full_year()),
            u32::from(self.month),
            u32::from(self.day),
        )
        .ok_or(DateTimeError::InvalidDateTime)
    }
}

impl TryFrom<&NaiveDate> for DateReading {
    type Error = DateTimeError;

    fn try_from(date: &NaiveDate) -> Result<Self, Self::Error> {
        let (century, year) = match date.year() {
            y @ 1900..=1999 => (true, y - 1900),
            y @ 2000..=2099 => (false, y - 2000),
            y => {
                error!("year {} cannot be stored in the PCF8563", y);
                return Err(DateTimeError::YearOutOfRange);
            }
        };
        Ok(Self {
            day: date.day() as u8,
            weekday: date.weekday().num_days_from_sunday() as u8,
            month: date.month() as u8,
            year: u8::try_from(year).map_err(|_| DateTimeError::YearOutOfRange)?,
            century,
        })
    }
}

impl fmt::Display for DateReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(DateStyle::World))
    }
}

/// Internal representation of the 7 date/time registers starting at seconds.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) struct Pcf8563DateTime {
    pub(crate) time: TimeReading,
    pub(crate) date: DateReading,
    pub(crate) voltage_low: bool,
}

impl Pcf8563DateTime {
    pub(crate) fn from_datetime(datetime: &NaiveDateTime) -> Result<Self, DateTimeError> {
        let raw = Self {
            time: TimeReading::from(&datetime.time()),
            date: DateReading::try_from(&datetime.date())?,
            voltage_low: false,
        };
        debug!("raw={:?}", raw);
        Ok(raw)
    }

    pub(crate) fn into_datetime(self) -> Result<NaiveDateTime, DateTimeError> {
        let date = self.date.to_naive_date()?;
        let time = self.time.to_naive_time()?;
        Ok(NaiveDateTime::new(date, time))
    }
}

impl From<[u8; 7]> for Pcf8563DateTime {
    fn from(data: [u8; 7]) -> Self {
        Pcf8563DateTime {
            time: TimeReading::from_registers([data[0], data[1], data[2]]),
            date: DateReading::from_registers([data[3], data[4], data[5], data[6]]),
            voltage_low: Seconds::from(data[0]).voltage_low(),
        }
    }
}

impl From<&Pcf8563DateTime> for [u8; 7] {
    fn from(dt: &Pcf8563DateTime) -> [u8; 7] {
        let [seconds, minutes, hours] = dt.time.to_registers();
        let [days, weekdays, months, years] = dt.date.to_registers();
        let mut seconds = Seconds::from(seconds);
        seconds.set_voltage_low(dt.voltage_low);
        [
            u8::from(seconds),
            minutes,
            hours,
            days,
            weekdays,
            months,
            years,
        ]
    }
}

fn push_pair<const N: usize>(out: &mut String<N>, value: u8) {
    // value / 10 is at most 25, so both digits stay single ASCII bytes
    push_char(out, char::from(b'0' + value / 10));
    push_char(out, char::from(b'0' + value % 10));
}

fn push_char<const N: usize>(out: &mut String<N>, c: char) {
    // capacity is sized for the widest style of each reading
    let _ = out.write_char(c);
}
