//! Alarm register packing for the PCF8563 RTC.
//!
//! The PCF8563 has four alarm registers (minute, hour, day, weekday). Each
//! holds a BCD match value plus an AE bit (bit 7); setting AE removes that
//! field from matching. The alarm fires when every enabled field matches.
//!
//! Fields are modelled as [`AlarmField::Active`] or [`AlarmField::Disabled`].
//! The raw-value API keeps the [`NO_ALARM`] sentinel: any value outside a
//! field's range packs as disabled, and a disabled field converts back to
//! [`NO_ALARM`].

use core::ops::RangeInclusive;

use crate::datetime::{decode_bcd, encode_bcd};
use crate::registers::AlarmRegister;

/// Raw sentinel for "no alarm on this field".
pub const NO_ALARM: u8 = 99;

/// Valid minute alarm values.
pub const MINUTE_RANGE: RangeInclusive<u8> = 0..=59;
/// Valid hour alarm values.
pub const HOUR_RANGE: RangeInclusive<u8> = 0..=23;
/// Valid day-of-month alarm values.
pub const DAY_RANGE: RangeInclusive<u8> = 1..=31;
/// Valid weekday alarm values.
pub const WEEKDAY_RANGE: RangeInclusive<u8> = 0..=6;

const MINUTE_MASK: u8 = 0b0111_1111;
const HOUR_MASK: u8 = 0b0011_1111;
const DAY_MASK: u8 = 0b0011_1111;
const WEEKDAY_MASK: u8 = 0b0000_0111;

/// Packs one alarm field.
///
/// Values within `min..=max` are BCD encoded with AE clear; anything else
/// produces a register with only AE set, disabling the field.
pub fn pack_alarm_field(value: u8, min: u8, max: u8) -> u8 {
    if (min..=max).contains(&value) {
        let mut reg = AlarmRegister::default();
        reg.set_value(encode_bcd(value));
        u8::from(reg)
    } else {
        disabled_register()
    }
}

fn disabled_register() -> u8 {
    let mut reg = AlarmRegister::default();
    reg.set_alarm_disabled(true);
    u8::from(reg)
}

/// A single alarm field.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmField {
    /// The alarm matches when the clock field equals this value
    Active(u8),
    /// The field does not take part in matching
    Disabled,
}

impl AlarmField {
    /// Builds a field from a raw value, disabling it when out of `range`.
    pub fn from_value(value: u8, range: &RangeInclusive<u8>) -> Self {
        if range.contains(&value) {
            AlarmField::Active(value)
        } else {
            AlarmField::Disabled
        }
    }

    /// Decodes a register byte, masking the BCD value with `mask`.
    pub fn decode(byte: u8, mask: u8) -> Self {
        let reg = AlarmRegister::from(byte);
        if reg.alarm_disabled() {
            AlarmField::Disabled
        } else {
            AlarmField::Active(decode_bcd(byte & mask))
        }
    }

    /// Packs the field for a register whose valid values are `range`.
    ///
    /// An active value outside `range` packs as disabled.
    pub fn pack(&self, range: &RangeInclusive<u8>) -> u8 {
        match *self {
            AlarmField::Active(value) => pack_alarm_field(value, *range.start(), *range.end()),
            AlarmField::Disabled => disabled_register(),
        }
    }

    /// Returns `true` if the field takes part in matching.
    pub fn is_active(&self) -> bool {
        matches!(self, AlarmField::Active(_))
    }
}

impl From<AlarmField> for u8 {
    /// Active values convert as-is; disabled fields become [`NO_ALARM`].
    fn from(field: AlarmField) -> Self {
        match field {
            AlarmField::Active(value) => value,
            AlarmField::Disabled => NO_ALARM,
        }
    }
}

/// The four PCF8563 alarm fields.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Alarm {
    /// Minute (0-59)
    pub minute: AlarmField,
    /// Hour (0-23)
    pub hour: AlarmField,
    /// Day of month (1-31)
    pub day: AlarmField,
    /// Day of week (0-6)
    pub weekday: AlarmField,
}

impl Alarm {
    /// Builds an alarm from raw values; out-of-range values disable their
    /// field, so [`NO_ALARM`] works for any of them.
    pub fn new(minute: u8, hour: u8, day: u8, weekday: u8) -> Self {
        Self {
            minute: AlarmField::from_value(minute, &MINUTE_RANGE),
            hour: AlarmField::from_value(hour, &HOUR_RANGE),
            day: AlarmField::from_value(day, &DAY_RANGE),
            weekday: AlarmField::from_value(weekday, &WEEKDAY_RANGE),
        }
    }

    /// An alarm with every field disabled.
    pub fn disabled() -> Self {
        Self {
            minute: AlarmField::Disabled,
            hour: AlarmField::Disabled,
            day: AlarmField::Disabled,
            weekday: AlarmField::Disabled,
        }
    }

    /// Decodes the minute, hour, day and weekday alarm registers.
    pub fn from_registers(data: [u8; 4]) -> Self {
        Self {
            minute: AlarmField::decode(data[0], MINUTE_MASK),
            hour: AlarmField::decode(data[1], HOUR_MASK),
            day: AlarmField::decode(data[2], DAY_MASK),
            weekday: AlarmField::decode(data[3], WEEKDAY_MASK),
        }
    }

    /// Encodes into the minute, hour, day and weekday alarm registers.
    pub fn to_registers(&self) -> [u8; 4] {
        [
            self.minute.pack(&MINUTE_RANGE),
            self.hour.pack(&HOUR_RANGE),
            self.day.pack(&DAY_RANGE),
            self.weekday.pack(&WEEKDAY_RANGE),
        ]
    }
}

impl Default for Alarm {
    fn default() -> Self {
        Self::disabled()
    }
}
