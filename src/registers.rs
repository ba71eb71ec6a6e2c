//! Register definitions and bitfield structures for the PCF8563 RTC.
//!
//! This module contains the register map, the bitfield views of the status,
//! seconds, month and alarm registers, and the CLKOUT square-wave settings.

use bitfield::bitfield;

/// Register addresses for the PCF8563 RTC.
#[allow(unused)]
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegAddr {
    /// Control/status 1 register
    ControlStatus1 = 0x00,
    /// Control/status 2 register (alarm and timer flags)
    ControlStatus2 = 0x01,
    /// Seconds register with the clock integrity (VL) bit
    VlSeconds = 0x02,
    /// Minutes register (0-59)
    Minutes = 0x03,
    /// Hours register (0-23)
    Hours = 0x04,
    /// Day of month register (1-31)
    Days = 0x05,
    /// Weekday register (0-6)
    Weekdays = 0x06,
    /// Month register (1-12) with the century bit
    CenturyMonths = 0x07,
    /// Year register (0-99)
    Years = 0x08,
    /// Minute alarm register
    MinuteAlarm = 0x09,
    /// Hour alarm register
    HourAlarm = 0x0A,
    /// Day alarm register
    DayAlarm = 0x0B,
    /// Weekday alarm register
    WeekdayAlarm = 0x0C,
    /// CLKOUT control register
    ClkoutControl = 0x0D,
    /// Timer control register
    TimerControl = 0x0E,
    /// Timer countdown value register
    Timer = 0x0F,
}

/// CLKOUT square-wave output settings.
///
/// The raw values are the complete CLKOUT control register contents, with
/// bit 7 (FE) enabling the output and bits 1-0 selecting the frequency.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockOut {
    /// Output disabled (high impedance)
    Disabled = 0b0000_0000,
    /// 32.768 kHz output
    Hz32768 = 0b1000_0000,
    /// 1.024 kHz output
    Hz1024 = 0b1000_0001,
    /// 32 Hz output
    Hz32 = 0b1000_0010,
    /// 1 Hz output
    Hz1 = 0b1000_0011,
}

impl TryFrom<u8> for ClockOut {
    type Error = InvalidClockOut;

    /// Accepts only the five documented CLKOUT register values.
    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0b0000_0000 => Ok(ClockOut::Disabled),
            0b1000_0000 => Ok(ClockOut::Hz32768),
            0b1000_0001 => Ok(ClockOut::Hz1024),
            0b1000_0010 => Ok(ClockOut::Hz32),
            0b1000_0011 => Ok(ClockOut::Hz1),
            _ => Err(InvalidClockOut(v)),
        }
    }
}

impl From<ClockOut> for u8 {
    /// Converts a `ClockOut` to its raw register value.
    fn from(v: ClockOut) -> Self {
        v as u8
    }
}

/// A CLKOUT register value outside the five supported settings.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidClockOut(pub u8);

// Raw byte conversions for the bitfield register types.
macro_rules! from_register_u8 {
    ($typ:ty) => {
        impl From<u8> for $typ {
            fn from(v: u8) -> Self {
                paste::paste!([< $typ >](v))
            }
        }
        impl From<$typ> for u8 {
            fn from(v: $typ) -> Self {
                v.0
            }
        }
    };
}

bitfield! {
    /// Control/status 1 register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Status1(u8);
    impl Debug;
    /// EXT_CLK test mode
    pub test1, set_test1: 7;
    /// Clock stopped
    pub stop, set_stop: 5;
    /// Power-on reset override
    pub testc, set_testc: 3;
}
from_register_u8!(Status1);

#[cfg(feature = "defmt")]
impl defmt::Format for Status1 {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Status1({=u8:#x}", self.0);
        if self.stop() {
            defmt::write!(f, ", STOP");
        }
        defmt::write!(f, ")");
    }
}

bitfield! {
    /// Control/status 2 register.
    ///
    /// The alarm interrupt enable (AIE) and alarm flag (AF) bits are
    /// independent; the transition helpers below touch only their own bits.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Status2(u8);
    impl Debug;
    /// Timer interrupt pulse mode
    pub ti_tp, set_ti_tp: 4;
    /// Alarm flag, set by the device when the alarm matched
    pub alarm_flag, set_alarm_flag: 3;
    /// Timer flag
    pub timer_flag, set_timer_flag: 2;
    /// Alarm interrupt enable
    pub alarm_interrupt_enable, set_alarm_interrupt_enable: 1;
    /// Timer interrupt enable
    pub timer_interrupt_enable, set_timer_interrupt_enable: 0;
}
from_register_u8!(Status2);

impl Status2 {
    /// Acknowledges a fired alarm and enables the alarm interrupt.
    pub fn enable_alarm(&mut self) {
        self.set_alarm_flag(false);
        self.set_alarm_interrupt_enable(true);
    }

    /// Acknowledges a fired alarm and disables the alarm interrupt.
    pub fn clear_alarm(&mut self) {
        self.set_alarm_flag(false);
        self.set_alarm_interrupt_enable(false);
    }

    /// Acknowledges a fired alarm, leaving the interrupt enable untouched.
    pub fn reset_alarm(&mut self) {
        self.set_alarm_flag(false);
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Status2 {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Status2(");
        let mut first = true;
        if self.alarm_interrupt_enable() {
            defmt::write!(f, "AIE");
            first = false;
        }
        if self.alarm_flag() {
            if !first {
                defmt::write!(f, ", ");
            }
            defmt::write!(f, "AF");
            first = false;
        }
        if self.timer_interrupt_enable() {
            if !first {
                defmt::write!(f, ", ");
            }
            defmt::write!(f, "TIE");
            first = false;
        }
        if self.timer_flag() {
            if !first {
                defmt::write!(f, ", ");
            }
            defmt::write!(f, "TF");
            first = false;
        }
        if first {
            defmt::write!(f, "clear");
        }
        defmt::write!(f, ")");
    }
}

bitfield! {
    /// Seconds register (0-59) with BCD encoding and the VL flag.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Seconds(u8);
    impl Debug;
    /// Voltage low: clock integrity is no longer guaranteed
    pub voltage_low, set_voltage_low: 7;
    /// Tens place of seconds (0-5)
    pub ten_seconds, set_ten_seconds: 6, 4;
    /// Ones place of seconds (0-9)
    pub seconds, set_seconds: 3, 0;
}
from_register_u8!(Seconds);

#[cfg(feature = "defmt")]
impl defmt::Format for Seconds {
    fn format(&self, f: defmt::Formatter) {
        let seconds = 10 * self.ten_seconds() + self.seconds();
        defmt::write!(f, "Seconds({}s", seconds);
        if self.voltage_low() {
            defmt::write!(f, ", VL");
        }
        defmt::write!(f, ")");
    }
}

bitfield! {
    /// Month register (1-12) with century flag and BCD encoding.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct CenturyMonths(u8);
    impl Debug;
    /// Century flag (set = 19xx)
    pub century, set_century: 7;
    /// Tens place of month (0-1)
    pub ten_month, set_ten_month: 4, 4;
    /// Ones place of month (0-9)
    pub month, set_month: 3, 0;
}
from_register_u8!(CenturyMonths);

#[cfg(feature = "defmt")]
impl defmt::Format for CenturyMonths {
    fn format(&self, f: defmt::Formatter) {
        let month = 10 * self.ten_month() + self.month();
        defmt::write!(f, "CenturyMonths({}", month);
        if self.century() {
            defmt::write!(f, ", century");
        }
        defmt::write!(f, ")");
    }
}

bitfield! {
    /// One of the four alarm registers.
    ///
    /// Bit 7 (AE) set removes the field from alarm matching; the remaining
    /// bits hold the BCD match value.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct AlarmRegister(u8);
    impl Debug;
    /// Alarm disabled for this field
    pub alarm_disabled, set_alarm_disabled: 7;
    /// BCD match value
    pub value, set_value: 6, 0;
}
from_register_u8!(AlarmRegister);

#[cfg(feature = "defmt")]
impl defmt::Format for AlarmRegister {
    fn format(&self, f: defmt::Formatter) {
        if self.alarm_disabled() {
            defmt::write!(f, "AlarmRegister(disabled)");
        } else {
            defmt::write!(f, "AlarmRegister({=u8:#x})", self.value());
        }
    }
}
