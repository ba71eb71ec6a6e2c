//! Driver for the PCF8574 8-bit I/O expander.
//!
//! The device has no registers: a one-byte write sets all eight quasi-bidirectional
//! pins, a one-byte read returns their levels. The driver keeps a pin byte that
//! the pin operations modify locally; [`Pcf8574::write_pins`] sends it and
//! [`Pcf8574::read_pins`] refreshes it.

use embedded_hal::i2c::I2c;

use crate::Error;

/// Default 7-bit I2C address of the PCF8574.
pub const EXPANDER_ADDRESS: u8 = 0x38;
/// Address with all three address pins grounded.
pub const EXPANDER_ADDRESS_LOW: u8 = 0x40;
/// Address with all three address pins high.
pub const EXPANDER_ADDRESS_HIGH: u8 = 0x4e;

const PIN_COUNT: u8 = 8;

pub(crate) fn pin_mask<E>(pin: u8) -> Result<u8, Error<E>> {
    if pin < PIN_COUNT {
        Ok(1 << pin)
    } else {
        warn!("PCF8574: no pin {}", pin);
        Err(Error::InvalidParameter)
    }
}

/// PCF8574 port expander driver.
pub struct Pcf8574<I2C: I2c> {
    i2c: I2C,
    address: u8,
    pins: u8,
}

impl<I2C: I2c> Pcf8574<I2C> {
    /// Creates a new driver with every cached pin low.
    ///
    /// # Arguments
    /// * `i2c` - The I2C bus implementation
    /// * `address` - The I2C address of the device (typically [`EXPANDER_ADDRESS`])
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            pins: 0,
        }
    }

    /// Releases the I2C bus.
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// The cached pin byte.
    pub fn pins(&self) -> u8 {
        self.pins
    }

    /// Replaces the cached pin byte.
    pub fn set_pins(&mut self, pins: u8) {
        self.pins = pins;
    }

    pub fn set_all_pins(&mut self) {
        self.pins = 0xff;
    }

    pub fn clear_all_pins(&mut self) {
        self.pins = 0x00;
    }

    /// Sets `pin` (0-7) high in the cache.
    pub fn set_pin(&mut self, pin: u8) -> Result<(), Error<I2C::Error>> {
        self.pins |= pin_mask::<I2C::Error>(pin)?;
        Ok(())
    }

    /// Sets `pin` (0-7) low in the cache.
    pub fn clear_pin(&mut self, pin: u8) -> Result<(), Error<I2C::Error>> {
        self.pins &= !pin_mask::<I2C::Error>(pin)?;
        Ok(())
    }

    /// Whether `pin` (0-7) is high in the cache.
    pub fn is_pin_set(&self, pin: u8) -> Result<bool, Error<I2C::Error>> {
        Ok(self.pins & pin_mask::<I2C::Error>(pin)? != 0)
    }

    /// Writes the cached pin byte to the device.
    pub fn write_pins(&mut self) -> Result<(), Error<I2C::Error>> {
        debug!("PCF8574: write {:#x}", self.pins);
        self.i2c.write(self.address, &[self.pins])?;
        Ok(())
    }

    /// Reads the pin levels into the cache and returns them.
    ///
    /// On a bus error the cache is left untouched.
    pub fn read_pins(&mut self) -> Result<u8, Error<I2C::Error>> {
        let mut data = [0u8];
        self.i2c.read(self.address, &mut data)?;
        self.pins = data[0];
        debug!("PCF8574: read {:#x}", self.pins);
        Ok(self.pins)
    }
}
