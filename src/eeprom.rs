//! Driver for 24LC-family paged EEPROMs.
//!
//! The device accepts up to one page per write transaction. A write that
//! starts inside a page and runs past its end wraps around to the start of
//! the same page (or is cut short, depending on the part), silently
//! corrupting data. [`Eeprom24::write`] therefore rejects such writes before
//! any bus activity; [`Eeprom24::write_paged`] splits arbitrary spans at page
//! boundaries instead. Reads have no such restriction.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::Error;

/// Default 7-bit I2C address of the EEPROM.
pub const EEPROM_ADDRESS: u8 = 0x52;

/// Page size in bytes.
pub const PAGE_SIZE: usize = 64;

/// Largest payload accepted by a single write transaction.
pub const MAX_PAYLOAD: usize = PAGE_SIZE;

/// Time the device needs to commit a page write.
pub const WRITE_CYCLE_MS: u32 = 5;

/// Reasons a write span is rejected.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PageError {
    /// The span starts inside a page and does not fit before the boundary
    UnalignedOverflow,
    /// The span starts on a boundary but exceeds one transfer
    PayloadTooLarge,
}

/// A contiguous span of EEPROM addresses to be written in one transaction.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PageSpan {
    /// First address of the span
    pub start: u16,
    /// Number of bytes
    pub len: usize,
}

impl PageSpan {
    /// Creates a span.
    pub fn new(start: u16, len: usize) -> Self {
        Self { start, len }
    }

    /// Offset of the start address within its page.
    pub fn offset_in_page(&self) -> usize {
        usize::from(self.start) % PAGE_SIZE
    }

    /// Bytes left between the start address and the next page boundary.
    pub fn room_in_page(&self) -> usize {
        PAGE_SIZE - self.offset_in_page()
    }

    /// Checks that the span can be written in a single transaction.
    ///
    /// # Errors
    ///
    /// - [`PageError::PayloadTooLarge`] if a page-aligned span is longer than
    ///   [`MAX_PAYLOAD`].
    /// - [`PageError::UnalignedOverflow`] if an unaligned span is longer than
    ///   the room left in its page.
    pub fn check(&self) -> Result<(), PageError> {
        if self.offset_in_page() == 0 {
            if self.len > MAX_PAYLOAD {
                return Err(PageError::PayloadTooLarge);
            }
        } else if self.len > self.room_in_page() {
            return Err(PageError::UnalignedOverflow);
        }
        Ok(())
    }

    /// Splits `len` bytes starting at `start` into spans that each pass
    /// [`check`](Self::check).
    pub fn split(start: u16, len: usize) -> PageSplit {
        PageSplit {
            next: usize::from(start),
            remaining: len,
        }
    }
}

/// Iterator over page-sized pieces of a span, produced by [`PageSpan::split`].
///
/// Addresses past `0xffff` wrap to zero, matching the device's internal
/// address counter.
#[derive(Debug, Clone)]
pub struct PageSplit {
    next: usize,
    remaining: usize,
}

impl Iterator for PageSplit {
    type Item = PageSpan;

    fn next(&mut self) -> Option<PageSpan> {
        if self.remaining == 0 {
            return None;
        }
        let start = (self.next & 0xffff) as u16;
        let mut span = PageSpan::new(start, 0);
        span.len = self.remaining.min(span.room_in_page());
        self.next += span.len;
        self.remaining -= span.len;
        Some(span)
    }
}

/// 24LC-family EEPROM driver.
pub struct Eeprom24<I2C: I2c> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Eeprom24<I2C> {
    /// Creates a new EEPROM driver instance.
    ///
    /// # Arguments
    /// * `i2c` - The I2C bus implementation
    /// * `address` - The I2C address of the device (typically [`EEPROM_ADDRESS`])
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Releases the I2C bus.
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Writes `data` starting at `address` in a single transaction.
    ///
    /// The word address goes on the bus most significant byte first, followed
    /// by the payload. Bus errors are returned as-is and not retried.
    ///
    /// # Errors
    ///
    /// - [`Error::UnalignedOverflow`] if the write starts inside a page and
    ///   does not fit before the page boundary. Nothing is sent.
    /// - [`Error::PayloadTooLarge`] if a page-aligned write exceeds
    ///   [`MAX_PAYLOAD`]. Nothing is sent.
    /// - [`Error::I2c`] on bus failure.
    pub fn write(&mut self, address: u16, data: &[u8]) -> Result<(), Error<I2C::Error>> {
        let (frame, len) = write_frame::<I2C::Error>(address, data)?;
        debug!("EEPROM: write {} bytes at {:#x}", data.len(), address);
        self.i2c.write(self.address, &frame[..len])?;
        Ok(())
    }

    /// Reads `buf.len()` bytes starting at `address`.
    ///
    /// Reads may span any number of pages.
    pub fn read(&mut self, address: u16, buf: &mut [u8]) -> Result<(), Error<I2C::Error>> {
        debug!("EEPROM: read {} bytes at {:#x}", buf.len(), address);
        self.i2c.write_read(self.address, &address.to_be_bytes(), buf)?;
        Ok(())
    }

    /// Writes `data` starting at `address`, splitting it at page boundaries.
    ///
    /// After each page the driver waits [`WRITE_CYCLE_MS`] for the device to
    /// commit it. Stops at the first bus error; pages already written stay
    /// written.
    pub fn write_paged<D: DelayNs>(
        &mut self,
        address: u16,
        data: &[u8],
        delay: &mut D,
    ) -> Result<(), Error<I2C::Error>> {
        let mut written = 0;
        for span in PageSpan::split(address, data.len()) {
            self.write(span.start, &data[written..written + span.len])?;
            written += span.len;
            delay.delay_ms(WRITE_CYCLE_MS);
        }
        Ok(())
    }
}

/// Validates a write and builds its bus frame: word address then payload.
///
/// Returns the frame buffer and the number of bytes of it to send.
pub(crate) fn write_frame<E>(
    address: u16,
    data: &[u8],
) -> Result<([u8; 2 + MAX_PAYLOAD], usize), Error<E>> {
    PageSpan::new(address, data.len()).check().map_err(|e| {
        warn!(
            "EEPROM: rejected {} byte write at {:#x}: {:?}",
            data.len(),
            address,
            e
        );
        Error::from_page_error(e)
    })?;
    let mut frame = [0u8; 2 + MAX_PAYLOAD];
    frame[..2].copy_from_slice(&address.to_be_bytes());
    frame[2..2 + data.len()].copy_from_slice(data);
    Ok((frame, 2 + data.len()))
}
